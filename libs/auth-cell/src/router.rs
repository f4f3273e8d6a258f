use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use shared_utils::{auth_middleware, AppState};

use crate::handlers;

pub fn auth_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .with_state(state)
}

pub fn user_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/me", get(handlers::me))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}
