use std::sync::Arc;

use axum::{middleware, routing::get, Router};

use shared_utils::{auth_middleware, AppState};

use crate::handlers;

pub fn admin_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/users", get(handlers::list_users))
        .route("/appointments", get(handlers::list_appointments))
        .route("/stats", get(handlers::stats))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}
