use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use shared_utils::{auth_middleware, AppState};

use crate::handlers;

pub fn clinic_routes(state: Arc<AppState>) -> Router {
    let public_routes = Router::new().route("/", get(handlers::list_clinics));

    let protected_routes = Router::new()
        .route("/", post(handlers::create_clinic))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}

pub fn doctor_routes(state: Arc<AppState>) -> Router {
    let public_routes = Router::new()
        .route("/", get(handlers::list_doctors))
        .route("/{doctor_id}", get(handlers::get_doctor));

    let protected_routes = Router::new()
        .route("/", post(handlers::create_doctor))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}

pub fn availability_routes(state: Arc<AppState>) -> Router {
    let public_routes = Router::new().route("/{doctor_id}", get(handlers::list_availability));

    let protected_routes = Router::new()
        .route("/", post(handlers::add_availability))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}
