use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use shared_utils::{auth_middleware, AppState};

use crate::handlers;

pub fn appointment_routes(state: Arc<AppState>) -> Router {
    // Every appointment operation requires authentication
    let protected_routes = Router::new()
        .route("/", post(handlers::book_appointment))
        .route("/me", get(handlers::my_appointments))
        .route(
            "/{appointment_id}",
            get(handlers::get_appointment).delete(handlers::cancel_appointment),
        )
        .route("/{appointment_id}/complete", post(handlers::complete_appointment))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new().merge(protected_routes).with_state(state)
}
