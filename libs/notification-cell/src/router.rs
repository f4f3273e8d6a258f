use std::sync::Arc;

use axum::{routing::post, Router};

use shared_utils::AppState;

use crate::handlers;

pub fn notification_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/send", post(handlers::send_notification))
        .route("/dispatch_pending", post(handlers::dispatch_pending))
        .with_state(state)
}
