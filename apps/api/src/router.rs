use std::sync::Arc;

use axum::{routing::get, Router};
use tower::Layer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::trace::{self, TraceLayer};
use tracing::Level;

use admin_cell::admin_routes;
use appointment_cell::appointment_routes;
use auth_cell::{auth_routes, user_routes};
use doctor_cell::{availability_routes, clinic_routes, doctor_routes};
use notification_cell::notification_routes;
use shared_utils::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(|| async { "Clinic Booking API is running!" }))
        .nest("/auth", auth_routes(state.clone()))
        .nest("/users", user_routes(state.clone()))
        .nest("/clinics", clinic_routes(state.clone()))
        .nest("/doctors", doctor_routes(state.clone()))
        .nest("/availability", availability_routes(state.clone()))
        .nest("/appointments", appointment_routes(state.clone()))
        .nest("/notifications", notification_routes(state.clone()))
        .nest("/admin", admin_routes(state))
}

/// The full service: routes plus tracing and CORS, with trailing slashes
/// trimmed before routing so `/doctors/` and `/doctors` hit the same handler.
pub fn create_app(state: Arc<AppState>) -> NormalizePath<Router> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let router = create_router(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(trace::DefaultMakeSpan::new().level(Level::INFO))
                .on_response(trace::DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors);

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
