use std::sync::Arc;

use axum::{extract::State, Json};
use tracing::debug;

use shared_models::error::AppError;
use shared_utils::{AppJson, AppState, EmailMessage};

use crate::error::NotificationError;
use crate::models::{DispatchSummary, ScheduledResponse, SendNotificationRequest};
use crate::services::NotificationDispatcher;

pub async fn send_notification(
    State(state): State<Arc<AppState>>,
    AppJson(request): AppJson<SendNotificationRequest>,
) -> Result<Json<ScheduledResponse>, AppError> {
    let email = request.email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(NotificationError::ValidationError("A valid email address is required".to_string()).into());
    }

    debug!("Scheduling ad-hoc email to {}", email);
    state
        .email_queue
        .schedule(EmailMessage::new(email, request.subject, request.message));

    Ok(Json(ScheduledResponse::scheduled()))
}

pub async fn dispatch_pending(State(state): State<Arc<AppState>>) -> Result<Json<DispatchSummary>, AppError> {
    let sent = NotificationDispatcher::from_state(&state).dispatch_pending().await?;
    Ok(Json(DispatchSummary { sent }))
}
