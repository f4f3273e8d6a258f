use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    Json,
};

use shared_models::error::AppError;
use shared_models::{Account, Appointment};
use shared_utils::{AppJson, AppState};

use crate::models::{BookAppointmentRequest, BookingReceipt, StatusMessage};
use crate::services::BookingService;

#[axum::debug_handler]
pub async fn book_appointment(
    State(state): State<Arc<AppState>>,
    Extension(account): Extension<Account>,
    AppJson(request): AppJson<BookAppointmentRequest>,
) -> Result<Json<BookingReceipt>, AppError> {
    let receipt = BookingService::from_state(&state).book(&account, request).await?;
    Ok(Json(receipt))
}

pub async fn my_appointments(
    State(state): State<Arc<AppState>>,
    Extension(account): Extension<Account>,
) -> Result<Json<Vec<Appointment>>, AppError> {
    let appointments = BookingService::from_state(&state).list_mine(&account).await?;
    Ok(Json(appointments))
}

pub async fn get_appointment(
    State(state): State<Arc<AppState>>,
    Extension(account): Extension<Account>,
    Path(appointment_id): Path<i64>,
) -> Result<Json<Appointment>, AppError> {
    let appointment = BookingService::from_state(&state)
        .get(&account, appointment_id)
        .await?;
    Ok(Json(appointment))
}

pub async fn cancel_appointment(
    State(state): State<Arc<AppState>>,
    Extension(account): Extension<Account>,
    Path(appointment_id): Path<i64>,
) -> Result<Json<StatusMessage>, AppError> {
    BookingService::from_state(&state)
        .cancel(&account, appointment_id)
        .await?;
    Ok(Json(StatusMessage::new("cancelled")))
}

pub async fn complete_appointment(
    State(state): State<Arc<AppState>>,
    Extension(account): Extension<Account>,
    Path(appointment_id): Path<i64>,
) -> Result<Json<StatusMessage>, AppError> {
    BookingService::from_state(&state)
        .complete(&account, appointment_id)
        .await?;
    Ok(Json(StatusMessage::new("completed")))
}
