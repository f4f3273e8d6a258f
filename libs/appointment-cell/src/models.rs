use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_database::DatabaseError;
use shared_models::error::AppError;
use shared_models::AppointmentStatus;

#[derive(Debug, Clone, Deserialize)]
pub struct BookAppointmentRequest {
    pub doctor_id: i64,
    pub date: NaiveDate,
    pub time: NaiveTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingReceipt {
    pub message: String,
    pub appointment_id: i64,
}

impl BookingReceipt {
    pub fn booked(appointment_id: i64) -> Self {
        Self {
            message: "booked".to_string(),
            appointment_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusMessage {
    pub message: String,
}

impl StatusMessage {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

#[derive(Error, Debug)]
pub enum AppointmentError {
    #[error("Appointment not found")]
    NotFound,

    #[error("Doctor not found")]
    DoctorNotFound,

    #[error("Time slot not available")]
    SlotConflict,

    #[error("Appointment time must be a whole second")]
    InvalidTime,

    #[error("Not authorized")]
    Forbidden,

    #[error("Cannot move appointment from {from} to {to}")]
    InvalidStatusTransition { from: AppointmentStatus, to: AppointmentStatus },

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl From<rusqlite::Error> for AppointmentError {
    fn from(err: rusqlite::Error) -> Self {
        AppointmentError::Database(err.into())
    }
}

impl From<AppointmentError> for AppError {
    fn from(err: AppointmentError) -> Self {
        match err {
            AppointmentError::NotFound | AppointmentError::DoctorNotFound => AppError::NotFound(err.to_string()),
            AppointmentError::SlotConflict => AppError::Conflict(err.to_string()),
            AppointmentError::InvalidTime => AppError::ValidationError(err.to_string()),
            AppointmentError::Forbidden => AppError::Forbidden(err.to_string()),
            AppointmentError::InvalidStatusTransition { .. } => AppError::BadRequest(err.to_string()),
            AppointmentError::Database(e) => e.into(),
        }
    }
}
