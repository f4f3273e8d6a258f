use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use thiserror::Error;

use shared_database::DatabaseError;
use shared_models::error::AppError;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateClinicRequest {
    pub name: String,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateDoctorRequest {
    pub name: String,
    pub specialty: Option<String>,
    pub clinic_id: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateAvailabilityRequest {
    pub doctor_id: i64,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("Doctor not found")]
    DoctorNotFound(i64),

    #[error("Clinic not found")]
    ClinicNotFound(i64),

    #[error("start_time must be before end_time")]
    InvalidTimeRange,

    #[error("{0}")]
    ValidationError(String),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl From<DirectoryError> for AppError {
    fn from(err: DirectoryError) -> Self {
        match err {
            DirectoryError::DoctorNotFound(_) | DirectoryError::ClinicNotFound(_) => AppError::NotFound(err.to_string()),
            DirectoryError::InvalidTimeRange | DirectoryError::ValidationError(_) => {
                AppError::ValidationError(err.to_string())
            }
            DirectoryError::Database(e) => e.into(),
        }
    }
}
