use thiserror::Error;

use shared_database::DatabaseError;
use shared_models::error::AppError;

#[derive(Error, Debug)]
pub enum NotificationError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl From<NotificationError> for AppError {
    fn from(err: NotificationError) -> Self {
        match err {
            NotificationError::ValidationError(msg) => AppError::ValidationError(msg),
            NotificationError::Database(e) => e.into(),
        }
    }
}
