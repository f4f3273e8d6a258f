use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: i64,
    pub appointment_id: Option<i64>,
    pub message: String,
    pub sent: bool,
    pub created_at: DateTime<Utc>,
}
