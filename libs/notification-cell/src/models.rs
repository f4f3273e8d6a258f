use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct SendNotificationRequest {
    pub email: String,
    pub subject: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledResponse {
    pub status: String,
}

impl ScheduledResponse {
    pub fn scheduled() -> Self {
        Self {
            status: "scheduled".to_string(),
        }
    }
}

/// Number of notification rows a dispatch run visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchSummary {
    pub sent: usize,
}
