pub mod error;
pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use error::NotificationError;
pub use models::{DispatchSummary, ScheduledResponse, SendNotificationRequest};
pub use router::notification_routes;
pub use services::{DispatchSweeper, EmailWorker, NotificationDispatcher};
