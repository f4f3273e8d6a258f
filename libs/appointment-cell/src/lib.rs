pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::{AppointmentError, BookAppointmentRequest, BookingReceipt, StatusMessage};
pub use router::appointment_routes;
pub use services::{AppointmentLifecycleService, BookingService, Transition};
