pub mod booking;
pub mod lifecycle;

pub use booking::BookingService;
pub use lifecycle::{AppointmentLifecycleService, Transition};
