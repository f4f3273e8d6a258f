pub mod account;
pub mod appointment;
pub mod auth;
pub mod directory;
pub mod error;
pub mod notification;

pub use account::{Account, AccountProfile};
pub use appointment::{Appointment, AppointmentStatus};
pub use auth::{Role, SessionClaims, TokenResponse};
pub use directory::{Availability, Clinic, Doctor, DoctorListing};
pub use error::AppError;
pub use notification::Notification;
