pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::{CreateAvailabilityRequest, CreateClinicRequest, CreateDoctorRequest, DirectoryError};
pub use router::{availability_routes, clinic_routes, doctor_routes};
pub use services::{AvailabilityService, ClinicService, DoctorService};
