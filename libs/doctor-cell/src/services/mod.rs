pub mod availability;
pub mod clinic;
pub mod doctor;

pub use availability::AvailabilityService;
pub use clinic::ClinicService;
pub use doctor::DoctorService;

use crate::models::DirectoryError;

pub(crate) fn required_name(name: &str) -> Result<String, DirectoryError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(DirectoryError::ValidationError("Name is required".to_string()));
    }
    Ok(name.to_string())
}
