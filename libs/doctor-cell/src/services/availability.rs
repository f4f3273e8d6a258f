use tracing::{debug, info};

use shared_database::repository::{availability, doctors, is_whole_seconds};
use shared_database::Database;
use shared_models::Availability;

use crate::models::{CreateAvailabilityRequest, DirectoryError};

pub struct AvailabilityService {
    db: Database,
}

impl AvailabilityService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Record a window during which the doctor accepts bookings.
    /// Windows are informational; booking does not consult them.
    pub async fn add_availability(&self, request: CreateAvailabilityRequest) -> Result<Availability, DirectoryError> {
        if !is_whole_seconds(request.start_time) || !is_whole_seconds(request.end_time) {
            return Err(DirectoryError::ValidationError(
                "Availability times must be whole seconds".to_string(),
            ));
        }
        if request.start_time >= request.end_time {
            return Err(DirectoryError::InvalidTimeRange);
        }

        let CreateAvailabilityRequest {
            doctor_id,
            date,
            start_time,
            end_time,
        } = request;

        let slot = self
            .db
            .call(move |conn| {
                if doctors::get_doctor(conn, doctor_id)?.is_none() {
                    return Err(DirectoryError::DoctorNotFound(doctor_id));
                }
                Ok(availability::insert_availability(conn, doctor_id, date, start_time, end_time)?)
            })
            .await?;

        info!("Added availability {} for doctor {}", slot.id, doctor_id);
        Ok(slot)
    }

    pub async fn list_availability(&self, doctor_id: i64) -> Result<Vec<Availability>, DirectoryError> {
        debug!("Listing availability for doctor {}", doctor_id);
        Ok(self
            .db
            .call(move |conn| availability::list_availability_for_doctor(conn, doctor_id))
            .await?)
    }
}
