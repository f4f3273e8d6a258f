use tracing::{debug, info};

use shared_database::repository::{clinics, doctors};
use shared_database::{Database, DatabaseError};
use shared_models::DoctorListing;

use crate::models::{CreateDoctorRequest, DirectoryError};
use crate::services::required_name;

pub struct DoctorService {
    db: Database,
}

impl DoctorService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Create a doctor, optionally attached to an existing clinic.
    pub async fn create_doctor(&self, request: CreateDoctorRequest) -> Result<DoctorListing, DirectoryError> {
        let name = required_name(&request.name)?;
        let specialty = request.specialty.filter(|s| !s.trim().is_empty());
        let clinic_id = request.clinic_id;

        let listing = self
            .db
            .call(move |conn| {
                let tx = conn.transaction().map_err(DatabaseError::from)?;
                if let Some(clinic_id) = clinic_id {
                    if clinics::get_clinic(&tx, clinic_id)?.is_none() {
                        return Err(DirectoryError::ClinicNotFound(clinic_id));
                    }
                }
                let doctor = doctors::insert_doctor(&tx, &name, specialty.as_deref(), clinic_id)?;
                let listing = doctors::get_doctor_listing(&tx, doctor.id)?
                    .ok_or(DirectoryError::DoctorNotFound(doctor.id))?;
                tx.commit().map_err(DatabaseError::from)?;
                Ok(listing)
            })
            .await?;

        info!("Created doctor {}", listing.id);
        Ok(listing)
    }

    /// Every doctor with its clinic name resolved, absent when the clinic is unset or gone.
    pub async fn list_doctors(&self) -> Result<Vec<DoctorListing>, DirectoryError> {
        debug!("Listing doctors");
        Ok(self.db.call(|conn| doctors::list_doctor_listings(conn)).await?)
    }

    pub async fn get_doctor(&self, doctor_id: i64) -> Result<DoctorListing, DirectoryError> {
        self.db
            .call(move |conn| doctors::get_doctor_listing(conn, doctor_id))
            .await?
            .ok_or(DirectoryError::DoctorNotFound(doctor_id))
    }
}
