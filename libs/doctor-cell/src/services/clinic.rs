use tracing::{debug, info};

use shared_database::repository::clinics;
use shared_database::Database;
use shared_models::Clinic;

use crate::models::{CreateClinicRequest, DirectoryError};
use crate::services::required_name;

pub struct ClinicService {
    db: Database,
}

impl ClinicService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn create_clinic(&self, request: CreateClinicRequest) -> Result<Clinic, DirectoryError> {
        let name = required_name(&request.name)?;
        let address = request.address.filter(|a| !a.trim().is_empty());

        let clinic = self
            .db
            .call(move |conn| clinics::insert_clinic(conn, &name, address.as_deref()))
            .await?;

        info!("Created clinic {}", clinic.id);
        Ok(clinic)
    }

    pub async fn list_clinics(&self) -> Result<Vec<Clinic>, DirectoryError> {
        debug!("Listing clinics");
        Ok(self.db.call(|conn| clinics::list_clinics(conn)).await?)
    }
}
