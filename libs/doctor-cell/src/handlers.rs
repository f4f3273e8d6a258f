use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    Json,
};

use shared_models::auth::Role;
use shared_models::error::AppError;
use shared_models::{Account, Availability, Clinic, DoctorListing};
use shared_utils::{ensure_any_role, ensure_role, AppJson, AppState};

use crate::models::{CreateAvailabilityRequest, CreateClinicRequest, CreateDoctorRequest};
use crate::services::{AvailabilityService, ClinicService, DoctorService};

// ==============================================================================
// CLINIC HANDLERS
// ==============================================================================

pub async fn list_clinics(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Clinic>>, AppError> {
    let clinics = ClinicService::new(state.db.clone()).list_clinics().await?;
    Ok(Json(clinics))
}

#[axum::debug_handler]
pub async fn create_clinic(
    State(state): State<Arc<AppState>>,
    Extension(account): Extension<Account>,
    AppJson(request): AppJson<CreateClinicRequest>,
) -> Result<Json<Clinic>, AppError> {
    ensure_role(&account, Role::Admin)?;

    let clinic = ClinicService::new(state.db.clone()).create_clinic(request).await?;
    Ok(Json(clinic))
}

// ==============================================================================
// DOCTOR HANDLERS
// ==============================================================================

pub async fn list_doctors(State(state): State<Arc<AppState>>) -> Result<Json<Vec<DoctorListing>>, AppError> {
    let doctors = DoctorService::new(state.db.clone()).list_doctors().await?;
    Ok(Json(doctors))
}

pub async fn get_doctor(
    State(state): State<Arc<AppState>>,
    Path(doctor_id): Path<i64>,
) -> Result<Json<DoctorListing>, AppError> {
    let doctor = DoctorService::new(state.db.clone()).get_doctor(doctor_id).await?;
    Ok(Json(doctor))
}

#[axum::debug_handler]
pub async fn create_doctor(
    State(state): State<Arc<AppState>>,
    Extension(account): Extension<Account>,
    AppJson(request): AppJson<CreateDoctorRequest>,
) -> Result<Json<DoctorListing>, AppError> {
    ensure_role(&account, Role::Admin)?;

    let doctor = DoctorService::new(state.db.clone()).create_doctor(request).await?;
    Ok(Json(doctor))
}

// ==============================================================================
// AVAILABILITY HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn add_availability(
    State(state): State<Arc<AppState>>,
    Extension(account): Extension<Account>,
    AppJson(request): AppJson<CreateAvailabilityRequest>,
) -> Result<Json<Availability>, AppError> {
    // Any doctor may publish windows for any doctor; accounts are not linked to doctor records.
    ensure_any_role(&account, &[Role::Doctor, Role::Admin])?;

    let slot = AvailabilityService::new(state.db.clone()).add_availability(request).await?;
    Ok(Json(slot))
}

pub async fn list_availability(
    State(state): State<Arc<AppState>>,
    Path(doctor_id): Path<i64>,
) -> Result<Json<Vec<Availability>>, AppError> {
    let slots = AvailabilityService::new(state.db.clone())
        .list_availability(doctor_id)
        .await?;
    Ok(Json(slots))
}
