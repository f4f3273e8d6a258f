use chrono::{NaiveDate, NaiveTime, Utc};
use rusqlite::TransactionBehavior;
use tracing::{debug, info, instrument, warn};

use notification_cell::NotificationDispatcher;
use shared_database::repository::{appointments, doctors, is_whole_seconds};
use shared_database::Database;
use shared_models::auth::Role;
use shared_models::{Account, Appointment, AppointmentStatus};
use shared_utils::{AppState, EmailMessage, EmailQueue};

use crate::models::{AppointmentError, BookAppointmentRequest, BookingReceipt};
use crate::services::lifecycle::{AppointmentLifecycleService, Transition};

pub const CONFIRMATION_SUBJECT: &str = "Appointment Confirmed";

pub struct BookingService {
    db: Database,
    email_queue: EmailQueue,
}

impl BookingService {
    pub fn new(db: Database, email_queue: EmailQueue) -> Self {
        Self { db, email_queue }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(state.db.clone(), state.email_queue.clone())
    }

    /// Book a slot for `patient`.
    ///
    /// The conflict check, the insert and the notification row share one
    /// immediate transaction. The partial unique index on booked slots backs
    /// the check, so a racing insert is reported as a conflict as well.
    #[instrument(skip(self, patient), fields(patient_id = patient.id))]
    pub async fn book(
        &self,
        patient: &Account,
        request: BookAppointmentRequest,
    ) -> Result<BookingReceipt, AppointmentError> {
        let BookAppointmentRequest { doctor_id, date, time } = request;
        if !is_whole_seconds(time) {
            return Err(AppointmentError::InvalidTime);
        }
        let patient_id = patient.id;

        let (appointment, doctor_name) = self
            .db
            .call(move |conn| {
                let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

                let doctor = doctors::get_doctor(&tx, doctor_id)?.ok_or(AppointmentError::DoctorNotFound)?;

                if appointments::find_booked_in_slot(&tx, doctor_id, date, time)?.is_some() {
                    return Err(AppointmentError::SlotConflict);
                }

                let appointment =
                    match appointments::insert_booked_appointment(&tx, patient_id, doctor_id, date, time, Utc::now()) {
                        Ok(appointment) => appointment,
                        Err(e) if e.is_constraint_violation() => return Err(AppointmentError::SlotConflict),
                        Err(e) => return Err(e.into()),
                    };

                NotificationDispatcher::enqueue(&tx, Some(appointment.id), &created_message(date, time))?;

                tx.commit()?;
                Ok((appointment, doctor.name))
            })
            .await
            .inspect_err(|e| {
                if matches!(e, AppointmentError::SlotConflict) {
                    warn!("Slot conflict for doctor {} at {} {}", doctor_id, date, time);
                }
            })?;

        info!("Booked appointment {} with doctor {}", appointment.id, doctor_id);

        self.email_queue.schedule(EmailMessage::new(
            patient.email.clone(),
            CONFIRMATION_SUBJECT,
            confirmation_message(&doctor_name, date, time),
        ));

        Ok(BookingReceipt::booked(appointment.id))
    }

    /// Cancel as the patient or an admin. Cancelling twice is not an error.
    #[instrument(skip(self, caller), fields(caller_id = caller.id))]
    pub async fn cancel(&self, caller: &Account, appointment_id: i64) -> Result<Appointment, AppointmentError> {
        self.transition(caller.clone(), appointment_id, AppointmentStatus::Cancelled)
            .await
    }

    /// Mark a booked appointment completed. Restricted to doctors and admins.
    #[instrument(skip(self, caller), fields(caller_id = caller.id))]
    pub async fn complete(&self, caller: &Account, appointment_id: i64) -> Result<Appointment, AppointmentError> {
        if !caller.role.is_any_of(&[Role::Doctor, Role::Admin]) {
            return Err(AppointmentError::Forbidden);
        }
        self.transition(caller.clone(), appointment_id, AppointmentStatus::Completed)
            .await
    }

    pub async fn get(&self, caller: &Account, appointment_id: i64) -> Result<Appointment, AppointmentError> {
        let appointment = self
            .db
            .call(move |conn| appointments::get_appointment(conn, appointment_id))
            .await?
            .ok_or(AppointmentError::NotFound)?;

        ensure_owner_or_admin(caller, &appointment)?;
        Ok(appointment)
    }

    pub async fn list_mine(&self, caller: &Account) -> Result<Vec<Appointment>, AppointmentError> {
        let patient_id = caller.id;
        debug!("Listing appointments for account {}", patient_id);
        Ok(self
            .db
            .call(move |conn| appointments::list_for_patient(conn, patient_id))
            .await?)
    }

    async fn transition(
        &self,
        caller: Account,
        appointment_id: i64,
        requested: AppointmentStatus,
    ) -> Result<Appointment, AppointmentError> {
        let updated = self
            .db
            .call(move |conn| {
                let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

                let mut appointment =
                    appointments::get_appointment(&tx, appointment_id)?.ok_or(AppointmentError::NotFound)?;

                // Completion is a staff action; only cancellation is tied to ownership.
                if requested == AppointmentStatus::Cancelled {
                    ensure_owner_or_admin(&caller, &appointment)?;
                }

                match AppointmentLifecycleService::validate_status_transition(appointment.status, requested)? {
                    Transition::Apply(status) => {
                        appointments::update_status(&tx, appointment_id, status)?;
                        appointment.status = status;
                    }
                    Transition::Unchanged => {
                        debug!("Appointment {} already {}", appointment_id, requested);
                    }
                }

                tx.commit()?;
                Ok::<_, AppointmentError>(appointment)
            })
            .await?;

        info!("Appointment {} is now {}", updated.id, updated.status);
        Ok(updated)
    }
}

fn ensure_owner_or_admin(caller: &Account, appointment: &Appointment) -> Result<(), AppointmentError> {
    if appointment.patient_id == caller.id || caller.role.satisfies(Role::Admin) {
        Ok(())
    } else {
        warn!("Account {} denied access to appointment {}", caller.id, appointment.id);
        Err(AppointmentError::Forbidden)
    }
}

pub fn created_message(date: NaiveDate, time: NaiveTime) -> String {
    format!("Appointment created for {} {}", date, time)
}

pub fn confirmation_message(doctor_name: &str, date: NaiveDate, time: NaiveTime) -> String {
    format!(
        "Your appointment with {} on {} at {} is confirmed.",
        doctor_name, date, time
    )
}
