use assert_matches::assert_matches;
use chrono::{NaiveDate, NaiveTime};
use tokio_test::{assert_err, assert_ok};

use appointment_cell::services::booking::CONFIRMATION_SUBJECT;
use appointment_cell::{AppointmentError, BookAppointmentRequest, BookingService};
use shared_database::repository::{appointments, notifications};
use shared_database::Database;
use shared_models::AppointmentStatus;
use shared_utils::test_utils::{TestConfig, TestContext};

fn slot_request(doctor_id: i64) -> BookAppointmentRequest {
    BookAppointmentRequest {
        doctor_id,
        date: NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
        time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
    }
}

#[tokio::test]
async fn test_book_creates_appointment_notification_and_email() {
    let mut ctx = TestContext::new();
    let patient = ctx.seed_patient("a@x.com").await;
    let doctor = ctx.seed_doctor("Dr. B", None).await;
    let service = BookingService::from_state(&ctx.state);

    let receipt = assert_ok!(service.book(&patient, slot_request(doctor.id)).await);

    assert_eq!(receipt.message, "booked");
    let appointment_id = receipt.appointment_id;
    let (appointment, notes) = ctx
        .db()
        .call(move |conn| {
            let appointment = appointments::get_appointment(conn, appointment_id)?;
            let notes = notifications::list_for_appointment(conn, appointment_id)?;
            Ok::<_, shared_database::DatabaseError>((appointment, notes))
        })
        .await
        .unwrap();

    let appointment = appointment.unwrap();
    assert_eq!(appointment.patient_id, patient.id);
    assert_eq!(appointment.status, AppointmentStatus::Booked);
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].message, "Appointment created for 2025-01-10 09:00:00");
    assert!(!notes[0].sent);

    let emails = ctx.scheduled_emails();
    assert_eq!(emails.len(), 1);
    assert_eq!(emails[0].to, "a@x.com");
    assert_eq!(emails[0].subject, CONFIRMATION_SUBJECT);
    assert_eq!(
        emails[0].body,
        "Your appointment with Dr. B on 2025-01-10 at 09:00:00 is confirmed."
    );
}

#[tokio::test]
async fn test_unknown_doctor_creates_nothing() {
    let mut ctx = TestContext::new();
    let patient = ctx.seed_patient("a@x.com").await;
    let service = BookingService::from_state(&ctx.state);

    let result = service.book(&patient, slot_request(404)).await;

    assert_matches!(result, Err(AppointmentError::DoctorNotFound));
    let (appointment_count, notification_count) = ctx
        .db()
        .call(|conn| {
            Ok::<_, shared_database::DatabaseError>((
                appointments::count_appointments(conn)?,
                notifications::count_notifications(conn)?,
            ))
        })
        .await
        .unwrap();
    assert_eq!(appointment_count, 0);
    assert_eq!(notification_count, 0);
    assert!(ctx.scheduled_emails().is_empty());
}

#[tokio::test]
async fn test_double_booking_conflicts_until_cancelled() {
    let ctx = TestContext::new();
    let patient_a = ctx.seed_patient("a@x.com").await;
    let patient_c = ctx.seed_patient("c@x.com").await;
    let doctor = ctx.seed_doctor("Dr. B", None).await;
    let service = BookingService::from_state(&ctx.state);

    let first = assert_ok!(service.book(&patient_a, slot_request(doctor.id)).await);
    assert_matches!(
        service.book(&patient_c, slot_request(doctor.id)).await,
        Err(AppointmentError::SlotConflict)
    );

    let cancelled = assert_ok!(service.cancel(&patient_a, first.appointment_id).await);
    assert_eq!(cancelled.status, AppointmentStatus::Cancelled);

    let second = assert_ok!(service.book(&patient_c, slot_request(doctor.id)).await);
    assert_ne!(first.appointment_id, second.appointment_id);
}

#[tokio::test]
async fn test_concurrent_bookings_admit_exactly_one() {
    let ctx = TestContext::new();
    let doctor = ctx.seed_doctor("Dr. B", None).await;
    let mut patients = Vec::new();
    for i in 0..8 {
        patients.push(ctx.seed_patient(&format!("p{}@x.com", i)).await);
    }

    let doctor_id = doctor.id;
    let results = futures::future::join_all(patients.iter().map(|patient| {
        let service = BookingService::from_state(&ctx.state);
        async move { service.book(patient, slot_request(doctor_id)).await }
    }))
    .await;

    let booked = results.iter().filter(|r| r.is_ok()).count();
    let conflicts = results
        .iter()
        .filter(|r| matches!(r, Err(AppointmentError::SlotConflict)))
        .count();
    assert_eq!(booked, 1);
    assert_eq!(conflicts, 7);

    let request = slot_request(doctor_id);
    let in_slot = ctx
        .db()
        .call(move |conn| appointments::count_booked_in_slot(conn, doctor_id, request.date, request.time))
        .await
        .unwrap();
    assert_eq!(in_slot, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_separate_connections_admit_exactly_one() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("clinic.db").to_string_lossy().into_owned();
    let ctx = TestContext::with_config(TestConfig {
        database_url: path.clone(),
        ..TestConfig::default()
    });
    // Second handle owns its own connection and mutex; only SQLite locking is shared.
    let other_db = Database::open(&path).unwrap();

    let doctor = ctx.seed_doctor("Dr. B", None).await;
    let mut patients = Vec::new();
    for i in 0..8 {
        patients.push(ctx.seed_patient(&format!("p{}@x.com", i)).await);
    }

    let doctor_id = doctor.id;
    let results = futures::future::join_all(patients.iter().enumerate().map(|(i, patient)| {
        let db = if i % 2 == 0 { ctx.db().clone() } else { other_db.clone() };
        let service = BookingService::new(db, ctx.state.email_queue.clone());
        async move { service.book(patient, slot_request(doctor_id)).await }
    }))
    .await;

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert_eq!(
        results
            .iter()
            .filter(|r| matches!(r, Err(AppointmentError::SlotConflict)))
            .count(),
        7
    );

    let request = slot_request(doctor_id);
    let in_slot = other_db
        .call(move |conn| appointments::count_booked_in_slot(conn, doctor_id, request.date, request.time))
        .await
        .unwrap();
    assert_eq!(in_slot, 1);
}

#[tokio::test]
async fn test_unique_index_rejects_second_booked_row_from_another_connection() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("clinic.db").to_string_lossy().into_owned();
    let ctx = TestContext::with_config(TestConfig {
        database_url: path.clone(),
        ..TestConfig::default()
    });
    let other_db = Database::open(&path).unwrap();
    let patient_a = ctx.seed_patient("a@x.com").await;
    let patient_c = ctx.seed_patient("c@x.com").await;
    let doctor = ctx.seed_doctor("Dr. B", None).await;

    assert_ok!(BookingService::from_state(&ctx.state).book(&patient_a, slot_request(doctor.id)).await);

    // Skip the service-level check entirely: the index alone must refuse the row.
    let request = slot_request(doctor.id);
    let doctor_id = doctor.id;
    let patient_id = patient_c.id;
    let result = other_db
        .call(move |conn| {
            appointments::insert_booked_appointment(conn, patient_id, doctor_id, request.date, request.time, chrono::Utc::now())
        })
        .await;

    let err = result.unwrap_err();
    assert!(err.is_constraint_violation());
}

#[tokio::test]
async fn test_fractional_second_time_is_rejected() {
    let ctx = TestContext::new();
    let patient = ctx.seed_patient("a@x.com").await;
    let doctor = ctx.seed_doctor("Dr. B", None).await;
    let service = BookingService::from_state(&ctx.state);

    let mut request = slot_request(doctor.id);
    request.time = NaiveTime::from_hms_milli_opt(10, 0, 0, 500).unwrap();
    assert_matches!(service.book(&patient, request).await, Err(AppointmentError::InvalidTime));

    let mut exact = slot_request(doctor.id);
    exact.time = NaiveTime::from_hms_opt(10, 0, 0).unwrap();
    assert_ok!(service.book(&patient, exact).await);
}

#[tokio::test]
async fn test_same_time_different_doctor_is_allowed() {
    let ctx = TestContext::new();
    let patient = ctx.seed_patient("a@x.com").await;
    let doctor_b = ctx.seed_doctor("Dr. B", None).await;
    let doctor_d = ctx.seed_doctor("Dr. D", None).await;
    let service = BookingService::from_state(&ctx.state);

    assert_ok!(service.book(&patient, slot_request(doctor_b.id)).await);
    assert_ok!(service.book(&patient, slot_request(doctor_d.id)).await);
}

#[tokio::test]
async fn test_other_patient_cannot_cancel() {
    let ctx = TestContext::new();
    let owner = ctx.seed_patient("a@x.com").await;
    let intruder = ctx.seed_patient("c@x.com").await;
    let doctor = ctx.seed_doctor("Dr. B", None).await;
    let service = BookingService::from_state(&ctx.state);
    let receipt = assert_ok!(service.book(&owner, slot_request(doctor.id)).await);

    assert_matches!(
        service.cancel(&intruder, receipt.appointment_id).await,
        Err(AppointmentError::Forbidden)
    );

    let unchanged = assert_ok!(service.get(&owner, receipt.appointment_id).await);
    assert_eq!(unchanged.status, AppointmentStatus::Booked);
}

#[tokio::test]
async fn test_admin_can_cancel_and_cancel_is_idempotent() {
    let ctx = TestContext::new();
    let owner = ctx.seed_patient("a@x.com").await;
    let admin = ctx.seed_admin("admin@x.com").await;
    let doctor = ctx.seed_doctor("Dr. B", None).await;
    let service = BookingService::from_state(&ctx.state);
    let receipt = assert_ok!(service.book(&owner, slot_request(doctor.id)).await);

    assert_ok!(service.cancel(&admin, receipt.appointment_id).await);
    let again = assert_ok!(service.cancel(&owner, receipt.appointment_id).await);
    assert_eq!(again.status, AppointmentStatus::Cancelled);
}

#[tokio::test]
async fn test_cancel_missing_appointment_is_not_found() {
    let ctx = TestContext::new();
    let patient = ctx.seed_patient("a@x.com").await;
    let service = BookingService::from_state(&ctx.state);

    assert_matches!(service.cancel(&patient, 77).await, Err(AppointmentError::NotFound));
}

#[tokio::test]
async fn test_complete_requires_staff_and_booked_status() {
    let ctx = TestContext::new();
    let patient = ctx.seed_patient("a@x.com").await;
    let doctor_account = ctx.seed_doctor_account("doc@x.com").await;
    let doctor = ctx.seed_doctor("Dr. B", None).await;
    let service = BookingService::from_state(&ctx.state);
    let receipt = assert_ok!(service.book(&patient, slot_request(doctor.id)).await);

    assert_matches!(
        service.complete(&patient, receipt.appointment_id).await,
        Err(AppointmentError::Forbidden)
    );

    let completed = assert_ok!(service.complete(&doctor_account, receipt.appointment_id).await);
    assert_eq!(completed.status, AppointmentStatus::Completed);

    assert_matches!(
        service.cancel(&patient, receipt.appointment_id).await,
        Err(AppointmentError::InvalidStatusTransition { .. })
    );
    assert_err!(service.complete(&doctor_account, receipt.appointment_id).await);
}

#[tokio::test]
async fn test_completed_slot_can_be_rebooked() {
    let ctx = TestContext::new();
    let patient = ctx.seed_patient("a@x.com").await;
    let admin = ctx.seed_admin("admin@x.com").await;
    let doctor = ctx.seed_doctor("Dr. B", None).await;
    let service = BookingService::from_state(&ctx.state);
    let receipt = assert_ok!(service.book(&patient, slot_request(doctor.id)).await);

    assert_ok!(service.complete(&admin, receipt.appointment_id).await);

    assert_ok!(service.book(&patient, slot_request(doctor.id)).await);
}

#[tokio::test]
async fn test_list_mine_only_returns_own_appointments() {
    let ctx = TestContext::new();
    let patient_a = ctx.seed_patient("a@x.com").await;
    let patient_c = ctx.seed_patient("c@x.com").await;
    let doctor = ctx.seed_doctor("Dr. B", None).await;
    let service = BookingService::from_state(&ctx.state);

    let mut later = slot_request(doctor.id);
    later.time = NaiveTime::from_hms_opt(10, 0, 0).unwrap();
    let first = assert_ok!(service.book(&patient_a, slot_request(doctor.id)).await);
    let second = assert_ok!(service.book(&patient_a, later).await);
    let mut other = slot_request(doctor.id);
    other.time = NaiveTime::from_hms_opt(11, 0, 0).unwrap();
    assert_ok!(service.book(&patient_c, other).await);

    let mine = assert_ok!(service.list_mine(&patient_a).await);
    let ids: Vec<i64> = mine.iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![first.appointment_id, second.appointment_id]);
}
