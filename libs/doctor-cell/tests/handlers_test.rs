use axum::http::{Method, StatusCode};
use axum::Router;
use serde_json::json;
use tower::ServiceExt;

use doctor_cell::{availability_routes, clinic_routes, doctor_routes};
use shared_utils::test_utils::{json_request, read_json, TestContext};

fn app(ctx: &TestContext) -> Router {
    Router::new()
        .nest("/clinics", clinic_routes(ctx.state.clone()))
        .nest("/doctors", doctor_routes(ctx.state.clone()))
        .nest("/availability", availability_routes(ctx.state.clone()))
}

#[tokio::test]
async fn test_admin_creates_clinic_and_doctor() {
    let ctx = TestContext::new();
    let admin = ctx.seed_admin("admin@x.com").await;
    let token = ctx.token_for(&admin);

    let response = app(&ctx)
        .oneshot(json_request(
            Method::POST,
            "/clinics",
            Some(&token),
            Some(json!({ "name": "North Clinic", "address": "1 Main St" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let clinic = read_json(response).await;

    let response = app(&ctx)
        .oneshot(json_request(
            Method::POST,
            "/doctors",
            Some(&token),
            Some(json!({ "name": "Dr. B", "specialty": "cardiology", "clinic_id": clinic["id"] })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let doctor = read_json(response).await;
    assert_eq!(doctor["name"], "Dr. B");
    assert_eq!(doctor["clinic"], "North Clinic");
}

#[tokio::test]
async fn test_patient_cannot_create_doctor() {
    let ctx = TestContext::new();
    let patient = ctx.seed_patient("a@x.com").await;
    let token = ctx.token_for(&patient);

    let response = app(&ctx)
        .oneshot(json_request(
            Method::POST,
            "/doctors",
            Some(&token),
            Some(json!({ "name": "Dr. Fake" })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_create_doctor_without_token_is_unauthorized() {
    let ctx = TestContext::new();

    let response = app(&ctx)
        .oneshot(json_request(Method::POST, "/doctors", None, Some(json!({ "name": "Dr. B" }))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_doctor_with_unknown_clinic_is_not_found() {
    let ctx = TestContext::new();
    let admin = ctx.seed_admin("admin@x.com").await;
    let token = ctx.token_for(&admin);

    let response = app(&ctx)
        .oneshot(json_request(
            Method::POST,
            "/doctors",
            Some(&token),
            Some(json!({ "name": "Dr. B", "clinic_id": 999 })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_doctors_is_public_and_resolves_clinic() {
    let ctx = TestContext::new();
    let clinic = ctx.seed_clinic("North Clinic").await;
    ctx.seed_doctor("Dr. B", Some(clinic.id)).await;
    ctx.seed_doctor("Dr. C", None).await;

    let response = app(&ctx)
        .oneshot(json_request(Method::GET, "/doctors", None, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    let doctors = body.as_array().unwrap();
    assert_eq!(doctors.len(), 2);
    assert_eq!(doctors[0]["clinic"], "North Clinic");
    assert!(doctors[1]["clinic"].is_null());
}

#[tokio::test]
async fn test_get_missing_doctor_is_not_found() {
    let ctx = TestContext::new();

    let response = app(&ctx)
        .oneshot(json_request(Method::GET, "/doctors/42", None, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_doctor_adds_and_lists_availability() {
    let ctx = TestContext::new();
    let doctor_account = ctx.seed_doctor_account("doc@x.com").await;
    let doctor = ctx.seed_doctor("Dr. B", None).await;
    let token = ctx.token_for(&doctor_account);

    let response = app(&ctx)
        .oneshot(json_request(
            Method::POST,
            "/availability",
            Some(&token),
            Some(json!({
                "doctor_id": doctor.id,
                "date": "2025-01-10",
                "start_time": "09:00:00",
                "end_time": "12:00:00"
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app(&ctx)
        .oneshot(json_request(Method::GET, &format!("/availability/{}", doctor.id), None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["start_time"], "09:00:00");
    assert_eq!(body[0]["date"], "2025-01-10");
}

#[tokio::test]
async fn test_patient_cannot_add_availability() {
    let ctx = TestContext::new();
    let patient = ctx.seed_patient("a@x.com").await;
    let doctor = ctx.seed_doctor("Dr. B", None).await;
    let token = ctx.token_for(&patient);

    let response = app(&ctx)
        .oneshot(json_request(
            Method::POST,
            "/availability",
            Some(&token),
            Some(json!({
                "doctor_id": doctor.id,
                "date": "2025-01-10",
                "start_time": "09:00:00",
                "end_time": "12:00:00"
            })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_inverted_availability_window_is_bad_request() {
    let ctx = TestContext::new();
    let admin = ctx.seed_admin("admin@x.com").await;
    let doctor = ctx.seed_doctor("Dr. B", None).await;
    let token = ctx.token_for(&admin);

    let response = app(&ctx)
        .oneshot(json_request(
            Method::POST,
            "/availability",
            Some(&token),
            Some(json!({
                "doctor_id": doctor.id,
                "date": "2025-01-10",
                "start_time": "12:00:00",
                "end_time": "09:00:00"
            })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_fractional_availability_time_is_bad_request() {
    let ctx = TestContext::new();
    let admin = ctx.seed_admin("admin@x.com").await;
    let doctor = ctx.seed_doctor("Dr. B", None).await;

    let response = app(&ctx)
        .oneshot(json_request(
            Method::POST,
            "/availability",
            Some(&ctx.token_for(&admin)),
            Some(json!({
                "doctor_id": doctor.id,
                "date": "2025-01-10",
                "start_time": "09:00:00.25",
                "end_time": "10:00:00"
            })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(read_json(response).await["error"].is_string());
}

#[tokio::test]
async fn test_mistyped_doctor_body_is_json_bad_request() {
    let ctx = TestContext::new();
    let admin = ctx.seed_admin("admin@x.com").await;

    let response = app(&ctx)
        .oneshot(json_request(
            Method::POST,
            "/doctors",
            Some(&ctx.token_for(&admin)),
            Some(json!({ "name": "Dr. B", "clinic_id": "north" })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(read_json(response).await["error"].is_string());
}
