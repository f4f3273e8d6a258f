use std::sync::Arc;

use assert_matches::assert_matches;
use axum::{http::Method, http::StatusCode, middleware, routing::get, Extension, Json, Router};
use serde_json::{json, Value};
use tower::ServiceExt;

use shared_models::auth::Role;
use shared_models::error::AppError;
use shared_models::Account;
use shared_utils::test_utils::{json_request, read_json, JwtTestUtils, TestContext};
use shared_utils::{auth_middleware, ensure_any_role, ensure_role, AppState};

async fn whoami(Extension(account): Extension<Account>) -> Json<Value> {
    Json(json!({ "id": account.id, "role": account.role }))
}

fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/whoami", get(whoami))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}

#[tokio::test]
async fn test_valid_token_attaches_account() {
    let ctx = TestContext::new();
    let account = ctx.seed_patient("a@x.com").await;
    let token = ctx.token_for(&account);

    let response = app(ctx.state.clone())
        .oneshot(json_request(Method::GET, "/whoami", Some(&token), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["id"], account.id);
    assert_eq!(body["role"], "patient");
}

#[tokio::test]
async fn test_missing_header_is_unauthorized() {
    let ctx = TestContext::new();

    let response = app(ctx.state.clone())
        .oneshot(json_request(Method::GET, "/whoami", None, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_non_bearer_scheme_is_unauthorized() {
    let ctx = TestContext::new();
    let request = axum::http::Request::builder()
        .uri("/whoami")
        .header("authorization", "Basic dXNlcjpwYXNz")
        .body(axum::body::Body::empty())
        .unwrap();

    let response = app(ctx.state.clone()).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_expired_and_forged_tokens_are_unauthorized() {
    let ctx = TestContext::new();
    let account = ctx.seed_patient("a@x.com").await;
    let secret = ctx.state.config.jwt_secret.clone();

    for token in [
        JwtTestUtils::create_expired_token(&account, &secret),
        JwtTestUtils::create_invalid_signature_token(&account),
        JwtTestUtils::create_malformed_token(),
    ] {
        let response = app(ctx.state.clone())
            .oneshot(json_request(Method::GET, "/whoami", Some(&token), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}

#[tokio::test]
async fn test_token_for_unknown_account_is_not_found() {
    let ctx = TestContext::new();
    let token = JwtTestUtils::create_token_for_subject("4242", &ctx.state.config.jwt_secret);

    let result = ctx.state.identity.resolve(&token).await;
    assert_matches!(result, Err(AppError::NotFound(_)));

    let response = app(ctx.state.clone())
        .oneshot(json_request(Method::GET, "/whoami", Some(&token), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_non_numeric_subject_is_unauthorized() {
    let ctx = TestContext::new();
    let token = JwtTestUtils::create_token_for_subject("not-an-id", &ctx.state.config.jwt_secret);

    let result = ctx.state.identity.resolve(&token).await;

    assert_matches!(result, Err(AppError::Auth(_)));
}

#[tokio::test]
async fn test_require_role_is_exact() {
    let ctx = TestContext::new();
    let admin = ctx.seed_admin("admin@x.com").await;
    let token = ctx.token_for(&admin);

    assert!(ctx.state.identity.require_role(&token, Role::Admin).await.is_ok());
    // Admin does not imply doctor.
    assert_matches!(
        ctx.state.identity.require_role(&token, Role::Doctor).await,
        Err(AppError::Forbidden(_))
    );
}

#[tokio::test]
async fn test_ensure_helpers() {
    let ctx = TestContext::new();
    let doctor = ctx.seed_doctor_account("doc@x.com").await;

    assert!(ensure_role(&doctor, Role::Doctor).is_ok());
    assert_matches!(ensure_role(&doctor, Role::Admin), Err(AppError::Forbidden(_)));
    assert!(ensure_any_role(&doctor, &[Role::Doctor, Role::Admin]).is_ok());
    assert_matches!(ensure_any_role(&doctor, &[Role::Patient]), Err(AppError::Forbidden(_)));
}
