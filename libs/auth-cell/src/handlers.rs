use std::sync::Arc;

use axum::{
    extract::{Json, State},
    Extension,
};
use tracing::debug;

use shared_models::auth::TokenResponse;
use shared_models::error::AppError;
use shared_models::{Account, AccountProfile};
use shared_utils::{AppJson, AppState};

use crate::models::{LoginRequest, RegisterRequest};
use crate::services::AccountService;

pub async fn register(
    State(state): State<Arc<AppState>>,
    AppJson(request): AppJson<RegisterRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let service = AccountService::new(state)?;
    let account = service.register(request).await?;
    let token = service.issue_token(&account)?;
    Ok(Json(TokenResponse::bearer(token)))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    AppJson(request): AppJson<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let service = AccountService::new(state)?;
    let account = service.login(request).await?;
    debug!("Account {} logged in", account.id);
    let token = service.issue_token(&account)?;
    Ok(Json(TokenResponse::bearer(token)))
}

pub async fn me(Extension(account): Extension<Account>) -> Json<AccountProfile> {
    Json(account.profile())
}
