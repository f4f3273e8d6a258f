use std::sync::Arc;

use axum::{
    body::Body,
    extract::{FromRequest, State},
    http::Request,
    middleware::Next,
    response::Response,
    RequestExt,
};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use tracing::debug;

use shared_database::repository::accounts;
use shared_database::Database;
use shared_models::auth::Role;
use shared_models::error::AppError;
use shared_models::Account;

use crate::jwt::decode_token;
use crate::state::AppState;

/// `Json` body extractor whose rejections render as `AppError` (400 with a JSON body).
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// Turns a bearer token into the account it was issued for.
#[derive(Clone)]
pub struct IdentityResolver {
    db: Database,
    jwt_secret: String,
}

impl IdentityResolver {
    pub fn new(db: Database, jwt_secret: impl Into<String>) -> Self {
        Self {
            db,
            jwt_secret: jwt_secret.into(),
        }
    }

    pub async fn resolve(&self, token: &str) -> Result<Account, AppError> {
        let claims = decode_token(token, &self.jwt_secret)
            .ok_or_else(|| AppError::Auth("Invalid authentication credentials".to_string()))?;

        let account_id = claims
            .account_id()
            .ok_or_else(|| AppError::Auth("Invalid authentication credentials".to_string()))?;

        let account = self
            .db
            .call(move |conn| accounts::get_account(conn, account_id))
            .await?;

        // Token outlived its account.
        account.ok_or_else(|| {
            debug!("Token subject {} no longer exists", account_id);
            AppError::NotFound("Account not found".to_string())
        })
    }

    pub async fn require_role(&self, token: &str, role: Role) -> Result<Account, AppError> {
        let account = self.resolve(token).await?;
        ensure_role(&account, role)?;
        Ok(account)
    }
}

pub fn ensure_role(account: &Account, role: Role) -> Result<(), AppError> {
    if account.role.satisfies(role) {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!("Requires {} role", role)))
    }
}

pub fn ensure_any_role(account: &Account, allowed: &[Role]) -> Result<(), AppError> {
    if account.role.is_any_of(allowed) {
        Ok(())
    } else {
        Err(AppError::Forbidden("Insufficient permissions".to_string()))
    }
}

/// Resolves the bearer token and stores the caller's `Account` in request extensions.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let TypedHeader(Authorization(bearer)) = request
        .extract_parts::<TypedHeader<Authorization<Bearer>>>()
        .await
        .map_err(|_| AppError::Auth("Missing or invalid authorization header".to_string()))?;

    let account = state.identity.resolve(bearer.token()).await?;
    request.extensions_mut().insert(account);

    Ok(next.run(request).await)
}
