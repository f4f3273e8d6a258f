use std::sync::Arc;

use regex::Regex;
use tracing::{debug, info, instrument, warn};

use shared_database::repository::accounts;
use shared_models::error::AppError;
use shared_models::Account;
use shared_utils::AppState;

use crate::models::{LoginRequest, RegisterRequest};

const EMAIL_PATTERN: &str = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";
const INVALID_CREDENTIALS: &str = "Invalid email or password";

pub struct AccountService {
    state: Arc<AppState>,
    email_pattern: Regex,
}

impl AccountService {
    pub fn new(state: Arc<AppState>) -> Result<Self, AppError> {
        let email_pattern = Regex::new(EMAIL_PATTERN).map_err(|e| AppError::Internal(e.to_string()))?;
        Ok(Self { state, email_pattern })
    }

    /// Create an account and return it. Emails are stored lowercased.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn register(&self, request: RegisterRequest) -> Result<Account, AppError> {
        let name = request.name.trim().to_string();
        let email = request.email.trim().to_lowercase();
        let role = request.role.unwrap_or_default();

        if name.is_empty() {
            return Err(AppError::ValidationError("Name is required".to_string()));
        }
        if !self.email_pattern.is_match(&email) {
            return Err(AppError::ValidationError("Invalid email address".to_string()));
        }
        if request.password.is_empty() {
            return Err(AppError::ValidationError("Password is required".to_string()));
        }

        let password_hash = self.hash_password(request.password).await?;

        let result = self
            .state
            .db
            .call(move |conn| {
                if accounts::find_account_by_email(conn, &email)?.is_some() {
                    return Ok(None);
                }
                accounts::insert_account(conn, &name, &email, &password_hash, role).map(Some)
            })
            .await;

        match result {
            Ok(Some(account)) => {
                info!("Registered account {} with role {}", account.id, account.role);
                Ok(account)
            }
            Ok(None) => Err(AppError::BadRequest("Email already registered".to_string())),
            Err(e) if e.is_constraint_violation() => {
                Err(AppError::BadRequest("Email already registered".to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn login(&self, request: LoginRequest) -> Result<Account, AppError> {
        let email = request.email.trim().to_lowercase();

        let account = self
            .state
            .db
            .call(move |conn| accounts::find_account_by_email(conn, &email))
            .await?;

        let Some(account) = account else {
            debug!("Login for unknown email");
            return Err(AppError::Auth(INVALID_CREDENTIALS.to_string()));
        };

        if !self.verify_password(request.password, account.password_hash.clone()).await? {
            warn!("Failed login for account {}", account.id);
            return Err(AppError::Auth(INVALID_CREDENTIALS.to_string()));
        }

        Ok(account)
    }

    pub fn issue_token(&self, account: &Account) -> Result<String, AppError> {
        self.state.issue_access_token(account)
    }

    async fn hash_password(&self, password: String) -> Result<String, AppError> {
        let passwords = self.state.passwords.clone();
        tokio::task::spawn_blocking(move || passwords.hash_password(&password))
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?
            .map_err(|e| AppError::Internal(e.to_string()))
    }

    async fn verify_password(&self, password: String, hash: String) -> Result<bool, AppError> {
        let passwords = self.state.passwords.clone();
        tokio::task::spawn_blocking(move || passwords.verify_password(&password, &hash))
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?
            .map_err(|e| AppError::Internal(e.to_string()))
    }
}
