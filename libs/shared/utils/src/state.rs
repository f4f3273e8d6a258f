use std::sync::Arc;

use chrono::Duration;

use shared_config::AppConfig;
use shared_database::Database;
use shared_models::error::AppError;
use shared_models::Account;

use crate::extractor::IdentityResolver;
use crate::jwt::issue_token;
use crate::mailer::{EmailQueue, EmailSender};
use crate::password::PasswordService;

/// Shared handles every cell router is built over.
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: Database,
    pub passwords: PasswordService,
    pub identity: IdentityResolver,
    pub email_queue: EmailQueue,
    pub mailer: Arc<dyn EmailSender>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        db: Database,
        email_queue: EmailQueue,
        mailer: Arc<dyn EmailSender>,
    ) -> Result<Self, AppError> {
        let passwords = PasswordService::from_config(&config).map_err(|e| AppError::Internal(e.to_string()))?;
        let identity = IdentityResolver::new(db.clone(), config.jwt_secret.clone());

        Ok(Self {
            config: Arc::new(config),
            db,
            passwords,
            identity,
            email_queue,
            mailer,
        })
    }

    pub fn issue_access_token(&self, account: &Account) -> Result<String, AppError> {
        let ttl = Duration::minutes(self.config.access_token_ttl_minutes);
        issue_token(&account.id.to_string(), Some(account.role), ttl, &self.config.jwt_secret)
            .map_err(|e| AppError::Internal(e.to_string()))
    }
}
