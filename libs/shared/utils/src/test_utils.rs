use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request};
use axum::response::Response;
use chrono::{Duration, Utc};
use serde_json::Value;

use shared_config::AppConfig;
use shared_database::repository::{accounts, clinics, doctors};
use shared_database::Database;
use shared_models::auth::{Role, SessionClaims};
use shared_models::{Account, Clinic, Doctor};

use crate::jwt::{encode_claims, issue_token};
use crate::mailer::{EmailMessage, EmailQueue, EmailReceiver, EmailSender};
use crate::state::AppState;

pub const TEST_PASSWORD: &str = "password123";

pub struct TestConfig {
    pub jwt_secret: String,
    pub database_url: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "test-secret-key-for-jwt-validation-must-be-long-enough".to_string(),
            database_url: ":memory:".to_string(),
        }
    }
}

impl TestConfig {
    /// Cheap argon2 parameters keep hashing fast under test.
    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            database_url: self.database_url.clone(),
            jwt_secret: self.jwt_secret.clone(),
            password_hash_memory_kib: 64,
            password_hash_iterations: 1,
            email_retry_delay_ms: 1,
            ..AppConfig::default()
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

/// Captures every message it is asked to send. Can be switched into a failing mode.
#[derive(Default)]
pub struct RecordingEmailSender {
    sent: Mutex<Vec<EmailMessage>>,
    failing: AtomicBool,
}

impl RecordingEmailSender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        let sender = Self::default();
        sender.set_failing(true);
        sender
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().map(|sent| sent.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl EmailSender for RecordingEmailSender {
    async fn send(&self, message: &EmailMessage) -> anyhow::Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(anyhow!("smtp unavailable"));
        }
        self.sent
            .lock()
            .map_err(|_| anyhow!("recorder poisoned"))?
            .push(message.clone());
        Ok(())
    }
}

/// In-memory application state plus handles tests use to observe side effects.
pub struct TestContext {
    pub state: Arc<AppState>,
    pub mailer: Arc<RecordingEmailSender>,
    pub email_rx: EmailReceiver,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_config(TestConfig::default())
    }

    pub fn with_config(config: TestConfig) -> Self {
        let db = Database::open(&config.database_url).expect("open test database");
        let (email_queue, email_rx) = EmailQueue::new();
        let mailer = Arc::new(RecordingEmailSender::new());
        let state = AppState::new(config.to_app_config(), db, email_queue, mailer.clone())
            .expect("build test state");

        Self {
            state: Arc::new(state),
            mailer,
            email_rx,
        }
    }

    pub fn db(&self) -> &Database {
        &self.state.db
    }

    /// Drain whatever the handlers have scheduled so far.
    pub fn scheduled_emails(&mut self) -> Vec<EmailMessage> {
        let mut messages = Vec::new();
        while let Ok(message) = self.email_rx.try_recv() {
            messages.push(message);
        }
        messages
    }

    pub async fn seed_account(&self, name: &str, email: &str, role: Role) -> Account {
        let hash = self.state.passwords.hash_password(TEST_PASSWORD).expect("hash test password");
        let name = name.to_string();
        let email = email.to_string();
        self.db()
            .call(move |conn| accounts::insert_account(conn, &name, &email, &hash, role))
            .await
            .expect("seed account")
    }

    pub async fn seed_patient(&self, email: &str) -> Account {
        self.seed_account("Test Patient", email, Role::Patient).await
    }

    pub async fn seed_admin(&self, email: &str) -> Account {
        self.seed_account("Test Admin", email, Role::Admin).await
    }

    pub async fn seed_doctor_account(&self, email: &str) -> Account {
        self.seed_account("Test Doctor", email, Role::Doctor).await
    }

    pub async fn seed_clinic(&self, name: &str) -> Clinic {
        let name = name.to_string();
        self.db()
            .call(move |conn| clinics::insert_clinic(conn, &name, None))
            .await
            .expect("seed clinic")
    }

    pub async fn seed_doctor(&self, name: &str, clinic_id: Option<i64>) -> Doctor {
        let name = name.to_string();
        self.db()
            .call(move |conn| doctors::insert_doctor(conn, &name, Some("general"), clinic_id))
            .await
            .expect("seed doctor")
    }

    pub fn token_for(&self, account: &Account) -> String {
        self.state.issue_access_token(account).expect("issue test token")
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

pub struct JwtTestUtils;

impl JwtTestUtils {
    pub fn create_test_token(account: &Account, secret: &str, exp_hours: Option<i64>) -> String {
        issue_token(
            &account.id.to_string(),
            Some(account.role),
            Duration::hours(exp_hours.unwrap_or(24)),
            secret,
        )
        .expect("sign test token")
    }

    pub fn create_expired_token(account: &Account, secret: &str) -> String {
        Self::create_test_token(account, secret, Some(-1))
    }

    pub fn create_invalid_signature_token(account: &Account) -> String {
        Self::create_test_token(account, "wrong-secret", None)
    }

    pub fn create_token_for_subject(sub: &str, secret: &str) -> String {
        let claims = SessionClaims {
            sub: sub.to_string(),
            role: None,
            exp: (Utc::now() + Duration::hours(1)).timestamp() as u64,
            iat: None,
        };
        encode_claims(&claims, secret).expect("sign test token")
    }

    pub fn create_malformed_token() -> String {
        "invalid.token.format".to_string()
    }
}

pub fn json_request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("build request"),
        None => builder.body(Body::empty()).expect("build request"),
    }
}

pub async fn read_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("read body");
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(&bytes).expect("response body is JSON")
}
