use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::rngs::OsRng;
use thiserror::Error;
use tracing::instrument;

use shared_config::AppConfig;

/// Bytes beyond this length are ignored when hashing and verifying.
pub const MAX_PASSWORD_BYTES: usize = 72;

#[derive(Error, Debug)]
pub enum PasswordError {
    #[error("Invalid password hashing parameters: {0}")]
    InvalidParams(String),

    #[error("Password hashing failed: {0}")]
    Hash(String),

    #[error("Stored password hash is malformed: {0}")]
    MalformedHash(String),
}

#[derive(Clone)]
pub struct PasswordService {
    argon2: Argon2<'static>,
}

impl PasswordService {
    pub fn new(memory_kib: u32, iterations: u32) -> Result<Self, PasswordError> {
        let params = Params::new(memory_kib, iterations, 1, None)
            .map_err(|e| PasswordError::InvalidParams(e.to_string()))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, PasswordError> {
        Self::new(config.password_hash_memory_kib, config.password_hash_iterations)
    }

    #[instrument(skip_all)]
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(truncate(password), &salt)
            .map_err(|e| PasswordError::Hash(e.to_string()))?;
        Ok(hash.to_string())
    }

    #[instrument(skip_all)]
    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        let parsed_hash = PasswordHash::new(hash).map_err(|e| PasswordError::MalformedHash(e.to_string()))?;

        match self.argon2.verify_password(truncate(password), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(PasswordError::Hash(e.to_string())),
        }
    }
}

fn truncate(password: &str) -> &[u8] {
    let bytes = password.as_bytes();
    &bytes[..bytes.len().min(MAX_PASSWORD_BYTES)]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> PasswordService {
        PasswordService::new(64, 1).unwrap()
    }

    #[test]
    fn test_hash_and_verify_round_trip() {
        let service = service();
        let hash = service.hash_password("correct horse").unwrap();
        assert!(service.verify_password("correct horse", &hash).unwrap());
    }

    #[test]
    fn test_verify_rejects_different_password() {
        let service = service();
        let hash = service.hash_password("correct horsex").unwrap();
        assert!(!service.verify_password("correct horse", &hash).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let service = service();
        let first = service.hash_password("same").unwrap();
        let second = service.hash_password("same").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_bytes_past_limit_are_ignored() {
        let service = service();
        let base = "a".repeat(MAX_PASSWORD_BYTES);
        let hash = service.hash_password(&format!("{}tail-one", base)).unwrap();
        assert!(service.verify_password(&format!("{}tail-two", base), &hash).unwrap());
        assert!(!service.verify_password(&base[..MAX_PASSWORD_BYTES - 1], &hash).unwrap());
    }

    #[test]
    fn test_malformed_hash_is_an_error() {
        assert!(matches!(
            service().verify_password("x", "not-a-phc-string"),
            Err(PasswordError::MalformedHash(_))
        ));
    }

    #[test]
    fn test_invalid_params_rejected() {
        assert!(PasswordService::new(1, 1).is_err());
    }

    #[test]
    fn test_hash_verifies_under_different_cost() {
        let cheap = service();
        let hash = cheap.hash_password("portable").unwrap();
        let other = PasswordService::new(128, 2).unwrap();
        assert!(other.verify_password("portable", &hash).unwrap());
    }
}
