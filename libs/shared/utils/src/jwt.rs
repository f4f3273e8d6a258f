use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;
use tracing::debug;

use shared_models::auth::{Role, SessionClaims};

#[derive(Error, Debug)]
pub enum TokenError {
    #[error("JWT secret is not set")]
    MissingSecret,

    #[error("Token lifetime is out of range")]
    InvalidTtl,

    #[error("Failed to encode token: {0}")]
    Encoding(#[from] jsonwebtoken::errors::Error),
}

/// Sign a session token for `sub` that expires after `ttl`.
pub fn issue_token(sub: &str, role: Option<Role>, ttl: Duration, jwt_secret: &str) -> Result<String, TokenError> {
    let now = Utc::now();
    let expires_at = now.checked_add_signed(ttl).ok_or(TokenError::InvalidTtl)?;
    let claims = SessionClaims {
        sub: sub.to_string(),
        role,
        exp: expires_at.timestamp().max(0) as u64,
        iat: Some(now.timestamp().max(0) as u64),
    };
    encode_claims(&claims, jwt_secret)
}

pub fn encode_claims(claims: &SessionClaims, jwt_secret: &str) -> Result<String, TokenError> {
    if jwt_secret.is_empty() {
        return Err(TokenError::MissingSecret);
    }

    let token = encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(jwt_secret.as_bytes()),
    )?;
    Ok(token)
}

/// Verify signature and expiry. Every failure collapses to `None`.
pub fn decode_token(token: &str, jwt_secret: &str) -> Option<SessionClaims> {
    if jwt_secret.is_empty() {
        debug!("Token rejected: JWT secret is not set");
        return None;
    }

    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    match decode::<SessionClaims>(token, &DecodingKey::from_secret(jwt_secret.as_bytes()), &validation) {
        Ok(data) => Some(data.claims),
        Err(e) => {
            debug!("Token rejected: {}", e);
            None
        }
    }
}
