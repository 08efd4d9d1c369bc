use axum::extract::FromRef;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use thiserror::Error;
use time::{Duration, OffsetDateTime};
use tracing::debug;

use super::claims::{Claims, Role};
use crate::{config::JwtConfig, state::AppState};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token signature does not match")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("token could not be parsed")]
    Malformed,
    #[error("token signing failed: {0}")]
    Signing(String),
}

/// HS256 keys built once from the shared secret.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        state.jwt.clone()
    }
}

impl JwtKeys {
    pub fn new(cfg: &JwtConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            ttl: Duration::hours(cfg.ttl_hours),
        }
    }

    /// Configured token lifetime.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn issue(&self, email: &str, role: Role, ttl: Duration) -> Result<String, TokenError> {
        self.issue_at(email, role, OffsetDateTime::now_utc(), ttl)
    }

    pub(crate) fn issue_at(
        &self,
        email: &str,
        role: Role,
        issued_at: OffsetDateTime,
        ttl: Duration,
    ) -> Result<String, TokenError> {
        let exp = issued_at
            .checked_add(ttl)
            .ok_or_else(|| TokenError::Signing("expiry out of range".into()))?
            .unix_timestamp()
            .max(0) as usize;
        let claims = Claims {
            email: email.to_string(),
            role,
            exp,
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))?;
        debug!(role = ?role, exp, "jwt signed");
        Ok(token)
    }

    pub fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed,
            }
        })?;
        debug!(role = ?data.claims.role, "jwt verified");
        Ok(data.claims)
    }
}
