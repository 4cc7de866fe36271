// security/src/lib.rs

pub mod policy;

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use policy::{AuthContext, Role, effective_doctor_id, effective_patient_id};

/// Claims for JWT. `sub` is the store id of the admin/doctor/patient row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: u64,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing or invalid token")]
    MissingToken,
    #[error("Invalid or expired token")]
    InvalidToken,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("JWT error: {0}")]
    Jwt(String),
}

/// Issues an HS256 token for the given identity.
pub fn issue_token(
    secret: &[u8],
    id: u64,
    role: Role,
    ttl_hours: i64,
) -> Result<String, AuthError> {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: id,
        role,
        iat: now,
        exp: now + ttl_hours * 3600,
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(secret))
        .map_err(|e| AuthError::Jwt(format!("Failed to encode JWT: {e}")))
}

/// Decodes and validates a bearer token, returning the caller's context.
pub fn validate_token(secret: &[u8], token: &str) -> Result<AuthContext, AuthError> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret),
        &Validation::default(),
    )
    .map_err(|_| AuthError::InvalidToken)?;

    Ok(AuthContext {
        id: data.claims.sub,
        role: data.claims.role,
    })
}

/// Pulls the token out of an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header: &str) -> Result<&str, AuthError> {
    header.strip_prefix("Bearer ").ok_or(AuthError::MissingToken)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test-secret-key-at-least-32-bytes-long!!";

    #[test]
    fn token_round_trip_preserves_identity() {
        let token = issue_token(SECRET, 42, Role::Doctor, 24).unwrap();
        let ctx = validate_token(SECRET, &token).unwrap();
        assert_eq!(ctx.id, 42);
        assert_eq!(ctx.role, Role::Doctor);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = issue_token(SECRET, 1, Role::Patient, 24).unwrap();
        assert!(validate_token(b"another-secret-key-32-bytes-long!!!!!!!!", &token).is_err());
    }

    #[test]
    fn bearer_prefix_required() {
        assert!(bearer_token("Bearer abc").is_ok());
        assert!(bearer_token("Basic abc").is_err());
    }
}
