//! JWT issuance and verification (HS256)
//!
//! The token carries the user guid as `sub`; handlers receive a verified
//! owner identifier and never re-read the bearer credential themselves.

use crate::{Error, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims embedded in an access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User guid
    pub sub: Uuid,
    /// Expiry, seconds since the Unix epoch
    pub exp: i64,
    /// Issued-at, seconds since the Unix epoch
    pub iat: i64,
}

/// Issue an access token for a user.
pub fn issue_token(secret: &str, user_guid: Uuid, ttl_minutes: i64) -> Result<String> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_guid,
        exp: (now + Duration::minutes(ttl_minutes)).timestamp(),
        iat: now.timestamp(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| Error::Internal(format!("token encoding failed: {e}")))
}

/// Verify a token and return its claims.
///
/// Signature and expiry failures both collapse into `Error::Unauthorized`
/// with a generic message.
pub fn verify_token(secret: &str, token: &str) -> Result<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| Error::Unauthorized("invalid or expired token".to_string()))
}
