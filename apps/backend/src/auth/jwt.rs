use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::state::security_config::SecurityConfig;
use crate::AppError;

/// Claims carried by admin session tokens.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// User id
    pub id: Uuid,
    /// Issued-at (seconds since epoch)
    pub iat: i64,
    /// Expiry (seconds since epoch)
    pub exp: i64,
}

fn epoch_secs(t: SystemTime) -> Result<i64, AppError> {
    let secs = t
        .duration_since(UNIX_EPOCH)
        .map_err(|_| AppError::internal("System clock is before the Unix epoch"))?
        .as_secs();
    i64::try_from(secs).map_err(|_| AppError::internal("Timestamp out of range"))
}

/// Mint a token for `user_id` valid for `security.token_ttl` from `now`.
pub fn mint_access_token(
    user_id: Uuid,
    now: SystemTime,
    security: &SecurityConfig,
) -> Result<String, AppError> {
    let iat = epoch_secs(now)?;
    let ttl = i64::try_from(security.token_ttl.as_secs())
        .map_err(|_| AppError::internal("Token TTL out of range"))?;

    let claims = Claims {
        id: user_id,
        iat,
        exp: iat.saturating_add(ttl),
    };

    encode(
        &Header::new(security.algorithm),
        &claims,
        &EncodingKey::from_secret(&security.jwt_secret),
    )
    .map_err(|e| AppError::internal(format!("Failed to encode JWT: {e}")))
}

/// Verify signature and expiry (no leeway) and return the claims.
///
/// Expired tokens map to `UnauthorizedExpiredJwt`; everything else that fails
/// to decode maps to `UnauthorizedInvalidJwt`.
pub fn verify_access_token(token: &str, security: &SecurityConfig) -> Result<Claims, AppError> {
    let mut validation = Validation::new(security.algorithm);
    validation.leeway = 0;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(&security.jwt_secret),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AppError::unauthorized_expired_jwt(),
        _ => AppError::unauthorized_invalid_jwt(),
    })
}
