//! Token claims model (transport-agnostic).
//!
//! This is the payload the token codec signs: `{userId, iat, exp}` as unix
//! timestamps. Signature verification / decoding is intentionally outside
//! this crate; `validate_claims` checks the time window only.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use cabinet_core::UserId;

use crate::error::AuthError;

/// Signed token payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject: the owning user.
    #[serde(rename = "userId")]
    pub user_id: UserId,

    /// Issued-at, unix seconds.
    pub iat: i64,

    /// Expiry, unix seconds.
    pub exp: i64,
}

impl TokenClaims {
    pub fn new(user_id: UserId, issued_at: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            user_id,
            iat: issued_at.timestamp(),
            exp: (issued_at + ttl).timestamp(),
        }
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_else(Utc::now)
    }
}

/// Deterministically validate a token's time window.
pub fn validate_claims(claims: &TokenClaims, now: DateTime<Utc>) -> Result<(), AuthError> {
    if claims.exp <= claims.iat {
        return Err(AuthError::InvalidToken);
    }
    if now.timestamp() >= claims.exp {
        return Err(AuthError::TokenExpired);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_claims_validate() {
        let now = Utc::now();
        let claims = TokenClaims::new(UserId::new(), now, Duration::hours(24));
        assert_eq!(validate_claims(&claims, now), Ok(()));
    }

    #[test]
    fn elapsed_expiry_is_rejected() {
        let now = Utc::now();
        let claims = TokenClaims::new(UserId::new(), now - Duration::hours(25), Duration::hours(24));
        assert_eq!(validate_claims(&claims, now), Err(AuthError::TokenExpired));
    }

    #[test]
    fn inverted_time_window_is_rejected() {
        let now = Utc::now();
        let claims = TokenClaims {
            user_id: UserId::new(),
            iat: now.timestamp(),
            exp: now.timestamp() - 10,
        };
        assert_eq!(validate_claims(&claims, now), Err(AuthError::InvalidToken));
    }

    #[test]
    fn wire_format_uses_user_id_key() {
        let claims = TokenClaims::new(UserId::new(), Utc::now(), Duration::hours(1));
        let json = serde_json::to_value(&claims).expect("serializable");
        assert!(json.get("userId").is_some());
        assert!(json.get("iat").is_some());
        assert!(json.get("exp").is_some());
    }
}
