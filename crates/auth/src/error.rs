//! Authentication error taxonomy.
//!
//! Messages here are user-safe: `InvalidCredentials` is identical for an
//! unknown email and a wrong password, and `Server` hides internal detail
//! (the payload is for server-side logs only).

use thiserror::Error;

use cabinet_core::DomainError;

/// Result type for authentication operations.
pub type AuthResult<T> = Result<T, AuthError>;

/// Typed authentication failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Wrong email or password; deliberately indistinguishable.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// No bearer token was supplied.
    #[error("missing authentication token")]
    MissingToken,

    /// The token is malformed or its signature does not verify.
    #[error("invalid authentication token")]
    InvalidToken,

    /// The token's expiry has elapsed.
    #[error("authentication token has expired")]
    TokenExpired,

    /// The user referenced by a valid token no longer exists (or is inactive).
    #[error("user not found")]
    UserNotFound,

    /// Self-registration against an already registered email.
    #[error("an account with this email already exists")]
    EmailTaken,

    /// Malformed input (email shape, password policy, ...).
    #[error("validation failed: {0}")]
    Validation(String),

    /// Transport failure (timeout, connection refused, ...).
    #[error("network failure: {0}")]
    Network(String),

    /// Internal failure; the payload is logged, never surfaced to clients.
    #[error("internal error")]
    Server(String),
}

impl From<DomainError> for AuthError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => AuthError::Validation(msg),
            DomainError::InvalidId(msg) => AuthError::Validation(msg),
            DomainError::NotFound => AuthError::UserNotFound,
        }
    }
}
