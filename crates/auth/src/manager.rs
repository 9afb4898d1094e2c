//! Session/credential manager.
//!
//! Orchestrates the user-record store, the credential verifier and the token
//! codec behind the [`AuthProvider`] contract. This is the stateless token
//! backend: sessions are validated by recomputation (signature + expiry),
//! so logout has nothing to invalidate server-side.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};

use cabinet_core::{UserId, UserRecord, user::normalize_email};

use crate::claims::{TokenClaims, validate_claims};
use crate::error::{AuthError, AuthResult};
use crate::provider::{AuthProvider, ExistsReport};
use crate::session::{SESSION_TTL_HOURS, Session, SessionUser};

/// User-record store (external collaborator, black box here).
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> AuthResult<Option<UserRecord>>;
    async fn find_by_id(&self, id: UserId) -> AuthResult<Option<UserRecord>>;
    async fn insert(&self, user: &UserRecord) -> AuthResult<()>;
}

/// One-way salted hash comparison (Argon2 in production).
pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, plaintext: &str, hash: &str) -> bool;
    fn hash(&self, plaintext: &str) -> AuthResult<String>;
}

/// Token issuer/verifier. `decode` fails closed on signature mismatch and
/// elapsed expiry.
pub trait TokenCodec: Send + Sync {
    fn encode(&self, claims: &TokenClaims) -> AuthResult<String>;
    fn decode(&self, token: &str) -> AuthResult<TokenClaims>;
}

const MIN_PASSWORD_LEN: usize = 8;

/// Session/credential manager over pluggable seams.
pub struct SessionManager {
    users: Arc<dyn UserStore>,
    credentials: Arc<dyn CredentialVerifier>,
    tokens: Arc<dyn TokenCodec>,
}

impl SessionManager {
    pub fn new(
        users: Arc<dyn UserStore>,
        credentials: Arc<dyn CredentialVerifier>,
        tokens: Arc<dyn TokenCodec>,
    ) -> Self {
        Self {
            users,
            credentials,
            tokens,
        }
    }

    /// Mint a 24h session for a verified user.
    pub fn mint_session(&self, user: &UserRecord) -> AuthResult<Session> {
        let claims = TokenClaims::new(user.id, Utc::now(), Duration::hours(SESSION_TTL_HOURS));
        let token = self.tokens.encode(&claims)?;

        Ok(Session {
            token,
            user: SessionUser::from(user),
            expires_at: claims.expires_at(),
        })
    }

    /// Decode a token and resolve its user against the store.
    async fn resolve_token(&self, token: &str) -> AuthResult<UserRecord> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AuthError::MissingToken);
        }

        let claims = self.tokens.decode(token)?;
        validate_claims(&claims, Utc::now())?;

        let user = self
            .users
            .find_by_id(claims.user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        // An inactive account is indistinguishable from a deleted one.
        if !user.is_active {
            return Err(AuthError::UserNotFound);
        }

        Ok(user)
    }
}

#[async_trait]
impl AuthProvider for SessionManager {
    async fn login(&self, email: &str, password: &str) -> AuthResult<Session> {
        let email = normalize_email(email)?;

        // Unknown email, inactive account and wrong password all collapse
        // into the same failure, so callers cannot enumerate accounts.
        let user = self
            .users
            .find_by_email(&email)
            .await?
            .filter(|u| u.is_active)
            .ok_or(AuthError::InvalidCredentials)?;

        let hash = user
            .password_hash
            .as_deref()
            .ok_or(AuthError::InvalidCredentials)?;

        if !self.credentials.verify(password, hash) {
            tracing::debug!(user_id = %user.id, "password mismatch");
            return Err(AuthError::InvalidCredentials);
        }

        let session = self.mint_session(&user)?;
        tracing::info!(user_id = %user.id, "session issued");
        Ok(session)
    }

    async fn validate(&self, token: &str) -> AuthResult<SessionUser> {
        let user = self.resolve_token(token).await?;
        Ok(SessionUser::from(&user))
    }

    async fn logout(&self, _token: &str) -> AuthResult<()> {
        // Nothing to invalidate: tokens are not tracked server-side in this
        // backend. The client clears its local session unconditionally.
        tracing::debug!("logout acknowledged (stateless backend)");
        Ok(())
    }

    async fn sign_up(&self, email: &str, password: &str, name: &str) -> AuthResult<Session> {
        if password.len() < MIN_PASSWORD_LEN {
            return Err(AuthError::Validation(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }

        let mut user = UserRecord::new(email, name, "")?;
        if self.users.find_by_email(&user.email).await?.is_some() {
            return Err(AuthError::EmailTaken);
        }

        user.password_hash = Some(self.credentials.hash(password)?);
        user.first_login = true;
        self.users.insert(&user).await?;

        tracing::info!(user_id = %user.id, "self-registered account created");
        self.mint_session(&user)
    }

    async fn check_user_exists(&self, email: &str) -> AuthResult<ExistsReport> {
        let email = normalize_email(email)?;

        Ok(match self.users.find_by_email(&email).await? {
            None => ExistsReport {
                exists: false,
                has_password: false,
                user_id: None,
            },
            Some(user) => {
                let has_password = user.has_password();
                ExistsReport {
                    exists: true,
                    has_password,
                    // Only the set-password flow needs the id.
                    user_id: (!has_password).then_some(user.id),
                }
            }
        })
    }
}
