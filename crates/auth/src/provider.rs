//! Pluggable auth-provider capability set.
//!
//! The application talks to exactly one of these, selected by configuration
//! at startup: the stateless token backend validates sessions by signature
//! and expiry recomputation, while the Postgres backend additionally tracks
//! sessions server-side. Handlers never know which one is wired in.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use cabinet_core::UserId;

use crate::error::AuthResult;
use crate::session::{Session, SessionUser};

/// Onboarding probe result for an email address.
///
/// `user_id` is only populated when the account exists but has no password
/// yet (the set-password flow needs it); otherwise it stays `None` to limit
/// what an unauthenticated probe can learn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExistsReport {
    pub exists: bool,
    pub has_password: bool,
    pub user_id: Option<UserId>,
}

/// Polymorphic auth backend.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Verify credentials and mint a session.
    async fn login(&self, email: &str, password: &str) -> AuthResult<Session>;

    /// Resolve the user behind a token, rejecting expired/invalid tokens.
    async fn validate(&self, token: &str) -> AuthResult<SessionUser>;

    /// Best-effort server-side invalidation. Callers clear their local
    /// session unconditionally regardless of this call's outcome.
    async fn logout(&self, token: &str) -> AuthResult<()>;

    /// Self-registration: create the record and mint a first session.
    async fn sign_up(&self, email: &str, password: &str, name: &str) -> AuthResult<Session>;

    /// Onboarding branch point between "set password" and "enter password".
    async fn check_user_exists(&self, email: &str) -> AuthResult<ExistsReport>;
}
