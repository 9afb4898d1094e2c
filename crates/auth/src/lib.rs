//! `cabinet-auth` — session/credential management and permission derivation.
//!
//! This crate is intentionally decoupled from HTTP and storage: the session
//! manager talks to a user-record store, a credential verifier and a token
//! codec through traits, and everything else (permission resolver, account
//! classifier, confirmation codes) is pure.

pub mod account;
pub mod claims;
pub mod confirmation;
pub mod error;
pub mod manager;
pub mod permissions;
pub mod provider;
pub mod roles;
pub mod session;

pub use account::{AccountType, OnboardingMessages, classify, messages_for};
pub use claims::{TokenClaims, validate_claims};
pub use confirmation::{ConfirmationCode, generate_confirmation_code, validate_confirmation_code};
pub use error::{AuthError, AuthResult};
pub use manager::{CredentialVerifier, SessionManager, TokenCodec, UserStore};
pub use permissions::{
    Module, ModulePermissions, PermissionMatrix, check_permission, default_permissions,
    permissions_for_level,
};
pub use provider::{AuthProvider, ExistsReport};
pub use roles::{AccessLevel, is_admin, resolve_access_level};
pub use session::{SESSION_TTL_HOURS, Session, SessionUser};
