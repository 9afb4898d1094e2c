//! User record as exposed by the user-record store.
//!
//! # Invariants
//! - `email` is stored lowercased and trimmed.
//! - `password_hash` is a PHC string and must never leave the backend;
//!   sanitized projections are built by the auth layer.
//! - `created_by` being present implies the account was provisioned by an
//!   administrator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::id::UserId;

/// Identity record owned by the user-record store.
///
/// `role` and `function` are free-form titles as entered by office staff
/// ("Avocat", "Gérant", "Associé Émérite", ...). Interpretation of those
/// strings belongs to the permission resolver, not to this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub role: String,
    /// Secondary role signal (job title); outranks `role` when recognized.
    pub function: Option<String>,
    /// PHC-format password hash; `None` until the user sets a password.
    pub password_hash: Option<String>,
    pub is_active: bool,
    pub first_login: bool,
    /// Present when an administrator provisioned this account.
    pub created_by: Option<UserId>,
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    /// Build a new record, normalizing the email and validating the basics.
    pub fn new(
        email: impl Into<String>,
        name: impl Into<String>,
        role: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let email = normalize_email(email.into())?;
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }

        Ok(Self {
            id: UserId::new(),
            email,
            name,
            role: role.into(),
            function: None,
            password_hash: None,
            is_active: true,
            first_login: false,
            created_by: None,
            created_at: Utc::now(),
        })
    }

    pub fn has_password(&self) -> bool {
        self.password_hash.is_some()
    }
}

/// Normalize an email address (trim + lowercase) and check its basic shape.
pub fn normalize_email(email: impl AsRef<str>) -> Result<String, DomainError> {
    let email = email.as_ref().trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(DomainError::validation("invalid email format"));
    }
    Ok(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_record_normalizes_email() {
        let user = UserRecord::new("  Maitre.Durand@Cabinet.FR ", "Maître Durand", "Avocat")
            .expect("valid record");
        assert_eq!(user.email, "maitre.durand@cabinet.fr");
        assert!(user.is_active);
        assert!(user.created_by.is_none());
        assert!(!user.has_password());
    }

    #[test]
    fn new_record_rejects_bad_email() {
        let result = UserRecord::new("not-an-email", "Someone", "Avocat");
        assert!(result.is_err());
    }

    #[test]
    fn new_record_rejects_blank_name() {
        let result = UserRecord::new("a@b.com", "   ", "Avocat");
        assert!(result.is_err());
    }
}
