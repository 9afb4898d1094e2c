//! Session objects returned to clients after a successful login.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use cabinet_core::{UserId, UserRecord};

/// Sessions expire 24 hours after issue.
pub const SESSION_TTL_HOURS: i64 = 24;

/// Sanitized user projection carried inside a session.
///
/// This is the only user shape that crosses the wire; the password hash
/// never appears here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub function: Option<String>,
    pub role: String,
}

impl From<&UserRecord> for SessionUser {
    fn from(user: &UserRecord) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            function: user.function.clone(),
            role: user.role.clone(),
        }
    }
}

/// Ephemeral credential grant: opaque token, owning user, expiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: SessionUser,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}
