//! Coarse access-level classification from a user's role and function.
//!
//! Role and function are free-form titles typed by office staff, so matching
//! is tolerant: case-insensitive, accent-insensitive, and it understands both
//! the French vocabulary of the cabinet ("Gérant", "Associé Émérite",
//! "Avocat", ...) and the English equivalents.

use serde::{Deserialize, Serialize};

use crate::session::SessionUser;

/// Coarse role classification used for quick authorization checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    /// No authenticated user.
    None,
    /// Managing partner ("Gérant").
    Manager,
    /// Senior partner ("Associé Émérite").
    Senior,
    Admin,
    Lawyer,
    Secretary,
    Intern,
    /// Authenticated but with no recognized title.
    User,
}

impl AccessLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessLevel::None => "none",
            AccessLevel::Manager => "manager",
            AccessLevel::Senior => "senior",
            AccessLevel::Admin => "admin",
            AccessLevel::Lawyer => "lawyer",
            AccessLevel::Secretary => "secretary",
            AccessLevel::Intern => "intern",
            AccessLevel::User => "user",
        }
    }
}

impl core::fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lowercase a title and strip the accents common in French job titles.
fn fold_title(title: &str) -> String {
    title
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'à' | 'â' | 'ä' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'î' | 'ï' => 'i',
            'ô' | 'ö' => 'o',
            'ù' | 'û' | 'ü' => 'u',
            'ç' => 'c',
            other => other,
        })
        .collect()
}

/// Map a folded title to an access level, when recognized.
pub(crate) fn classify_title(title: &str) -> Option<AccessLevel> {
    match fold_title(title).as_str() {
        "gerant" | "manager" => Some(AccessLevel::Manager),
        "associe emerite" | "senior partner" | "seniorpartner" => Some(AccessLevel::Senior),
        "admin" | "administrateur" => Some(AccessLevel::Admin),
        "avocat" | "lawyer" => Some(AccessLevel::Lawyer),
        "secretaire" | "secretary" => Some(AccessLevel::Secretary),
        "stagiaire" | "intern" => Some(AccessLevel::Intern),
        _ => None,
    }
}

/// Resolve the access level for a user, `function` outranking `role`.
///
/// Pure and total: an absent user yields [`AccessLevel::None`], an
/// unrecognized title yields [`AccessLevel::User`].
pub fn resolve_access_level(user: Option<&SessionUser>) -> AccessLevel {
    let Some(user) = user else {
        return AccessLevel::None;
    };

    if let Some(level) = user.function.as_deref().and_then(classify_title) {
        return level;
    }
    classify_title(&user.role).unwrap_or(AccessLevel::User)
}

/// Superset check: managing/senior partners by function, or an "admin" role.
///
/// Not mutually exclusive with [`resolve_access_level`]; a user can be both
/// a lawyer and an admin.
pub fn is_admin(user: Option<&SessionUser>) -> bool {
    let Some(user) = user else {
        return false;
    };

    let function_is_partner = matches!(
        user.function.as_deref().and_then(classify_title),
        Some(AccessLevel::Manager) | Some(AccessLevel::Senior)
    );

    function_is_partner || fold_title(&user.role) == "admin"
}
