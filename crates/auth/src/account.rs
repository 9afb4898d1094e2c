//! Account-type classification, used to pick the onboarding flow.
//!
//! Admin-provisioned accounts walk the temporary-password flow; self
//! registered accounts walk the confirmation-code flow. This module only
//! classifies — the flows themselves live with the UI.

use serde::{Deserialize, Serialize};

use cabinet_core::UserRecord;

/// How an account came into existence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AccountType {
    AdminCreated,
    SelfCreated,
    Unknown,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::AdminCreated => "admin-created",
            AccountType::SelfCreated => "self-created",
            AccountType::Unknown => "unknown",
        }
    }
}

/// Classify a user record by provenance.
///
/// `created_by` present means an administrator provisioned the account,
/// whoever ends up logging in with it. A first login with no `created_by`
/// is a self-registration still in onboarding.
pub fn classify(user: &UserRecord) -> AccountType {
    if user.created_by.is_some() {
        AccountType::AdminCreated
    } else if user.first_login {
        AccountType::SelfCreated
    } else {
        AccountType::Unknown
    }
}

/// Onboarding copy for one account type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OnboardingMessages {
    pub welcome: &'static str,
    pub password_info: &'static str,
    pub next_step: &'static str,
}

/// Static onboarding copy per account type. Total: any unrecognized state
/// falls back to the `Unknown` set.
pub fn messages_for(account_type: AccountType) -> OnboardingMessages {
    match account_type {
        AccountType::AdminCreated => OnboardingMessages {
            welcome: "Bienvenue ! Votre compte a été créé par un administrateur du cabinet.",
            password_info: "Un mot de passe temporaire vous a été communiqué.",
            next_step: "Connectez-vous puis choisissez un nouveau mot de passe.",
        },
        AccountType::SelfCreated => OnboardingMessages {
            welcome: "Bienvenue ! Votre compte a bien été créé.",
            password_info: "Vous avez choisi votre mot de passe lors de l'inscription.",
            next_step: "Saisissez le code de confirmation qui vous a été transmis.",
        },
        AccountType::Unknown => OnboardingMessages {
            welcome: "Bienvenue sur l'espace du cabinet.",
            password_info: "Connectez-vous avec vos identifiants habituels.",
            next_step: "Contactez un administrateur en cas de difficulté.",
        },
    }
}
