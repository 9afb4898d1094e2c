//! Short-lived confirmation codes for the self-registration flow.
//!
//! Codes are 6 characters with at least one digit and one letter, the rest
//! drawn uniformly from digits, lowercase letters and a small set of
//! specials. `thread_rng` is acceptable here: the code is short-lived,
//! single-use and delivered out of band, not a long-lived secret.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use rand::seq::SliceRandom;

pub const CODE_LENGTH: usize = 6;
pub const DEFAULT_TTL_MINUTES: i64 = 15;

const DIGITS: &[u8] = b"0123456789";
const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz!@#$%&*";

/// Generate a 6-character confirmation code.
///
/// One digit and one letter are guaranteed; the final shuffle keeps their
/// positions unpredictable.
pub fn generate_confirmation_code() -> String {
    let mut rng = rand::thread_rng();

    let mut chars: Vec<u8> = Vec::with_capacity(CODE_LENGTH);
    chars.push(DIGITS[rng.gen_range(0..DIGITS.len())]);
    chars.push(LETTERS[rng.gen_range(0..LETTERS.len())]);
    while chars.len() < CODE_LENGTH {
        chars.push(ALPHABET[rng.gen_range(0..ALPHABET.len())]);
    }
    chars.shuffle(&mut rng);

    chars.into_iter().map(char::from).collect()
}

/// Structural validation: exactly 6 characters of `[a-z0-9!@#$%&*]`.
///
/// Always answers `false` for malformed input, never panics.
pub fn validate_confirmation_code(code: &str) -> bool {
    code.len() == CODE_LENGTH && code.bytes().all(|b| ALPHABET.contains(&b))
}

/// A confirmation code bundled with its expiry and single-use state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationCode {
    pub code: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    used: bool,
}

impl ConfirmationCode {
    /// Generate a code expiring `ttl_minutes` from now.
    pub fn generate(ttl_minutes: i64) -> Self {
        let issued_at = Utc::now();
        Self {
            code: generate_confirmation_code(),
            issued_at,
            expires_at: issued_at + Duration::minutes(ttl_minutes),
            used: false,
        }
    }

    /// Lazily evaluated expiry check.
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    /// One-time consumption: succeeds at most once, and never after expiry.
    pub fn consume(&mut self) -> bool {
        if self.used || self.is_expired() {
            return false;
        }
        self.used = true;
        true
    }

    pub fn is_used(&self) -> bool {
        self.used
    }
}

impl Default for ConfirmationCode {
    fn default() -> Self {
        Self::generate(DEFAULT_TTL_MINUTES)
    }
}
