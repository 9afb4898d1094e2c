//! Argon2 credential verifier.
//!
//! Salted one-way hashing in PHC string format; Argon2id defaults carry the
//! cost factor that makes offline brute force expensive.

use argon2::password_hash::{PasswordHash, SaltString, rand_core::OsRng};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};

use cabinet_auth::{AuthError, AuthResult, CredentialVerifier};

/// Argon2id verifier/hasher with library defaults.
#[derive(Debug, Default, Clone, Copy)]
pub struct Argon2Verifier;

impl CredentialVerifier for Argon2Verifier {
    fn verify(&self, plaintext: &str, hash: &str) -> bool {
        // An unparseable stored hash is a verification failure, not an error
        // path worth surfacing to the caller.
        match PasswordHash::new(hash) {
            Ok(parsed) => Argon2::default()
                .verify_password(plaintext.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }

    fn hash(&self, plaintext: &str) -> AuthResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|phc| phc.to_string())
            .map_err(|e| AuthError::Server(format!("password hashing failed: {e}")))
    }
}
