//! argon2id password hashing.

use argon2::Argon2;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use rand::rngs::OsRng;

use snapvote_core::service::hash::CredentialHasher;

/// `CredentialHasher` backed by argon2id with default parameters and a
/// random per-password salt. Hashes are PHC strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2PasswordHasher;

impl Argon2PasswordHasher {
    pub fn new() -> Self {
        Self
    }
}

impl CredentialHasher for Argon2PasswordHasher {
    fn hash_password(&self, password: &str) -> Result<String, String> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| format!("password hashing failed: {e}"))
    }

    fn verify_password(&self, password: &str, hash: &str) -> bool {
        match PasswordHash::new(hash) {
            Ok(parsed) => Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(e) => {
                tracing::warn!(error = %e, "stored password hash is malformed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hasher = Argon2PasswordHasher::new();
        let hash = hasher.hash_password("123456#").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify_password("123456#", &hash));
        assert!(!hasher.verify_password("123456", &hash));
    }

    #[test]
    fn test_salts_differ() {
        let hasher = Argon2PasswordHasher::new();
        let a = hasher.hash_password("secret1").unwrap();
        let b = hasher.hash_password("secret1").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_malformed_hash_is_mismatch() {
        let hasher = Argon2PasswordHasher::new();
        assert!(!hasher.verify_password("anything", "not-a-phc-string"));
    }
}
