//! Hashing ports.
//!
//! Defined in snapvote-core so services can hash passwords and session tokens
//! without coupling to a specific algorithm. The argon2 and SHA-256 adapters
//! live in snapvote-infra.

/// Abstraction over content hashing (session token lookup keys).
pub trait ContentHasher: Send + Sync {
    /// Compute a hex-encoded hash of the given content.
    fn compute_hash(&self, content: &str) -> String;
}

/// Salted, slow password hashing.
pub trait CredentialHasher: Send + Sync {
    /// Hash a plaintext password into a self-describing PHC string.
    fn hash_password(&self, password: &str) -> Result<String, String>;

    /// Check a plaintext password against a stored hash. A malformed stored
    /// hash counts as a mismatch.
    fn verify_password(&self, password: &str, hash: &str) -> bool;
}
