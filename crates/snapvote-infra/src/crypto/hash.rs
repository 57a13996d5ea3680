//! SHA-256 hashing of session bearer tokens.
//!
//! Only the digest of a session token is stored, so a leaked database does
//! not hand out live sessions.

use sha2::{Digest, Sha256};

use snapvote_core::service::hash::ContentHasher;

/// SHA-256 implementation of `ContentHasher`, producing lowercase hex.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256ContentHasher;

impl Sha256ContentHasher {
    pub fn new() -> Self {
        Self
    }
}

impl ContentHasher for Sha256ContentHasher {
    fn compute_hash(&self, content: &str) -> String {
        let digest = Sha256::digest(content.as_bytes());
        format!("{:x}", digest)
    }
}
