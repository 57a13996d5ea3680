//! Cryptographic operations for SnapVote.
//!
//! - `hash`: SHA-256 hashing of session tokens
//! - `password`: argon2id password hashing
//! - `token`: HMAC-SHA256 signed, purpose-bound tokens for emailed links
//! - `random`: OS-backed randomness for session tokens and image numbers

pub mod hash;
pub mod password;
pub mod random;
pub mod token;
