//! OS-backed randomness.

use rand::RngCore;
use rand::rngs::OsRng;

use snapvote_core::service::random::RandomSource;

/// Prefix that makes session tokens recognizable in logs and bug reports.
pub const SESSION_TOKEN_PREFIX: &str = "svs_";

#[derive(Debug, Clone, Copy, Default)]
pub struct OsRandomSource;

impl OsRandomSource {
    pub fn new() -> Self {
        Self
    }
}

/// Fill a buffer of `len` random bytes from the OS generator.
pub fn random_bytes(len: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    OsRng.fill_bytes(&mut bytes);
    bytes
}

impl RandomSource for OsRandomSource {
    fn digits(&self, len: usize) -> String {
        let mut out = String::with_capacity(len);
        let mut buf = [0u8; 16];
        while out.len() < len {
            OsRng.fill_bytes(&mut buf);
            // Rejecting 250..=255 keeps the digits uniform
            for byte in buf.iter().filter(|b| **b < 250) {
                if out.len() == len {
                    break;
                }
                out.push(char::from(b'0' + byte % 10));
            }
        }
        out
    }

    fn session_token(&self) -> String {
        let hex: String = random_bytes(32).iter().map(|b| format!("{b:02x}")).collect();
        format!("{SESSION_TOKEN_PREFIX}{hex}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digits_length_and_charset() {
        let random = OsRandomSource::new();
        for len in [0, 1, 10, 33] {
            let digits = random.digits(len);
            assert_eq!(digits.len(), len);
            assert!(digits.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_session_tokens_are_unique() {
        let random = OsRandomSource::new();
        let a = random.session_token();
        let b = random.session_token();
        assert!(a.starts_with(SESSION_TOKEN_PREFIX));
        assert_eq!(a.len(), SESSION_TOKEN_PREFIX.len() + 64);
        assert_ne!(a, b);
    }
}
