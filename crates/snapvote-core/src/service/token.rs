//! TokenSigner trait for emailed verification and reset links.

use snapvote_types::token::TokenClaims;

/// Signs and verifies URL-safe tokens carrying [`TokenClaims`].
///
/// Verification only checks integrity; expiry and purpose are checked by the
/// caller against `issued_at` and `purpose`.
pub trait TokenSigner: Send + Sync {
    fn sign(&self, claims: &TokenClaims) -> Result<String, String>;

    fn verify(&self, token: &str) -> Result<TokenClaims, String>;
}
