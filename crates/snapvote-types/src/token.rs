//! Claims carried by emailed, signed links.

use serde::{Deserialize, Serialize};

use std::fmt;

/// What a signed token may be used for. A token minted for one purpose is
/// rejected for every other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TokenPurpose {
    VerifyEmail,
    PasswordReset,
    ChangeEmail,
}

impl fmt::Display for TokenPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenPurpose::VerifyEmail => write!(f, "verify-email"),
            TokenPurpose::PasswordReset => write!(f, "password-reset"),
            TokenPurpose::ChangeEmail => write!(f, "change-email"),
        }
    }
}

/// Signed payload of an emailed link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub purpose: TokenPurpose,
    /// Account email at the time the token was issued.
    pub email: String,
    /// Requested address, for change-email tokens only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_email: Option<String>,
    /// Unix timestamp (seconds).
    pub issued_at: i64,
}

impl TokenClaims {
    pub fn new(purpose: TokenPurpose, email: &str, issued_at: i64) -> Self {
        Self {
            purpose,
            email: email.to_string(),
            new_email: None,
            issued_at,
        }
    }

    pub fn with_new_email(mut self, new_email: &str) -> Self {
        self.new_email = Some(new_email.to_string());
        self
    }
}
