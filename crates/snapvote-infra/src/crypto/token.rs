//! HMAC-SHA256 signed tokens for emailed links.
//!
//! Format: `base64url(claims_json) "." base64url(hmac_sha256(payload))`,
//! both parts unpadded. The signer only proves integrity; purpose and age
//! are checked by the account service.

use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use snapvote_core::service::token::TokenSigner;
use snapvote_types::token::TokenClaims;

use super::random::random_bytes;

type HmacSha256 = Hmac<Sha256>;

/// Environment variable holding the signing key.
pub const SECRET_KEY_ENV: &str = "SNAPVOTE_SECRET_KEY";

/// File under the data directory holding a generated signing key.
pub const SECRET_KEY_FILE: &str = "secret.key";

const GENERATED_KEY_LEN: usize = 32;

/// Errors while loading or creating the signing key.
#[derive(Debug, thiserror::Error)]
pub enum SigningKeyError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("signing key in {path} is not valid base64")]
    Malformed { path: String },

    #[error("signing key must not be empty")]
    Empty,
}

/// `TokenSigner` keyed with a server secret.
#[derive(Clone)]
pub struct HmacTokenSigner {
    key: Vec<u8>,
}

impl std::fmt::Debug for HmacTokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HmacTokenSigner").finish_non_exhaustive()
    }
}

impl HmacTokenSigner {
    pub fn new(key: impl Into<Vec<u8>>) -> Result<Self, SigningKeyError> {
        let key = key.into();
        if key.is_empty() {
            return Err(SigningKeyError::Empty);
        }
        Ok(Self { key })
    }

    /// Load the key from `SNAPVOTE_SECRET_KEY`, else from
    /// `{data_dir}/secret.key`, generating and persisting a random key on
    /// first start.
    pub async fn from_environment(data_dir: &Path) -> Result<Self, SigningKeyError> {
        if let Ok(key) = std::env::var(SECRET_KEY_ENV) {
            if !key.is_empty() {
                tracing::debug!("using signing key from {SECRET_KEY_ENV}");
                return Self::new(key.into_bytes());
            }
        }
        Self::new(load_or_create_key_file(data_dir).await?)
    }

    fn mac(&self, payload: &[u8]) -> Result<HmacSha256, String> {
        let mut mac =
            HmacSha256::new_from_slice(&self.key).map_err(|e| format!("invalid HMAC key: {e}"))?;
        mac.update(payload);
        Ok(mac)
    }
}

async fn load_or_create_key_file(data_dir: &Path) -> Result<Vec<u8>, SigningKeyError> {
    let path = data_dir.join(SECRET_KEY_FILE);
    let path_display = path.display().to_string();

    match tokio::fs::read_to_string(&path).await {
        Ok(content) => URL_SAFE_NO_PAD
            .decode(content.trim())
            .map_err(|_| SigningKeyError::Malformed { path: path_display }),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            let key = random_bytes(GENERATED_KEY_LEN);
            tokio::fs::create_dir_all(data_dir)
                .await
                .map_err(|source| SigningKeyError::Io {
                    path: data_dir.display().to_string(),
                    source,
                })?;
            tokio::fs::write(&path, URL_SAFE_NO_PAD.encode(&key))
                .await
                .map_err(|source| SigningKeyError::Io {
                    path: path_display.clone(),
                    source,
                })?;
            tracing::info!(path = %path_display, "generated new signing key");
            Ok(key)
        }
        Err(source) => Err(SigningKeyError::Io {
            path: path_display,
            source,
        }),
    }
}

impl TokenSigner for HmacTokenSigner {
    fn sign(&self, claims: &TokenClaims) -> Result<String, String> {
        let json = serde_json::to_vec(claims).map_err(|e| format!("claims encoding failed: {e}"))?;
        let payload = URL_SAFE_NO_PAD.encode(json);
        let signature = self.mac(payload.as_bytes())?.finalize().into_bytes();
        Ok(format!("{payload}.{}", URL_SAFE_NO_PAD.encode(signature)))
    }

    fn verify(&self, token: &str) -> Result<TokenClaims, String> {
        let (payload, signature) = token
            .split_once('.')
            .ok_or_else(|| "malformed token".to_string())?;
        let signature = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| "malformed signature".to_string())?;

        // Constant-time comparison via `verify_slice`
        self.mac(payload.as_bytes())?
            .verify_slice(&signature)
            .map_err(|_| "signature mismatch".to_string())?;

        let json = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| "malformed payload".to_string())?;
        serde_json::from_slice(&json).map_err(|e| format!("invalid claims: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snapvote_types::token::TokenPurpose;

    fn signer() -> HmacTokenSigner {
        HmacTokenSigner::new(b"test-secret".to_vec()).unwrap()
    }

    #[test]
    fn test_sign_then_verify() {
        let claims = TokenClaims::new(TokenPurpose::ChangeEmail, "old@example.com", 1_700_000_000)
            .with_new_email("new@example.com");
        let token = signer().sign(&claims).unwrap();
        assert!(!token.contains('='));
        assert_eq!(signer().verify(&token).unwrap(), claims);
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let claims = TokenClaims::new(TokenPurpose::PasswordReset, "victim@example.com", 0);
        let token = signer().sign(&claims).unwrap();
        let (_, signature) = token.split_once('.').unwrap();

        let forged = TokenClaims::new(TokenPurpose::PasswordReset, "attacker@example.com", 0);
        let forged_payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&forged).unwrap());
        let forged_token = format!("{forged_payload}.{signature}");

        assert_eq!(signer().verify(&forged_token).unwrap_err(), "signature mismatch");
    }

    #[test]
    fn test_other_key_rejected() {
        let claims = TokenClaims::new(TokenPurpose::VerifyEmail, "a@b.co", 0);
        let token = signer().sign(&claims).unwrap();
        let other = HmacTokenSigner::new(b"other-secret".to_vec()).unwrap();
        assert!(other.verify(&token).is_err());
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(signer().verify("").is_err());
        assert!(signer().verify("no-dot-here").is_err());
        assert!(signer().verify("abc.!!!").is_err());
    }

    #[test]
    fn test_empty_key_rejected() {
        assert!(matches!(
            HmacTokenSigner::new(Vec::new()),
            Err(SigningKeyError::Empty)
        ));
    }

    #[tokio::test]
    async fn test_key_file_generated_once() {
        let dir = tempfile::tempdir().unwrap();
        let first = load_or_create_key_file(dir.path()).await.unwrap();
        assert_eq!(first.len(), GENERATED_KEY_LEN);
        assert!(dir.path().join(SECRET_KEY_FILE).exists());

        let second = load_or_create_key_file(dir.path()).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_malformed_key_file() {
        let dir = tempfile::tempdir().unwrap();
        tokio::fs::write(dir.path().join(SECRET_KEY_FILE), "not base64 !!")
            .await
            .unwrap();
        assert!(matches!(
            load_or_create_key_file(dir.path()).await,
            Err(SigningKeyError::Malformed { .. })
        ));
    }
}
