//! Service configuration types.
//!
//! `AppConfig` represents `config.toml` in the data directory. Every field
//! has a default so an empty or missing file yields a working setup.

use serde::{Deserialize, Serialize};

/// Top-level configuration for SnapVote.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base URL used when building links sent by email.
    #[serde(default = "default_public_url")]
    pub public_url: String,

    /// Lifetime of emailed verification/reset tokens, in seconds.
    #[serde(default = "default_token_ttl_secs")]
    pub token_ttl_secs: i64,

    /// Session lifetime for a normal login, in hours.
    #[serde(default = "default_session_ttl_hours")]
    pub session_ttl_hours: i64,

    /// Session lifetime when "remember me" is set, in hours.
    #[serde(default = "default_remember_me_ttl_hours")]
    pub remember_me_ttl_hours: i64,

    /// Outgoing mail. Without it, emails are written to the log.
    #[serde(default)]
    pub smtp: Option<SmtpConfig>,
}

fn default_public_url() -> String {
    "http://127.0.0.1:3000".to_string()
}

fn default_token_ttl_secs() -> i64 {
    3600
}

fn default_session_ttl_hours() -> i64 {
    24
}

fn default_remember_me_ttl_hours() -> i64 {
    720
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            public_url: default_public_url(),
            token_ttl_secs: default_token_ttl_secs(),
            session_ttl_hours: default_session_ttl_hours(),
            remember_me_ttl_hours: default_remember_me_ttl_hours(),
            smtp: None,
        }
    }
}

/// SMTP relay settings. The password is read from the environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmtpConfig {
    pub host: String,
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    pub username: String,
    /// Sender address; defaults to `username`.
    #[serde(default)]
    pub from: Option<String>,
}

fn default_smtp_port() -> u16 {
    587
}

impl SmtpConfig {
    pub fn sender(&self) -> &str {
        self.from.as_deref().unwrap_or(&self.username)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_config_default_values() {
        let config = AppConfig::default();
        assert_eq!(config.token_ttl_secs, 3600);
        assert_eq!(config.session_ttl_hours, 24);
        assert!(config.smtp.is_none());
    }

    #[test]
    fn test_app_config_deserialize_empty() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.public_url, "http://127.0.0.1:3000");
        assert_eq!(config.remember_me_ttl_hours, 720);
    }

    #[test]
    fn test_app_config_deserialize_with_smtp() {
        let toml_str = r#"
public_url = "https://snap.example.com"
token_ttl_secs = 600

[smtp]
host = "smtp.gmail.com"
username = "bot@example.com"
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.public_url, "https://snap.example.com");
        assert_eq!(config.token_ttl_secs, 600);
        let smtp = config.smtp.unwrap();
        assert_eq!(smtp.port, 587);
        assert_eq!(smtp.sender(), "bot@example.com");
    }
}
