//! Outgoing email.
//!
//! `ConfiguredMailer` picks the SMTP relay when `[smtp]` is configured and
//! falls back to writing messages to the log otherwise, so local setups can
//! follow verification links without a mail server.

pub mod log;
pub mod smtp;

use snapvote_core::service::mail::{Mailer, OutgoingEmail};
use snapvote_types::config::SmtpConfig;

pub use self::log::LogMailer;
pub use self::smtp::SmtpMailer;

/// Environment variable holding the SMTP password.
pub const SMTP_PASSWORD_ENV: &str = "SNAPVOTE_SMTP_PASSWORD";

/// Mailer selected from configuration at startup.
pub enum ConfiguredMailer {
    Smtp(SmtpMailer),
    Log(LogMailer),
}

impl ConfiguredMailer {
    /// Build the mailer for `smtp`, reading the password from
    /// `SNAPVOTE_SMTP_PASSWORD`. An unusable relay degrades to logging.
    pub fn from_config(smtp: Option<&SmtpConfig>) -> Self {
        let Some(smtp) = smtp else {
            tracing::info!("no [smtp] section configured, emails will be logged");
            return ConfiguredMailer::Log(LogMailer);
        };

        let password = std::env::var(SMTP_PASSWORD_ENV).unwrap_or_default();
        if password.is_empty() {
            tracing::warn!("{SMTP_PASSWORD_ENV} is not set, SMTP login will likely fail");
        }

        match SmtpMailer::new(smtp, &password) {
            Ok(mailer) => {
                tracing::info!(host = %smtp.host, port = smtp.port, "SMTP mailer ready");
                ConfiguredMailer::Smtp(mailer)
            }
            Err(e) => {
                tracing::warn!(
                    host = %smtp.host,
                    error = %e,
                    "SMTP setup failed, emails will be logged"
                );
                ConfiguredMailer::Log(LogMailer)
            }
        }
    }
}

impl Mailer for ConfiguredMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), String> {
        match self {
            ConfiguredMailer::Smtp(mailer) => mailer.send(email).await,
            ConfiguredMailer::Log(mailer) => mailer.send(email).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_without_smtp_logs() {
        assert!(matches!(
            ConfiguredMailer::from_config(None),
            ConfiguredMailer::Log(_)
        ));
    }

    #[tokio::test]
    async fn test_log_mailer_always_succeeds() {
        let mailer = ConfiguredMailer::from_config(None);
        let email = OutgoingEmail {
            to: "artist1@example.com".to_string(),
            subject: "Verify Your Email".to_string(),
            body: "Hello".to_string(),
        };
        assert!(mailer.send(&email).await.is_ok());
    }
}
