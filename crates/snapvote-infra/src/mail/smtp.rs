//! SMTP mailer backed by lettre's async transport.

use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use snapvote_core::service::mail::{Mailer, OutgoingEmail};
use snapvote_types::config::SmtpConfig;

/// STARTTLS relay with username/password login.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig, password: &str) -> Result<Self, String> {
        let from: Mailbox = config
            .sender()
            .parse()
            .map_err(|e: lettre::address::AddressError| format!("invalid sender address: {e}"))?;
        let creds = Credentials::new(config.username.clone(), password.to_string());

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| e.to_string())?
            .credentials(creds)
            .port(config.port)
            .build();

        Ok(Self { transport, from })
    }
}

/// Build a plain-text message.
fn build_message(from: &Mailbox, email: &OutgoingEmail) -> Result<Message, String> {
    let to: Mailbox = email
        .to
        .parse()
        .map_err(|e: lettre::address::AddressError| format!("invalid recipient address: {e}"))?;

    Message::builder()
        .from(from.clone())
        .to(to)
        .subject(&email.subject)
        .header(ContentType::TEXT_PLAIN)
        .body(email.body.clone())
        .map_err(|e| e.to_string())
}

impl Mailer for SmtpMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), String> {
        let message = build_message(&self.from, email)?;
        self.transport
            .send(message)
            .await
            .map_err(|e| e.to_string())?;
        tracing::info!(to = %email.to, subject = %email.subject, "email sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outgoing(to: &str) -> OutgoingEmail {
        OutgoingEmail {
            to: to.to_string(),
            subject: "Password Reset Request".to_string(),
            body: "Hello artist1".to_string(),
        }
    }

    #[test]
    fn test_build_message() {
        let from: Mailbox = "noreply@example.com".parse().unwrap();
        let message = build_message(&from, &outgoing("artist1@example.com")).unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("Subject: Password Reset Request"));
        assert!(raw.contains("To: artist1@example.com"));
    }

    #[test]
    fn test_invalid_recipient() {
        let from: Mailbox = "noreply@example.com".parse().unwrap();
        assert!(build_message(&from, &outgoing("not an address")).is_err());
    }

    #[test]
    fn test_invalid_sender_rejected() {
        let config = SmtpConfig {
            host: "smtp.example.com".to_string(),
            port: 587,
            username: "not an address".to_string(),
            from: None,
        };
        assert!(SmtpMailer::new(&config, "pw").is_err());
    }
}
