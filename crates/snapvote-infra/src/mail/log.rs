//! Mailer that writes messages to the log instead of sending them.

use snapvote_core::service::mail::{Mailer, OutgoingEmail};

#[derive(Debug, Clone, Copy, Default)]
pub struct LogMailer;

impl Mailer for LogMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), String> {
        tracing::info!(
            to = %email.to,
            subject = %email.subject,
            body = %email.body,
            "email (not sent, SMTP disabled)"
        );
        Ok(())
    }
}
