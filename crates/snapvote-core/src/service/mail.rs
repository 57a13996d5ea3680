//! Mailer trait for outgoing notification emails.

/// A plain-text email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

pub trait Mailer: Send + Sync {
    /// Deliver an email. Errors are reported as strings; callers decide
    /// whether a failed delivery fails the request.
    fn send(
        &self,
        email: &OutgoingEmail,
    ) -> impl std::future::Future<Output = Result<(), String>> + Send;
}
