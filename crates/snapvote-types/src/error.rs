use thiserror::Error;

/// Errors related to accounts, authentication, and signed tokens.
#[derive(Debug, Error)]
pub enum AccountError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("Username already taken. Please choose another.")]
    UsernameTaken,

    #[error("Email already registered. Please use a different email.")]
    EmailTaken,

    #[error("This email is already in use.")]
    EmailInUse,

    #[error("Invalid email/username or password")]
    InvalidCredentials,

    #[error("Please verify your email before logging in.")]
    NotVerified,

    #[error("{0}")]
    InvalidToken(String),

    #[error("No account found with that email.")]
    EmailNotFound,

    #[error("user not found")]
    UserNotFound,

    #[error("Current password is incorrect.")]
    IncorrectPassword,

    #[error("session expired or invalid")]
    InvalidSession,

    #[error("crypto error: {0}")]
    CryptoError(String),

    #[error("storage error: {0}")]
    StorageError(String),
}

/// Errors related to images, moderation, and voting.
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("image not found")]
    NotFound,

    #[error("{0}")]
    InvalidInput(String),

    #[error("Access Denied!")]
    Forbidden,

    #[error("{0}")]
    NotModerated(String),

    #[error("processing error: {0}")]
    ProcessingError(String),

    #[error("storage error: {0}")]
    StorageError(String),
}

/// Errors related to followers and comments.
#[derive(Debug, Error)]
pub enum SocialError {
    #[error("user not found")]
    UserNotFound,

    #[error("image not found")]
    ImageNotFound,

    #[error("comment not found")]
    CommentNotFound,

    #[error("{0}")]
    InvalidInput(String),

    #[error("Comments are only available for moderated images.")]
    NotModerated,

    #[error("{0}")]
    Forbidden(String),

    #[error("storage error: {0}")]
    StorageError(String),
}

/// Errors from repository operations (used by trait definitions in snapvote-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_error_messages_are_user_facing() {
        assert_eq!(
            AccountError::UsernameTaken.to_string(),
            "Username already taken. Please choose another."
        );
        assert_eq!(
            AccountError::InvalidCredentials.to_string(),
            "Invalid email/username or password"
        );
    }

    #[test]
    fn test_image_forbidden_message() {
        assert_eq!(ImageError::Forbidden.to_string(), "Access Denied!");
    }

    #[test]
    fn test_repository_error_display() {
        let err = RepositoryError::Query("syntax error".to_string());
        assert_eq!(err.to_string(), "query error: syntax error");
    }
}
