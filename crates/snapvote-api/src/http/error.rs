//! Application error type mapping to HTTP status codes and envelope format.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use snapvote_types::error::{AccountError, ImageError, SocialError};

use crate::http::response::ApiResponse;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Account, session, and token errors.
    Account(AccountError),
    /// Image, moderation, and vote errors.
    Image(ImageError),
    /// Follower and comment errors.
    Social(SocialError),
    /// Missing or invalid bearer token.
    Unauthorized(String),
    /// Authenticated but not allowed.
    Forbidden(String),
    /// Unknown id in the path.
    NotFound(String),
    /// Malformed request input.
    Validation(String),
}

impl From<AccountError> for AppError {
    fn from(e: AccountError) -> Self {
        AppError::Account(e)
    }
}

impl From<ImageError> for AppError {
    fn from(e: ImageError) -> Self {
        AppError::Image(e)
    }
}

impl From<SocialError> for AppError {
    fn from(e: SocialError) -> Self {
        AppError::Social(e)
    }
}

impl AppError {
    /// Status, machine-readable code, and message for this error.
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Account(e) => match e {
                AccountError::InvalidInput(msg) | AccountError::InvalidToken(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                AccountError::IncorrectPassword => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", e.to_string())
                }
                AccountError::UsernameTaken
                | AccountError::EmailTaken
                | AccountError::EmailInUse => {
                    (StatusCode::CONFLICT, "CONFLICT", e.to_string())
                }
                AccountError::InvalidCredentials | AccountError::InvalidSession => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", e.to_string())
                }
                AccountError::NotVerified => {
                    (StatusCode::FORBIDDEN, "EMAIL_NOT_VERIFIED", e.to_string())
                }
                AccountError::EmailNotFound | AccountError::UserNotFound => {
                    (StatusCode::NOT_FOUND, "USER_NOT_FOUND", e.to_string())
                }
                AccountError::CryptoError(_) | AccountError::StorageError(_) => {
                    internal(e)
                }
            },
            AppError::Image(e) => match e {
                ImageError::NotFound => {
                    (StatusCode::NOT_FOUND, "IMAGE_NOT_FOUND", "Image not found".to_string())
                }
                ImageError::InvalidInput(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                ImageError::NotModerated(msg) => {
                    (StatusCode::BAD_REQUEST, "NOT_MODERATED", msg.clone())
                }
                ImageError::Forbidden => (StatusCode::FORBIDDEN, "FORBIDDEN", e.to_string()),
                ImageError::ProcessingError(_) | ImageError::StorageError(_) => internal(e),
            },
            AppError::Social(e) => match e {
                SocialError::UserNotFound => {
                    (StatusCode::NOT_FOUND, "USER_NOT_FOUND", "User not found".to_string())
                }
                SocialError::ImageNotFound => {
                    (StatusCode::NOT_FOUND, "IMAGE_NOT_FOUND", "Image not found".to_string())
                }
                SocialError::CommentNotFound => {
                    (StatusCode::NOT_FOUND, "COMMENT_NOT_FOUND", "Comment not found".to_string())
                }
                SocialError::InvalidInput(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                SocialError::NotModerated => {
                    (StatusCode::BAD_REQUEST, "NOT_MODERATED", e.to_string())
                }
                SocialError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
                SocialError::StorageError(_) => internal(e),
            },
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        }
    }
}

/// Internal failures are logged in full and reported generically.
fn internal(e: &dyn std::fmt::Display) -> (StatusCode, &'static str, String) {
    tracing::error!(error = %e, "request failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "Internal server error".to_string(),
    )
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();
        let request_id = uuid::Uuid::now_v7().to_string();
        let mut response = ApiResponse::error(code, &message, request_id, 0).into_response();
        *response.status_mut() = status;
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_account_errors_map_to_status() {
        assert_eq!(status_of(AccountError::UsernameTaken.into()), StatusCode::CONFLICT);
        assert_eq!(status_of(AccountError::EmailInUse.into()), StatusCode::CONFLICT);
        assert_eq!(status_of(AccountError::InvalidCredentials.into()), StatusCode::UNAUTHORIZED);
        assert_eq!(status_of(AccountError::NotVerified.into()), StatusCode::FORBIDDEN);
        assert_eq!(status_of(AccountError::EmailNotFound.into()), StatusCode::NOT_FOUND);
        assert_eq!(status_of(AccountError::IncorrectPassword.into()), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_of(AccountError::InvalidToken("Invalid or expired token".into()).into()),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_image_and_social_errors_map_to_status() {
        assert_eq!(status_of(ImageError::Forbidden.into()), StatusCode::FORBIDDEN);
        assert_eq!(status_of(ImageError::NotFound.into()), StatusCode::NOT_FOUND);
        assert_eq!(
            status_of(ImageError::InvalidInput("Invalid vote type!".into()).into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status_of(SocialError::CommentNotFound.into()), StatusCode::NOT_FOUND);
        assert_eq!(
            status_of(SocialError::Forbidden("Only superusers can delete comments.".into()).into()),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_user_facing_messages_preserved() {
        let (_, code, message) = AppError::from(ImageError::Forbidden).parts();
        assert_eq!(code, "FORBIDDEN");
        assert_eq!(message, "Access Denied!");

        let (_, _, message) = AppError::from(SocialError::NotModerated).parts();
        assert_eq!(message, "Comments are only available for moderated images.");
    }

    #[test]
    fn test_storage_errors_are_not_leaked() {
        let err = AppError::from(ImageError::StorageError("disk I/O error at /var/db".into()));
        let (status, code, message) = err.parts();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(code, "INTERNAL_ERROR");
        assert!(!message.contains("/var/db"));
    }
}
