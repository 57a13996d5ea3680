//! HTTP request handlers for the REST API.

pub mod account;
pub mod admin;
pub mod auth;
pub mod comment;
pub mod image;
pub mod social;

use std::str::FromStr;

use snapvote_types::id::{CommentId, ImageId, UserId};

use crate::http::error::AppError;

/// Parse an id path segment. Malformed ids cannot exist, so they are 404s.
fn parse_id<T: FromStr>(raw: &str, what: &str) -> Result<T, AppError> {
    raw.parse()
        .map_err(|_| AppError::NotFound(format!("{what} not found")))
}

pub(crate) fn image_id(raw: &str) -> Result<ImageId, AppError> {
    parse_id(raw, "Image")
}

pub(crate) fn user_id(raw: &str) -> Result<UserId, AppError> {
    parse_id(raw, "User")
}

pub(crate) fn comment_id(raw: &str) -> Result<CommentId, AppError> {
    parse_id(raw, "Comment")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_id_is_not_found() {
        assert!(matches!(image_id("42"), Err(AppError::NotFound(msg)) if msg == "Image not found"));
        let id = UserId::new();
        assert_eq!(user_id(&id.to_string()).unwrap(), id);
    }
}
