use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::UserId;

/// A registered account.
///
/// `password_hash` never leaves the service boundary: it is skipped during
/// serialization so a `User` can be returned from the API directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    /// Unique display handle, 3-50 characters.
    pub username: String,
    /// Unique contact address, used for verification and resets.
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// Administrator allowed to moderate, archive, and delete comments.
    pub is_superuser: bool,
    /// Set once the emailed verification link has been followed.
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

/// Minimal public view of a user, used in follower lists and comments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: UserId,
    pub username: String,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
        }
    }
}

/// Request to register a new account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Login by email or username.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email_or_username: String,
    pub password: String,
    #[serde(default)]
    pub remember_me: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_user() -> User {
        User {
            id: UserId::new(),
            username: "artist1".to_string(),
            email: "artist1@example.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            is_superuser: false,
            is_verified: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let json = serde_json::to_value(make_user()).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["username"], "artist1");
    }

    #[test]
    fn test_login_request_remember_me_defaults_false() {
        let req: LoginRequest =
            serde_json::from_str(r#"{"email_or_username":"a","password":"b"}"#).unwrap();
        assert!(!req.remember_me);
    }

    #[test]
    fn test_summary_from_user() {
        let user = make_user();
        let summary = UserSummary::from(&user);
        assert_eq!(summary.id, user.id);
        assert_eq!(summary.username, "artist1");
    }
}
