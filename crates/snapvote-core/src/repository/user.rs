//! User repository trait definition.

use snapvote_types::error::RepositoryError;
use snapvote_types::id::UserId;
use snapvote_types::user::User;

/// Repository trait for user persistence.
///
/// Implementations live in snapvote-infra (e.g., SqliteUserRepository).
pub trait UserRepository: Send + Sync {
    /// Insert a new user. Duplicate username or email yields `Conflict`.
    fn create(
        &self,
        user: &User,
    ) -> impl std::future::Future<Output = Result<User, RepositoryError>> + Send;

    fn get_by_id(
        &self,
        id: &UserId,
    ) -> impl std::future::Future<Output = Result<Option<User>, RepositoryError>> + Send;

    fn get_by_username(
        &self,
        username: &str,
    ) -> impl std::future::Future<Output = Result<Option<User>, RepositoryError>> + Send;

    fn get_by_email(
        &self,
        email: &str,
    ) -> impl std::future::Future<Output = Result<Option<User>, RepositoryError>> + Send;

    /// Match `login` against either the email or the username column.
    fn get_by_login(
        &self,
        login: &str,
    ) -> impl std::future::Future<Output = Result<Option<User>, RepositoryError>> + Send;

    /// All users, oldest first.
    fn list(&self) -> impl std::future::Future<Output = Result<Vec<User>, RepositoryError>> + Send;

    /// Persist changes to email, password hash, and flags.
    fn update(
        &self,
        user: &User,
    ) -> impl std::future::Future<Output = Result<User, RepositoryError>> + Send;
}
