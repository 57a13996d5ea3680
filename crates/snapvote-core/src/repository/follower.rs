//! Follower repository trait definition.

use snapvote_types::error::RepositoryError;
use snapvote_types::id::UserId;
use snapvote_types::user::UserSummary;

pub trait FollowerRepository: Send + Sync {
    /// Record that `follower` follows `followed`. Returns false when the
    /// relation already existed.
    fn follow(
        &self,
        follower: &UserId,
        followed: &UserId,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;

    /// Remove the relation. Returns false when there was nothing to remove.
    fn unfollow(
        &self,
        follower: &UserId,
        followed: &UserId,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;

    fn is_following(
        &self,
        follower: &UserId,
        followed: &UserId,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;

    /// Users following `user_id`.
    fn followers(
        &self,
        user_id: &UserId,
    ) -> impl std::future::Future<Output = Result<Vec<UserSummary>, RepositoryError>> + Send;

    /// Number of users following `user_id`.
    fn follower_count(
        &self,
        user_id: &UserId,
    ) -> impl std::future::Future<Output = Result<i64, RepositoryError>> + Send;

    /// Number of users `user_id` follows.
    fn following_count(
        &self,
        user_id: &UserId,
    ) -> impl std::future::Future<Output = Result<i64, RepositoryError>> + Send;
}
