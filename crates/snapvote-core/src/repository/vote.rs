//! Vote repository trait definition.

use std::collections::HashMap;

use snapvote_types::error::RepositoryError;
use snapvote_types::id::{ImageId, UserId};
use snapvote_types::vote::{VoteTally, VoteType};

pub trait VoteRepository: Send + Sync {
    /// Apply a vote request atomically: resolve it against the caller's
    /// existing vote (see `snapvote_types::vote::resolve_vote`), write the
    /// change, and recompute the image's `vote_count` in the same transaction.
    fn apply_vote(
        &self,
        user_id: &UserId,
        image_id: &ImageId,
        requested: VoteType,
    ) -> impl std::future::Future<Output = Result<VoteTally, RepositoryError>> + Send;

    /// Every vote cast by a user, keyed by image.
    fn votes_by_user(
        &self,
        user_id: &UserId,
    ) -> impl std::future::Future<Output = Result<HashMap<ImageId, VoteType>, RepositoryError>>
    + Send;
}
