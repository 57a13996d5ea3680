//! Image repository trait definition.

use chrono::{DateTime, Utc};
use snapvote_types::error::RepositoryError;
use snapvote_types::id::{ImageId, UserId};
use snapvote_types::image::{Category, Image, ModerationStatus};

/// Filter criteria for listing images. Unset fields do not constrain.
#[derive(Debug, Clone, Default)]
pub struct ImageFilter {
    /// Keep only images whose status is in this set.
    pub statuses: Option<Vec<ModerationStatus>>,
    pub category: Option<Category>,
    /// Superuser archive flag.
    pub is_archived: Option<bool>,
    /// Owner archive flag.
    pub artist_archived: Option<bool>,
    /// Uploader.
    pub user_id: Option<UserId>,
}

/// Repository trait for image persistence.
///
/// Listings return metadata only; the PNG payload is fetched with `get_data`.
pub trait ImageRepository: Send + Sync {
    /// Insert an image together with its PNG payload.
    fn create(
        &self,
        image: &Image,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<Image, RepositoryError>> + Send;

    fn get_by_id(
        &self,
        id: &ImageId,
    ) -> impl std::future::Future<Output = Result<Option<Image>, RepositoryError>> + Send;

    /// PNG payload of an image.
    fn get_data(
        &self,
        id: &ImageId,
    ) -> impl std::future::Future<Output = Result<Option<Vec<u8>>, RepositoryError>> + Send;

    /// List images matching the filter, newest upload first.
    fn list(
        &self,
        filter: ImageFilter,
    ) -> impl std::future::Future<Output = Result<Vec<Image>, RepositoryError>> + Send;

    /// Re-read the image inside a writer transaction, apply `change`, and
    /// persist status, category, archive flags, and unique number before
    /// committing. Concurrent updates of one image are serialized.
    ///
    /// `None` when the image does not exist. A clashing unique number yields
    /// `Conflict` and nothing is written.
    fn update_with<T, F>(
        &self,
        id: &ImageId,
        change: F,
    ) -> impl std::future::Future<Output = Result<Option<(Image, T)>, RepositoryError>> + Send
    where
        F: FnOnce(&mut Image) -> T + Send,
        T: Send;

    /// Highest `vote_count` among the user's approved images.
    fn most_upvoted_approved(
        &self,
        user_id: &UserId,
    ) -> impl std::future::Future<Output = Result<Option<Image>, RepositoryError>> + Send;

    /// Delete all votes of an image, zero its count, and record the reset.
    fn reset_votes(
        &self,
        id: &ImageId,
        reason: &str,
        at: DateTime<Utc>,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}
