//! Comment repository trait definition.

use snapvote_types::comment::Comment;
use snapvote_types::error::RepositoryError;
use snapvote_types::id::{CommentId, ImageId};

pub trait CommentRepository: Send + Sync {
    fn create(
        &self,
        comment: &Comment,
    ) -> impl std::future::Future<Output = Result<Comment, RepositoryError>> + Send;

    fn get_by_id(
        &self,
        id: &CommentId,
    ) -> impl std::future::Future<Output = Result<Option<Comment>, RepositoryError>> + Send;

    /// Comments on an image, newest first.
    fn list_for_image(
        &self,
        image_id: &ImageId,
    ) -> impl std::future::Future<Output = Result<Vec<Comment>, RepositoryError>> + Send;

    fn delete(
        &self,
        id: &CommentId,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}
