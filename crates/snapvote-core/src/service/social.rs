//! Social service: profiles, follows, and comments.

use chrono::Utc;

use snapvote_types::comment::Comment;
use snapvote_types::error::{RepositoryError, SocialError};
use snapvote_types::follow::Profile;
use snapvote_types::id::{CommentId, ImageId, UserId};
use snapvote_types::image::Image;
use snapvote_types::user::{User, UserSummary};

use crate::repository::comment::CommentRepository;
use crate::repository::follower::FollowerRepository;
use crate::repository::image::ImageRepository;
use crate::repository::user::UserRepository;

fn storage(e: RepositoryError) -> SocialError {
    SocialError::StorageError(e.to_string())
}

pub struct SocialService<U, I, F, C>
where
    U: UserRepository,
    I: ImageRepository,
    F: FollowerRepository,
    C: CommentRepository,
{
    users: U,
    images: I,
    followers: F,
    comments: C,
}

impl<U, I, F, C> SocialService<U, I, F, C>
where
    U: UserRepository,
    I: ImageRepository,
    F: FollowerRepository,
    C: CommentRepository,
{
    pub fn new(users: U, images: I, followers: F, comments: C) -> Self {
        Self {
            users,
            images,
            followers,
            comments,
        }
    }

    /// Profile of `user_id` as seen by `viewer` (anonymous when `None`).
    pub async fn profile(
        &self,
        user_id: &UserId,
        viewer: Option<&User>,
    ) -> Result<Profile, SocialError> {
        let user = self.user(user_id).await?;

        let followers = self.followers.followers(&user.id).await.map_err(storage)?;
        let follower_count = self.followers.follower_count(&user.id).await.map_err(storage)?;
        let following_count = self.followers.following_count(&user.id).await.map_err(storage)?;
        let most_upvoted_image = self
            .images
            .most_upvoted_approved(&user.id)
            .await
            .map_err(storage)?;

        let is_followed_by_viewer = match viewer {
            Some(viewer) if viewer.id != user.id => self
                .followers
                .is_following(&viewer.id, &user.id)
                .await
                .map_err(storage)?,
            _ => false,
        };

        Ok(Profile {
            user: UserSummary::from(&user),
            is_superuser: user.is_superuser,
            followers,
            follower_count,
            following_count,
            most_upvoted_image,
            is_followed_by_viewer,
        })
    }

    /// Follow `target`. Returns the target and whether a new relation was made.
    pub async fn follow(&self, actor: &User, target: &UserId) -> Result<(User, bool), SocialError> {
        let target = self.user(target).await?;
        if target.id == actor.id {
            return Err(SocialError::InvalidInput("You cannot follow yourself.".to_string()));
        }
        if target.is_superuser {
            return Err(SocialError::InvalidInput("You cannot follow a superuser.".to_string()));
        }

        let created = self
            .followers
            .follow(&actor.id, &target.id)
            .await
            .map_err(storage)?;
        tracing::info!(follower = %actor.id, followed = %target.id, created, "follow");
        Ok((target, created))
    }

    /// Unfollow `target`. Returns the target and whether a relation was removed.
    pub async fn unfollow(
        &self,
        actor: &User,
        target: &UserId,
    ) -> Result<(User, bool), SocialError> {
        let target = self.user(target).await?;
        let removed = self
            .followers
            .unfollow(&actor.id, &target.id)
            .await
            .map_err(storage)?;
        tracing::info!(follower = %actor.id, followed = %target.id, removed, "unfollow");
        Ok((target, removed))
    }

    /// Comments on an approved image, newest first.
    pub async fn comments(&self, image_id: &ImageId) -> Result<(Image, Vec<Comment>), SocialError> {
        let image = self.approved_image(image_id).await?;
        let comments = self
            .comments
            .list_for_image(&image.id)
            .await
            .map_err(storage)?;
        Ok((image, comments))
    }

    pub async fn add_comment(
        &self,
        author: &User,
        image_id: &ImageId,
        content: &str,
    ) -> Result<Comment, SocialError> {
        let image = self.approved_image(image_id).await?;
        let content = content.trim();
        if content.is_empty() {
            return Err(SocialError::InvalidInput("Comment cannot be empty.".to_string()));
        }

        let comment = Comment {
            id: CommentId::new(),
            content: content.to_string(),
            timestamp: Utc::now(),
            user_id: author.id,
            image_id: image.id,
            username: author.username.clone(),
        };
        let comment = self.comments.create(&comment).await.map_err(storage)?;
        tracing::info!(
            comment_id = %comment.id,
            image_id = %image.id,
            user_id = %author.id,
            "comment added"
        );
        Ok(comment)
    }

    /// Delete a comment (superusers only). Returns the deleted comment.
    pub async fn delete_comment(
        &self,
        actor: &User,
        id: &CommentId,
    ) -> Result<Comment, SocialError> {
        let comment = self
            .comments
            .get_by_id(id)
            .await
            .map_err(storage)?
            .ok_or(SocialError::CommentNotFound)?;
        if !actor.is_superuser {
            return Err(SocialError::Forbidden(
                "Only superusers can delete comments.".to_string(),
            ));
        }

        self.comments.delete(id).await.map_err(|e| match e {
            RepositoryError::NotFound => SocialError::CommentNotFound,
            other => storage(other),
        })?;
        tracing::info!(comment_id = %id, image_id = %comment.image_id, "comment deleted");
        Ok(comment)
    }

    async fn user(&self, id: &UserId) -> Result<User, SocialError> {
        self.users
            .get_by_id(id)
            .await
            .map_err(storage)?
            .ok_or(SocialError::UserNotFound)
    }

    async fn approved_image(&self, id: &ImageId) -> Result<Image, SocialError> {
        let image = self
            .images
            .get_by_id(id)
            .await
            .map_err(storage)?
            .ok_or(SocialError::ImageNotFound)?;
        if !image.is_approved() {
            return Err(SocialError::NotModerated);
        }
        Ok(image)
    }
}
