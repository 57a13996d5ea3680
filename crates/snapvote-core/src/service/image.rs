//! Image service.
//!
//! Upload normalization, role-scoped listings, moderation, archive toggles,
//! voting, and QR rendering. Superuser and ownership checks live here so the
//! HTTP layer only has to resolve the caller.

use std::collections::HashMap;

use chrono::Utc;

use snapvote_types::error::{ImageError, RepositoryError};
use snapvote_types::id::{ImageId, UserId};
use snapvote_types::image::{
    self, Category, CategoryFilter, Image, ModerationOutcome, ModerationStatus, OwnerScope,
    UNIQUE_NUMBER_LEN,
};
use snapvote_types::user::User;
use snapvote_types::vote::{VoteTally, VoteType};

use crate::repository::image::{ImageFilter, ImageRepository};
use crate::repository::vote::VoteRepository;
use crate::service::media::ImageProcessor;
use crate::service::random::RandomSource;
use crate::validation;

/// Attempts at drawing a unique number before giving up.
const UNIQUE_NUMBER_ATTEMPTS: usize = 5;

fn storage(e: RepositoryError) -> ImageError {
    ImageError::StorageError(e.to_string())
}

fn require_superuser(actor: &User) -> Result<(), ImageError> {
    if actor.is_superuser {
        Ok(())
    } else {
        Err(ImageError::Forbidden)
    }
}

/// Images visible to an authenticated user plus that user's own votes.
#[derive(Debug, Clone)]
pub struct VotedListing {
    pub images: Vec<Image>,
    pub user_votes: HashMap<ImageId, VoteType>,
}

pub struct ImageService<I, V, P, R>
where
    I: ImageRepository,
    V: VoteRepository,
    P: ImageProcessor,
    R: RandomSource,
{
    images: I,
    votes: V,
    processor: P,
    random: R,
}

impl<I, V, P, R> ImageService<I, V, P, R>
where
    I: ImageRepository,
    V: VoteRepository,
    P: ImageProcessor,
    R: RandomSource,
{
    pub fn new(images: I, votes: V, processor: P, random: R) -> Self {
        Self {
            images,
            votes,
            processor,
            random,
        }
    }

    /// Store a new unmoderated image for `owner`.
    pub async fn upload(
        &self,
        owner: &User,
        name: &str,
        filename: &str,
        bytes: &[u8],
    ) -> Result<Image, ImageError> {
        let name = name.trim();
        validation::validate_image_name(name).map_err(ImageError::InvalidInput)?;
        if !image::has_allowed_extension(filename) {
            return Err(ImageError::InvalidInput("Images only!".to_string()));
        }

        let png = self.processor.normalize(bytes).map_err(|e| {
            tracing::debug!(filename = %filename, error = %e, "upload rejected");
            ImageError::InvalidInput("The uploaded file is not a valid image.".to_string())
        })?;

        let image = Image {
            id: ImageId::new(),
            name: name.to_string(),
            upload_date: Utc::now(),
            moderation_status: ModerationStatus::Unmoderated,
            category: Category::default(),
            is_archived: false,
            artist_archived: false,
            unique_number: None,
            vote_count: 0,
            last_reset_date: None,
            last_reset_reason: None,
            user_id: owner.id,
            username: owner.username.clone(),
        };

        let image = self.images.create(&image, &png).await.map_err(storage)?;
        tracing::info!(
            image_id = %image.id,
            user_id = %owner.id,
            bytes = png.len(),
            "image uploaded"
        );
        Ok(image)
    }

    pub async fn get(&self, id: &ImageId) -> Result<Image, ImageError> {
        self.images
            .get_by_id(id)
            .await
            .map_err(storage)?
            .ok_or(ImageError::NotFound)
    }

    /// Stored PNG payload. Missing or empty payloads are reported as not found.
    pub async fn image_data(&self, id: &ImageId) -> Result<Vec<u8>, ImageError> {
        match self.images.get_data(id).await.map_err(storage)? {
            Some(data) if !data.is_empty() => Ok(data),
            _ => Err(ImageError::NotFound),
        }
    }

    /// QR code PNG encoding the image's unique number.
    pub async fn qr_code(&self, id: &ImageId) -> Result<Vec<u8>, ImageError> {
        let image = self.get(id).await?;
        if !image.is_approved() {
            return Err(ImageError::NotModerated(
                "QR Code is only available for moderated images.".to_string(),
            ));
        }
        let number = image.unique_number.as_deref().ok_or_else(|| {
            ImageError::NotModerated("This image does not have a unique number yet.".to_string())
        })?;

        self.processor
            .qr_png(&format!("Image ID: {number}"))
            .map_err(ImageError::ProcessingError)
    }

    /// Superuser dashboard: pending and approved images.
    pub async fn dashboard(
        &self,
        actor: &User,
        category: CategoryFilter,
    ) -> Result<Vec<Image>, ImageError> {
        require_superuser(actor)?;
        self.list(ImageFilter {
            statuses: Some(vec![ModerationStatus::Pending, ModerationStatus::Approved]),
            category: category.category(),
            ..ImageFilter::default()
        })
        .await
    }

    /// Superuser edit view: every image regardless of status.
    pub async fn edit_images(
        &self,
        actor: &User,
        category: CategoryFilter,
    ) -> Result<Vec<Image>, ImageError> {
        require_superuser(actor)?;
        self.list(ImageFilter {
            category: category.category(),
            ..ImageFilter::default()
        })
        .await
    }

    pub async fn archived_images(
        &self,
        actor: &User,
        category: CategoryFilter,
    ) -> Result<Vec<Image>, ImageError> {
        require_superuser(actor)?;
        self.list(ImageFilter {
            category: category.category(),
            is_archived: Some(true),
            ..ImageFilter::default()
        })
        .await
    }

    /// All images together with the caller's votes.
    pub async fn view_all(
        &self,
        viewer: &User,
        category: CategoryFilter,
    ) -> Result<VotedListing, ImageError> {
        let images = self
            .list(ImageFilter {
                category: category.category(),
                ..ImageFilter::default()
            })
            .await?;
        let user_votes = self.votes.votes_by_user(&viewer.id).await.map_err(storage)?;
        Ok(VotedListing { images, user_votes })
    }

    /// Public gallery: approved images only.
    pub async fn guest_view(&self, category: CategoryFilter) -> Result<Vec<Image>, ImageError> {
        self.list(ImageFilter {
            statuses: Some(vec![ModerationStatus::Approved]),
            category: category.category(),
            ..ImageFilter::default()
        })
        .await
    }

    pub async fn owner_images(
        &self,
        owner: &UserId,
        scope: OwnerScope,
    ) -> Result<Vec<Image>, ImageError> {
        let mut filter = ImageFilter {
            user_id: Some(*owner),
            ..ImageFilter::default()
        };
        match scope {
            OwnerScope::Active => filter.artist_archived = Some(false),
            OwnerScope::Moderated => {
                filter.artist_archived = Some(false);
                filter.statuses = Some(vec![ModerationStatus::Approved]);
            }
            OwnerScope::Archived => filter.artist_archived = Some(true),
        }
        self.list(filter).await
    }

    async fn list(&self, filter: ImageFilter) -> Result<Vec<Image>, ImageError> {
        self.images.list(filter).await.map_err(storage)
    }

    /// Superuser moderation decision. The image must exist; `status` and
    /// `category` arrive as raw form values and are validated in that order.
    ///
    /// The decision is applied to the stored row inside a writer transaction,
    /// so a unique number is minted at most once per image.
    pub async fn moderate(
        &self,
        actor: &User,
        id: &ImageId,
        status: &str,
        category: &str,
    ) -> Result<(Image, ModerationOutcome), ImageError> {
        require_superuser(actor)?;
        self.get(id).await?;
        let status: ModerationStatus = status
            .parse()
            .map_err(|_| ImageError::InvalidInput("Invalid status update!".to_string()))?;
        let category: Category = category
            .parse()
            .map_err(|_| ImageError::InvalidInput("Invalid category!".to_string()))?;

        let random = &self.random;
        for attempt in 1..=UNIQUE_NUMBER_ATTEMPTS {
            let result = self
                .images
                .update_with(id, |image| {
                    image.moderate(status, category, || random.digits(UNIQUE_NUMBER_LEN))
                })
                .await;

            match result {
                Ok(Some((saved, outcome))) => {
                    tracing::info!(
                        image_id = %saved.id,
                        status = %saved.moderation_status,
                        category = %saved.category,
                        assigned_number = outcome.assigned_number,
                        unarchived = outcome.unarchived,
                        "image moderated"
                    );
                    return Ok((saved, outcome));
                }
                Ok(None) => return Err(ImageError::NotFound),
                Err(RepositoryError::Conflict(msg)) => {
                    tracing::warn!(
                        image_id = %id,
                        attempt,
                        conflict = %msg,
                        "unique number collision, retrying"
                    );
                }
                Err(e) => return Err(storage(e)),
            }
        }

        Err(ImageError::StorageError(
            "could not allocate a unique image number".to_string(),
        ))
    }

    /// Flip the superuser archive flag.
    pub async fn toggle_archive(&self, actor: &User, id: &ImageId) -> Result<Image, ImageError> {
        require_superuser(actor)?;
        let image = self
            .apply(id, |image| image.is_archived = !image.is_archived)
            .await?;
        tracing::info!(image_id = %image.id, archived = image.is_archived, "archive toggled");
        Ok(image)
    }

    /// Flip the owner archive flag.
    pub async fn toggle_artist_archive(
        &self,
        actor: &User,
        id: &ImageId,
    ) -> Result<Image, ImageError> {
        self.owned(actor, id).await?;
        let image = self
            .apply(id, |image| image.artist_archived = !image.artist_archived)
            .await?;
        tracing::info!(
            image_id = %image.id,
            artist_archived = image.artist_archived,
            "artist archive toggled"
        );
        Ok(image)
    }

    /// Owner asks for moderation. Returns the image and whether it moved to
    /// pending.
    pub async fn request_moderation(
        &self,
        actor: &User,
        id: &ImageId,
    ) -> Result<(Image, bool), ImageError> {
        self.owned(actor, id).await?;
        let (image, requested) = self
            .images
            .update_with(id, Image::request_moderation)
            .await
            .map_err(storage)?
            .ok_or(ImageError::NotFound)?;
        if requested {
            tracing::info!(image_id = %image.id, "moderation requested");
        }
        Ok((image, requested))
    }

    /// Apply a flag change to the stored image.
    async fn apply<F>(&self, id: &ImageId, change: F) -> Result<Image, ImageError>
    where
        F: FnOnce(&mut Image) + Send,
    {
        self.images
            .update_with(id, change)
            .await
            .map_err(storage)?
            .map(|(image, ())| image)
            .ok_or(ImageError::NotFound)
    }

    /// Cast, switch, or retract a vote. `vote_type` is the raw path value.
    pub async fn vote(
        &self,
        voter: &User,
        id: &ImageId,
        vote_type: &str,
    ) -> Result<VoteTally, ImageError> {
        let requested: VoteType = vote_type
            .parse()
            .map_err(|_| ImageError::InvalidInput("Invalid vote type!".to_string()))?;
        self.get(id).await?;

        let tally = self
            .votes
            .apply_vote(&voter.id, id, requested)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => ImageError::NotFound,
                other => storage(other),
            })?;
        tracing::debug!(
            image_id = %id,
            user_id = %voter.id,
            vote_count = tally.vote_count,
            "vote applied"
        );
        Ok(tally)
    }

    pub async fn reset_votes(
        &self,
        actor: &User,
        id: &ImageId,
        reason: &str,
    ) -> Result<Image, ImageError> {
        require_superuser(actor)?;
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(ImageError::InvalidInput(
                "You must provide a reason for resetting votes.".to_string(),
            ));
        }
        self.get(id).await?;

        self.images
            .reset_votes(id, reason, Utc::now())
            .await
            .map_err(storage)?;
        tracing::info!(image_id = %id, reason = %reason, "votes reset");
        self.get(id).await
    }

    async fn owned(&self, actor: &User, id: &ImageId) -> Result<Image, ImageError> {
        let image = self.get(id).await?;
        if image.user_id != actor.id {
            return Err(ImageError::Forbidden);
        }
        Ok(image)
    }
}
