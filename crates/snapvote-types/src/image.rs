use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

use crate::id::{ImageId, UserId};

/// Number of decimal digits in an approved image's unique number.
pub const UNIQUE_NUMBER_LEN: usize = 10;

/// Uploaded images are normalized to this square size (pixels).
pub const THUMBNAIL_SIZE: u32 = 64;

/// File extensions accepted on upload.
pub const ALLOWED_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "gif", "webp"];

/// An uploaded image with its moderation metadata.
///
/// The PNG payload is stored alongside but is loaded separately; listings
/// never carry image bytes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    pub id: ImageId,
    /// Title given by the uploader (1-100 characters).
    pub name: String,
    pub upload_date: DateTime<Utc>,
    pub moderation_status: ModerationStatus,
    pub category: Category,
    /// Archived by a superuser.
    pub is_archived: bool,
    /// Archived by its owner.
    pub artist_archived: bool,
    /// Assigned on first approval, never changed afterwards.
    pub unique_number: Option<String>,
    /// Cached upvotes minus downvotes.
    pub vote_count: i64,
    pub last_reset_date: Option<DateTime<Utc>>,
    pub last_reset_reason: Option<String>,
    /// Uploader.
    pub user_id: UserId,
    /// Uploader's username, joined in for display.
    pub username: String,
}

/// Moderation lifecycle.
///
/// - Unmoderated: freshly uploaded, visible only to its owner and superusers
/// - Pending: the owner asked for moderation
/// - Approved: visible to guests, votable, commentable, QR-enabled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModerationStatus {
    #[default]
    Unmoderated,
    Pending,
    Approved,
}

impl fmt::Display for ModerationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModerationStatus::Unmoderated => write!(f, "unmoderated"),
            ModerationStatus::Pending => write!(f, "pending"),
            ModerationStatus::Approved => write!(f, "approved"),
        }
    }
}

impl FromStr for ModerationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unmoderated" => Ok(ModerationStatus::Unmoderated),
            "pending" => Ok(ModerationStatus::Pending),
            "approved" => Ok(ModerationStatus::Approved),
            other => Err(format!("invalid moderation status: '{other}'")),
        }
    }
}

/// Image categories assigned by moderation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Category {
    #[default]
    Nature,
    Art,
    Technology,
    Memes,
    Photography,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Nature,
        Category::Art,
        Category::Technology,
        Category::Memes,
        Category::Photography,
    ];
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Nature => write!(f, "Nature"),
            Category::Art => write!(f, "Art"),
            Category::Technology => write!(f, "Technology"),
            Category::Memes => write!(f, "Memes"),
            Category::Photography => write!(f, "Photography"),
        }
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.to_string() == s)
            .ok_or_else(|| format!("invalid category: '{s}'"))
    }
}

/// Category selector used by listings: `all` or a single category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn category(&self) -> Option<Category> {
        match self {
            CategoryFilter::All => None,
            CategoryFilter::Only(c) => Some(*c),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            return Ok(CategoryFilter::All);
        }
        s.parse().map(CategoryFilter::Only)
    }
}

/// What a superuser moderation call changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ModerationOutcome {
    /// A unique number was assigned by this call.
    pub assigned_number: bool,
    /// The image was archived and has been unarchived by unmoderating it.
    pub unarchived: bool,
}

impl Image {
    /// Apply a superuser moderation decision.
    ///
    /// `next_number` is only invoked when the image is approved for the first
    /// time; an existing unique number is kept.
    pub fn moderate(
        &mut self,
        status: ModerationStatus,
        category: Category,
        next_number: impl FnOnce() -> String,
    ) -> ModerationOutcome {
        let mut outcome = ModerationOutcome::default();
        self.moderation_status = status;

        if status == ModerationStatus::Approved && self.unique_number.is_none() {
            self.unique_number = Some(next_number());
            outcome.assigned_number = true;
        }

        if self.is_archived && status == ModerationStatus::Unmoderated {
            self.is_archived = false;
            outcome.unarchived = true;
        }

        self.category = category;
        outcome
    }

    /// Owner asks for moderation. Only `unmoderated` moves (to `pending`);
    /// returns whether the status changed.
    pub fn request_moderation(&mut self) -> bool {
        if self.moderation_status == ModerationStatus::Unmoderated {
            self.moderation_status = ModerationStatus::Pending;
            true
        } else {
            false
        }
    }

    pub fn is_approved(&self) -> bool {
        self.moderation_status == ModerationStatus::Approved
    }
}

/// Owner-facing image views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OwnerScope {
    /// Not archived by the owner.
    #[default]
    Active,
    /// Approved and not archived by the owner.
    Moderated,
    /// Archived by the owner.
    Archived,
}

impl FromStr for OwnerScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(OwnerScope::Active),
            "moderated" => Ok(OwnerScope::Moderated),
            "archived" => Ok(OwnerScope::Archived),
            other => Err(format!("invalid scope: '{other}'")),
        }
    }
}

/// Whether `filename` carries an accepted image extension (case-insensitive).
pub fn has_allowed_extension(filename: &str) -> bool {
    match filename.rsplit_once('.') {
        Some((_, ext)) => {
            let ext = ext.to_lowercase();
            ALLOWED_EXTENSIONS.contains(&ext.as_str())
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_image() -> Image {
        Image {
            id: ImageId::new(),
            name: "Sunset".to_string(),
            upload_date: Utc::now(),
            moderation_status: ModerationStatus::Unmoderated,
            category: Category::Nature,
            is_archived: false,
            artist_archived: false,
            unique_number: None,
            vote_count: 0,
            last_reset_date: None,
            last_reset_reason: None,
            user_id: UserId::new(),
            username: "artist1".to_string(),
        }
    }

    #[test]
    fn test_first_approval_assigns_number() {
        let mut image = make_image();
        let outcome = image.moderate(ModerationStatus::Approved, Category::Art, || {
            "0123456789".to_string()
        });
        assert!(outcome.assigned_number);
        assert_eq!(image.unique_number.as_deref(), Some("0123456789"));
        assert_eq!(image.category, Category::Art);
        assert!(image.is_approved());
    }

    #[test]
    fn test_reapproval_keeps_existing_number() {
        let mut image = make_image();
        image.unique_number = Some("1111111111".to_string());
        let outcome = image.moderate(ModerationStatus::Approved, Category::Nature, || {
            panic!("generator must not run when a number exists")
        });
        assert!(!outcome.assigned_number);
        assert_eq!(image.unique_number.as_deref(), Some("1111111111"));
    }

    #[test]
    fn test_number_survives_unmoderation() {
        let mut image = make_image();
        image.moderate(ModerationStatus::Approved, Category::Nature, || "5".repeat(10));
        image.moderate(ModerationStatus::Unmoderated, Category::Nature, || "6".repeat(10));
        assert_eq!(image.unique_number.as_deref(), Some("5555555555"));
    }

    #[test]
    fn test_unmoderating_archived_image_unarchives() {
        let mut image = make_image();
        image.moderation_status = ModerationStatus::Approved;
        image.is_archived = true;
        let outcome = image.moderate(ModerationStatus::Unmoderated, Category::Memes, String::new);
        assert!(outcome.unarchived);
        assert!(!image.is_archived);
    }

    #[test]
    fn test_pending_on_archived_image_stays_archived() {
        let mut image = make_image();
        image.is_archived = true;
        let outcome = image.moderate(ModerationStatus::Pending, Category::Memes, String::new);
        assert!(!outcome.unarchived);
        assert!(image.is_archived);
    }

    #[test]
    fn test_request_moderation_only_from_unmoderated() {
        let mut image = make_image();
        assert!(image.request_moderation());
        assert_eq!(image.moderation_status, ModerationStatus::Pending);
        assert!(!image.request_moderation());

        image.moderation_status = ModerationStatus::Approved;
        assert!(!image.request_moderation());
        assert_eq!(image.moderation_status, ModerationStatus::Approved);
    }

    #[test]
    fn test_category_parse_is_case_sensitive() {
        assert_eq!("Technology".parse::<Category>().unwrap(), Category::Technology);
        assert!("technology".parse::<Category>().is_err());
    }

    #[test]
    fn test_category_filter_parse() {
        assert_eq!("all".parse::<CategoryFilter>().unwrap(), CategoryFilter::All);
        assert_eq!(
            "Memes".parse::<CategoryFilter>().unwrap(),
            CategoryFilter::Only(Category::Memes)
        );
        assert!("Cats".parse::<CategoryFilter>().is_err());
    }

    #[test]
    fn test_status_roundtrip() {
        for status in [
            ModerationStatus::Unmoderated,
            ModerationStatus::Pending,
            ModerationStatus::Approved,
        ] {
            assert_eq!(status.to_string().parse::<ModerationStatus>().unwrap(), status);
        }
        assert!("archived".parse::<ModerationStatus>().is_err());
    }

    #[test]
    fn test_new_image_defaults() {
        assert_eq!(ModerationStatus::default(), ModerationStatus::Unmoderated);
        assert_eq!(Category::default(), Category::Nature);
        assert_eq!(CategoryFilter::default(), CategoryFilter::All);
        assert_eq!(OwnerScope::default(), OwnerScope::Active);
    }

    #[test]
    fn test_allowed_extensions() {
        assert!(has_allowed_extension("cat.PNG"));
        assert!(has_allowed_extension("photo.final.jpeg"));
        assert!(has_allowed_extension("anim.webp"));
        assert!(!has_allowed_extension("notes.txt"));
        assert!(!has_allowed_extension("png"));
    }
}
