use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::{CommentId, ImageId, UserId};

/// A comment left on an approved image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub user_id: UserId,
    pub image_id: ImageId,
    /// Author's username, joined in for display.
    pub username: String,
}
