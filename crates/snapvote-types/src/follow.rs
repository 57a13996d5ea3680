use serde::{Deserialize, Serialize};

use crate::image::Image;
use crate::user::UserSummary;

/// Public profile of a user as seen by a (possibly anonymous) viewer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub user: UserSummary,
    pub is_superuser: bool,
    /// Users following this user.
    pub followers: Vec<UserSummary>,
    pub follower_count: i64,
    pub following_count: i64,
    /// Highest-voted approved image, if any.
    pub most_upvoted_image: Option<Image>,
    /// Whether the viewer follows this user (false for anonymous viewers).
    pub is_followed_by_viewer: bool,
}
