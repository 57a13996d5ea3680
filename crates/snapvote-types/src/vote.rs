//! Vote types and the toggle rule.
//!
//! A user holds at most one vote per image. Repeating the same vote retracts
//! it, voting the other way switches it.

use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

use crate::id::ImageId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteType {
    Upvote,
    Downvote,
}

impl VoteType {
    /// Contribution to the image's vote count.
    pub fn weight(&self) -> i64 {
        match self {
            VoteType::Upvote => 1,
            VoteType::Downvote => -1,
        }
    }
}

impl fmt::Display for VoteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VoteType::Upvote => write!(f, "upvote"),
            VoteType::Downvote => write!(f, "downvote"),
        }
    }
}

impl FromStr for VoteType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "upvote" => Ok(VoteType::Upvote),
            "downvote" => Ok(VoteType::Downvote),
            other => Err(format!("invalid vote type: '{other}'")),
        }
    }
}

/// Row-level change produced by a vote request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteChange {
    Insert(VoteType),
    Switch(VoteType),
    Remove,
}

impl VoteChange {
    /// The caller's vote after the change is applied.
    pub fn resulting_vote(&self) -> Option<VoteType> {
        match self {
            VoteChange::Insert(v) | VoteChange::Switch(v) => Some(*v),
            VoteChange::Remove => None,
        }
    }
}

/// Decide how a vote request changes the caller's existing vote.
pub fn resolve_vote(existing: Option<VoteType>, requested: VoteType) -> VoteChange {
    match existing {
        None => VoteChange::Insert(requested),
        Some(current) if current == requested => VoteChange::Remove,
        Some(_) => VoteChange::Switch(requested),
    }
}

/// Result of a vote request: the recomputed count and the caller's vote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteTally {
    pub image_id: ImageId,
    pub vote_count: i64,
    pub user_vote: Option<VoteType>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_vote_inserts() {
        assert_eq!(
            resolve_vote(None, VoteType::Upvote),
            VoteChange::Insert(VoteType::Upvote)
        );
    }

    #[test]
    fn test_same_vote_removes() {
        let change = resolve_vote(Some(VoteType::Downvote), VoteType::Downvote);
        assert_eq!(change, VoteChange::Remove);
        assert_eq!(change.resulting_vote(), None);
    }

    #[test]
    fn test_opposite_vote_switches() {
        let change = resolve_vote(Some(VoteType::Upvote), VoteType::Downvote);
        assert_eq!(change, VoteChange::Switch(VoteType::Downvote));
        assert_eq!(change.resulting_vote(), Some(VoteType::Downvote));
    }

    #[test]
    fn test_vote_type_parse() {
        assert_eq!("upvote".parse::<VoteType>().unwrap(), VoteType::Upvote);
        assert_eq!("downvote".parse::<VoteType>().unwrap(), VoteType::Downvote);
        assert!("sideways".parse::<VoteType>().is_err());
    }

    #[test]
    fn test_weights() {
        assert_eq!(VoteType::Upvote.weight() + VoteType::Downvote.weight(), 0);
    }
}
