//! Shared domain types for SnapVote.
//!
//! This crate contains the core domain types used across the SnapVote service:
//! User, Image, Vote, Follower, Comment, Session, plus the pure rules that
//! govern vote toggling and image moderation.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod comment;
pub mod config;
pub mod error;
pub mod follow;
pub mod id;
pub mod image;
pub mod session;
pub mod token;
pub mod user;
pub mod vote;
