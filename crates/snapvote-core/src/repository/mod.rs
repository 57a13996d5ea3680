//! Repository trait definitions (ports).
//!
//! These traits define the storage interface that the infrastructure layer
//! (snapvote-infra) implements. The core crate never depends on any
//! specific storage technology.

pub mod comment;
pub mod follower;
pub mod image;
pub mod session;
pub mod user;
pub mod vote;
