//! Business logic and repository trait definitions for SnapVote.
//!
//! This crate defines the "ports" (repository and service traits) that the
//! infrastructure layer implements. It depends only on `snapvote-types` --
//! never on `snapvote-infra` or any database/IO crate.

pub mod repository;
pub mod service;
pub mod validation;
