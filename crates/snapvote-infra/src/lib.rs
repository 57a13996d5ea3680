//! Infrastructure layer for SnapVote.
//!
//! Contains implementations of the ports defined in `snapvote-core`:
//! SQLite storage, password and token cryptography, outgoing email, and
//! image processing. Also loads `config.toml` and resolves the data
//! directory.

pub mod config;
pub mod crypto;
pub mod mail;
pub mod media;
pub mod sqlite;
