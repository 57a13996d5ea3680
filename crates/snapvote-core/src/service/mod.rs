//! Business logic services (use cases).
//!
//! Services orchestrate repository calls, crypto, mail, and media operations.
//! They depend on traits (ports) -- never on concrete infrastructure
//! implementations.

pub mod account;
pub mod hash;
pub mod image;
pub mod mail;
pub mod media;
pub mod random;
pub mod social;
pub mod token;
