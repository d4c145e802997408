//! Shared types for the accounts crate.

pub mod errors;

pub use errors::{AccountError, AccountResult};

/// Internal user identifier.
pub type UserId = i64;
