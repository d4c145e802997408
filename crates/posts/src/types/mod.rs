//! Shared types for the posts crate.

pub mod errors;

pub use errors::{PostError, PostResult};
