//! Business logic services for the posts crate.

pub mod post_service;

pub use post_service::{PostChanges, PostService};
