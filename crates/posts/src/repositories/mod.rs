//! Data access layer for the posts crate.

pub mod post_repository;

pub use post_repository::SqlitePostStore;
