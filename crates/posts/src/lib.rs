//! # Inkwell Posts Crate
//!
//! Blog posts for the Inkwell backend: the post entity with its tag and
//! authorship rules, SQLite persistence, and the CRUD service.

pub mod entities;
pub mod repositories;
pub mod services;
pub mod types;

pub use entities::Post;
pub use repositories::SqlitePostStore;
pub use services::{PostChanges, PostService};
pub use types::{PostError, PostResult};
