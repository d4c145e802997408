//! Domain entities for the posts system.

pub mod post;

pub use post::Post;
