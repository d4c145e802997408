//! Error types for the posts crate.

use thiserror::Error;

/// Post-related errors.
#[derive(Debug, Error)]
pub enum PostError {
    #[error("post not found")]
    PostNotFound,

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("only the author may modify this post")]
    Forbidden,

    #[error("database error: {0}")]
    Database(String),
}

pub type PostResult<T> = Result<T, PostError>;

impl From<sqlx::Error> for PostError {
    fn from(error: sqlx::Error) -> Self {
        PostError::Database(error.to_string())
    }
}
