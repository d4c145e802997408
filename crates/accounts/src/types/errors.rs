//! Error types for the accounts crate.

use thiserror::Error;

/// Account-related errors.
///
/// `InvalidToken` and `TokenExpired` are kept distinct so callers can
/// tell a dead token from a wrong one; the HTTP layer maps both to 400.
#[derive(Debug, Error)]
pub enum AccountError {
    #[error("user not found")]
    UserNotFound,

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("invalid confirmation token")]
    InvalidToken,

    #[error("confirmation token expired")]
    TokenExpired,

    #[error("email already in use")]
    EmailTaken,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("notification delivery failed: {0}")]
    Notification(String),

    #[error("database error: {0}")]
    Database(String),
}

pub type AccountResult<T> = Result<T, AccountError>;

impl From<sqlx::Error> for AccountError {
    fn from(error: sqlx::Error) -> Self {
        AccountError::Database(error.to_string())
    }
}
