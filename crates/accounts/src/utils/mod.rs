//! Internal utilities for the accounts crate.

pub mod password;
pub mod token;
pub mod validation;

pub use password::{hash_password, verify_password};
pub use token::{issue_confirmation_token, IssuedToken};
pub use validation::{validate_email, validate_password};
