//! Domain entities for the accounts system.
//!
//! Pure domain objects without API-specific concerns. The email-change
//! state machine lives on [`User`] itself.

pub mod user;

pub use user::{PendingEmailChange, User};
