//! Business logic services for the accounts crate.
//!
//! Services coordinate between the user store and the email notifier and
//! enforce the account business rules.

pub mod email_update;
pub mod notifier;
pub mod profile;

pub use email_update::{EmailUpdateService, EmailUpdateSettings, RequestAcknowledgement};
pub use notifier::{EmailNotifier, Notifier, NullNotifier, SmtpNotifier};
pub use profile::{PasswordChangeOutcome, ProfileService};
