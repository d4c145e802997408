//! # Inkwell Accounts Crate
//!
//! Account management for the Inkwell backend: the user aggregate, the
//! token-gated email change workflow, and profile operations (rename,
//! password change).
//!
//! ## Architecture
//!
//! - **Entities**: Domain models (User, PendingEmailChange)
//! - **Services**: Business logic layer (email update workflow, profile)
//! - **Repositories**: Data access layer behind the [`UserStore`] trait
//! - **Types**: Shared error types
//! - **Utils**: Hashing, validation, token issuance

pub mod entities;
pub mod repositories;
pub mod services;
pub mod types;
pub mod utils;

pub use entities::{PendingEmailChange, User};
pub use repositories::{MemoryUserStore, SqliteUserStore, UserStore};
pub use services::{
    EmailNotifier, EmailUpdateService, EmailUpdateSettings, Notifier, NullNotifier,
    PasswordChangeOutcome, ProfileService, RequestAcknowledgement, SmtpNotifier,
};
pub use types::{AccountError, AccountResult};
