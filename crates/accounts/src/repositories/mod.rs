//! Data access layer for the accounts crate.
//!
//! The workflow services depend on the [`UserStore`] trait rather than a
//! concrete backend, so tests can substitute the in-memory store.

pub mod memory;
pub mod user_repository;

pub use memory::MemoryUserStore;
pub use user_repository::SqliteUserStore;

use crate::entities::User;
use crate::types::AccountResult;

/// Persistence contract the account services depend on.
///
/// `save` must persist the pending email-change triple together with the
/// other mutable fields: an unrelated update (say, a rename) never drops
/// an outstanding request, and the confirm transition (email swap plus
/// pending clear) lands as a single write.
pub trait UserStore {
    async fn find_by_id(&self, id: i64) -> AccountResult<Option<User>>;
    async fn find_by_public_id(&self, public_id: &str) -> AccountResult<Option<User>>;
    async fn find_by_email(&self, email: &str) -> AccountResult<Option<User>>;
    async fn save(&self, user: &User) -> AccountResult<User>;
}
