//! In-memory user store used by service tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;

use super::UserStore;
use crate::entities::User;
use crate::types::{AccountError, AccountResult};

/// Hash-map backed [`UserStore`] with the same uniqueness semantics as
/// the SQLite store.
#[derive(Clone, Default)]
pub struct MemoryUserStore {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
struct Inner {
    users: HashMap<i64, User>,
    next_id: i64,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a user, bypassing registration. Test-setup convenience.
    pub fn insert_user(&self, name: Option<&str>, email: &str, password_hash: &str) -> User {
        let mut inner = self.inner.lock().expect("memory store poisoned");
        inner.next_id += 1;
        let id = inner.next_id;
        let now = Utc::now().to_rfc3339();

        let user = User {
            id,
            public_id: format!("usr_{id:08}"),
            name: name.map(str::to_owned),
            email: email.to_owned(),
            password_hash: password_hash.to_owned(),
            pending_email_change: None,
            created_at: now.clone(),
            updated_at: now,
        };
        inner.users.insert(id, user.clone());
        user
    }
}

impl UserStore for MemoryUserStore {
    async fn find_by_id(&self, id: i64) -> AccountResult<Option<User>> {
        let inner = self.inner.lock().expect("memory store poisoned");
        Ok(inner.users.get(&id).cloned())
    }

    async fn find_by_public_id(&self, public_id: &str) -> AccountResult<Option<User>> {
        let inner = self.inner.lock().expect("memory store poisoned");
        Ok(inner
            .users
            .values()
            .find(|user| user.public_id == public_id)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> AccountResult<Option<User>> {
        let inner = self.inner.lock().expect("memory store poisoned");
        Ok(inner
            .users
            .values()
            .find(|user| user.email == email)
            .cloned())
    }

    async fn save(&self, user: &User) -> AccountResult<User> {
        let mut inner = self.inner.lock().expect("memory store poisoned");

        if !inner.users.contains_key(&user.id) {
            return Err(AccountError::UserNotFound);
        }

        let taken = inner
            .users
            .values()
            .any(|other| other.id != user.id && other.email == user.email);
        if taken {
            return Err(AccountError::EmailTaken);
        }

        inner.users.insert(user.id, user.clone());
        Ok(user.clone())
    }
}
