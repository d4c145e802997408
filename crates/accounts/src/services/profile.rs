//! Profile operations: reading the caller's own record, renaming, and
//! password changes.

use tracing::{info, warn};

use super::notifier::EmailNotifier;
use crate::repositories::UserStore;
use crate::types::{AccountError, AccountResult};
use crate::utils::{hash_password, validate_password, verify_password};
use crate::User;

/// Result of a password change. Delivery of the courtesy notification is
/// best-effort; `notification_sent` reports whether it went out.
#[derive(Debug, Clone)]
pub struct PasswordChangeOutcome {
    pub user: User,
    pub notification_sent: bool,
}

/// Profile mutations over a [`UserStore`], with courtesy notifications
/// through an [`EmailNotifier`].
pub struct ProfileService<S, N> {
    store: S,
    notifier: N,
}

impl<S, N> ProfileService<S, N>
where
    S: UserStore,
    N: EmailNotifier,
{
    pub fn new(store: S, notifier: N) -> Self {
        Self { store, notifier }
    }

    /// Fetch the caller's own record.
    pub async fn get_profile(&self, user_id: i64) -> AccountResult<User> {
        self.store
            .find_by_id(user_id)
            .await?
            .ok_or(AccountError::UserNotFound)
    }

    /// Change the display name.
    pub async fn update_name(&self, user_id: i64, new_name: &str) -> AccountResult<User> {
        let mut user = self
            .store
            .find_by_id(user_id)
            .await?
            .ok_or(AccountError::UserNotFound)?;

        user.rename(new_name)?;
        let user = self.store.save(&user).await?;
        info!(user = %user.public_id, "display name updated");
        Ok(user)
    }

    /// Change the password after re-verifying the current one.
    ///
    /// The courtesy email is sent after the new hash is saved; a delivery
    /// failure downgrades to a warning rather than failing the change,
    /// since the credential swap has already happened.
    pub async fn update_password(
        &self,
        user_id: i64,
        current_password: &str,
        new_password: &str,
    ) -> AccountResult<PasswordChangeOutcome> {
        let mut user = self
            .store
            .find_by_id(user_id)
            .await?
            .ok_or(AccountError::UserNotFound)?;

        if !verify_password(current_password, &user.password_hash)? {
            return Err(AccountError::InvalidCredentials);
        }

        validate_password(new_password)?;

        user.password_hash = hash_password(new_password)?;
        user.touch();
        let user = self.store.save(&user).await?;
        info!(user = %user.public_id, "password changed");

        let html = "<p>Your password was just changed. If this wasn't you, \
                    please contact support immediately.</p>";
        let notification_sent = match self
            .notifier
            .send(&user.email, "Your password was changed", html)
            .await
        {
            Ok(()) => true,
            Err(error) => {
                warn!(user = %user.public_id, %error, "password change notice failed to send");
                false
            }
        };

        Ok(PasswordChangeOutcome {
            user,
            notification_sent,
        })
    }
}
