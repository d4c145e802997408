//! The two-phase, token-gated email change workflow.
//!
//! `request_update` moves a user from Idle to PendingConfirmation and
//! mails a confirmation link; `confirm_update` consumes the token and
//! swaps the address. An expired token stays on the record until a fresh
//! request replaces it; it is never honoured.

use chrono::{Duration, Utc};
use tracing::{info, warn};

use super::notifier::EmailNotifier;
use crate::repositories::UserStore;
use crate::types::{AccountError, AccountResult};
use crate::utils::{issue_confirmation_token, validate_email};
use crate::User;

/// Knobs for the workflow: where confirmation links point, and how long
/// tokens stay valid.
#[derive(Debug, Clone)]
pub struct EmailUpdateSettings {
    pub frontend_url: String,
    pub token_ttl: Duration,
}

impl EmailUpdateSettings {
    pub fn new(frontend_url: impl Into<String>, token_ttl_seconds: u64) -> Self {
        Self {
            frontend_url: frontend_url.into(),
            token_ttl: Duration::seconds(token_ttl_seconds.min(i64::MAX as u64) as i64),
        }
    }
}

/// What the caller gets back from a request: an acknowledgement only.
/// The token travels exclusively over the email channel.
#[derive(Debug, Clone)]
pub struct RequestAcknowledgement {
    pub message: String,
}

/// Orchestrates the email-change state machine over a [`UserStore`] and
/// an [`EmailNotifier`].
pub struct EmailUpdateService<S, N> {
    store: S,
    notifier: N,
    settings: EmailUpdateSettings,
}

impl<S, N> EmailUpdateService<S, N>
where
    S: UserStore,
    N: EmailNotifier,
{
    pub fn new(store: S, notifier: N, settings: EmailUpdateSettings) -> Self {
        Self {
            store,
            notifier,
            settings,
        }
    }

    /// Start (or restart) an email change for `user_id`.
    ///
    /// Persists the new pending request before attempting delivery; a
    /// failed delivery is surfaced to the caller but the committed
    /// pending state stays in place, so a retry issues a fresh token
    /// rather than finding half-written state.
    pub async fn request_update(
        &self,
        user_id: i64,
        new_email: &str,
    ) -> AccountResult<RequestAcknowledgement> {
        let mut user = self
            .store
            .find_by_id(user_id)
            .await?
            .ok_or(AccountError::UserNotFound)?;

        validate_email(new_email)?;

        if user.email == new_email {
            return Err(AccountError::Validation(
                "new email is the same as the current email".to_string(),
            ));
        }

        let issued = issue_confirmation_token(self.settings.token_ttl);
        user.set_pending_email_change(
            new_email.to_string(),
            issued.token.clone(),
            issued.expires_at,
        );
        self.store.save(&user).await?;

        info!(user = %user.public_id, "email change requested");

        let subject = "Confirm your email update";
        let link = format!(
            "{}/confirm-email-update?token={}",
            self.settings.frontend_url, issued.token
        );
        let html = format!(
            "<p>Please click the following link to confirm your email update: \
             <a href=\"{link}\">Confirm email</a></p>"
        );

        if let Err(error) = self.notifier.send(new_email, subject, &html).await {
            warn!(user = %user.public_id, %error, "confirmation email delivery failed");
            return Err(AccountError::Notification(error.to_string()));
        }

        Ok(RequestAcknowledgement {
            message: "Confirmation email sent. Please check your inbox.".to_string(),
        })
    }

    /// Complete a pending email change with the token received by mail.
    ///
    /// The swap and the pending-clear land in a single save; the caller
    /// gets the updated user back (its credential hash never serializes).
    pub async fn confirm_update(&self, user_id: i64, token: &str) -> AccountResult<User> {
        let mut user = self
            .store
            .find_by_id(user_id)
            .await?
            .ok_or(AccountError::UserNotFound)?;

        user.confirm_pending_email(token, Utc::now())?;

        let user = self.store.save(&user).await?;
        info!(user = %user.public_id, "email change confirmed");
        Ok(user)
    }
}
