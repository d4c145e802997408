use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::types::AccountError;

/// A not-yet-confirmed email change: the candidate address, the secret
/// proving control of it, and the moment the secret stops being honoured.
///
/// At most one of these exists per user; a new request replaces the old
/// one wholesale.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingEmailChange {
    pub new_email: String,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// The user aggregate.
///
/// `email` is only ever changed through the two-phase confirmation
/// workflow; `password_hash` and the pending sub-record never appear in
/// serialized output.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    /// Database primary key, internal only.
    #[serde(skip_serializing)]
    pub id: i64,
    /// Publicly visible stable identifier.
    pub public_id: String,
    /// Optional display name.
    pub name: Option<String>,
    /// Unique address, mutable only via the confirmation workflow.
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Idle when `None`, PendingConfirmation when `Some`.
    #[serde(skip_serializing)]
    pub pending_email_change: Option<PendingEmailChange>,
    pub created_at: String,
    pub updated_at: String,
}

impl User {
    /// Whether the email-change sub-state machine is in PendingConfirmation.
    pub fn has_pending_email_change(&self) -> bool {
        self.pending_email_change.is_some()
    }

    /// Replace the display name.
    pub fn rename(&mut self, new_name: &str) -> Result<(), AccountError> {
        let trimmed = new_name.trim();
        if trimmed.is_empty() {
            return Err(AccountError::Validation("name cannot be empty".into()));
        }
        if trimmed.len() > 100 {
            return Err(AccountError::Validation(
                "name too long (max 100 characters)".into(),
            ));
        }
        self.name = Some(trimmed.to_string());
        self.touch();
        Ok(())
    }

    /// Enter (or re-enter) PendingConfirmation, replacing any previous
    /// request and its token.
    pub fn set_pending_email_change(
        &mut self,
        new_email: String,
        token: String,
        expires_at: DateTime<Utc>,
    ) {
        self.pending_email_change = Some(PendingEmailChange {
            new_email,
            token,
            expires_at,
        });
        self.touch();
    }

    /// Drop any pending request, returning to Idle.
    pub fn clear_pending_email_change(&mut self) {
        self.pending_email_change = None;
        self.touch();
    }

    /// Consume the pending request if `token` proves it: swaps `email` to
    /// the pending address and returns to Idle in one step, so no
    /// intermediate state is ever observable on the entity.
    pub fn confirm_pending_email(
        &mut self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<(), AccountError> {
        let Some(pending) = self.pending_email_change.as_ref() else {
            return Err(AccountError::InvalidToken);
        };

        if pending.token != token {
            return Err(AccountError::InvalidToken);
        }

        if pending.expires_at <= now {
            return Err(AccountError::TokenExpired);
        }

        self.email = pending.new_email.clone();
        self.pending_email_change = None;
        self.touch();
        Ok(())
    }

    /// Refresh the update timestamp.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now().to_rfc3339();
    }
}
