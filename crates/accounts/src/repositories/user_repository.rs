//! SQLite-backed user store.

use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};

use super::UserStore;
use crate::entities::{PendingEmailChange, User};
use crate::types::{AccountError, AccountResult};

const USER_COLUMNS: &str = "id, public_id, name, email, password_hash, \
     pending_email, pending_email_token, pending_email_expires, created_at, updated_at";

/// Repository over the `users` table.
#[derive(Clone)]
pub struct SqliteUserStore {
    pool: SqlitePool,
}

impl SqliteUserStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn fetch_where(&self, clause: &str, bind: &str) -> AccountResult<Option<User>> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE {clause}");
        let row = sqlx::query(&query)
            .bind(bind)
            .fetch_optional(&self.pool)
            .await?;

        row.map(map_user_row).transpose()
    }
}

impl UserStore for SqliteUserStore {
    async fn find_by_id(&self, id: i64) -> AccountResult<Option<User>> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?");
        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(map_user_row).transpose()
    }

    async fn find_by_public_id(&self, public_id: &str) -> AccountResult<Option<User>> {
        self.fetch_where("public_id = ?", public_id).await
    }

    async fn find_by_email(&self, email: &str) -> AccountResult<Option<User>> {
        self.fetch_where("email = ?", email).await
    }

    /// Persist every mutable field in one statement. The pending triple is
    /// written (or nulled) alongside name/email/hash, so a save can never
    /// leave the email swapped but the pending record behind, or vice versa.
    async fn save(&self, user: &User) -> AccountResult<User> {
        let (pending_email, pending_token, pending_expires) = match &user.pending_email_change {
            Some(pending) => (
                Some(pending.new_email.as_str()),
                Some(pending.token.as_str()),
                Some(pending.expires_at.to_rfc3339()),
            ),
            None => (None, None, None),
        };

        let result = sqlx::query(
            "UPDATE users SET name = ?, email = ?, password_hash = ?, \
             pending_email = ?, pending_email_token = ?, pending_email_expires = ?, \
             updated_at = ? WHERE id = ?",
        )
        .bind(user.name.as_deref())
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(pending_email)
        .bind(pending_token)
        .bind(pending_expires)
        .bind(&user.updated_at)
        .bind(user.id)
        .execute(&self.pool)
        .await
        .map_err(map_save_error)?;

        if result.rows_affected() == 0 {
            return Err(AccountError::UserNotFound);
        }

        self.find_by_id(user.id)
            .await?
            .ok_or(AccountError::UserNotFound)
    }
}

fn map_save_error(error: sqlx::Error) -> AccountError {
    if let sqlx::Error::Database(db_error) = &error {
        if db_error.message().contains("UNIQUE constraint failed")
            && db_error.message().contains("email")
        {
            return AccountError::EmailTaken;
        }
    }
    AccountError::Database(error.to_string())
}

fn map_user_row(row: sqlx::sqlite::SqliteRow) -> AccountResult<User> {
    let pending_email: Option<String> = row
        .try_get("pending_email")
        .map_err(|e| AccountError::Database(e.to_string()))?;
    let pending_token: Option<String> = row
        .try_get("pending_email_token")
        .map_err(|e| AccountError::Database(e.to_string()))?;
    let pending_expires: Option<String> = row
        .try_get("pending_email_expires")
        .map_err(|e| AccountError::Database(e.to_string()))?;

    let pending_email_change = match (pending_email, pending_token, pending_expires) {
        (Some(new_email), Some(token), Some(expires)) => {
            let expires_at = DateTime::parse_from_rfc3339(&expires)
                .map_err(|e| AccountError::Database(format!("bad pending expiry: {e}")))?
                .with_timezone(&Utc);
            Some(PendingEmailChange {
                new_email,
                token,
                expires_at,
            })
        }
        // A partially written triple would mean a broken invariant; treat
        // it as Idle rather than guessing.
        _ => None,
    };

    Ok(User {
        id: row
            .try_get("id")
            .map_err(|e| AccountError::Database(e.to_string()))?,
        public_id: row
            .try_get("public_id")
            .map_err(|e| AccountError::Database(e.to_string()))?,
        name: row
            .try_get("name")
            .map_err(|e| AccountError::Database(e.to_string()))?,
        email: row
            .try_get("email")
            .map_err(|e| AccountError::Database(e.to_string()))?,
        password_hash: row
            .try_get("password_hash")
            .map_err(|e| AccountError::Database(e.to_string()))?,
        pending_email_change,
        created_at: row
            .try_get("created_at")
            .map_err(|e| AccountError::Database(e.to_string()))?,
        updated_at: row
            .try_get("updated_at")
            .map_err(|e| AccountError::Database(e.to_string()))?,
    })
}
