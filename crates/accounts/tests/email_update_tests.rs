//! End-to-end email-update workflow tests over the real SQLite store.

use chrono::{Duration, Utc};
use inkwell_accounts::{
    AccountError, EmailNotifier, EmailUpdateService, EmailUpdateSettings, ProfileService,
    SqliteUserStore, UserStore,
};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Row, SqlitePool,
};
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

type TestResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations");

#[derive(Clone, Default)]
struct RecordingNotifier {
    sent: Arc<Mutex<Vec<(String, String)>>>,
}

impl EmailNotifier for RecordingNotifier {
    async fn send(&self, to: &str, _subject: &str, html_body: &str) -> anyhow::Result<()> {
        self.sent
            .lock()
            .unwrap()
            .push((to.to_string(), html_body.to_string()));
        Ok(())
    }
}

struct TestContext {
    pool: SqlitePool,
    store: SqliteUserStore,
    notifier: RecordingNotifier,
    service: EmailUpdateService<SqliteUserStore, RecordingNotifier>,
    _temp_dir: TempDir,
}

impl TestContext {
    async fn new() -> TestResult<Self> {
        let temp_dir = TempDir::new()?;
        let db_path = temp_dir.path().join("accounts.sqlite");
        let db_url = format!("sqlite://{}", db_path.display());

        let options = SqliteConnectOptions::from_str(&db_url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        MIGRATOR.run(&pool).await?;

        let store = SqliteUserStore::new(pool.clone());
        let notifier = RecordingNotifier::default();
        let settings = EmailUpdateSettings::new("https://app.example.com", 3_600);
        let service = EmailUpdateService::new(store.clone(), notifier.clone(), settings);

        Ok(Self {
            pool,
            store,
            notifier,
            service,
            _temp_dir: temp_dir,
        })
    }

    async fn seed_user(&self, public_id: &str, email: &str) -> TestResult<i64> {
        let now = Utc::now().to_rfc3339();
        let result = sqlx::query(
            "INSERT INTO users (public_id, name, email, password_hash, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(public_id)
        .bind(Option::<&str>::None)
        .bind(email)
        .bind("$argon2id$placeholder")
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    async fn pending_token(&self, user_id: i64) -> TestResult<String> {
        let user = self
            .store
            .find_by_id(user_id)
            .await?
            .ok_or("user missing")?;
        Ok(user.pending_email_change.ok_or("no pending change")?.token)
    }
}

#[tokio::test]
async fn request_then_confirm_swaps_the_email_atomically() -> TestResult {
    let ctx = TestContext::new().await?;
    let id = ctx.seed_user("usr_1", "a@x.com").await?;

    ctx.service.request_update(id, "b@x.com").await?;

    // Pending triple persisted; primary address untouched.
    let row = sqlx::query(
        "SELECT email, pending_email, pending_email_token, pending_email_expires \
         FROM users WHERE id = ?",
    )
    .bind(id)
    .fetch_one(&ctx.pool)
    .await?;
    assert_eq!(row.get::<String, _>("email"), "a@x.com");
    assert_eq!(row.get::<Option<String>, _>("pending_email").as_deref(), Some("b@x.com"));
    assert!(row.get::<Option<String>, _>("pending_email_token").is_some());
    assert!(row.get::<Option<String>, _>("pending_email_expires").is_some());

    let token = ctx.pending_token(id).await?;
    let updated = ctx.service.confirm_update(id, &token).await?;
    assert_eq!(updated.email, "b@x.com");

    // Swap and clear landed in the same row write.
    let row = sqlx::query(
        "SELECT email, pending_email, pending_email_token, pending_email_expires \
         FROM users WHERE id = ?",
    )
    .bind(id)
    .fetch_one(&ctx.pool)
    .await?;
    assert_eq!(row.get::<String, _>("email"), "b@x.com");
    assert!(row.get::<Option<String>, _>("pending_email").is_none());
    assert!(row.get::<Option<String>, _>("pending_email_token").is_none());
    assert!(row.get::<Option<String>, _>("pending_email_expires").is_none());

    let sent = ctx.notifier.sent.lock().unwrap().clone();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, "b@x.com");
    assert!(sent[0].1.contains(&token));
    Ok(())
}

#[tokio::test]
async fn pending_request_survives_an_unrelated_profile_update() -> TestResult {
    let ctx = TestContext::new().await?;
    let id = ctx.seed_user("usr_1", "a@x.com").await?;

    ctx.service.request_update(id, "b@x.com").await?;
    let token = ctx.pending_token(id).await?;

    let profiles = ProfileService::new(ctx.store.clone(), ctx.notifier.clone());
    profiles.update_name(id, "Ada").await?;

    // The rename did not drop the outstanding request.
    let updated = ctx.service.confirm_update(id, &token).await?;
    assert_eq!(updated.email, "b@x.com");
    assert_eq!(updated.name.as_deref(), Some("Ada"));
    Ok(())
}

#[tokio::test]
async fn confirm_fails_when_the_pending_address_was_claimed_meanwhile() -> TestResult {
    let ctx = TestContext::new().await?;
    let id = ctx.seed_user("usr_1", "a@x.com").await?;
    ctx.seed_user("usr_2", "b@x.com").await?;

    ctx.service.request_update(id, "b@x.com").await?;
    let token = ctx.pending_token(id).await?;

    // The unique index arbitrates the race at confirm time.
    let err = ctx.service.confirm_update(id, &token).await.unwrap_err();
    assert!(matches!(err, AccountError::EmailTaken));

    let user = ctx.store.find_by_id(id).await?.ok_or("user missing")?;
    assert_eq!(user.email, "a@x.com");
    Ok(())
}

#[tokio::test]
async fn expired_token_round_trips_through_the_store() -> TestResult {
    let ctx = TestContext::new().await?;
    let id = ctx.seed_user("usr_1", "a@x.com").await?;

    ctx.service.request_update(id, "b@x.com").await?;

    let mut user = ctx.store.find_by_id(id).await?.ok_or("user missing")?;
    let token = {
        let pending = user.pending_email_change.as_mut().ok_or("no pending")?;
        pending.expires_at = Utc::now() - Duration::minutes(5);
        pending.token.clone()
    };
    ctx.store.save(&user).await?;

    let err = ctx.service.confirm_update(id, &token).await.unwrap_err();
    assert!(matches!(err, AccountError::TokenExpired));
    Ok(())
}

#[tokio::test]
async fn lookups_by_public_id_and_email_find_the_same_row() -> TestResult {
    let ctx = TestContext::new().await?;
    let id = ctx.seed_user("usr_1", "a@x.com").await?;

    let by_public = ctx
        .store
        .find_by_public_id("usr_1")
        .await?
        .ok_or("not found by public id")?;
    let by_email = ctx
        .store
        .find_by_email("a@x.com")
        .await?
        .ok_or("not found by email")?;

    assert_eq!(by_public.id, id);
    assert_eq!(by_email.id, id);
    assert!(ctx.store.find_by_email("nobody@x.com").await?.is_none());
    Ok(())
}
