use chrono::{Duration, Utc};
use inkwell_auth::{AuthError, Authenticator};
use inkwell_config::AuthConfig;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};
use std::str::FromStr;
use tempfile::TempDir;

type TestResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations");

fn short_ttl_config() -> AuthConfig {
    AuthConfig {
        session_ttl_seconds: 3_600,
        email_token_ttl_seconds: 3_600,
    }
}

struct TestContext {
    pool: SqlitePool,
    authenticator: Authenticator,
    _temp_dir: TempDir,
}

impl TestContext {
    async fn new() -> TestResult<Self> {
        let temp_dir = TempDir::new()?;
        let db_path = temp_dir.path().join("auth.sqlite");
        let db_url = format!("sqlite://{}", db_path.display());

        let options = SqliteConnectOptions::from_str(&db_url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        MIGRATOR.run(&pool).await?;

        let authenticator = Authenticator::new(pool.clone(), short_ttl_config());

        Ok(Self {
            pool,
            authenticator,
            _temp_dir: temp_dir,
        })
    }
}

#[tokio::test]
async fn register_persists_user_with_hashed_password() -> TestResult {
    let ctx = TestContext::new().await?;

    let user = ctx
        .authenticator
        .register_with_password(Some("Alice"), "alice@example.com", "s3cret")
        .await?;

    assert_eq!(user.email, "alice@example.com");
    assert_eq!(user.name.as_deref(), Some("Alice"));

    let stored: String = sqlx::query_scalar("SELECT password_hash FROM users WHERE id = ?")
        .bind(user.id)
        .fetch_one(&ctx.pool)
        .await?;

    assert_ne!(stored, "s3cret", "password must not be stored in clear");
    assert!(stored.starts_with("$argon2"));
    Ok(())
}

#[tokio::test]
async fn register_rejects_duplicate_email() -> TestResult {
    let ctx = TestContext::new().await?;

    ctx.authenticator
        .register_with_password(None, "bob@example.com", "pw-one")
        .await?;

    let result = ctx
        .authenticator
        .register_with_password(None, "bob@example.com", "pw-two")
        .await;

    assert!(matches!(result, Err(AuthError::UserExists)));
    Ok(())
}

#[tokio::test]
async fn login_issues_session_resolvable_back_to_user() -> TestResult {
    let ctx = TestContext::new().await?;

    let registered = ctx
        .authenticator
        .register_with_password(Some("Carol"), "carol@example.com", "hunter2!")
        .await?;

    let session = ctx
        .authenticator
        .login_with_password("carol@example.com", "hunter2!")
        .await?;

    assert!(session.expires_at > Utc::now());

    let (user, resolved) = ctx.authenticator.authenticate_token(&session.token).await?;
    assert_eq!(user.id, registered.id);
    assert_eq!(resolved.user_id, registered.id);
    Ok(())
}

#[tokio::test]
async fn login_rejects_wrong_password_and_unknown_email() -> TestResult {
    let ctx = TestContext::new().await?;

    ctx.authenticator
        .register_with_password(None, "dave@example.com", "correct")
        .await?;

    let wrong = ctx
        .authenticator
        .login_with_password("dave@example.com", "incorrect")
        .await;
    assert!(matches!(wrong, Err(AuthError::InvalidCredentials)));

    let unknown = ctx
        .authenticator
        .login_with_password("nobody@example.com", "whatever")
        .await;
    assert!(matches!(unknown, Err(AuthError::InvalidCredentials)));
    Ok(())
}

#[tokio::test]
async fn expired_sessions_are_rejected_and_removed() -> TestResult {
    let ctx = TestContext::new().await?;

    let user = ctx
        .authenticator
        .register_with_password(None, "eve@example.com", "password")
        .await?;

    let expired_at = (Utc::now() - Duration::hours(1)).to_rfc3339();
    sqlx::query(
        "INSERT INTO sessions (user_id, token, created_at, expires_at) VALUES (?, ?, ?, ?)",
    )
    .bind(user.id)
    .bind("stale-token")
    .bind(expired_at.clone())
    .bind(expired_at)
    .execute(&ctx.pool)
    .await?;

    let result = ctx.authenticator.authenticate_token("stale-token").await;
    assert!(matches!(result, Err(AuthError::SessionExpired)));

    let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sessions WHERE token = ?")
        .bind("stale-token")
        .fetch_one(&ctx.pool)
        .await?;
    assert_eq!(remaining, 0, "expired session should be purged");
    Ok(())
}

#[tokio::test]
async fn unknown_tokens_are_rejected() -> TestResult {
    let ctx = TestContext::new().await?;

    let result = ctx.authenticator.authenticate_token("no-such-token").await;
    assert!(matches!(result, Err(AuthError::SessionNotFound)));
    Ok(())
}
