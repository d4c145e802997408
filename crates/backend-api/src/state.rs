use std::sync::Arc;

use inkwell_accounts::{
    EmailUpdateService, EmailUpdateSettings, Notifier, ProfileService, SqliteUserStore,
};
use inkwell_auth::{AuthSession, AuthUser, Authenticator};
use inkwell_config::AppConfig;
use inkwell_posts::{PostService, SqlitePostStore};
use sqlx::SqlitePool;

use crate::ApiError;

/// Shared handler state: the authenticator plus the account and post
/// services, all over the same pool.
#[derive(Clone)]
pub struct AppState {
    authenticator: Authenticator,
    email_updates: Arc<EmailUpdateService<SqliteUserStore, Notifier>>,
    profiles: Arc<ProfileService<SqliteUserStore, Notifier>>,
    posts: PostService,
}

impl AppState {
    pub fn new(pool: SqlitePool, config: &AppConfig, notifier: Notifier) -> Self {
        let authenticator = Authenticator::new(pool.clone(), config.auth.clone());
        let store = SqliteUserStore::new(pool.clone());
        let settings = EmailUpdateSettings::new(
            config.email.frontend_url.clone(),
            config.auth.email_token_ttl_seconds,
        );

        Self {
            authenticator,
            email_updates: Arc::new(EmailUpdateService::new(
                store.clone(),
                notifier.clone(),
                settings,
            )),
            profiles: Arc::new(ProfileService::new(store, notifier)),
            posts: PostService::new(SqlitePostStore::new(pool)),
        }
    }

    pub fn authenticator(&self) -> &Authenticator {
        &self.authenticator
    }

    pub fn email_updates(&self) -> &EmailUpdateService<SqliteUserStore, Notifier> {
        &self.email_updates
    }

    pub fn profiles(&self) -> &ProfileService<SqliteUserStore, Notifier> {
        &self.profiles
    }

    pub fn posts(&self) -> &PostService {
        &self.posts
    }

    pub async fn authenticate(&self, token: &str) -> Result<(AuthUser, AuthSession), ApiError> {
        self.authenticator
            .authenticate_token(token)
            .await
            .map_err(ApiError::from)
    }
}
