use axum::{extract::State, http::HeaderMap, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use inkwell_auth::{AuthSession, AuthUser};

use crate::{util::require_bearer, ApiError, AppState};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: Option<String>,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub token: String,
    pub user: UserResponse,
    pub expires_at: String,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub email: String,
}

impl From<AuthUser> for UserResponse {
    fn from(value: AuthUser) -> Self {
        Self {
            id: value.public_id,
            name: value.name,
            email: value.email,
        }
    }
}

impl From<inkwell_accounts::User> for UserResponse {
    fn from(value: inkwell_accounts::User) -> Self {
        Self {
            id: value.public_id,
            name: value.name,
            email: value.email,
        }
    }
}

pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let user = state
        .authenticator()
        .register_with_password(payload.name.as_deref(), &payload.email, &payload.password)
        .await?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    let session = state
        .authenticator()
        .login_with_password(&payload.email, &payload.password)
        .await?;
    let (user, session): (AuthUser, AuthSession) =
        state.authenticate(&session.token).await?;

    Ok(Json(SessionResponse {
        token: session.token,
        user: user.into(),
        expires_at: session.expires_at.to_rfc3339(),
    }))
}

pub async fn whoami(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<UserResponse>, ApiError> {
    let token = require_bearer(&headers)?;
    let (caller, _) = state.authenticate(&token).await?;

    let user = state.profiles().get_profile(caller.id).await?;
    Ok(Json(user.into()))
}
