use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use serde::{Deserialize, Serialize};
use inkwell_auth::AuthUser;

use crate::{routes::auth::UserResponse, util::require_bearer, ApiError, AppState};

#[derive(Debug, Deserialize)]
pub struct UpdateNameRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct RequestEmailUpdateRequest {
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct RequestEmailUpdateResponse {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct ConfirmEmailUpdateRequest {
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Serialize)]
pub struct UpdatePasswordResponse {
    pub user: UserResponse,
    pub notification_sent: bool,
}

/// Resolve the bearer token and check the path id names the caller.
/// Account mutations are strictly self-service.
async fn require_self(
    state: &AppState,
    headers: &HeaderMap,
    user_id: &str,
) -> Result<AuthUser, ApiError> {
    let token = require_bearer(headers)?;
    let (user, _) = state.authenticate(&token).await?;

    if user.public_id != user_id {
        return Err(ApiError::forbidden("cannot modify another user's account"));
    }
    Ok(user)
}

pub async fn update_name(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    headers: HeaderMap,
    Json(payload): Json<UpdateNameRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let caller = require_self(&state, &headers, &user_id).await?;

    let user = state.profiles().update_name(caller.id, &payload.name).await?;
    Ok(Json(user.into()))
}

pub async fn request_email_update(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    headers: HeaderMap,
    Json(payload): Json<RequestEmailUpdateRequest>,
) -> Result<Json<RequestEmailUpdateResponse>, ApiError> {
    let caller = require_self(&state, &headers, &user_id).await?;

    let ack = state
        .email_updates()
        .request_update(caller.id, &payload.email)
        .await?;
    Ok(Json(RequestEmailUpdateResponse {
        message: ack.message,
    }))
}

pub async fn confirm_email_update(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    headers: HeaderMap,
    Json(payload): Json<ConfirmEmailUpdateRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let caller = require_self(&state, &headers, &user_id).await?;

    let user = state
        .email_updates()
        .confirm_update(caller.id, &payload.token)
        .await?;
    Ok(Json(user.into()))
}

pub async fn update_password(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    headers: HeaderMap,
    Json(payload): Json<UpdatePasswordRequest>,
) -> Result<Json<UpdatePasswordResponse>, ApiError> {
    let caller = require_self(&state, &headers, &user_id).await?;

    let outcome = state
        .profiles()
        .update_password(caller.id, &payload.current_password, &payload.new_password)
        .await?;
    Ok(Json(UpdatePasswordResponse {
        user: outcome.user.into(),
        notification_sent: outcome.notification_sent,
    }))
}
