use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::{Deserialize, Serialize};
use inkwell_posts::{Post, PostChanges};

use crate::{util::require_bearer, ApiError, AppState};

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePostRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct PostResponse {
    pub id: String,
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub author: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Post> for PostResponse {
    fn from(value: Post) -> Self {
        Self {
            id: value.public_id,
            title: value.title,
            content: value.content,
            tags: value.tags,
            author: value.author,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

/// Entry in the post listing; content is truncated to a summary.
#[derive(Debug, Serialize)]
pub struct PostListEntry {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub tags: Vec<String>,
    pub author: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Post> for PostListEntry {
    fn from(value: Post) -> Self {
        Self {
            summary: value.summary(),
            id: value.public_id,
            title: value.title,
            tags: value.tags,
            author: value.author,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

pub async fn list_posts(
    State(state): State<AppState>,
) -> Result<Json<Vec<PostListEntry>>, ApiError> {
    let posts = state.posts().list_posts().await?;
    Ok(Json(posts.into_iter().map(PostListEntry::from).collect()))
}

pub async fn get_post(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
) -> Result<Json<PostResponse>, ApiError> {
    let post = state.posts().get_post(&post_id).await?;
    Ok(Json(post.into()))
}

pub async fn create_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreatePostRequest>,
) -> Result<(StatusCode, Json<PostResponse>), ApiError> {
    let token = require_bearer(&headers)?;
    let (user, _) = state.authenticate(&token).await?;

    let post = state
        .posts()
        .create_post(
            user.id,
            &user.public_id,
            &payload.title,
            &payload.content,
            payload.tags,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(post.into())))
}

pub async fn update_post(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
    headers: HeaderMap,
    Json(payload): Json<UpdatePostRequest>,
) -> Result<Json<PostResponse>, ApiError> {
    let token = require_bearer(&headers)?;
    let (user, _) = state.authenticate(&token).await?;

    let changes = PostChanges {
        title: payload.title,
        content: payload.content,
        tags: payload.tags,
    };
    let post = state.posts().update_post(&post_id, user.id, changes).await?;
    Ok(Json(post.into()))
}

pub async fn delete_post(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    let token = require_bearer(&headers)?;
    let (user, _) = state.authenticate(&token).await?;

    state.posts().delete_post(&post_id, user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
