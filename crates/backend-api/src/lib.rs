mod error;
mod state;
mod util;

pub mod routes;

pub use error::{ApiError, ErrorResponse};
pub use state::AppState;

use axum::{
    http::header::{AUTHORIZATION, CONTENT_TYPE},
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health::health_check))
        // Auth routes
        .route("/api/auth/register", post(routes::auth::register))
        .route("/api/auth/login", post(routes::auth::login))
        .route("/api/auth/whoami", get(routes::auth::whoami))
        // Account routes
        .route("/api/users/:user_id/name", put(routes::users::update_name))
        .route(
            "/api/users/:user_id/email/request-update",
            put(routes::users::request_email_update),
        )
        .route(
            "/api/users/:user_id/email/confirm-update",
            put(routes::users::confirm_email_update),
        )
        .route(
            "/api/users/:user_id/password",
            put(routes::users::update_password),
        )
        // Post routes
        .route("/api/posts", get(routes::posts::list_posts))
        .route("/api/posts", post(routes::posts::create_post))
        .route("/api/posts/:post_id", get(routes::posts::get_post))
        .route("/api/posts/:post_id", put(routes::posts::update_post))
        .route("/api/posts/:post_id", delete(routes::posts::delete_post))
        .with_state(state)
        .layer(cors_layer())
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::PUT,
            axum::http::Method::PATCH,
            axum::http::Method::DELETE,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
}
