use axum::{
    extract::{Path, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    routing::{get, post},
    Json, Router,
};
use tracing::{error, instrument, warn};

use super::dto::{CreatePostRequest, FeedResponse};
use super::model::Post;
use super::store::FeedError;
use crate::{auth::jwt::AuthUser, state::AppState};

pub fn feed_routes() -> Router<AppState> {
    Router::new()
        .route("/feed", get(get_feed))
        .route("/feed/posts", post(create_post))
        .route("/feed/posts/:id/like", post(toggle_like))
}

fn feed_error(e: FeedError) -> (StatusCode, String) {
    match e {
        FeedError::Rejected(msg) => {
            warn!(%msg, "post rejected");
            (StatusCode::BAD_REQUEST, msg.to_string())
        }
        FeedError::NotFound(id) => (StatusCode::NOT_FOUND, format!("Post {id} not found")),
        FeedError::Store(e) => {
            error!(error = %e, "feed store failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

fn internal<E: std::fmt::Display>(e: E) -> (StatusCode, String) {
    error!(error = %e, "feed open failed");
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}

#[instrument(skip(state, user), fields(email = %user.email))]
pub async fn get_feed(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<FeedResponse>, (StatusCode, String)> {
    let feed = state
        .feeds
        .open(&state.store, &user.email)
        .await
        .map_err(internal)?;
    Ok(Json(FeedResponse {
        author: feed.author().to_string(),
        posts: feed.posts().to_vec(),
    }))
}

#[instrument(skip(state, user, payload), fields(email = %user.email))]
pub async fn create_post(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreatePostRequest>,
) -> Result<(StatusCode, HeaderMap, Json<Post>), (StatusCode, String)> {
    let mut feed = state
        .feeds
        .open(&state.store, &user.email)
        .await
        .map_err(internal)?;
    let post = feed
        .create_post(payload.into())
        .await
        .map_err(feed_error)?;

    let mut headers = HeaderMap::new();
    if let Ok(location) = HeaderValue::from_str(&format!("/api/v1/feed/posts/{}", post.id)) {
        headers.insert(axum::http::header::LOCATION, location);
    }
    Ok((StatusCode::CREATED, headers, Json(post)))
}

#[instrument(skip(state, user), fields(email = %user.email))]
pub async fn toggle_like(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<Post>, (StatusCode, String)> {
    let mut feed = state
        .feeds
        .open(&state.store, &user.email)
        .await
        .map_err(internal)?;
    let post = feed.toggle_like(id).await.map_err(feed_error)?;
    Ok(Json(post))
}
