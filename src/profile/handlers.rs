use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use tracing::{error, info, instrument, warn};

use super::dto::{AvatarRequest, ProfileResponse, ProfileUpdateRequest};
use super::{repo, services};
use crate::{auth::jwt::AuthUser, media, state::AppState};

pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/profile", get(get_profile).patch(patch_profile))
        .route("/profile/avatar", put(put_avatar))
}

#[instrument(skip(state, user), fields(email = %user.email))]
pub async fn get_profile(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ProfileResponse>, (StatusCode, String)> {
    match services::load_profile(state.store.as_ref(), &user.email).await {
        Ok(Some(p)) => Ok(Json(p)),
        Ok(None) => Err((StatusCode::NOT_FOUND, "Profile not found".into())),
        Err(e) => {
            error!(error = %e, "load_profile failed");
            Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}

#[instrument(skip(state, user, payload), fields(email = %user.email))]
pub async fn patch_profile(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<ProfileUpdateRequest>,
) -> Result<Json<ProfileResponse>, (StatusCode, String)> {
    if let Err(msg) = payload.validate() {
        warn!(%msg, "profile update rejected");
        return Err((StatusCode::BAD_REQUEST, msg));
    }

    match services::update_profile(state.store.as_ref(), &user.email, payload).await {
        Ok(Some(p)) => {
            info!("profile updated");
            Ok(Json(p))
        }
        Ok(None) => Err((StatusCode::NOT_FOUND, "Profile not found".into())),
        Err(e) => {
            error!(error = %e, "update_profile failed");
            Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}

#[instrument(skip(state, user, payload), fields(email = %user.email))]
pub async fn put_avatar(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<AvatarRequest>,
) -> Result<Json<ProfileResponse>, (StatusCode, String)> {
    if !media::is_image_data_url(&payload.image) {
        warn!("avatar is not an image data URL");
        return Err((StatusCode::BAD_REQUEST, "Avatar must be an image data URL".into()));
    }

    repo::save_avatar(state.store.as_ref(), &user.email, &payload.image)
        .await
        .map_err(|e| {
            error!(error = %e, "save_avatar failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?;

    info!("avatar updated");
    get_profile(State(state), user).await
}
