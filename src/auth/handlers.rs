use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{error, info, instrument, warn};

use crate::{
    auth::{
        dto::{
            AuthResponse, LoginRequest, MessageResponse, PublicUser, RefreshRequest,
            SessionResponse, SignupRequest,
        },
        jwt::{AuthUser, JwtKeys, MaybeAuthUser},
        password::{check_password_policy, hash_password, verify_password},
        repo,
        repo_types::User,
    },
    profile::{repo::Profile, services::load_profile},
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
        .route("/auth/logout", post(logout))
        .route("/auth/session", get(session))
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn internal<E: std::fmt::Display>(e: E) -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}

/// Opens a session for `user` and issues a token pair.
async fn sign_in(state: &AppState, user: User, message: &str) -> Result<AuthResponse, (StatusCode, String)> {
    let keys = JwtKeys::from_ref(state);
    let access_token = keys.sign_access(user.id, &user.email).map_err(|e| {
        error!(error = %e, "jwt sign access failed");
        internal(e)
    })?;
    let refresh_token = keys.sign_refresh(user.id, &user.email).map_err(|e| {
        error!(error = %e, "jwt sign refresh failed");
        internal(e)
    })?;

    repo::open_session(state.store.as_ref(), &user).await.map_err(|e| {
        error!(error = %e, "open_session failed");
        internal(e)
    })?;

    Ok(AuthResponse {
        message: message.to_string(),
        access_token,
        refresh_token,
        user: PublicUser {
            id: user.id,
            email: user.email,
            username: user.username,
        },
    })
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    Json(mut payload): Json<SignupRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), (StatusCode, String)> {
    payload.email = payload.email.trim().to_lowercase();
    let full_name = payload.full_name.trim().to_string();

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err((StatusCode::BAD_REQUEST, "Invalid email".into()));
    }
    if full_name.is_empty() || full_name.chars().count() > 255 {
        warn!("invalid full name");
        return Err((StatusCode::BAD_REQUEST, "Full name is required".into()));
    }
    if let Err(reason) = check_password_policy(&payload.password) {
        warn!(reason, "password rejected");
        return Err((StatusCode::BAD_REQUEST, reason.into()));
    }

    let store = state.store.as_ref();
    match User::find_by_email(store, &payload.email).await {
        Ok(None) => {}
        Ok(Some(_)) => {
            warn!(email = %payload.email, "email already registered");
            return Err((StatusCode::CONFLICT, "Email already registered.".into()));
        }
        Err(e) => {
            error!(error = %e, "find_by_email failed");
            return Err(internal(e));
        }
    }

    let hash = hash_password(&payload.password).map_err(|e| {
        error!(error = %e, "hash_password failed");
        internal(e)
    })?;

    // the existence check above is only a fast path; the insert decides
    let user = match User::create(store, &payload.email, &hash).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            warn!(email = %payload.email, "email registered concurrently");
            return Err((StatusCode::CONFLICT, "Email already registered.".into()));
        }
        Err(e) => {
            error!(error = %e, "create user failed");
            return Err(internal(e));
        }
    };
    if let Err(e) = Profile::new(&full_name).save(store, &user.email).await {
        error!(error = %e, "create profile failed");
        if let Err(undo) = User::delete(store, &user.email).await {
            error!(error = %undo, "rollback of user without profile failed");
        }
        return Err(internal(e));
    }

    info!(user_id = %user.id, email = %user.email, "user signed up");
    let body = sign_in(&state, user, "Signup successful").await?;
    Ok((StatusCode::CREATED, Json(body)))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, (StatusCode, String)> {
    payload.email = payload.email.trim().to_lowercase();

    let user = match User::find_by_email(state.store.as_ref(), &payload.email).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            warn!(email = %payload.email, "login unknown email");
            return Err((StatusCode::UNAUTHORIZED, "Invalid credentials".into()));
        }
        Err(e) => {
            error!(error = %e, "find_by_email failed");
            return Err(internal(e));
        }
    };

    let ok = verify_password(&payload.password, &user.password_hash).map_err(|e| {
        error!(error = %e, "verify_password failed");
        internal(e)
    })?;
    if !ok {
        warn!(email = %payload.email, user_id = %user.id, "login invalid password");
        return Err((StatusCode::UNAUTHORIZED, "Invalid credentials".into()));
    }

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok(Json(sign_in(&state, user, "Login successful").await?))
}

#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<AuthResponse>, (StatusCode, String)> {
    let keys = JwtKeys::from_ref(&state);
    let claims = keys
        .verify_refresh(&payload.refresh_token)
        .map_err(|e| (StatusCode::UNAUTHORIZED, e.to_string()))?;

    let store = state.store.as_ref();
    let open = repo::session_email(store, claims.sub).await.map_err(internal)?;
    if open.as_deref() != Some(claims.email.as_str()) {
        warn!(user_id = %claims.sub, "refresh without open session");
        return Err((StatusCode::UNAUTHORIZED, "Session expired".into()));
    }

    let user = User::find_by_email(store, &claims.email)
        .await
        .map_err(internal)?
        .ok_or((StatusCode::UNAUTHORIZED, "User not found".to_string()))?;

    Ok(Json(sign_in(&state, user, "Token refreshed").await?))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn logout(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<MessageResponse>, (StatusCode, String)> {
    repo::close_session(state.store.as_ref(), user.id)
        .await
        .map_err(|e| {
            error!(error = %e, "close_session failed");
            internal(e)
        })?;
    state.feeds.evict(&user.email).await;

    info!("user logged out");
    Ok(Json(MessageResponse {
        message: "Logged out".into(),
    }))
}

#[instrument(skip(state, user))]
pub async fn session(
    State(state): State<AppState>,
    MaybeAuthUser(user): MaybeAuthUser,
) -> Json<SessionResponse> {
    let Some(user) = user else {
        return Json(SessionResponse { authenticated: false, profile: None });
    };
    match load_profile(state.store.as_ref(), &user.email).await {
        Ok(Some(profile)) => Json(SessionResponse {
            authenticated: true,
            profile: Some(profile),
        }),
        Ok(None) => Json(SessionResponse { authenticated: false, profile: None }),
        Err(e) => {
            error!(error = %e, "session profile lookup failed");
            Json(SessionResponse { authenticated: false, profile: None })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::FailingWrites;
    use std::sync::Arc;

    #[test]
    fn email_pattern() {
        assert!(is_valid_email("ana@fit.io"));
        assert!(is_valid_email("a.b+c@mail.example.com"));
        assert!(!is_valid_email("ana@fit"));
        assert!(!is_valid_email("ana fit@io.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn session_response_hides_missing_profile() {
        let json = serde_json::to_value(SessionResponse { authenticated: false, profile: None }).unwrap();
        assert_eq!(json, serde_json::json!({ "authenticated": false }));
    }

    #[tokio::test]
    async fn failed_profile_write_leaves_no_account_behind() {
        let fake = AppState::fake();
        let store = Arc::new(FailingWrites::new("fitcraftProfile:"));
        let state = AppState::from_parts(store.clone(), fake.config.clone());

        let req = SignupRequest {
            full_name: "Ana Silva".into(),
            email: "ana@fit.io".into(),
            password: "s3cret-pass".into(),
        };
        let err = signup(State(state), Json(req)).await.unwrap_err();
        assert_eq!(err.0, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(User::find_by_email(store.as_ref(), "ana@fit.io").await.unwrap().is_none());
    }
}
