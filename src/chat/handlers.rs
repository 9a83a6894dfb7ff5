use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{error, instrument, warn};

use super::contacts::{self, Conversation};
use super::dto::{ConversationQuery, SendMessageRequest, ThreadResponse};
use super::services::{ChatError, ChatMessage, ChatService};
use crate::{auth::jwt::AuthUser, state::AppState};

pub fn chat_routes() -> Router<AppState> {
    Router::new()
        .route("/conversations", get(list_conversations))
        .route(
            "/conversations/:id/messages",
            get(get_messages).post(send_message),
        )
}

fn contact_or_404(id: u32) -> Result<&'static Conversation, (StatusCode, String)> {
    contacts::find(id).ok_or_else(|| {
        warn!(contact_id = id, "unknown conversation");
        (StatusCode::NOT_FOUND, "Conversation not found".to_string())
    })
}

fn internal<E: std::fmt::Display>(e: E) -> (StatusCode, String) {
    error!(error = %e, "chat request failed");
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}

#[instrument(skip(_user))]
pub async fn list_conversations(
    _user: AuthUser,
    Query(query): Query<ConversationQuery>,
) -> Json<Vec<Conversation>> {
    Json(contacts::search(&query.q))
}

#[instrument(skip(state, user), fields(email = %user.email))]
pub async fn get_messages(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<u32>,
) -> Result<Json<ThreadResponse>, (StatusCode, String)> {
    let contact = contact_or_404(id)?;
    let messages = ChatService::from_state(&state)
        .thread(&user.email, contact)
        .await
        .map_err(internal)?;
    Ok(Json(ThreadResponse { contact: contact.clone(), messages }))
}

#[instrument(skip(state, user, payload), fields(email = %user.email))]
pub async fn send_message(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<u32>,
    Json(payload): Json<SendMessageRequest>,
) -> Result<(StatusCode, Json<ChatMessage>), (StatusCode, String)> {
    let contact = contact_or_404(id)?;
    let sent = ChatService::from_state(&state)
        .send(&user.email, contact, &payload.text)
        .await
        .map_err(|e| match e {
            ChatError::EmptyMessage => (StatusCode::BAD_REQUEST, "Message must not be empty".to_string()),
            ChatError::Store(e) => internal(e),
        })?;
    Ok((StatusCode::CREATED, Json(sent)))
}
