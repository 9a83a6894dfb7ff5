use serde::{Deserialize, Serialize};

use super::contacts::Conversation;
use super::services::ChatMessage;

#[derive(Debug, Default, Deserialize)]
pub struct ConversationQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct ThreadResponse {
    pub contact: Conversation,
    pub messages: Vec<ChatMessage>,
}
