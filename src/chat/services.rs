use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use super::contacts::Conversation;
use crate::clock::{clock_label, now_millis};
use crate::state::AppState;
use crate::storage::{keys, load_json_or_default, put_json, KvStore};

pub const AUTO_REPLY: &str = "Sounds good! Catch you there.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: i64,
    pub sender: String,
    pub text: String,
    pub from_user: bool,
    pub time: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("message is empty")]
    EmptyMessage,
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

/// Opening lines of every thread the user has not written to yet.
pub fn seed_thread(contact: &Conversation) -> Vec<ChatMessage> {
    [
        (1, false, "Hey! Ready for today's workout?", "10:24 AM"),
        (2, true, "Absolutely, let's crush it!", "10:25 AM"),
        (3, false, "Awesome! Warm-up in 10 minutes?", "10:26 AM"),
    ]
    .into_iter()
    .map(|(id, from_user, text, time)| ChatMessage {
        id,
        sender: if from_user { "You".into() } else { contact.name.clone() },
        text: text.into(),
        from_user,
        time: time.into(),
    })
    .collect()
}

/// Chat threads per (user, contact). The auto-reply is a detached task
/// that fires once after `reply_delay`.
#[derive(Clone)]
pub struct ChatService {
    store: Arc<dyn KvStore>,
    lock: Arc<Mutex<()>>,
    reply_delay: Duration,
}

impl ChatService {
    pub fn new(store: Arc<dyn KvStore>, lock: Arc<Mutex<()>>, reply_delay: Duration) -> Self {
        Self { store, lock, reply_delay }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(
            state.store.clone(),
            state.write_lock.clone(),
            Duration::from_millis(state.config.chat_reply_delay_ms),
        )
    }

    pub async fn thread(&self, email: &str, contact: &Conversation) -> anyhow::Result<Vec<ChatMessage>> {
        let stored: Option<Vec<ChatMessage>> =
            load_json_or_default(self.store.as_ref(), &keys::chat(email, contact.id))
                .await
                .with_context(|| format!("load chat {email}/{}", contact.id))?;
        Ok(stored.unwrap_or_else(|| seed_thread(contact)))
    }

    async fn append(&self, email: &str, contact: &Conversation, mut msg: ChatMessage) -> anyhow::Result<ChatMessage> {
        let _guard = self.lock.lock().await;
        let mut thread = self.thread(email, contact).await?;
        let max = thread.iter().map(|m| m.id).max().unwrap_or(0);
        msg.id = msg.id.max(max + 1);
        thread.push(msg.clone());
        put_json(self.store.as_ref(), &keys::chat(email, contact.id), &thread)
            .await
            .with_context(|| format!("store chat {email}/{}", contact.id))?;
        Ok(msg)
    }

    /// Appends the user's message and schedules the contact's reply.
    pub async fn send(&self, email: &str, contact: &Conversation, text: &str) -> Result<ChatMessage, ChatError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        let outgoing = ChatMessage {
            id: now_millis(),
            sender: "You".into(),
            text: text.to_string(),
            from_user: true,
            time: clock_label(OffsetDateTime::now_utc()),
        };
        let outgoing = self.append(email, contact, outgoing).await?;
        info!(%email, contact_id = contact.id, "chat message sent");

        self.schedule_reply(email.to_string(), contact.clone());
        Ok(outgoing)
    }

    fn schedule_reply(&self, email: String, contact: Conversation) {
        let svc = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(svc.reply_delay).await;
            let reply = ChatMessage {
                id: now_millis(),
                sender: contact.name.clone(),
                text: AUTO_REPLY.into(),
                from_user: false,
                time: clock_label(OffsetDateTime::now_utc()),
            };
            match svc.append(&email, &contact, reply).await {
                Ok(_) => debug!(%email, contact_id = contact.id, "auto-reply delivered"),
                Err(e) => error!(error = %e, %email, contact_id = contact.id, "auto-reply failed"),
            }
        });
    }
}
