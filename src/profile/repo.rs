use anyhow::Context;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::storage::{get_json, keys, put_json, KvStore};

/// Served when a user never uploaded an avatar.
pub const DEFAULT_AVATAR: &str = "/static/avatars/default.jpeg";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub full_name: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub gender: String,
    pub age: Option<u32>,
    pub height_cm: Option<u32>,
    pub weight_kg: Option<u32>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Profile {
    pub fn new(full_name: &str) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            full_name: full_name.to_string(),
            bio: String::new(),
            gender: String::new(),
            age: None,
            height_cm: None,
            weight_kg: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub async fn load(store: &dyn KvStore, email: &str) -> anyhow::Result<Option<Profile>> {
        get_json(store, &keys::profile(email))
            .await
            .with_context(|| format!("load profile {email}"))
    }

    pub async fn save(&self, store: &dyn KvStore, email: &str) -> anyhow::Result<()> {
        put_json(store, &keys::profile(email), self)
            .await
            .with_context(|| format!("store profile {email}"))
    }
}

pub async fn load_avatar(store: &dyn KvStore, email: &str) -> anyhow::Result<Option<String>> {
    store
        .get(&keys::profile_image(email))
        .await
        .with_context(|| format!("load avatar {email}"))
}

/// Stored avatar, or [`DEFAULT_AVATAR`].
pub async fn avatar_or_default(store: &dyn KvStore, email: &str) -> anyhow::Result<String> {
    Ok(load_avatar(store, email)
        .await?
        .unwrap_or_else(|| DEFAULT_AVATAR.to_string()))
}

pub async fn save_avatar(store: &dyn KvStore, email: &str, data_url: &str) -> anyhow::Result<()> {
    store
        .set(&keys::profile_image(email), data_url)
        .await
        .with_context(|| format!("store avatar {email}"))
}

/// Name shown as post author: the email's local part with every
/// non-alphanumeric character turned into a space.
pub fn display_name(email: &str) -> String {
    lazy_static! {
        static ref NON_ALNUM: Regex = Regex::new(r"[^a-zA-Z0-9]").unwrap();
    }
    let local = email.split('@').next().unwrap_or_default();
    let name = NON_ALNUM.replace_all(local, " ");
    if name.is_empty() {
        "User".to_string()
    } else {
        name.into_owned()
    }
}
