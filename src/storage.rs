use std::collections::{hash_map::Entry, HashMap};

use axum::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::RwLock;
use tracing::warn;

/// Failures of a key-value backend. Missing keys are not errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("encode value for {key}: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("decode value for {key}: {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// String key-value storage, the only persistence the service has.
#[async_trait]
pub trait KvStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    /// Writes only when `key` is absent; `false` means it was already taken.
    async fn insert_if_absent(&self, key: &str, value: &str) -> Result<bool, StoreError>;
    async fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Deterministic per-user keys.
pub mod keys {
    use uuid::Uuid;

    pub fn current_user(user_id: Uuid) -> String {
        format!("fitcraftCurrentUser:{user_id}")
    }

    pub fn profile_image(email: &str) -> String {
        format!("fitcraftProfileImage:{email}")
    }

    pub fn posts(email: &str) -> String {
        format!("fitcraftPosts:{email}")
    }

    pub fn user(email: &str) -> String {
        format!("fitcraftUser:{email}")
    }

    pub fn profile(email: &str) -> String {
        format!("fitcraftProfile:{email}")
    }

    pub fn meals(email: &str) -> String {
        format!("fitcraftMeals:{email}")
    }

    pub fn custom_foods(email: &str) -> String {
        format!("fitcraftCustomFoods:{email}")
    }

    pub fn chat(email: &str, contact_id: u32) -> String {
        format!("fitcraftChat:{email}:{contact_id}")
    }
}

/// Strict read: a stored value that does not parse is an error.
pub async fn get_json<T: DeserializeOwned>(
    store: &dyn KvStore,
    key: &str,
) -> Result<Option<T>, StoreError> {
    let Some(raw) = store.get(key).await? else {
        return Ok(None);
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| StoreError::Decode { key: key.to_string(), source })
}

/// Lenient read: missing or malformed data reads as `T::default()`.
pub async fn load_json_or_default<T: DeserializeOwned + Default>(
    store: &dyn KvStore,
    key: &str,
) -> Result<T, StoreError> {
    match get_json(store, key).await {
        Ok(v) => Ok(v.unwrap_or_default()),
        Err(StoreError::Decode { key, source }) => {
            warn!(%key, error = %source, "discarding malformed stored value");
            Ok(T::default())
        }
        Err(e) => Err(e),
    }
}

fn encode<T: Serialize + ?Sized>(key: &str, value: &T) -> Result<String, StoreError> {
    serde_json::to_string(value).map_err(|source| StoreError::Encode { key: key.to_string(), source })
}

pub async fn put_json<T: Serialize + ?Sized>(
    store: &dyn KvStore,
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    store.set(key, &encode(key, value)?).await
}

/// Like [`put_json`] but never overwrites; `false` when the key exists.
pub async fn put_json_if_absent<T: Serialize + ?Sized>(
    store: &dyn KvStore,
    key: &str,
    value: &T,
) -> Result<bool, StoreError> {
    store.insert_if_absent(key, &encode(key, value)?).await
}

/// Process-local store, used when no database is configured and in tests.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn insert_if_absent(&self, key: &str, value: &str) -> Result<bool, StoreError> {
        match self.entries.write().await.entry(key.to_string()) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(value.to_string());
                Ok(true)
            }
        }
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

/// Test double: a [`MemoryStore`] whose writes fail for keys under `prefix`.
#[cfg(test)]
pub struct FailingWrites {
    pub inner: MemoryStore,
    pub prefix: &'static str,
}

#[cfg(test)]
impl FailingWrites {
    pub fn new(prefix: &'static str) -> Self {
        Self { inner: MemoryStore::new(), prefix }
    }

    fn check(&self, key: &str) -> Result<(), StoreError> {
        if key.starts_with(self.prefix) {
            return Err(StoreError::Database(sqlx::Error::PoolClosed));
        }
        Ok(())
    }
}

#[cfg(test)]
#[async_trait]
impl KvStore for FailingWrites {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.check(key)?;
        self.inner.set(key, value).await
    }

    async fn insert_if_absent(&self, key: &str, value: &str) -> Result<bool, StoreError> {
        self.check(key)?;
        self.inner.insert_if_absent(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.inner.remove(key).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_store_set_get_remove() {
        let store = MemoryStore::new();
        assert_eq!(store.get("a").await.unwrap(), None);

        store.set("a", "1").await.unwrap();
        store.set("a", "2").await.unwrap();
        assert_eq!(store.get("a").await.unwrap().as_deref(), Some("2"));

        store.remove("a").await.unwrap();
        assert_eq!(store.get("a").await.unwrap(), None);
    }

    #[tokio::test]
    async fn lenient_read_treats_garbage_as_default() {
        let store = MemoryStore::new();
        store.set("k", "{not json").await.unwrap();

        let v: Vec<u32> = load_json_or_default(&store, "k").await.unwrap();
        assert!(v.is_empty());

        let err = get_json::<Vec<u32>>(&store, "k").await.unwrap_err();
        assert!(matches!(err, StoreError::Decode { .. }));
    }

    #[tokio::test]
    async fn insert_if_absent_keeps_the_first_value() {
        let store = MemoryStore::new();
        assert!(put_json_if_absent(&store, "u", &"first").await.unwrap());
        assert!(!put_json_if_absent(&store, "u", &"second").await.unwrap());
        let v: Option<String> = get_json(&store, "u").await.unwrap();
        assert_eq!(v.as_deref(), Some("first"));
    }

    #[tokio::test]
    async fn put_then_get_json() {
        let store = MemoryStore::new();
        put_json(&store, "nums", &vec![1, 2, 3]).await.unwrap();
        let v: Option<Vec<u32>> = get_json(&store, "nums").await.unwrap();
        assert_eq!(v, Some(vec![1, 2, 3]));
    }

    #[test]
    fn keys_are_per_user() {
        assert_eq!(keys::posts("a@b.io"), "fitcraftPosts:a@b.io");
        assert_eq!(keys::profile_image("a@b.io"), "fitcraftProfileImage:a@b.io");
        assert_ne!(keys::meals("a@b.io"), keys::meals("c@d.io"));
        assert_eq!(keys::chat("a@b.io", 3), "fitcraftChat:a@b.io:3");
    }
}
