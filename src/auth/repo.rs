use anyhow::Context;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::repo_types::User;
use crate::storage::{get_json, keys, put_json_if_absent, KvStore};

impl User {
    /// Find an account by (already lowercased) email.
    pub async fn find_by_email(store: &dyn KvStore, email: &str) -> anyhow::Result<Option<User>> {
        get_json(store, &keys::user(email))
            .await
            .with_context(|| format!("load user {email}"))
    }

    /// Create a new account with a hashed password. `None` when the email is
    /// already registered; the existing record is left untouched.
    pub async fn create(store: &dyn KvStore, email: &str, password_hash: &str) -> anyhow::Result<Option<User>> {
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            username: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: OffsetDateTime::now_utc(),
        };
        let created = put_json_if_absent(store, &keys::user(email), &user)
            .await
            .with_context(|| format!("store user {email}"))?;
        Ok(created.then_some(user))
    }

    pub async fn delete(store: &dyn KvStore, email: &str) -> anyhow::Result<()> {
        store
            .remove(&keys::user(email))
            .await
            .with_context(|| format!("delete user {email}"))
    }
}

/// Marks the account as signed in by writing its current-user key.
pub async fn open_session(store: &dyn KvStore, user: &User) -> anyhow::Result<()> {
    store
        .set(&keys::current_user(user.id), &user.email)
        .await
        .context("open session")?;
    Ok(())
}

pub async fn close_session(store: &dyn KvStore, user_id: Uuid) -> anyhow::Result<()> {
    store
        .remove(&keys::current_user(user_id))
        .await
        .context("close session")?;
    Ok(())
}

pub async fn session_email(store: &dyn KvStore, user_id: Uuid) -> anyhow::Result<Option<String>> {
    store
        .get(&keys::current_user(user_id))
        .await
        .context("read session")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[tokio::test]
    async fn create_then_find_by_email() {
        let store = MemoryStore::new();
        assert!(User::find_by_email(&store, "ana@fit.io").await.unwrap().is_none());

        let created = User::create(&store, "ana@fit.io", "$argon2id$fake").await.unwrap().unwrap();
        let found = User::find_by_email(&store, "ana@fit.io").await.unwrap().unwrap();
        assert_eq!(found.id, created.id);
        assert_eq!(found.username, "ana@fit.io");
        assert_eq!(found.password_hash, "$argon2id$fake");
    }

    #[tokio::test]
    async fn create_never_overwrites_an_existing_account() {
        let store = MemoryStore::new();
        let first = User::create(&store, "ana@fit.io", "hash-one").await.unwrap().unwrap();
        assert!(User::create(&store, "ana@fit.io", "hash-two").await.unwrap().is_none());

        let found = User::find_by_email(&store, "ana@fit.io").await.unwrap().unwrap();
        assert_eq!(found.id, first.id);
        assert_eq!(found.password_hash, "hash-one");

        User::delete(&store, "ana@fit.io").await.unwrap();
        assert!(User::find_by_email(&store, "ana@fit.io").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn session_open_and_close() {
        let store = MemoryStore::new();
        let user = User::create(&store, "ana@fit.io", "h").await.unwrap().unwrap();

        open_session(&store, &user).await.unwrap();
        assert_eq!(
            session_email(&store, user.id).await.unwrap().as_deref(),
            Some("ana@fit.io")
        );

        close_session(&store, user.id).await.unwrap();
        assert!(session_email(&store, user.id).await.unwrap().is_none());
    }
}
