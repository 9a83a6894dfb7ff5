use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, info};

use super::model::{Post, PostDraft};
use super::seed::seed_posts;
use crate::clock::now_millis;
use crate::media;
use crate::profile::repo::{avatar_or_default, display_name};
use crate::storage::{keys, load_json_or_default, put_json, KvStore};

pub const MISSING_CAPTION_OR_IMAGE: &str = "Please add an image and caption to post.";

#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("{0}")]
    Rejected(&'static str),
    #[error("post {0} not found")]
    NotFound(i64),
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

/// Concatenates `stored ++ seed` and collapses duplicate ids. Each id keeps
/// the position of its first occurrence and the value of its last.
pub fn merge_posts(stored: Vec<Post>, seed: Vec<Post>) -> Vec<Post> {
    let mut order = Vec::new();
    let mut by_id: HashMap<i64, Post> = HashMap::new();
    for post in stored.into_iter().chain(seed) {
        let id = post.id;
        if by_id.insert(id, post).is_none() {
            order.push(id);
        }
    }
    order.into_iter().filter_map(|id| by_id.remove(&id)).collect()
}

/// One user's feed: seed posts merged with the posts they authored.
/// Changes to own posts are written through to the store; a failed write
/// leaves the feed as it was.
pub struct FeedStore {
    store: Arc<dyn KvStore>,
    email: String,
    author: String,
    avatar: String,
    posts: Vec<Post>,
    /// Posts by others whose like state differs from what was loaded.
    seed_flips: HashSet<i64>,
}

impl FeedStore {
    pub async fn load(store: Arc<dyn KvStore>, email: &str) -> anyhow::Result<Self> {
        let stored: Vec<Post> = load_json_or_default(store.as_ref(), &keys::posts(email))
            .await
            .with_context(|| format!("load posts {email}"))?;
        let avatar = avatar_or_default(store.as_ref(), email).await?;
        debug!(%email, stored = stored.len(), "feed loaded");

        Ok(Self {
            author: display_name(email),
            email: email.to_string(),
            avatar,
            posts: merge_posts(stored, seed_posts()),
            store,
            seed_flips: HashSet::new(),
        })
    }

    /// Replays like toggles made earlier on posts that are not persisted.
    pub fn with_seed_flips(mut self, flips: &HashSet<i64>) -> Self {
        for post in self
            .posts
            .iter_mut()
            .filter(|p| p.author != self.author && flips.contains(&p.id))
        {
            post.toggle_like();
            self.seed_flips.insert(post.id);
        }
        self
    }

    pub fn seed_flips(&self) -> &HashSet<i64> {
        &self.seed_flips
    }

    /// Newest first.
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub async fn create_post(&mut self, draft: PostDraft) -> Result<Post, FeedError> {
        let caption = draft.caption.trim();
        let image = draft.image.filter(|i| !i.trim().is_empty());
        let Some(image) = image else {
            return Err(FeedError::Rejected(MISSING_CAPTION_OR_IMAGE));
        };
        if caption.is_empty() {
            return Err(FeedError::Rejected(MISSING_CAPTION_OR_IMAGE));
        }
        if !media::is_image_data_url(&image) {
            return Err(FeedError::Rejected("Image must be an image data URL"));
        }

        let post = Post {
            id: self.next_id(),
            author: self.author.clone(),
            avatar: self.avatar.clone(),
            timestamp: "Just now".into(),
            content: caption.to_string(),
            image: Some(image),
            hashtags: Some(draft.hashtags),
            stats: None,
            likes: 0,
            comments: 0,
            is_liked: false,
        };
        self.posts.insert(0, post.clone());
        if let Err(e) = self.persist().await {
            self.posts.remove(0);
            return Err(e.into());
        }

        info!(email = %self.email, post_id = post.id, "post created");
        Ok(post)
    }

    pub async fn toggle_like(&mut self, id: i64) -> Result<Post, FeedError> {
        let idx = self
            .posts
            .iter()
            .position(|p| p.id == id)
            .ok_or(FeedError::NotFound(id))?;
        self.posts[idx].toggle_like();

        if self.posts[idx].author == self.author {
            if let Err(e) = self.persist().await {
                self.posts[idx].toggle_like();
                return Err(e.into());
            }
        } else if !self.seed_flips.remove(&id) {
            self.seed_flips.insert(id);
        }
        Ok(self.posts[idx].clone())
    }

    /// Millisecond timestamp, bumped past any id already in the feed.
    fn next_id(&self) -> i64 {
        let max = self.posts.iter().map(|p| p.id).max().unwrap_or(0);
        now_millis().max(max + 1)
    }

    /// Writes the posts authored by this user; nothing when there are none.
    async fn persist(&self) -> anyhow::Result<()> {
        let own: Vec<&Post> = self
            .posts
            .iter()
            .filter(|p| p.author == self.author)
            .collect();
        if own.is_empty() {
            return Ok(());
        }
        put_json(self.store.as_ref(), &keys::posts(&self.email), &own)
            .await
            .with_context(|| format!("store posts {}", self.email))
    }
}

struct Session {
    flips: Arc<Mutex<HashSet<i64>>>,
    last_used: Instant,
}

/// Per-user feed sessions. Only the like state of posts that are never
/// persisted is kept here; own posts are reloaded from the store on every
/// open. Sessions idle for longer than `idle_ttl` are dropped.
#[derive(Clone)]
pub struct FeedSessions {
    inner: Arc<Mutex<HashMap<String, Session>>>,
    idle_ttl: Duration,
}

impl FeedSessions {
    pub fn new(idle_ttl: Duration) -> Self {
        Self {
            inner: Arc::default(),
            idle_ttl,
        }
    }

    /// Loads the user's feed and holds their session lock until the
    /// returned [`OpenFeed`] is dropped.
    pub async fn open(&self, store: &Arc<dyn KvStore>, email: &str) -> anyhow::Result<OpenFeed> {
        let flips = {
            let mut sessions = self.inner.lock().await;
            let ttl = self.idle_ttl;
            // a session still referenced by an open feed is in use
            sessions.retain(|_, s| Arc::strong_count(&s.flips) > 1 || s.last_used.elapsed() < ttl);
            let session = sessions.entry(email.to_string()).or_insert_with(|| Session {
                flips: Arc::default(),
                last_used: Instant::now(),
            });
            session.last_used = Instant::now();
            session.flips.clone()
        };

        let flips = flips.lock_owned().await;
        let feed = FeedStore::load(store.clone(), email)
            .await?
            .with_seed_flips(&flips);
        Ok(OpenFeed { feed, flips })
    }

    pub async fn evict(&self, email: &str) {
        self.inner.lock().await.remove(email);
    }

    #[cfg(test)]
    async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }
}

/// A freshly loaded feed with exclusive access to the user's session.
pub struct OpenFeed {
    feed: FeedStore,
    flips: OwnedMutexGuard<HashSet<i64>>,
}

impl OpenFeed {
    pub fn author(&self) -> &str {
        self.feed.author()
    }

    pub fn posts(&self) -> &[Post] {
        self.feed.posts()
    }

    pub async fn create_post(&mut self, draft: PostDraft) -> Result<Post, FeedError> {
        self.feed.create_post(draft).await
    }

    pub async fn toggle_like(&mut self, id: i64) -> Result<Post, FeedError> {
        let post = self.feed.toggle_like(id).await?;
        *self.flips = self.feed.seed_flips().clone();
        Ok(post)
    }
}
