use crate::config::AppConfig;
use crate::db::PgStore;
use crate::feed::store::FeedSessions;
use crate::storage::{KvStore, MemoryStore};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn KvStore>,
    pub config: Arc<AppConfig>,
    pub feeds: FeedSessions,
    /// Serializes read-modify-write cycles on meal and chat records.
    pub write_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let store = match config.database_url.as_deref() {
            Some(url) => {
                let pg = PgStore::connect(url).await?;
                if let Err(e) = pg.migrate().await {
                    tracing::warn!(error = %e, "migration failed; continuing");
                }
                Arc::new(pg) as Arc<dyn KvStore>
            }
            None => {
                tracing::warn!("DATABASE_URL not set; using in-memory store");
                Arc::new(MemoryStore::new()) as Arc<dyn KvStore>
            }
        };

        Ok(Self::from_parts(store, config))
    }

    pub fn from_parts(store: Arc<dyn KvStore>, config: Arc<AppConfig>) -> Self {
        // feed sessions idle past an access token's lifetime are dropped
        let feed_idle = Duration::from_secs(config.jwt.ttl_minutes.max(1) as u64 * 60);
        Self {
            store,
            config,
            feeds: FeedSessions::new(feed_idle),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    #[cfg(test)]
    pub fn fake() -> Self {
        let config = Arc::new(AppConfig {
            database_url: None,
            jwt: crate::config::JwtConfig {
                secret: "test".into(),
                issuer: "test-issuer".into(),
                audience: "test-aud".into(),
                ttl_minutes: 5,
                refresh_ttl_minutes: 60,
            },
            host: "127.0.0.1".into(),
            port: 0,
            calorie_goal: 2500,
            chat_reply_delay_ms: 10,
        });
        Self::from_parts(Arc::new(MemoryStore::new()), config)
    }
}
