use anyhow::{Context, Result};
use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Shared Redis connection manager guarded by a Tokio mutex.
pub type SharedConnectionManager = Arc<Mutex<ConnectionManager>>;

/// Key/value store for session markers.
///
/// Values are opaque strings; callers decide how to serialize the
/// authenticated-user marker. Entries expire after the TTL given at `put`
/// time, so an absent entry means "no authenticated session".
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Look up a session marker. `Ok(None)` when the session id is unknown
    /// or the entry has expired.
    async fn get(&self, session_id: &str) -> Result<Option<String>>;

    /// Store a session marker with the given time-to-live.
    async fn put(&self, session_id: &str, value: &str, ttl: Duration) -> Result<()>;

    /// Remove a session marker. Removing an unknown id is not an error.
    async fn remove(&self, session_id: &str) -> Result<()>;
}

/// Redis-backed session store.
pub struct RedisSessionStore {
    manager: SharedConnectionManager,
    key_prefix: String,
}

impl RedisSessionStore {
    pub fn new(manager: SharedConnectionManager, key_prefix: impl Into<String>) -> Self {
        Self {
            manager,
            key_prefix: key_prefix.into(),
        }
    }

    fn key(&self, session_id: &str) -> String {
        format!("{}:{}", self.key_prefix, session_id)
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn get(&self, session_id: &str) -> Result<Option<String>> {
        let mut conn = self.manager.lock().await;
        let value: Option<String> = conn
            .get(self.key(session_id))
            .await
            .context("failed to read session from Redis")?;
        Ok(value)
    }

    async fn put(&self, session_id: &str, value: &str, ttl: Duration) -> Result<()> {
        let mut conn = self.manager.lock().await;
        let _: () = conn
            .set_ex(self.key(session_id), value, ttl.as_secs())
            .await
            .context("failed to write session to Redis")?;
        Ok(())
    }

    async fn remove(&self, session_id: &str) -> Result<()> {
        let mut conn = self.manager.lock().await;
        let _: () = conn
            .del(self.key(session_id))
            .await
            .context("failed to delete session from Redis")?;
        Ok(())
    }
}

/// In-process session store for tests and single-node development.
///
/// Expiry is enforced lazily on read.
#[derive(Default)]
pub struct MemorySessionStore {
    entries: StdMutex<HashMap<String, (String, Instant)>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, session_id: &str) -> Result<Option<String>> {
        let mut entries = self.entries.lock().unwrap();
        match entries.get(session_id) {
            Some((_, deadline)) if *deadline <= Instant::now() => {
                entries.remove(session_id);
                Ok(None)
            }
            Some((value, _)) => Ok(Some(value.clone())),
            None => Ok(None),
        }
    }

    async fn put(&self, session_id: &str, value: &str, ttl: Duration) -> Result<()> {
        let mut entries = self.entries.lock().unwrap();
        entries.insert(
            session_id.to_string(),
            (value.to_string(), Instant::now() + ttl),
        );
        Ok(())
    }

    async fn remove(&self, session_id: &str) -> Result<()> {
        let mut entries = self.entries.lock().unwrap();
        entries.remove(session_id);
        Ok(())
    }
}
