//! Typed session layer over the session-store library.
//!
//! The store holds opaque strings; this module serializes the
//! authenticated-user marker and owns session id generation. Lookup failures
//! degrade to "no session" so a flaky store can never authenticate anyone.
use crate::error::{AppError, Result};
use crate::models::Role;
use serde::{Deserialize, Serialize};
use session_store::SessionStore;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// Name of the cookie carrying the session id.
pub const SESSION_COOKIE: &str = "session_id";

/// Authenticated-user marker stored per session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: Uuid,
    pub username: String,
    pub role: Role,
}

/// Handle to the session store shared across workers.
#[derive(Clone)]
pub struct Sessions {
    store: Arc<dyn SessionStore>,
    ttl: Duration,
}

impl Sessions {
    pub fn new(store: Arc<dyn SessionStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    /// Resolve a session id to its user marker, if any.
    pub async fn resolve(&self, session_id: &str) -> Option<SessionUser> {
        let raw = match self.store.get(session_id).await {
            Ok(value) => value?,
            Err(err) => {
                tracing::warn!("session lookup failed: {}", err);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(err) => {
                tracing::warn!("discarding undeserializable session marker: {}", err);
                None
            }
        }
    }

    /// Create a session for the given user and return its id.
    pub async fn create(&self, user: &SessionUser) -> Result<String> {
        let session_id = Uuid::new_v4().simple().to_string();
        let payload = serde_json::to_string(user)?;
        self.store
            .put(&session_id, &payload, self.ttl)
            .await
            .map_err(|err| AppError::Internal(format!("session write failed: {}", err)))?;
        Ok(session_id)
    }

    /// Destroy a session. Unknown ids are ignored.
    pub async fn destroy(&self, session_id: &str) -> Result<()> {
        self.store
            .remove(session_id)
            .await
            .map_err(|err| AppError::Internal(format!("session delete failed: {}", err)))
    }
}
