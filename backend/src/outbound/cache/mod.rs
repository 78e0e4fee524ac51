//! Redis-backed `SessionStore`.
//!
//! Each session is one string key holding the JSON attribute map, written
//! with `SET .. EX` so Redis expires it on its own. Logout is a `DEL`.
//! Connections come from a lazily filled `bb8` pool, so constructing the
//! store never touches the network.

use std::time::Duration;

use async_trait::async_trait;
use bb8_redis::RedisConnectionManager;
use bb8_redis::bb8::{Pool, RunError};
use bb8_redis::redis::{AsyncCommands, RedisError};
use tracing::debug;

use crate::domain::ports::{SessionStore, SessionStoreError};
use crate::domain::{SessionAttributes, SessionToken};

const KEY_PREFIX: &str = "session:";
const CHECKOUT_TIMEOUT: Duration = Duration::from_secs(5);

/// Session store shared between service instances through Redis.
#[derive(Clone)]
pub struct RedisSessionStore {
    pool: Pool<RedisConnectionManager>,
}

impl RedisSessionStore {
    /// Build a store for `redis_url`.
    ///
    /// # Errors
    /// Returns [`SessionStoreError::Connection`] when the URL is malformed.
    pub fn connect(redis_url: &str) -> Result<Self, SessionStoreError> {
        let manager = RedisConnectionManager::new(redis_url)
            .map_err(|err| SessionStoreError::connection(err.to_string()))?;
        let pool = Pool::builder()
            .connection_timeout(CHECKOUT_TIMEOUT)
            .build_unchecked(manager);
        Ok(Self { pool })
    }
}

fn session_key(token: &SessionToken) -> String {
    format!("{KEY_PREFIX}{}", token.as_ref())
}

fn map_pool_error(error: RunError<RedisError>) -> SessionStoreError {
    match error {
        RunError::User(err) => SessionStoreError::connection(err.to_string()),
        RunError::TimedOut => SessionStoreError::connection("timed out waiting for a connection"),
    }
}

fn map_redis_error(error: RedisError) -> SessionStoreError {
    debug!(kind = ?error.kind(), "redis command failed");
    if error.is_io_error() || error.is_connection_dropped() || error.is_timeout() {
        SessionStoreError::connection(error.to_string())
    } else {
        SessionStoreError::operation(error.to_string())
    }
}

// Redis rejects `EX 0`; a sub-second TTL still gets one second.
fn ttl_seconds(ttl: Duration) -> u64 {
    ttl.as_secs().max(1)
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn load(
        &self,
        token: &SessionToken,
    ) -> Result<Option<SessionAttributes>, SessionStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let raw: Option<String> = conn
            .get(session_key(token))
            .await
            .map_err(map_redis_error)?;
        raw.map(|json| {
            serde_json::from_str(&json)
                .map_err(|err| SessionStoreError::serialization(err.to_string()))
        })
        .transpose()
    }

    async fn save(
        &self,
        token: &SessionToken,
        attributes: &SessionAttributes,
        ttl: Duration,
    ) -> Result<(), SessionStoreError> {
        let json = serde_json::to_string(attributes)
            .map_err(|err| SessionStoreError::serialization(err.to_string()))?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        conn.set_ex::<_, _, ()>(session_key(token), json, ttl_seconds(ttl))
            .await
            .map_err(map_redis_error)
    }

    async fn delete(&self, token: &SessionToken) -> Result<(), SessionStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        conn.del::<_, ()>(session_key(token))
            .await
            .map_err(map_redis_error)
    }
}
