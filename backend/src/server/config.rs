//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::time::Duration;

use accounts::domain::DEFAULT_SESSION_TTL;
use accounts::inbound::http::session_config::SessionCookieConfig;
use accounts::outbound::cache::RedisSessionStore;
use accounts::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) cookie: SessionCookieConfig,
    pub(crate) session_ttl: Duration,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) redis: Option<RedisSessionStore>,
}

impl ServerConfig {
    /// Configuration using in-memory adapters and the default session TTL.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, cookie: SessionCookieConfig) -> Self {
        Self {
            bind_addr,
            cookie,
            session_ttl: DEFAULT_SESSION_TTL,
            db_pool: None,
            redis: None,
        }
    }

    #[must_use]
    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }

    /// Back the user directory with PostgreSQL.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Back the session store with Redis.
    #[must_use]
    pub fn with_redis(mut self, store: RedisSessionStore) -> Self {
        self.redis = Some(store);
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
