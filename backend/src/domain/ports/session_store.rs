//! Port for the server-side session store.
//!
//! The store owns session state keyed by token. Callers load a snapshot,
//! modify it, and commit it back with `save`; `delete` removes the session
//! outright so the token resolves to nothing afterwards.

use std::time::Duration;

use async_trait::async_trait;

use crate::domain::{SessionAttributes, SessionToken};

use super::define_port_error;

define_port_error! {
    /// Errors raised by session store adapters.
    pub enum SessionStoreError {
        /// Store connection could not be established.
        Connection { message: String } => "session store connection failed: {message}",
        /// A read or write failed during execution.
        Operation { message: String } => "session store operation failed: {message}",
        /// Stored state could not be encoded or decoded.
        Serialization { message: String } => "session state serialisation failed: {message}",
    }
}

/// Key-value session backend.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Read the live attributes for `token`; expired sessions read as `None`.
    async fn load(
        &self,
        token: &SessionToken,
    ) -> Result<Option<SessionAttributes>, SessionStoreError>;

    /// Commit `attributes` for `token`, replacing any previous state.
    async fn save(
        &self,
        token: &SessionToken,
        attributes: &SessionAttributes,
        ttl: Duration,
    ) -> Result<(), SessionStoreError>;

    /// Remove the session; removing an unknown token succeeds.
    async fn delete(&self, token: &SessionToken) -> Result<(), SessionStoreError>;
}
