//! Session lifecycle: resolving a token to an identity, issuing tokens on
//! login, and ending sessions on logout.
//!
//! Resolution is read-only. Missing, expired or malformed session state reads
//! as [`Identity::Unauthenticated`]; store and directory failures are errors.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use super::accounts::map_user_persistence_error;
use super::ports::{SessionStore, SessionStoreError, UserRepository};
use super::{Error, Identity, SessionAttributes, SessionToken, UserId};

/// Default lifetime of a session.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Session operations on top of a [`SessionStore`] and the user directory.
#[derive(Clone)]
pub struct SessionService {
    store: Arc<dyn SessionStore>,
    users: Arc<dyn UserRepository>,
    ttl: Duration,
}

impl SessionService {
    pub fn new(store: Arc<dyn SessionStore>, users: Arc<dyn UserRepository>) -> Self {
        Self {
            store,
            users,
            ttl: DEFAULT_SESSION_TTL,
        }
    }

    /// Override the session lifetime.
    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Lifetime applied to sessions written by [`SessionService::establish`].
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Resolve the identity attached to `token`.
    pub async fn resolve(&self, token: Option<&SessionToken>) -> Result<Identity, Error> {
        let Some(token) = token else {
            return Ok(Identity::Unauthenticated);
        };

        let Some(attributes) = self
            .store
            .load(token)
            .await
            .map_err(map_session_store_error)?
        else {
            debug!("no live session for presented token");
            return Ok(Identity::Unauthenticated);
        };

        let Some(user_id) = attributes.user_id() else {
            return Ok(Identity::Unauthenticated);
        };

        let user = self
            .users
            .find_by_id(&user_id)
            .await
            .map_err(map_user_persistence_error)?;

        Ok(match user {
            Some(user) => Identity::Authenticated(user),
            None => {
                debug!(%user_id, "session refers to a user missing from the directory");
                Identity::Unauthenticated
            }
        })
    }

    /// Start an authenticated session for `user_id`.
    ///
    /// A fresh token is always issued; `previous`, when given, is discarded so
    /// a token planted before login never becomes authenticated.
    pub async fn establish(
        &self,
        previous: Option<&SessionToken>,
        user_id: &UserId,
    ) -> Result<SessionToken, Error> {
        if let Some(previous) = previous {
            self.store
                .delete(previous)
                .await
                .map_err(map_session_store_error)?;
        }

        let token = SessionToken::generate();
        let mut attributes = SessionAttributes::default();
        attributes.set_user_id(*user_id);
        self.store
            .save(&token, &attributes, self.ttl)
            .await
            .map_err(map_session_store_error)?;
        Ok(token)
    }

    /// Clear the session for `token` and commit before returning.
    ///
    /// An emptied session carries no state, so committing it removes the
    /// entry from the store.
    pub async fn terminate(&self, token: &SessionToken) -> Result<(), Error> {
        self.store
            .delete(token)
            .await
            .map_err(map_session_store_error)
    }
}

fn map_session_store_error(error: SessionStoreError) -> Error {
    match error {
        SessionStoreError::Connection { message } | SessionStoreError::Operation { message } => {
            Error::service_unavailable(format!("session store unavailable: {message}"))
        }
        SessionStoreError::Serialization { message } => {
            Error::internal(format!("session state unreadable: {message}"))
        }
    }
}
