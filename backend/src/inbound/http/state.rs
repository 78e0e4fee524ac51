//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use super::session_config::SessionCookieConfig;
use crate::domain::SessionService;
use crate::domain::ports::{LoginService, RegistrationService};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub registration: Arc<dyn RegistrationService>,
    pub sessions: SessionService,
    pub cookie: SessionCookieConfig,
}

impl HttpState {
    /// Bundle the handler dependencies.
    ///
    /// The cookie `Max-Age` is aligned with the session service TTL so the
    /// browser forgets the token when the server does.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use accounts::domain::{AccountService, SessionService};
    /// use accounts::inbound::http::session_config::SessionCookieConfig;
    /// use accounts::inbound::http::state::HttpState;
    /// use accounts::outbound::crypto::Argon2PasswordHasher;
    /// use accounts::outbound::memory::{InMemorySessionStore, InMemoryUserRepository};
    ///
    /// let users = Arc::new(InMemoryUserRepository::default());
    /// let accounts = Arc::new(AccountService::new(
    ///     users.clone(),
    ///     Arc::new(Argon2PasswordHasher::default()),
    /// ));
    /// let sessions = SessionService::new(Arc::new(InMemorySessionStore::default()), users);
    /// let state = HttpState::new(
    ///     accounts.clone(),
    ///     accounts,
    ///     sessions,
    ///     SessionCookieConfig::default(),
    /// );
    /// assert_eq!(state.cookie.name(), "session");
    /// ```
    pub fn new(
        login: Arc<dyn LoginService>,
        registration: Arc<dyn RegistrationService>,
        sessions: SessionService,
        cookie: SessionCookieConfig,
    ) -> Self {
        let cookie = cookie.with_max_age(sessions.ttl());
        Self {
            login,
            registration,
            sessions,
            cookie,
        }
    }
}
