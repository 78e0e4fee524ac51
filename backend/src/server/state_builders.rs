//! Adapter selection for the HTTP state.

use std::sync::Arc;

use tracing::info;

use accounts::domain::ports::{SessionStore, UserRepository};
use accounts::domain::{AccountService, SessionService};
use accounts::inbound::http::state::HttpState;
use accounts::outbound::crypto::Argon2PasswordHasher;
use accounts::outbound::memory::{InMemorySessionStore, InMemoryUserRepository};
use accounts::outbound::persistence::DieselUserRepository;

use super::ServerConfig;

fn user_repository(config: &ServerConfig) -> Arc<dyn UserRepository> {
    match &config.db_pool {
        Some(pool) => Arc::new(DieselUserRepository::new(pool.clone())),
        None => {
            info!("no database configured; using in-memory user directory");
            Arc::new(InMemoryUserRepository::default())
        }
    }
}

fn session_store(config: &ServerConfig) -> Arc<dyn SessionStore> {
    match &config.redis {
        Some(store) => Arc::new(store.clone()),
        None => {
            info!("no Redis configured; using in-memory session store");
            Arc::new(InMemorySessionStore::default())
        }
    }
}

/// Wire services over the configured adapters.
///
/// Called once per process; every worker shares the resulting state so the
/// in-memory adapters behave as a single store.
pub(crate) fn build_http_state(config: &ServerConfig) -> HttpState {
    let users = user_repository(config);
    let accounts = Arc::new(AccountService::new(
        users.clone(),
        Arc::new(Argon2PasswordHasher::new()),
    ));
    let sessions =
        SessionService::new(session_store(config), users).with_ttl(config.session_ttl);
    HttpState::new(accounts.clone(), accounts, sessions, config.cookie.clone())
}
