//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use chrono::DateTime;

use super::routes;
use super::session_config::SessionCookieConfig;
use super::state::HttpState;
use crate::Trace;
use crate::domain::ports::PasswordHasher;
use crate::domain::{
    AccountService, DEFAULT_SESSION_TTL, Nickname, SessionAttributes, SessionService,
    SessionToken, User, UserAccount, UserId, UserName,
};
use crate::outbound::crypto::Argon2PasswordHasher;
use crate::outbound::memory::{InMemorySessionStore, InMemoryUserRepository};

pub(crate) const ANN_PASSWORD: &str = "password1";

/// In-memory adapters wired into an [`HttpState`].
pub(crate) struct TestContext {
    pub users: Arc<InMemoryUserRepository>,
    pub store: Arc<InMemorySessionStore>,
    pub state: HttpState,
}

impl TestContext {
    pub(crate) fn new() -> Self {
        let users = Arc::new(InMemoryUserRepository::default());
        let store = Arc::new(InMemorySessionStore::default());
        let accounts = Arc::new(AccountService::new(
            users.clone(),
            Arc::new(Argon2PasswordHasher::new()),
        ));
        let sessions = SessionService::new(store.clone(), users.clone());
        let state = HttpState::new(
            accounts.clone(),
            accounts,
            sessions,
            SessionCookieConfig::default().with_secure(false),
        );
        Self {
            users,
            store,
            state,
        }
    }

    /// Store a live session for `user_id` under `token`.
    pub(crate) async fn seed_session(&self, token: &SessionToken, user_id: u64) {
        let attributes: SessionAttributes = [("user_id", user_id.to_string())].into_iter().collect();
        self.store
            .insert(token.clone(), attributes, DEFAULT_SESSION_TTL)
            .await;
    }

    /// Application with the account routes mounted over this context.
    pub(crate) fn app(
        &self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        > + use<>,
    > {
        app_for(self.state.clone())
    }
}

/// Application with the account routes mounted over `state`.
pub(crate) fn app_for(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .wrap(Trace)
        .app_data(web::Data::new(state))
        .configure(routes::configure)
}

/// Token used by fixtures that pre-seed a session.
pub(crate) fn seeded_token() -> SessionToken {
    SessionToken::new("abc123").expect("fixture token")
}

/// Active account 42 named `ann_lee` with nickname `Ann`.
pub(crate) fn ann_account() -> UserAccount {
    let user = User::new(
        UserId::new(42).expect("fixture id"),
        UserName::new("ann_lee").expect("fixture user name"),
        Nickname::new("Ann").expect("fixture nickname"),
        DateTime::from_timestamp(1_700_000_000, 0).expect("fixture timestamp"),
    );
    let password_digest = Argon2PasswordHasher::new()
        .hash(ANN_PASSWORD)
        .expect("fixture digest");
    UserAccount {
        user,
        password_digest,
    }
}
