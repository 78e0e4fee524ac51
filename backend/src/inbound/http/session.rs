//! Session helpers to keep HTTP handlers free of cookie plumbing.
//!
//! [`SessionContext`] pulls the session token out of the request cookie so
//! handlers only deal with domain operations on [`SessionService`].

use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::{Ready, ready};
use tracing::debug;

use super::session_config::DEFAULT_COOKIE_NAME;
use super::state::HttpState;
use crate::domain::{Error, SessionService, SessionToken, User};

/// Message returned when a request needs a logged-in user.
pub const LOGIN_REQUIRED_MESSAGE: &str = "login required";

/// Session token presented with the current request, if any.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    token: Option<SessionToken>,
}

impl SessionContext {
    pub fn new(token: Option<SessionToken>) -> Self {
        Self { token }
    }

    /// Token carried by the request cookie.
    pub fn token(&self) -> Option<&SessionToken> {
        self.token.as_ref()
    }

    /// Resolve the session to a user or fail with `401`.
    pub async fn require_user(&self, sessions: &SessionService) -> Result<User, Error> {
        sessions
            .resolve(self.token())
            .await?
            .into_user()
            .ok_or_else(|| Error::unauthorized(LOGIN_REQUIRED_MESSAGE))
    }

    fn from_http_request(req: &HttpRequest) -> Self {
        let name = req
            .app_data::<web::Data<HttpState>>()
            .map_or(DEFAULT_COOKIE_NAME, |state| state.cookie.name());
        let Some(cookie) = req.cookie(name) else {
            return Self::default();
        };
        match SessionToken::new(cookie.value()) {
            Ok(token) => Self::new(Some(token)),
            Err(error) => {
                debug!(%error, "ignoring malformed session cookie");
                Self::default()
            }
        }
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(Self::from_http_request(req)))
    }
}
