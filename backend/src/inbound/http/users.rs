//! User account API handlers.
//!
//! ```text
//! POST /api/v1/user/register nickname, user_name, password, password_confirm
//! POST /api/v1/user/login    user_name, password
//! GET  /api/v1/user/me
//! GET  /api/v1/user/logout
//! ```
//!
//! Bodies are JSON objects or URL-encoded forms. Each handler binds its input, calls one domain operation and answers with
//! the shared [`Envelope`]. Binding failures return before any service runs.

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::envelope::Envelope;
use super::payload::RequestBody;
use super::schemas::{EmptyEnvelopeSchema, UserEnvelopeSchema};
use super::session::{LOGIN_REQUIRED_MESSAGE, SessionContext};
use super::state::HttpState;
use super::validation::{
    NICKNAME, PASSWORD, PASSWORD_CONFIRM, USER_NAME, credentials_error, require,
};
use crate::domain::{Error, LoginCredentials, Registration, User};
use crate::inbound::http::ApiResult;

/// Registration request body for `POST /api/v1/user/register`.
#[derive(Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(default)]
pub struct RegisterRequest {
    #[schema(example = "Ann")]
    pub nickname: Option<String>,
    #[schema(example = "ann_lee")]
    pub user_name: Option<String>,
    pub password: Option<String>,
    pub password_confirm: Option<String>,
}

impl TryFrom<RegisterRequest> for Registration {
    type Error = Error;

    fn try_from(value: RegisterRequest) -> Result<Self, Self::Error> {
        let nickname = require(value.nickname, NICKNAME)?;
        let user_name = require(value.user_name, USER_NAME)?;
        let password = require(value.password, PASSWORD)?;
        let password_confirm = require(value.password_confirm, PASSWORD_CONFIRM)?;
        Self::try_from_parts(&nickname, &user_name, &password, &password_confirm)
            .map_err(credentials_error)
    }
}

/// Login request body for `POST /api/v1/user/login`.
#[derive(Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(default)]
pub struct LoginRequest {
    #[schema(example = "ann_lee")]
    pub user_name: Option<String>,
    pub password: Option<String>,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = Error;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        let user_name = require(value.user_name, USER_NAME)?;
        let password = require(value.password, PASSWORD)?;
        Self::try_from_parts(&user_name, &password).map_err(credentials_error)
    }
}

/// Public view of a user account.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, utoipa::ToSchema)]
pub struct UserResponse {
    #[schema(example = 42)]
    pub id: u64,
    #[schema(example = "ann_lee")]
    pub user_name: String,
    #[schema(example = "Ann")]
    pub nickname: String,
    #[schema(example = "active")]
    pub status: String,
    pub avatar: String,
    /// Unix timestamp in seconds.
    #[schema(example = 1_700_000_000)]
    pub created_at: i64,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().get(),
            user_name: user.user_name().as_ref().to_owned(),
            nickname: user.nickname().as_ref().to_owned(),
            status: user.status().as_str().to_owned(),
            avatar: user.avatar().to_owned(),
            created_at: user.created_at().timestamp(),
        }
    }
}

/// Create an account.
///
/// Registration does not log the new user in.
#[utoipa::path(
    post,
    path = "/api/v1/user/register",
    request_body(content(
        (RegisterRequest = "application/json"),
        (RegisterRequest = "application/x-www-form-urlencoded")
    )),
    responses(
        (status = 200, description = "Envelope with the created user, or code 40001 for invalid input and taken names", body = UserEnvelopeSchema),
    ),
    tags = ["user"],
    operation_id = "register",
    security([])
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: RequestBody<RegisterRequest>,
) -> ApiResult<Envelope<UserResponse>> {
    let registration = Registration::try_from(payload.into_inner())?;
    let user = state.registration.register(&registration).await?;
    Ok(Envelope::success(UserResponse::from(&user)))
}

/// Authenticate and start a session.
///
/// Any session token presented with the request is discarded and a fresh one
/// is issued in the `Set-Cookie` header.
#[utoipa::path(
    post,
    path = "/api/v1/user/login",
    request_body(content(
        (LoginRequest = "application/json"),
        (LoginRequest = "application/x-www-form-urlencoded")
    )),
    responses(
        (status = 200, description = "Envelope with the logged-in user, or code 401 for bad credentials", body = UserEnvelopeSchema,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
    ),
    tags = ["user"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: RequestBody<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let credentials = LoginCredentials::try_from(payload.into_inner())?;
    let user = state.login.authenticate(&credentials).await?;
    let token = state.sessions.establish(session.token(), &user.id()).await?;
    info!(user_id = %user.id(), "user logged in");

    Ok(HttpResponse::Ok()
        .cookie(state.cookie.issue(&token))
        .json(Envelope::success(UserResponse::from(&user))))
}

/// Return the user bound to the current session.
#[utoipa::path(
    get,
    path = "/api/v1/user/me",
    responses(
        (status = 200, description = "Envelope with the current user, or code 401 when not logged in", body = UserEnvelopeSchema),
    ),
    tags = ["user"],
    operation_id = "me",
    security(("SessionCookie" = []))
)]
#[get("/me")]
pub async fn me(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<Envelope<UserResponse>> {
    let user = session.require_user(&state.sessions).await?;
    Ok(Envelope::success(UserResponse::from(&user)))
}

/// End the current session.
///
/// The cleared session is committed before responding; a store failure is
/// reported with code 50001 and the session stays intact.
#[utoipa::path(
    get,
    path = "/api/v1/user/logout",
    responses(
        (status = 200, description = "Envelope with code 0, or 401 when not logged in", body = EmptyEnvelopeSchema,
            headers(("Set-Cookie" = String, description = "Expired session cookie"))),
    ),
    tags = ["user"],
    operation_id = "logout",
    security(("SessionCookie" = []))
)]
#[get("/logout")]
pub async fn logout(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let Some(token) = session.token() else {
        return Err(Error::unauthorized(LOGIN_REQUIRED_MESSAGE));
    };
    let user = session.require_user(&state.sessions).await?;
    state.sessions.terminate(token).await?;
    info!(user_id = %user.id(), "user logged out");

    Ok(HttpResponse::Ok()
        .cookie(state.cookie.removal())
        .json(Envelope::<()>::message_only("logged out")))
}

#[cfg(test)]
mod tests;
