//! Domain primitives, services and ports.
//!
//! Purpose: define strongly typed account and session values and the
//! use-cases that operate on them. Nothing here knows about HTTP, SQL or
//! Redis; adapters reach the domain through the traits in [`ports`].
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - User and its value types: the account record exposed to clients.
//! - LoginCredentials / Registration: validated inbound requests.
//! - SessionToken / SessionAttributes / Identity: session primitives.
//! - AccountService / SessionService: the use-cases.

pub mod accounts;
pub mod auth;
pub mod error;
pub mod ports;
pub mod session;
pub mod session_service;
pub mod trace_id;
pub mod user;

pub use self::accounts::{AccountService, INVALID_CREDENTIALS_MESSAGE};
pub use self::auth::{
    CredentialsValidationError, LoginCredentials, PASSWORD_MAX, PASSWORD_MIN, Registration,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::session::{
    Identity, SessionAttributes, SessionToken, SessionTokenError, USER_ID_ATTRIBUTE,
};
pub use self::session_service::{DEFAULT_SESSION_TTL, SessionService};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    NewUserAccount, Nickname, PasswordDigest, User, UserAccount, UserId, UserName, UserStatus,
    UserValidationError,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use accounts::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<()> {
///     Err(Error::forbidden("nope"))
/// }
/// assert!(handler().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
