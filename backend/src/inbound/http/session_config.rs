//! Session cookie configuration parsing and validation.
//!
//! Cookie attributes come from the environment through [`mockable::Env`] so
//! validation can be tested without touching process state. Release builds
//! insist on explicit toggles; debug builds warn and fall back to defaults.

use std::time::Duration;

use actix_web::cookie::time::Duration as CookieDuration;
use actix_web::cookie::{Cookie, SameSite};
use mockable::Env;
use tracing::warn;

use crate::domain::{DEFAULT_SESSION_TTL, SessionToken};

const COOKIE_NAME_ENV: &str = "SESSION_COOKIE_NAME";
const COOKIE_SECURE_ENV: &str = "SESSION_COOKIE_SECURE";
const SAMESITE_ENV: &str = "SESSION_SAMESITE";
const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";
const SAMESITE_EXPECTED: &str = "Strict|Lax|None";
const COOKIE_NAME_EXPECTED: &str = "letters, digits, '-' or '_'";

/// Cookie name used when none is configured.
pub const DEFAULT_COOKIE_NAME: &str = "session";

/// Build mode for session configuration validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds tolerate defaults and emit warnings for missing toggles.
    Debug,
    /// Release builds require explicit, valid session toggles.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    ///
    /// ```rust
    /// use accounts::inbound::http::session_config::BuildMode;
    ///
    /// let mode = BuildMode::from_debug_assertions();
    /// assert_eq!(mode == BuildMode::Debug, cfg!(debug_assertions));
    /// ```
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Attributes applied to the session cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCookieConfig {
    name: String,
    secure: bool,
    same_site: SameSite,
    max_age: Duration,
}

impl Default for SessionCookieConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_COOKIE_NAME.to_owned(),
            secure: true,
            same_site: SameSite::Lax,
            max_age: DEFAULT_SESSION_TTL,
        }
    }
}

impl SessionCookieConfig {
    /// Replace the cookie `Max-Age`; keep it equal to the session TTL.
    #[must_use]
    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self
    }

    #[must_use]
    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn secure(&self) -> bool {
        self.secure
    }

    pub fn same_site(&self) -> SameSite {
        self.same_site
    }

    /// Cookie carrying a freshly issued session token.
    ///
    /// ```rust
    /// use accounts::domain::SessionToken;
    /// use accounts::inbound::http::session_config::SessionCookieConfig;
    ///
    /// let token = SessionToken::new("abc123").unwrap();
    /// let cookie = SessionCookieConfig::default().issue(&token);
    /// assert_eq!(cookie.name(), "session");
    /// assert_eq!(cookie.http_only(), Some(true));
    /// ```
    pub fn issue(&self, token: &SessionToken) -> Cookie<'static> {
        let max_age = i64::try_from(self.max_age.as_secs()).unwrap_or(i64::MAX);
        Cookie::build(self.name.clone(), token.as_ref().to_owned())
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .same_site(self.same_site)
            .max_age(CookieDuration::seconds(max_age))
            .finish()
    }

    /// Cookie instructing the client to drop its session token.
    pub fn removal(&self) -> Cookie<'static> {
        let mut cookie = Cookie::build(self.name.clone(), "")
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .same_site(self.same_site)
            .finish();
        cookie.make_removal();
        cookie
    }
}

/// Errors raised while validating session configuration.
#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
    /// A required environment variable is missing.
    #[error("missing required environment variable: {name}")]
    MissingEnv { name: &'static str },
    /// A variable is present but contains an invalid value.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    /// `SameSite=None` requires a secure cookie setting in release builds.
    #[error("SESSION_SAMESITE=None requires SESSION_COOKIE_SECURE=1")]
    InsecureSameSiteNone,
}

/// Build cookie settings from environment variables and build mode.
///
/// ```rust
/// use accounts::inbound::http::session_config::{BuildMode, session_cookie_from_env};
/// use mockable::MockEnv;
///
/// let mut env = MockEnv::new();
/// env.expect_string().returning(|name| match name {
///     "SESSION_COOKIE_SECURE" => Some("1".to_string()),
///     "SESSION_SAMESITE" => Some("Strict".to_string()),
///     _ => None,
/// });
///
/// let config = session_cookie_from_env(&env, BuildMode::Release).unwrap();
/// assert!(config.secure());
/// assert_eq!(config.name(), "session");
/// ```
pub fn session_cookie_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<SessionCookieConfig, SessionConfigError> {
    let name = cookie_name_from_env(env, mode)?;
    let secure = cookie_secure_from_env(env, mode)?;
    let same_site = same_site_from_env(env, mode, secure)?;

    Ok(SessionCookieConfig {
        name,
        secure,
        same_site,
        max_age: DEFAULT_SESSION_TTL,
    })
}

fn cookie_name_from_env<E: Env>(env: &E, mode: BuildMode) -> Result<String, SessionConfigError> {
    let Some(value) = env.string(COOKIE_NAME_ENV) else {
        return Ok(DEFAULT_COOKIE_NAME.to_owned());
    };
    let valid = !value.is_empty()
        && value
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
    if valid {
        return Ok(value);
    }
    if mode.is_debug() {
        warn!(value = %value, "invalid SESSION_COOKIE_NAME, using default");
        return Ok(DEFAULT_COOKIE_NAME.to_owned());
    }
    Err(SessionConfigError::InvalidEnv {
        name: COOKIE_NAME_ENV,
        value,
        expected: COOKIE_NAME_EXPECTED,
    })
}

fn cookie_secure_from_env<E: Env>(env: &E, mode: BuildMode) -> Result<bool, SessionConfigError> {
    match env.string(COOKIE_SECURE_ENV) {
        Some(value) => match parse_bool(&value) {
            Some(flag) => Ok(flag),
            None if mode.is_debug() => {
                warn!(value = %value, "invalid SESSION_COOKIE_SECURE; defaulting to secure");
                Ok(true)
            }
            None => Err(SessionConfigError::InvalidEnv {
                name: COOKIE_SECURE_ENV,
                value,
                expected: BOOL_EXPECTED,
            }),
        },
        None if mode.is_debug() => {
            warn!("SESSION_COOKIE_SECURE not set; defaulting to secure");
            Ok(true)
        }
        None => Err(SessionConfigError::MissingEnv {
            name: COOKIE_SECURE_ENV,
        }),
    }
}

fn same_site_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
    cookie_secure: bool,
) -> Result<SameSite, SessionConfigError> {
    let default_same_site = if mode.is_debug() {
        SameSite::Lax
    } else {
        SameSite::Strict
    };

    let Some(value) = env.string(SAMESITE_ENV) else {
        if mode.is_debug() {
            warn!("SESSION_SAMESITE not set; using default");
            return Ok(default_same_site);
        }
        return Err(SessionConfigError::MissingEnv { name: SAMESITE_ENV });
    };

    match value.to_ascii_lowercase().as_str() {
        "lax" => Ok(SameSite::Lax),
        "strict" => Ok(SameSite::Strict),
        "none" if cookie_secure => Ok(SameSite::None),
        "none" if mode.is_debug() => {
            warn!("SESSION_SAMESITE=None with SESSION_COOKIE_SECURE=0; browsers may reject the cookie");
            Ok(SameSite::None)
        }
        "none" => Err(SessionConfigError::InsecureSameSiteNone),
        _ if mode.is_debug() => {
            warn!(value = %value, "invalid SESSION_SAMESITE, using default");
            Ok(default_same_site)
        }
        _ => Err(SessionConfigError::InvalidEnv {
            name: SAMESITE_ENV,
            value,
            expected: SAMESITE_EXPECTED,
        }),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}
