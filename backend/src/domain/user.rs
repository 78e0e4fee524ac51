//! User data model.
//!
//! Users are created by registration and only read afterwards. The
//! credential digest travels with [`UserAccount`] and never with [`User`], so
//! anything that serialises a `User` cannot leak it.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;

/// Minimum allowed length for a login name.
pub const USER_NAME_MIN: usize = 5;
/// Maximum allowed length for a login name.
pub const USER_NAME_MAX: usize = 30;
/// Minimum allowed length for a nickname.
pub const NICKNAME_MIN: usize = 2;
/// Maximum allowed length for a nickname.
pub const NICKNAME_MAX: usize = 30;

/// Validation errors returned by the user value constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    InvalidId,
    EmptyUserName,
    UserNameTooShort { min: usize },
    UserNameTooLong { max: usize },
    UserNameInvalidCharacters,
    EmptyNickname,
    NicknameTooShort { min: usize },
    NicknameTooLong { max: usize },
    UnknownStatus(String),
    EmptyPasswordDigest,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidId => write!(f, "user id must be a positive integer"),
            Self::EmptyUserName => write!(f, "user_name must not be empty"),
            Self::UserNameTooShort { min } => {
                write!(f, "user_name must be at least {min} characters")
            }
            Self::UserNameTooLong { max } => {
                write!(f, "user_name must be at most {max} characters")
            }
            Self::UserNameInvalidCharacters => write!(
                f,
                "user_name may only contain letters, numbers, dots, dashes, or underscores",
            ),
            Self::EmptyNickname => write!(f, "nickname must not be empty"),
            Self::NicknameTooShort { min } => {
                write!(f, "nickname must be at least {min} characters")
            }
            Self::NicknameTooLong { max } => {
                write!(f, "nickname must be at most {max} characters")
            }
            Self::UnknownStatus(value) => write!(f, "unknown user status: {value}"),
            Self::EmptyPasswordDigest => write!(f, "password digest must not be empty"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Stable user identifier assigned by the user directory.
///
/// # Examples
/// ```
/// use accounts::domain::UserId;
///
/// let id: UserId = "42".parse().expect("numeric id");
/// assert_eq!(id.get(), 42);
/// assert!(UserId::new(0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(u64);

impl UserId {
    /// Validate and construct a [`UserId`]; zero is reserved.
    pub fn new(id: u64) -> Result<Self, UserValidationError> {
        if id == 0 {
            return Err(UserValidationError::InvalidId);
        }
        Ok(Self(id))
    }

    /// Numeric value of the identifier.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UserId {
    type Err = UserValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.parse::<u64>().map_err(|_| UserValidationError::InvalidId)?;
        Self::new(value)
    }
}

impl TryFrom<i64> for UserId {
    type Error = UserValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        let value = u64::try_from(value).map_err(|_| UserValidationError::InvalidId)?;
        Self::new(value)
    }
}

static USER_NAME_RE: OnceLock<Regex> = OnceLock::new();

fn user_name_regex() -> &'static Regex {
    USER_NAME_RE.get_or_init(|| {
        // Length is enforced separately; this regex constrains allowed characters.
        let pattern = "^[A-Za-z0-9_.-]+$";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("user name regex failed to compile: {error}"))
    })
}

/// Unique login name.
///
/// ## Invariants
/// - Trimmed of surrounding whitespace.
/// - Between [`USER_NAME_MIN`] and [`USER_NAME_MAX`] characters.
/// - Only ASCII letters, digits, `.`, `-` and `_`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserName(String);

impl UserName {
    /// Validate and construct a [`UserName`].
    pub fn new(user_name: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let normalized = user_name.as_ref().trim();
        if normalized.is_empty() {
            return Err(UserValidationError::EmptyUserName);
        }
        let length = normalized.chars().count();
        if length < USER_NAME_MIN {
            return Err(UserValidationError::UserNameTooShort { min: USER_NAME_MIN });
        }
        if length > USER_NAME_MAX {
            return Err(UserValidationError::UserNameTooLong { max: USER_NAME_MAX });
        }
        if !user_name_regex().is_match(normalized) {
            return Err(UserValidationError::UserNameInvalidCharacters);
        }
        Ok(Self(normalized.to_owned()))
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Public nickname shown to other users; unique across accounts.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Nickname(String);

impl Nickname {
    /// Validate and construct a [`Nickname`].
    pub fn new(nickname: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let normalized = nickname.as_ref().trim();
        if normalized.is_empty() {
            return Err(UserValidationError::EmptyNickname);
        }
        let length = normalized.chars().count();
        if length < NICKNAME_MIN {
            return Err(UserValidationError::NicknameTooShort { min: NICKNAME_MIN });
        }
        if length > NICKNAME_MAX {
            return Err(UserValidationError::NicknameTooLong { max: NICKNAME_MAX });
        }
        Ok(Self(normalized.to_owned()))
    }
}

impl AsRef<str> for Nickname {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Nickname {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Account lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UserStatus {
    /// Account may log in.
    #[default]
    Active,
    /// Account exists but has not been activated.
    Inactive,
    /// Account was suspended by an operator.
    Suspended,
}

impl UserStatus {
    /// Stable storage and wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Suspended => "suspended",
        }
    }
}

impl FromStr for UserStatus {
    type Err = UserValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            "suspended" => Ok(Self::Suspended),
            other => Err(UserValidationError::UnknownStatus(other.to_owned())),
        }
    }
}

/// Opaque credential digest in PHC string format.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordDigest(String);

impl PasswordDigest {
    /// Wrap a digest produced by a password hasher.
    pub fn new(digest: impl Into<String>) -> Result<Self, UserValidationError> {
        let digest = digest.into();
        if digest.trim().is_empty() {
            return Err(UserValidationError::EmptyPasswordDigest);
        }
        Ok(Self(digest))
    }
}

impl AsRef<str> for PasswordDigest {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordDigest(..)")
    }
}

/// Application user as exposed to clients.
///
/// ## Invariants
/// - `user_name` and `nickname` satisfy their newtype invariants.
/// - `avatar` is empty when the user has not set one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    user_name: UserName,
    nickname: Nickname,
    status: UserStatus,
    avatar: String,
    created_at: DateTime<Utc>,
}

impl User {
    /// Build an active user without an avatar.
    pub fn new(
        id: UserId,
        user_name: UserName,
        nickname: Nickname,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_name,
            nickname,
            status: UserStatus::Active,
            avatar: String::new(),
            created_at,
        }
    }

    /// Replace the account status.
    #[must_use]
    pub fn with_status(mut self, status: UserStatus) -> Self {
        self.status = status;
        self
    }

    /// Replace the avatar reference.
    #[must_use]
    pub fn with_avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = avatar.into();
        self
    }

    /// Stable user identifier.
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Login name.
    pub fn user_name(&self) -> &UserName {
        &self.user_name
    }

    /// Nickname shown to other users.
    pub fn nickname(&self) -> &Nickname {
        &self.nickname
    }

    /// Account lifecycle state.
    pub fn status(&self) -> UserStatus {
        self.status
    }

    /// Avatar reference; empty when unset.
    pub fn avatar(&self) -> &str {
        self.avatar.as_str()
    }

    /// Account creation time.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// A user record together with its stored credential digest.
///
/// Only the login flow reads this type.
#[derive(Debug, Clone)]
pub struct UserAccount {
    pub user: User,
    pub password_digest: PasswordDigest,
}

/// Fields required to create an account; the directory assigns the id and
/// creation time.
#[derive(Debug, Clone)]
pub struct NewUserAccount {
    pub user_name: UserName,
    pub nickname: Nickname,
    pub password_digest: PasswordDigest,
    pub status: UserStatus,
}
