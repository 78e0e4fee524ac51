//! Authentication primitives: login credentials and registration requests.
//!
//! Inbound adapters hand raw strings to the constructors here so that a
//! handler only ever talks to a service with validated values.

use std::fmt;

use zeroize::Zeroizing;

use super::user::{Nickname, UserName, UserValidationError};

/// Minimum allowed password length.
pub const PASSWORD_MIN: usize = 8;
/// Maximum allowed password length.
pub const PASSWORD_MAX: usize = 40;

/// Domain error returned when login or registration values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialsValidationError {
    /// The user name failed [`UserName`] validation.
    UserName(UserValidationError),
    /// The nickname failed [`Nickname`] validation.
    Nickname(UserValidationError),
    /// Password was blank.
    EmptyPassword,
    PasswordTooShort { min: usize },
    PasswordTooLong { max: usize },
    /// Password confirmation was blank.
    EmptyPasswordConfirm,
}

impl CredentialsValidationError {
    /// Name of the request field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::UserName(_) => "user_name",
            Self::Nickname(_) => "nickname",
            Self::EmptyPassword | Self::PasswordTooShort { .. } | Self::PasswordTooLong { .. } => {
                "password"
            }
            Self::EmptyPasswordConfirm => "password_confirm",
        }
    }
}

impl fmt::Display for CredentialsValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UserName(err) | Self::Nickname(err) => err.fmt(f),
            Self::EmptyPassword => write!(f, "password must not be empty"),
            Self::PasswordTooShort { min } => {
                write!(f, "password must be at least {min} characters")
            }
            Self::PasswordTooLong { max } => {
                write!(f, "password must be at most {max} characters")
            }
            Self::EmptyPasswordConfirm => write!(f, "password_confirm must not be empty"),
        }
    }
}

impl std::error::Error for CredentialsValidationError {}

fn validate_password(password: &str) -> Result<Zeroizing<String>, CredentialsValidationError> {
    if password.is_empty() {
        return Err(CredentialsValidationError::EmptyPassword);
    }
    let length = password.chars().count();
    if length < PASSWORD_MIN {
        return Err(CredentialsValidationError::PasswordTooShort { min: PASSWORD_MIN });
    }
    if length > PASSWORD_MAX {
        return Err(CredentialsValidationError::PasswordTooLong { max: PASSWORD_MAX });
    }
    Ok(Zeroizing::new(password.to_owned()))
}

/// Validated login credentials used by authentication services.
///
/// ## Invariants
/// - `user_name` satisfies [`UserName`] validation.
/// - `password` is between [`PASSWORD_MIN`] and [`PASSWORD_MAX`] characters and
///   retains caller-provided whitespace.
///
/// # Examples
/// ```
/// use accounts::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("ann_lee", "correct horse").unwrap();
/// assert_eq!(creds.user_name().as_ref(), "ann_lee");
/// assert_eq!(creds.password(), "correct horse");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    user_name: UserName,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw user name and password inputs.
    pub fn try_from_parts(
        user_name: &str,
        password: &str,
    ) -> Result<Self, CredentialsValidationError> {
        let user_name = UserName::new(user_name).map_err(CredentialsValidationError::UserName)?;
        let password = validate_password(password)?;
        Ok(Self {
            user_name,
            password,
        })
    }

    /// User name suitable for directory lookups.
    pub fn user_name(&self) -> &UserName {
        &self.user_name
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated registration request.
///
/// The confirmation is kept verbatim; the registration service decides what a
/// mismatch means.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    nickname: Nickname,
    user_name: UserName,
    password: Zeroizing<String>,
    password_confirm: Zeroizing<String>,
}

impl Registration {
    /// Construct a registration request from raw inputs.
    pub fn try_from_parts(
        nickname: &str,
        user_name: &str,
        password: &str,
        password_confirm: &str,
    ) -> Result<Self, CredentialsValidationError> {
        let nickname = Nickname::new(nickname).map_err(CredentialsValidationError::Nickname)?;
        let user_name = UserName::new(user_name).map_err(CredentialsValidationError::UserName)?;
        let password = validate_password(password)?;
        if password_confirm.is_empty() {
            return Err(CredentialsValidationError::EmptyPasswordConfirm);
        }
        Ok(Self {
            nickname,
            user_name,
            password,
            password_confirm: Zeroizing::new(password_confirm.to_owned()),
        })
    }

    pub fn nickname(&self) -> &Nickname {
        &self.nickname
    }

    pub fn user_name(&self) -> &UserName {
        &self.user_name
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    /// Whether the confirmation repeats the password exactly.
    pub fn passwords_match(&self) -> bool {
        self.password.as_str() == self.password_confirm.as_str()
    }
}
