//! Session primitives shared by the session service and its store adapters.

use std::collections::BTreeMap;
use std::fmt;

use rand::RngCore;
use serde::{Deserialize, Serialize};

use super::user::{User, UserId};

/// Attribute under which the authenticated user's identifier is stored.
pub const USER_ID_ATTRIBUTE: &str = "user_id";

/// Maximum accepted token length.
pub const SESSION_TOKEN_MAX: usize = 128;

const GENERATED_TOKEN_BYTES: usize = 32;

/// Validation errors for [`SessionToken`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionTokenError {
    Empty,
    TooLong { max: usize },
    InvalidCharacters,
}

impl fmt::Display for SessionTokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "session token must not be empty"),
            Self::TooLong { max } => write!(f, "session token must be at most {max} characters"),
            Self::InvalidCharacters => write!(
                f,
                "session token may only contain letters, numbers, dashes, or underscores",
            ),
        }
    }
}

impl std::error::Error for SessionTokenError {}

/// Opaque token identifying one session, carried in the session cookie.
///
/// # Examples
/// ```
/// use accounts::domain::SessionToken;
///
/// let token = SessionToken::new("abc123").expect("valid token");
/// assert_eq!(token.as_ref(), "abc123");
/// assert_eq!(SessionToken::generate().as_ref().len(), 64);
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SessionToken(String);

impl SessionToken {
    /// Validate a token presented by a client.
    pub fn new(token: impl Into<String>) -> Result<Self, SessionTokenError> {
        let token = token.into();
        if token.is_empty() {
            return Err(SessionTokenError::Empty);
        }
        if token.len() > SESSION_TOKEN_MAX {
            return Err(SessionTokenError::TooLong {
                max: SESSION_TOKEN_MAX,
            });
        }
        if !token
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
        {
            return Err(SessionTokenError::InvalidCharacters);
        }
        Ok(Self(token))
    }

    /// Issue a fresh random token from the operating system RNG.
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = [0_u8; GENERATED_TOKEN_BYTES];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        Self(hex::encode(bytes))
    }
}

impl AsRef<str> for SessionToken {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

// Tokens are bearer credentials; keep them out of logs.
impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(..)")
    }
}

/// Attribute map stored for one session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionAttributes(BTreeMap<String, String>);

impl SessionAttributes {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Drop every attribute.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Identity attribute, or `None` when unset or unparsable.
    pub fn user_id(&self) -> Option<UserId> {
        let raw = self.get(USER_ID_ATTRIBUTE)?;
        match raw.parse() {
            Ok(id) => Some(id),
            Err(error) => {
                tracing::warn!(%error, "ignoring unparsable user_id session attribute");
                None
            }
        }
    }

    /// Record the authenticated user.
    pub fn set_user_id(&mut self, id: UserId) {
        self.insert(USER_ID_ATTRIBUTE, id.to_string());
    }
}

impl<K, V> FromIterator<(K, V)> for SessionAttributes
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Outcome of resolving a session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    Authenticated(User),
    Unauthenticated,
}

impl Identity {
    /// The resolved user, if any.
    pub fn into_user(self) -> Option<User> {
        match self {
            Self::Authenticated(user) => Some(user),
            Self::Unauthenticated => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("abc123")]
    #[case("A-b_9")]
    fn accepts_well_formed_tokens(#[case] raw: &str) {
        assert_eq!(SessionToken::new(raw).map(|t| t.as_ref().to_owned()), Ok(raw.to_owned()));
    }

    #[rstest]
    #[case("", SessionTokenError::Empty)]
    #[case("abc 123", SessionTokenError::InvalidCharacters)]
    #[case("abc;123", SessionTokenError::InvalidCharacters)]
    #[case(&"a".repeat(SESSION_TOKEN_MAX + 1), SessionTokenError::TooLong { max: SESSION_TOKEN_MAX })]
    fn rejects_malformed_tokens(#[case] raw: &str, #[case] expected: SessionTokenError) {
        assert_eq!(SessionToken::new(raw), Err(expected));
    }

    #[rstest]
    fn generated_tokens_are_distinct_and_valid() {
        let first = SessionToken::generate();
        let second = SessionToken::generate();
        assert_ne!(first, second);
        assert!(SessionToken::new(first.as_ref()).is_ok());
        assert_eq!(format!("{first:?}"), "SessionToken(..)");
    }

    #[rstest]
    fn user_id_round_trips_through_attributes() {
        let mut attributes = SessionAttributes::default();
        let id = UserId::new(42).expect("id");
        attributes.set_user_id(id);
        assert_eq!(attributes.get(USER_ID_ATTRIBUTE), Some("42"));
        assert_eq!(attributes.user_id(), Some(id));

        attributes.clear();
        assert!(attributes.is_empty());
        assert_eq!(attributes.user_id(), None);
    }

    #[rstest]
    #[case("not-a-number")]
    #[case("0")]
    #[case("")]
    fn unparsable_user_id_reads_as_absent(#[case] raw: &str) {
        let attributes: SessionAttributes = [(USER_ID_ATTRIBUTE, raw)].into_iter().collect();
        assert_eq!(attributes.user_id(), None);
    }

    #[rstest]
    fn attributes_serialise_as_flat_object() {
        let attributes: SessionAttributes = [("user_id", "7"), ("theme", "dark")]
            .into_iter()
            .collect();
        let json = serde_json::to_value(&attributes).expect("serialise");
        assert_eq!(json, serde_json::json!({"theme": "dark", "user_id": "7"}));
    }
}
