//! Port abstraction for the user directory and its errors.
use async_trait::async_trait;

use crate::domain::{NewUserAccount, Nickname, User, UserAccount, UserId, UserName};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// A uniqueness constraint rejected the insert.
        Duplicate { field: String } => "user repository rejected duplicate {field}",
    }
}

/// Directory of registered users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user and their credential digest by login name.
    async fn find_account_by_user_name(
        &self,
        user_name: &UserName,
    ) -> Result<Option<UserAccount>, UserPersistenceError>;

    async fn nickname_exists(&self, nickname: &Nickname) -> Result<bool, UserPersistenceError>;

    async fn user_name_exists(&self, user_name: &UserName) -> Result<bool, UserPersistenceError>;

    /// Insert a new account, assigning its id and creation time.
    async fn insert(&self, account: &NewUserAccount) -> Result<User, UserPersistenceError>;
}
