//! In-memory `UserRepository` enforcing the same uniqueness rules as the
//! PostgreSQL schema.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use mockable::{Clock, DefaultClock};
use tokio::sync::RwLock;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{NewUserAccount, Nickname, User, UserAccount, UserId, UserName};

#[derive(Default)]
struct State {
    last_id: u64,
    accounts: BTreeMap<UserId, UserAccount>,
}

/// User directory kept in process memory.
pub struct InMemoryUserRepository {
    state: RwLock<State>,
    clock: Arc<dyn Clock>,
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new(Arc::new(DefaultClock))
    }
}

impl InMemoryUserRepository {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            state: RwLock::new(State::default()),
            clock,
        }
    }

    /// Store a fully formed account, keeping its id.
    ///
    /// Later inserts continue numbering after the highest seeded id.
    pub async fn seed(&self, account: UserAccount) {
        let mut state = self.state.write().await;
        let id = account.user.id();
        state.last_id = state.last_id.max(id.get());
        state.accounts.insert(id, account);
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let state = self.state.read().await;
        Ok(state.accounts.get(id).map(|account| account.user.clone()))
    }

    async fn find_account_by_user_name(
        &self,
        user_name: &UserName,
    ) -> Result<Option<UserAccount>, UserPersistenceError> {
        let state = self.state.read().await;
        Ok(state
            .accounts
            .values()
            .find(|account| account.user.user_name() == user_name)
            .cloned())
    }

    async fn nickname_exists(&self, nickname: &Nickname) -> Result<bool, UserPersistenceError> {
        let state = self.state.read().await;
        Ok(state
            .accounts
            .values()
            .any(|account| account.user.nickname() == nickname))
    }

    async fn user_name_exists(&self, user_name: &UserName) -> Result<bool, UserPersistenceError> {
        let state = self.state.read().await;
        Ok(state
            .accounts
            .values()
            .any(|account| account.user.user_name() == user_name))
    }

    async fn insert(&self, account: &NewUserAccount) -> Result<User, UserPersistenceError> {
        let mut state = self.state.write().await;
        for existing in state.accounts.values() {
            if existing.user.user_name() == &account.user_name {
                return Err(UserPersistenceError::duplicate("user_name"));
            }
            if existing.user.nickname() == &account.nickname {
                return Err(UserPersistenceError::duplicate("nickname"));
            }
        }

        let id = UserId::new(state.last_id + 1)
            .map_err(|err| UserPersistenceError::query(err.to_string()))?;
        let user = User::new(
            id,
            account.user_name.clone(),
            account.nickname.clone(),
            self.clock.utc(),
        )
        .with_status(account.status);
        state.last_id = id.get();
        state.accounts.insert(
            id,
            UserAccount {
                user: user.clone(),
                password_digest: account.password_digest.clone(),
            },
        );
        Ok(user)
    }
}
