//! Account use-cases: registration and credential checks.
//!
//! `AccountService` implements both driving ports on top of the user
//! directory and the password hasher. Hashing runs on the blocking pool so
//! Argon2 does not stall the async workers.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{info, warn};
use zeroize::Zeroizing;

use super::ports::{
    LoginService, PasswordHashError, PasswordHasher, RegistrationService, UserPersistenceError,
    UserRepository,
};
use super::{
    Error, LoginCredentials, NewUserAccount, PasswordDigest, Registration, User, UserStatus,
};

/// Message returned for every credential failure so callers cannot learn
/// which user names exist.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "invalid user name or password";

/// Login and registration backed by a [`UserRepository`].
#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

impl AccountService {
    pub fn new(users: Arc<dyn UserRepository>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { users, hasher }
    }

    async fn hash_password(&self, password: &str) -> Result<PasswordDigest, Error> {
        let hasher = Arc::clone(&self.hasher);
        let password = Zeroizing::new(password.to_owned());
        tokio::task::spawn_blocking(move || hasher.hash(password.as_str()))
            .await
            .map_err(|err| Error::internal(format!("password hashing task failed: {err}")))?
            .map_err(map_hash_error)
    }

    async fn verify_password(&self, password: &str, digest: PasswordDigest) -> Result<bool, Error> {
        let hasher = Arc::clone(&self.hasher);
        let password = Zeroizing::new(password.to_owned());
        tokio::task::spawn_blocking(move || hasher.verify(password.as_str(), &digest))
            .await
            .map_err(|err| Error::internal(format!("password verification task failed: {err}")))?
            .map_err(map_hash_error)
    }
}

pub(crate) fn map_user_persistence_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user directory unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user directory error: {message}"))
        }
        UserPersistenceError::Duplicate { field } => duplicate_error(&field),
    }
}

fn map_hash_error(error: PasswordHashError) -> Error {
    Error::internal(error.to_string())
}

fn duplicate_error(field: &str) -> Error {
    let message = match field {
        "nickname" => "nickname already registered",
        _ => "user name already registered",
    };
    Error::conflict(message).with_details(json!({ "field": field, "code": "taken" }))
}

#[async_trait]
impl LoginService for AccountService {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<User, Error> {
        let account = self
            .users
            .find_account_by_user_name(credentials.user_name())
            .await
            .map_err(map_user_persistence_error)?;

        let Some(account) = account else {
            return Err(Error::unauthorized(INVALID_CREDENTIALS_MESSAGE));
        };

        let verified = self
            .verify_password(credentials.password(), account.password_digest)
            .await?;
        if !verified {
            warn!(user_id = %account.user.id(), "password verification failed");
            return Err(Error::unauthorized(INVALID_CREDENTIALS_MESSAGE));
        }

        if account.user.status() != UserStatus::Active {
            return Err(Error::forbidden("account is not active")
                .with_details(json!({ "status": account.user.status().as_str() })));
        }

        Ok(account.user)
    }
}

#[async_trait]
impl RegistrationService for AccountService {
    async fn register(&self, registration: &Registration) -> Result<User, Error> {
        if !registration.passwords_match() {
            return Err(Error::invalid_request("password confirmation does not match")
                .with_details(json!({ "field": "password_confirm", "code": "mismatch" })));
        }

        if self
            .users
            .nickname_exists(registration.nickname())
            .await
            .map_err(map_user_persistence_error)?
        {
            return Err(duplicate_error("nickname"));
        }

        if self
            .users
            .user_name_exists(registration.user_name())
            .await
            .map_err(map_user_persistence_error)?
        {
            return Err(duplicate_error("user_name"));
        }

        let password_digest = self.hash_password(registration.password()).await?;
        let account = NewUserAccount {
            user_name: registration.user_name().clone(),
            nickname: registration.nickname().clone(),
            password_digest,
            status: UserStatus::Active,
        };

        let user = self
            .users
            .insert(&account)
            .await
            .map_err(map_user_persistence_error)?;
        info!(user_id = %user.id(), "registered user");
        Ok(user)
    }
}
