//! PostgreSQL-backed `UserRepository` using Diesel.
//!
//! Uniqueness of `user_name` and `nickname` is enforced by named constraints;
//! a violation surfaces as [`UserPersistenceError::Duplicate`] so a race
//! between two registrations still reports a conflict.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{
    NewUserAccount, Nickname, PasswordDigest, User, UserAccount, UserId, UserName, UserStatus,
};

use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

const USER_NAME_CONSTRAINT: &str = "users_user_name_key";
const NICKNAME_CONSTRAINT: &str = "users_nickname_key";

/// Diesel implementation of the user directory.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            UserPersistenceError::connection(message)
        }
    }
}

fn map_diesel_error(error: DieselError) -> UserPersistenceError {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            match info.constraint_name() {
                Some(NICKNAME_CONSTRAINT) => UserPersistenceError::duplicate("nickname"),
                Some(USER_NAME_CONSTRAINT) => UserPersistenceError::duplicate("user_name"),
                _ => UserPersistenceError::query("unique constraint violated"),
            }
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            UserPersistenceError::connection("database connection error")
        }
        DieselError::NotFound => UserPersistenceError::query("record not found"),
        DieselError::QueryBuilderError(_) => UserPersistenceError::query("database query error"),
        _ => UserPersistenceError::query("database error"),
    }
}

fn row_to_account(row: UserRow) -> Result<UserAccount, UserPersistenceError> {
    let corrupt = |err: crate::domain::UserValidationError| {
        UserPersistenceError::query(format!("stored user {} is invalid: {err}", row.id))
    };
    let id = UserId::try_from(row.id).map_err(corrupt)?;
    let user_name = UserName::new(&row.user_name).map_err(corrupt)?;
    let nickname = Nickname::new(&row.nickname).map_err(corrupt)?;
    let status: UserStatus = row.status.parse().map_err(corrupt)?;
    let password_digest = PasswordDigest::new(row.password_digest.as_str()).map_err(corrupt)?;

    let user = User::new(id, user_name, nickname, row.created_at)
        .with_status(status)
        .with_avatar(row.avatar.as_str());
    Ok(UserAccount {
        user,
        password_digest,
    })
}

fn id_for_db(id: &UserId) -> Result<i64, UserPersistenceError> {
    i64::try_from(id.get()).map_err(|_| UserPersistenceError::query("user id out of range"))
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let db_id = id_for_db(id)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .filter(users::id.eq(db_id))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(|row| row_to_account(row).map(|account| account.user))
            .transpose()
    }

    async fn find_account_by_user_name(
        &self,
        user_name: &UserName,
    ) -> Result<Option<UserAccount>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .filter(users::user_name.eq(user_name.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_account).transpose()
    }

    async fn nickname_exists(&self, nickname: &Nickname) -> Result<bool, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::select(diesel::dsl::exists(
            users::table.filter(users::nickname.eq(nickname.as_ref())),
        ))
        .get_result(&mut conn)
        .await
        .map_err(map_diesel_error)
    }

    async fn user_name_exists(&self, user_name: &UserName) -> Result<bool, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::select(diesel::dsl::exists(
            users::table.filter(users::user_name.eq(user_name.as_ref())),
        ))
        .get_result(&mut conn)
        .await
        .map_err(map_diesel_error)
    }

    async fn insert(&self, account: &NewUserAccount) -> Result<User, UserPersistenceError> {
        let new_row = NewUserRow {
            user_name: account.user_name.as_ref(),
            nickname: account.nickname.as_ref(),
            password_digest: account.password_digest.as_ref(),
            status: account.status.as_str(),
        };
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: UserRow = diesel::insert_into(users::table)
            .values(&new_row)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row_to_account(row).map(|account| account.user)
    }
}
