//! Internal Diesel row structs; never exposed to the domain.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::users;

/// Row read from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i64,
    pub user_name: String,
    pub nickname: String,
    pub password_digest: String,
    pub status: String,
    pub avatar: String,
    pub created_at: DateTime<Utc>,
}

/// Insertable user; the database assigns `id`, `avatar` and `created_at`.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub user_name: &'a str,
    pub nickname: &'a str,
    pub password_digest: &'a str,
    pub status: &'a str,
}
