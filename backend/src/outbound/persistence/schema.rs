//! Diesel table definitions; keep in step with `migrations/`.

diesel::table! {
    /// Registered accounts.
    users (id) {
        id -> Int8,
        user_name -> Varchar,
        nickname -> Varchar,
        password_digest -> Text,
        status -> Varchar,
        avatar -> Text,
        created_at -> Timestamptz,
    }
}
