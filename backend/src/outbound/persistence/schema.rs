//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered accounts.
    users (id) {
        id -> Int8,
        /// Display name, 3 to 32 characters.
        username -> Varchar,
        /// Lower-cased login email; unique.
        email -> Varchar,
        /// Self-describing Argon2 hash string.
        password_hash -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    posts (id) {
        id -> Int8,
        /// Owning user.
        user_id -> Int8,
        title -> Varchar,
        content -> Text,
        /// Number of live comments; only ever changed by relative updates.
        comments_count -> Int8,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    comments (id) {
        id -> Int8,
        post_id -> Int8,
        /// Owning user.
        user_id -> Int8,
        content -> Text,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(posts -> users (user_id));
diesel::joinable!(comments -> posts (post_id));

diesel::allow_tables_to_appear_in_same_query!(comments, posts, users);
