//! Diesel table definitions.
//!
//! Must match `backend/migrations` exactly; regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered accounts. `username` and `email` carry unique constraints.
    users (id) {
        id -> Uuid,
        username -> Text,
        /// Stored trimmed and lowercase.
        email -> Text,
        /// Argon2id PHC string.
        password_hash -> Text,
        /// `user` or `admin`.
        role -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Catalogue entries. `price` and `quantity` are checked non-negative.
    sweets (id) {
        id -> Uuid,
        name -> Text,
        category -> Text,
        price -> Float8,
        quantity -> Int4,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::allow_tables_to_appear_in_same_query!(users, sweets);
