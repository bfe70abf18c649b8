//! Diesel row structs. Never exposed outside the persistence adapters.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{sweets, users};

/// Row read from `users`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

/// Row inserted into `users`.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub role: &'a str,
    pub created_at: DateTime<Utc>,
}

/// Row read from `sweets`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = sweets)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct SweetRow {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row inserted into `sweets`.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = sweets)]
pub(crate) struct NewSweetRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub category: &'a str,
    pub price: f64,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update for `sweets`; `None` fields are left untouched.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = sweets)]
pub(crate) struct SweetChangeset<'a> {
    pub name: Option<&'a str>,
    pub category: Option<&'a str>,
    pub price: Option<f64>,
    pub quantity: Option<i32>,
    pub updated_at: DateTime<Utc>,
}
