//! PostgreSQL-backed `UserRepository`.
//!
//! Uniqueness of username and email is enforced by the table's unique
//! constraints; a violation surfaces as [`UserRepositoryError::Duplicate`].

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::{EmailAddress, PasswordDigest, Role, User, UserId, Username};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error, unique_violation_column};
use super::models::{NewUserRow, UserRow};
use super::pool::DbPool;
use super::schema::users;

/// Diesel implementation of the credential store.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_error(error: diesel::result::Error) -> UserRepositoryError {
    if let Some(field) = unique_violation_column(&error) {
        return UserRepositoryError::duplicate(field);
    }
    map_diesel_error(
        error,
        UserRepositoryError::query,
        UserRepositoryError::connection,
    )
}

fn row_to_user(row: UserRow) -> Result<User, UserRepositoryError> {
    let corrupt = |err: crate::domain::UserValidationError| {
        UserRepositoryError::query(format!("stored user is invalid: {err}"))
    };
    Ok(User::new(
        UserId::from(row.id),
        Username::new(&row.username).map_err(corrupt)?,
        EmailAddress::new(&row.email).map_err(corrupt)?,
        PasswordDigest::new(row.password_hash),
        row.role.parse::<Role>().map_err(corrupt)?,
        row.created_at,
    ))
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, user: &User) -> Result<(), UserRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, UserRepositoryError::connection))?;

        let row = NewUserRow {
            id: *user.id().as_uuid(),
            username: user.username().as_ref(),
            email: user.email().as_ref(),
            password_hash: user.password().as_str(),
            role: user.role().as_str(),
            created_at: user.created_at(),
        };

        diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_error)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, UserRepositoryError::connection))?;

        users::table
            .find(*id.as_uuid())
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(map_error)?
            .map(row_to_user)
            .transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, UserRepositoryError::connection))?;

        users::table
            .filter(users::email.eq(email))
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(map_error)?
            .map(row_to_user)
            .transpose()
    }
}
