//! Port abstraction for account persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// A unique username or email already exists.
        Duplicate { field: String } => "user with this {field} already exists",
    }
}

/// Credential store.
///
/// Adapters enforce username and email uniqueness inside the store so
/// concurrent registrations cannot both succeed.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user, failing with [`UserRepositoryError::Duplicate`]
    /// when the username or email is taken.
    async fn insert(&self, user: &User) -> Result<(), UserRepositoryError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError>;

    /// Fetch a user by normalised email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserRepositoryError>;
}
