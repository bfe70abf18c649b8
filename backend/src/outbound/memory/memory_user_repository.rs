//! In-process `UserRepository` for development and tests.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::{User, UserId};

/// Users held in a lock-guarded map keyed by id.
///
/// The uniqueness check and the insert share one write lock, so concurrent
/// registrations with the same email cannot both succeed.
#[derive(Clone, Default)]
pub struct MemoryUserRepository {
    storage: Arc<RwLock<HashMap<UserId, User>>>,
}

impl MemoryUserRepository {
    /// Empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned(operation: &'static str) -> UserRepositoryError {
    UserRepositoryError::query(format!("user store lock poisoned during {operation}"))
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn insert(&self, user: &User) -> Result<(), UserRepositoryError> {
        let mut storage = self.storage.write().map_err(|_| poisoned("insert"))?;
        for existing in storage.values() {
            if existing.email() == user.email() {
                return Err(UserRepositoryError::duplicate("email"));
            }
            if existing.username() == user.username() {
                return Err(UserRepositoryError::duplicate("username"));
            }
        }
        storage.insert(*user.id(), user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        let storage = self.storage.read().map_err(|_| poisoned("find_by_id"))?;
        Ok(storage.get(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserRepositoryError> {
        let storage = self.storage.read().map_err(|_| poisoned("find_by_email"))?;
        Ok(storage
            .values()
            .find(|user| user.email().as_ref() == email)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    //! Store contract coverage.
    use super::*;
    use crate::domain::{EmailAddress, PasswordDigest, Role, Username};
    use crate::test_support::fixture_timestamp;
    use rstest::rstest;

    fn user(username: &str, email: &str) -> User {
        User::new(
            UserId::random(),
            Username::new(username).expect("valid username"),
            EmailAddress::new(email).expect("valid email"),
            PasswordDigest::new("$argon2id$x"),
            Role::User,
            fixture_timestamp(),
        )
    }

    #[rstest]
    #[case("other", "candy@example.com", "email")]
    #[case("candy", "other@example.com", "username")]
    #[tokio::test]
    async fn rejects_duplicates(
        #[case] username: &str,
        #[case] email: &str,
        #[case] field: &str,
    ) {
        let repo = MemoryUserRepository::new();
        repo.insert(&user("candy", "candy@example.com"))
            .await
            .expect("first insert");

        let error = repo
            .insert(&user(username, email))
            .await
            .expect_err("duplicate");
        assert_eq!(error, UserRepositoryError::duplicate(field));
    }

    #[tokio::test]
    async fn finds_by_id_and_email() {
        let repo = MemoryUserRepository::new();
        let stored = user("candy", "candy@example.com");
        repo.insert(&stored).await.expect("insert");

        let by_id = repo.find_by_id(stored.id()).await.expect("lookup");
        let by_email = repo
            .find_by_email("candy@example.com")
            .await
            .expect("lookup");
        assert_eq!(by_id.as_ref(), Some(&stored));
        assert_eq!(by_email, Some(stored));
        assert!(
            repo.find_by_email("nobody@example.com")
                .await
                .expect("lookup")
                .is_none()
        );
    }
}
