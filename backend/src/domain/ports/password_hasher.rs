//! Port for password hashing.
use async_trait::async_trait;

use crate::domain::PasswordDigest;

use super::define_port_error;

define_port_error! {
    /// Failures raised by password hashing adapters.
    pub enum PasswordHasherError {
        /// Hashing or verification could not run.
        Hashing { message: String } => "password hashing failed: {message}",
        /// A stored digest could not be parsed.
        MalformedDigest { message: String } => "stored password digest is malformed: {message}",
    }
}

/// Hashes and verifies passwords.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    /// Produce a salted digest for `password`.
    async fn hash(&self, password: &str) -> Result<PasswordDigest, PasswordHasherError>;

    /// Check `password` against `digest`.
    async fn verify(
        &self,
        password: &str,
        digest: &PasswordDigest,
    ) -> Result<bool, PasswordHasherError>;
}
