//! Argon2id implementation of the `PasswordHasher` port.
//!
//! Hashing is CPU-bound, so both operations run on Tokio's blocking pool.

use argon2::password_hash::{
    Error as PasswordHashError, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString,
};
use argon2::{Algorithm, Argon2, Params, Version};
use async_trait::async_trait;
use rand::rngs::OsRng;
use zeroize::Zeroizing;

use crate::domain::PasswordDigest;
use crate::domain::ports::{PasswordHasher, PasswordHasherError};

/// Argon2id hasher producing PHC strings.
#[derive(Debug, Clone)]
pub struct Argon2PasswordHasher {
    params: Params,
}

impl Default for Argon2PasswordHasher {
    fn default() -> Self {
        Self {
            params: Params::default(),
        }
    }
}

impl Argon2PasswordHasher {
    /// Hasher with explicit cost parameters.
    ///
    /// Low costs keep tests fast; production uses [`Default`].
    ///
    /// # Errors
    /// Returns [`PasswordHasherError::Hashing`] when the parameters are out
    /// of range for Argon2.
    pub fn with_cost(
        memory_kib: u32,
        iterations: u32,
        parallelism: u32,
    ) -> Result<Self, PasswordHasherError> {
        let params = Params::new(memory_kib, iterations, parallelism, None)
            .map_err(|err| PasswordHasherError::hashing(err.to_string()))?;
        Ok(Self { params })
    }

    fn engine(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

#[async_trait]
impl PasswordHasher for Argon2PasswordHasher {
    async fn hash(&self, password: &str) -> Result<PasswordDigest, PasswordHasherError> {
        let engine = self.engine();
        let password = Zeroizing::new(password.to_owned());
        tokio::task::spawn_blocking(move || {
            let salt = SaltString::generate(&mut OsRng);
            engine
                .hash_password(password.as_bytes(), &salt)
                .map(|hash| PasswordDigest::new(hash.to_string()))
                .map_err(|err| PasswordHasherError::hashing(err.to_string()))
        })
        .await
        .map_err(|err| PasswordHasherError::hashing(err.to_string()))?
    }

    async fn verify(
        &self,
        password: &str,
        digest: &PasswordDigest,
    ) -> Result<bool, PasswordHasherError> {
        let engine = self.engine();
        let password = Zeroizing::new(password.to_owned());
        let digest = digest.as_str().to_owned();
        tokio::task::spawn_blocking(move || {
            let parsed = PasswordHash::new(&digest)
                .map_err(|err| PasswordHasherError::malformed_digest(err.to_string()))?;
            match engine.verify_password(password.as_bytes(), &parsed) {
                Ok(()) => Ok(true),
                Err(PasswordHashError::Password) => Ok(false),
                Err(err) => Err(PasswordHasherError::hashing(err.to_string())),
            }
        })
        .await
        .map_err(|err| PasswordHasherError::hashing(err.to_string()))?
    }
}
