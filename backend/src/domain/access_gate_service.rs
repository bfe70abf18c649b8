//! Bearer-token access gate.
//!
//! The pipeline is: extract bearer token, verify it, resolve the subject
//! against the credential store. The identity carries the stored email and
//! role, never the values frozen into the token.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error};

use crate::domain::ports::{AccessGate, TokenService, UserRepository};
use crate::domain::{AccessError, Identity};

/// Extract the token from a `Bearer <token>` header value.
///
/// The scheme is matched case-insensitively. `None` when the header is
/// absent, uses another scheme, or carries an empty token.
#[must_use]
pub fn bearer_token(authorization: Option<&str>) -> Option<&str> {
    let (scheme, token) = authorization?.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Access gate backed by a token verifier and the credential store.
#[derive(Clone)]
pub struct TokenAccessGate<U> {
    users: Arc<U>,
    tokens: Arc<dyn TokenService>,
}

impl<U> TokenAccessGate<U> {
    /// Create a gate over `users` and `tokens`.
    pub fn new(users: Arc<U>, tokens: Arc<dyn TokenService>) -> Self {
        Self { users, tokens }
    }
}

#[async_trait]
impl<U> AccessGate for TokenAccessGate<U>
where
    U: UserRepository,
{
    async fn authenticate(&self, authorization: Option<&str>) -> Result<Identity, AccessError> {
        let token = bearer_token(authorization).ok_or(AccessError::MissingToken)?;

        let claims = self.tokens.verify(token).map_err(|err| {
            debug!(error = %err, "token verification failed");
            AccessError::InvalidToken
        })?;

        let user = self
            .users
            .find_by_id(&claims.user_id)
            .await
            .map_err(|err| {
                error!(error = %err, "identity lookup failed");
                AccessError::Store(err)
            })?
            .ok_or(AccessError::StaleIdentity)?;

        Ok(Identity::from(&user))
    }
}
