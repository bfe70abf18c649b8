//! Registration and login.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::ports::{
    AccountCommand, LoginRequest, PasswordHasher, PasswordHasherError, RegisterRequest,
    TokenService, TokenServiceError, UserRepository, UserRepositoryError,
};
use crate::domain::{
    AccountSession, Error, Identity, LoginCredentials, Registration, Role, User, UserId,
};

const INVALID_LOGIN: &str = "Invalid email or password";

fn map_user_repository_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserRepositoryError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserRepositoryError::Duplicate { field } => {
            Error::invalid_request("User with this email or username already exists")
                .with_details(json!({ "field": field, "code": "already_exists" }))
        }
    }
}

fn map_hasher_error(error: PasswordHasherError) -> Error {
    Error::internal(error.to_string())
}

fn map_token_error(error: TokenServiceError) -> Error {
    Error::internal(error.to_string())
}

/// Account service over a credential store, a hasher, and a token issuer.
#[derive(Clone)]
pub struct AccountService<U, H> {
    users: Arc<U>,
    hasher: Arc<H>,
    tokens: Arc<dyn TokenService>,
    clock: Arc<dyn Clock>,
}

impl<U, H> AccountService<U, H> {
    /// Wire the service to its driven ports.
    pub fn new(
        users: Arc<U>,
        hasher: Arc<H>,
        tokens: Arc<dyn TokenService>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
            clock,
        }
    }

    fn session_for(&self, user: User) -> Result<AccountSession, Error> {
        let token = self
            .tokens
            .issue(&Identity::from(&user))
            .map_err(map_token_error)?;
        Ok(AccountSession { user, token })
    }
}

#[async_trait]
impl<U, H> AccountCommand for AccountService<U, H>
where
    U: UserRepository,
    H: PasswordHasher,
{
    async fn register(&self, request: RegisterRequest) -> Result<AccountSession, Error> {
        let registration = Registration::try_from_parts(
            request.username.as_deref().unwrap_or_default(),
            request.email.as_deref().unwrap_or_default(),
            request.password.as_deref().unwrap_or_default(),
        )?;

        let digest = self
            .hasher
            .hash(registration.password())
            .await
            .map_err(map_hasher_error)?;
        let user = User::new(
            UserId::random(),
            registration.username().clone(),
            registration.email().clone(),
            digest,
            Role::User,
            self.clock.utc(),
        );
        self.users
            .insert(&user)
            .await
            .map_err(map_user_repository_error)?;

        info!(user_id = %user.id(), "user registered");
        self.session_for(user)
    }

    async fn login(&self, request: LoginRequest) -> Result<AccountSession, Error> {
        let credentials = LoginCredentials::try_from_parts(
            request.email.as_deref().unwrap_or_default(),
            request.password.as_deref().unwrap_or_default(),
        )?;

        let Some(user) = self
            .users
            .find_by_email(credentials.email())
            .await
            .map_err(map_user_repository_error)?
        else {
            warn!("login rejected: unknown email");
            return Err(Error::unauthorized(INVALID_LOGIN));
        };

        let matches = self
            .hasher
            .verify(credentials.password(), user.password())
            .await
            .map_err(map_hasher_error)?;
        if !matches {
            warn!(user_id = %user.id(), "login rejected: wrong password");
            return Err(Error::unauthorized(INVALID_LOGIN));
        }

        info!(user_id = %user.id(), "user logged in");
        self.session_for(user)
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
