//! Driving port for registration and login.

use async_trait::async_trait;

use crate::domain::{AccountSession, Error};

/// Raw registration input. Missing fields are `None`.
#[derive(Debug, Clone, Default)]
pub struct RegisterRequest {
    /// Requested username.
    pub username: Option<String>,
    /// Email address.
    pub email: Option<String>,
    /// Plain password.
    pub password: Option<String>,
}

/// Raw login input. Missing fields are `None`.
#[derive(Debug, Clone, Default)]
pub struct LoginRequest {
    /// Email address.
    pub email: Option<String>,
    /// Plain password.
    pub password: Option<String>,
}

/// Account use cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountCommand: Send + Sync {
    /// Create an account with role `user` and issue a token.
    async fn register(&self, request: RegisterRequest) -> Result<AccountSession, Error>;

    /// Check credentials and issue a token.
    async fn login(&self, request: LoginRequest) -> Result<AccountSession, Error>;
}
