//! Async connection pool for PostgreSQL.
//!
//! Wraps `diesel-async` with `bb8`. Checkout failures surface as
//! [`PoolError`] so repositories can report them as connection problems.

use std::time::Duration;

use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::bb8::{Pool, PooledConnection};

/// Errors raised while building the pool or checking out a connection.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    /// No connection became available in time.
    #[error("failed to get connection from pool: {message}")]
    Checkout {
        /// Underlying failure.
        message: String,
    },

    /// The pool could not be created.
    #[error("failed to build connection pool: {message}")]
    Build {
        /// Underlying failure.
        message: String,
    },
}

impl PoolError {
    /// Construct a checkout error.
    pub fn checkout(message: impl Into<String>) -> Self {
        Self::Checkout {
            message: message.into(),
        }
    }

    /// Construct a build error.
    pub fn build(message: impl Into<String>) -> Self {
        Self::Build {
            message: message.into(),
        }
    }

    /// Underlying failure text.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Checkout { message } | Self::Build { message } => message,
        }
    }
}

/// Pool sizing and timeouts.
///
/// Defaults: ten connections, one kept idle, five-second checkout timeout.
///
/// ```
/// use std::time::Duration;
/// use sweetshop::outbound::persistence::PoolConfig;
///
/// let config = PoolConfig::new("postgres://shop@localhost/sweets")
///     .with_max_size(4)
///     .with_connection_timeout(Duration::from_secs(2));
/// assert_eq!(config.max_size(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct PoolConfig {
    database_url: String,
    max_size: u32,
    min_idle: Option<u32>,
    connection_timeout: Duration,
}

impl PoolConfig {
    /// Configuration for `database_url` with default limits.
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_size: 10,
            min_idle: Some(1),
            connection_timeout: Duration::from_secs(5),
        }
    }

    /// Maximum open connections.
    #[must_use]
    pub fn with_max_size(mut self, max_size: u32) -> Self {
        self.max_size = max_size;
        self
    }

    /// Idle connections kept warm.
    #[must_use]
    pub fn with_min_idle(mut self, min_idle: Option<u32>) -> Self {
        self.min_idle = min_idle;
        self
    }

    /// Checkout timeout.
    #[must_use]
    pub fn with_connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }

    /// Target database.
    #[must_use]
    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    /// Maximum open connections.
    #[must_use]
    pub fn max_size(&self) -> u32 {
        self.max_size
    }
}

/// Shared pool of async PostgreSQL connections.
#[derive(Clone)]
pub struct DbPool {
    inner: Pool<AsyncPgConnection>,
}

impl DbPool {
    /// Build a pool from `config`.
    ///
    /// # Errors
    /// Returns [`PoolError::Build`] when the pool cannot be created.
    pub async fn new(config: PoolConfig) -> Result<Self, PoolError> {
        let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(config.database_url);
        let inner = Pool::builder()
            .max_size(config.max_size)
            .min_idle(config.min_idle)
            .connection_timeout(config.connection_timeout)
            .build(manager)
            .await
            .map_err(|err| PoolError::build(err.to_string()))?;
        Ok(Self { inner })
    }

    /// Check out a connection.
    ///
    /// # Errors
    /// Returns [`PoolError::Checkout`] when none is available in time.
    pub async fn get(&self) -> Result<PooledConnection<'_, AsyncPgConnection>, PoolError> {
        self.inner
            .get()
            .await
            .map_err(|err| PoolError::checkout(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    //! Configuration defaults and error text.
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn defaults_are_conservative() {
        let config = PoolConfig::new("postgres://localhost/sweets");
        assert_eq!(config.database_url(), "postgres://localhost/sweets");
        assert_eq!(config.max_size, 10);
        assert_eq!(config.min_idle, Some(1));
        assert_eq!(config.connection_timeout, Duration::from_secs(5));
    }

    #[rstest]
    fn builder_overrides_limits() {
        let config = PoolConfig::new("postgres://localhost/sweets")
            .with_max_size(3)
            .with_min_idle(None)
            .with_connection_timeout(Duration::from_millis(250));
        assert_eq!(config.max_size(), 3);
        assert_eq!(config.min_idle, None);
        assert_eq!(config.connection_timeout, Duration::from_millis(250));
    }

    #[rstest]
    #[case(PoolError::checkout("timed out"), "timed out")]
    #[case(PoolError::build("bad url"), "bad url")]
    fn errors_expose_message(#[case] error: PoolError, #[case] message: &str) {
        assert_eq!(error.message(), message);
        assert!(error.to_string().contains(message));
    }
}
