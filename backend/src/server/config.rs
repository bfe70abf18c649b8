//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::time::Duration;

use rand::RngCore;
use sweetshop::outbound::persistence::DbPool;
use sweetshop::settings::AppSettings;
use tracing::warn;
use zeroize::Zeroizing;

const EPHEMERAL_SECRET_LEN: usize = 32;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) signing_secret: Zeroizing<Vec<u8>>,
    pub(crate) token_ttl: Duration,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) admin_password: Option<Zeroizing<String>>,
}

impl ServerConfig {
    /// Construct a server configuration from a bind address and token settings.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, signing_secret: Zeroizing<Vec<u8>>, token_ttl: Duration) -> Self {
        Self {
            bind_addr,
            signing_secret,
            token_ttl,
            db_pool: None,
            admin_password: None,
        }
    }

    /// Attach a database connection pool for persistence adapters.
    ///
    /// When absent the server keeps users and sweets in memory.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Seed the admin account and sample sweets at startup with `password`.
    #[must_use]
    pub fn with_seed_admin_password(mut self, password: Option<&str>) -> Self {
        self.admin_password = password.map(|value| Zeroizing::new(value.to_owned()));
        self
    }
}

/// Failure to obtain a token signing secret.
#[derive(Debug, thiserror::Error)]
#[error(
    "no JWT secret configured; set SWEETSHOP_JWT_SECRET or SWEETSHOP_ALLOW_EPHEMERAL_SECRET=true"
)]
pub struct MissingSecret;

/// Resolve the signing secret from settings.
///
/// Debug builds, or an explicit opt-in, fall back to a random secret that
/// invalidates every token on restart.
///
/// # Errors
/// Returns [`MissingSecret`] in release builds without a configured secret.
pub fn signing_secret(settings: &AppSettings) -> Result<Zeroizing<Vec<u8>>, MissingSecret> {
    if let Some(secret) = settings
        .jwt_secret
        .as_deref()
        .filter(|secret| !secret.trim().is_empty())
    {
        return Ok(Zeroizing::new(secret.as_bytes().to_vec()));
    }
    if cfg!(debug_assertions) || settings.allow_ephemeral_secret {
        warn!("using ephemeral JWT secret (dev only); tokens will not survive restarts");
        let mut bytes = Zeroizing::new(vec![0_u8; EPHEMERAL_SECRET_LEN]);
        rand::thread_rng().fill_bytes(bytes.as_mut_slice());
        return Ok(bytes);
    }
    Err(MissingSecret)
}
