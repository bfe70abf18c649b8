//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{AccessGate, AccountCommand, InventoryCommand, InventoryQuery};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub access: Arc<dyn AccessGate>,
    pub accounts: Arc<dyn AccountCommand>,
    pub inventory: Arc<dyn InventoryCommand>,
    pub catalogue: Arc<dyn InventoryQuery>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub access: Arc<dyn AccessGate>,
    pub accounts: Arc<dyn AccountCommand>,
    pub inventory: Arc<dyn InventoryCommand>,
    pub catalogue: Arc<dyn InventoryQuery>,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Construct state from a ports bundle.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use mockable::DefaultClock;
    /// use sweetshop::domain::{AccountService, InventoryService, TokenAccessGate};
    /// use sweetshop::inbound::http::state::{HttpState, HttpStatePorts};
    /// use sweetshop::outbound::memory::{MemorySweetRepository, MemoryUserRepository};
    /// use sweetshop::outbound::security::{
    ///     Argon2PasswordHasher, DEFAULT_TOKEN_TTL, JwtTokenService,
    /// };
    ///
    /// let clock = Arc::new(DefaultClock);
    /// let users = Arc::new(MemoryUserRepository::new());
    /// let tokens = Arc::new(
    ///     JwtTokenService::new(b"secret", DEFAULT_TOKEN_TTL, clock.clone()).expect("config"),
    /// );
    /// let inventory = Arc::new(InventoryService::new(
    ///     Arc::new(MemorySweetRepository::new()),
    ///     clock.clone(),
    /// ));
    /// let state = HttpState::new(HttpStatePorts {
    ///     access: Arc::new(TokenAccessGate::new(users.clone(), tokens.clone())),
    ///     accounts: Arc::new(AccountService::new(
    ///         users,
    ///         Arc::new(Argon2PasswordHasher::default()),
    ///         tokens,
    ///         clock,
    ///     )),
    ///     inventory: inventory.clone(),
    ///     catalogue: inventory,
    /// });
    /// let _gate = state.access.clone();
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            access,
            accounts,
            inventory,
            catalogue,
        } = ports;
        Self {
            access,
            accounts,
            inventory,
            catalogue,
        }
    }
}
