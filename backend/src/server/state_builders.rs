//! Builders for HTTP state over either adapter family.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use tracing::{info, warn};

use sweetshop::domain::ports::{SweetRepository, TokenService, UserRepository};
use sweetshop::domain::{AccountService, InventoryService, TokenAccessGate};
use sweetshop::inbound::http::state::{HttpState, HttpStatePorts};
use sweetshop::outbound::memory::{MemorySweetRepository, MemoryUserRepository};
use sweetshop::outbound::persistence::{DieselSweetRepository, DieselUserRepository};
use sweetshop::outbound::security::{Argon2PasswordHasher, JwtTokenService};
use sweetshop::seed::{SeedTargets, seed};

use super::ServerConfig;

/// Collaborators shared by both adapter families.
struct Collaborators<'a> {
    hasher: Arc<Argon2PasswordHasher>,
    tokens: Arc<dyn TokenService>,
    clock: Arc<dyn Clock>,
    admin_password: Option<&'a str>,
}

/// Seed when requested, then wire services over `users` and `sweets`.
async fn assemble<U, S>(
    users: Arc<U>,
    sweets: Arc<S>,
    deps: Collaborators<'_>,
) -> std::io::Result<HttpState>
where
    U: UserRepository + 'static,
    S: SweetRepository + 'static,
{
    if let Some(password) = deps.admin_password {
        let targets = SeedTargets {
            users: users.as_ref(),
            hasher: deps.hasher.as_ref(),
            sweets: sweets.as_ref(),
            clock: deps.clock.as_ref(),
        };
        seed(targets, password)
            .await
            .map_err(|err| std::io::Error::other(format!("seeding failed: {err}")))?;
    }

    let inventory = Arc::new(InventoryService::new(sweets, deps.clock.clone()));
    Ok(HttpState::new(HttpStatePorts {
        access: Arc::new(TokenAccessGate::new(users.clone(), deps.tokens.clone())),
        accounts: Arc::new(AccountService::new(
            users,
            deps.hasher,
            deps.tokens,
            deps.clock,
        )),
        inventory: inventory.clone(),
        catalogue: inventory,
    }))
}

/// Build HTTP state, using PostgreSQL adapters when a pool is configured and
/// in-memory adapters otherwise.
///
/// # Errors
/// Returns [`std::io::Error`] when the token service cannot be configured or
/// seeding fails.
pub(crate) async fn build_http_state(config: &ServerConfig) -> std::io::Result<HttpState> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let tokens = JwtTokenService::new(&config.signing_secret, config.token_ttl, clock.clone())
        .map_err(|err| std::io::Error::other(err.to_string()))?;
    let deps = Collaborators {
        hasher: Arc::new(Argon2PasswordHasher::default()),
        tokens: Arc::new(tokens),
        clock,
        admin_password: config.admin_password.as_ref().map(|password| password.as_str()),
    };

    match &config.db_pool {
        Some(pool) => {
            info!("using PostgreSQL stores");
            assemble(
                Arc::new(DieselUserRepository::new(pool.clone())),
                Arc::new(DieselSweetRepository::new(pool.clone())),
                deps,
            )
            .await
        }
        None => {
            warn!("no database configured; users and sweets are kept in memory");
            assemble(
                Arc::new(MemoryUserRepository::new()),
                Arc::new(MemorySweetRepository::new()),
                deps,
            )
            .await
        }
    }
}
