//! Shared wiring for HTTP integration tests.
//!
//! Integration tests compile as separate crates under `backend/tests/`, so the
//! application assembly they all need lives here: memory stores seeded with
//! the admin account and sample sweets, real JWT tokens, and a cheap Argon2
//! configuration.

use std::sync::Arc;
use std::time::Duration;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use mockable::{Clock, DefaultClock};
use sweetshop::Trace;
use sweetshop::domain::ports::TokenService;
use sweetshop::domain::{AccountService, InventoryService, TokenAccessGate};
use sweetshop::inbound::http::configure_api;
use sweetshop::inbound::http::health::{HealthState, banner, health, live, ready};
use sweetshop::inbound::http::state::{HttpState, HttpStatePorts};
use sweetshop::outbound::memory::{MemorySweetRepository, MemoryUserRepository};
use sweetshop::outbound::security::{Argon2PasswordHasher, JwtTokenService};
use sweetshop::seed::{SeedTargets, seed};

/// Password given to the seeded admin account.
pub const ADMIN_PASSWORD: &str = "admin123";

const TEST_SECRET: &[u8] = b"integration-test-signing-secret";

/// HTTP state over freshly seeded memory stores.
pub async fn seeded_state() -> web::Data<HttpState> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let users = Arc::new(MemoryUserRepository::new());
    let sweets = Arc::new(MemorySweetRepository::new());
    let hasher = Arc::new(Argon2PasswordHasher::with_cost(1024, 1, 1).expect("argon2 params"));
    let tokens: Arc<dyn TokenService> = Arc::new(
        JwtTokenService::new(TEST_SECRET, Duration::from_secs(3600), clock.clone())
            .expect("token service"),
    );

    seed(
        SeedTargets {
            users: users.as_ref(),
            hasher: hasher.as_ref(),
            sweets: sweets.as_ref(),
            clock: clock.as_ref(),
        },
        ADMIN_PASSWORD,
    )
    .await
    .expect("seed memory stores");

    let inventory = Arc::new(InventoryService::new(sweets, clock.clone()));
    web::Data::new(HttpState::new(HttpStatePorts {
        access: Arc::new(TokenAccessGate::new(users.clone(), tokens.clone())),
        accounts: Arc::new(AccountService::new(users, hasher, tokens, clock)),
        inventory: inventory.clone(),
        catalogue: inventory,
    }))
}

/// The full application as the server binary mounts it, minus Swagger UI.
pub fn app(
    state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let health_state = web::Data::new(HealthState::new());
    health_state.mark_ready();
    App::new()
        .app_data(health_state)
        .app_data(state)
        .wrap(Trace)
        .configure(configure_api)
        .service(banner)
        .service(health)
        .service(ready)
        .service(live)
}
