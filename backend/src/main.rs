//! Sweet shop entry-point: loads settings, prepares stores, and serves the API.

mod server;

use actix_web::web;
use color_eyre::eyre::{Context, Result, eyre};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use sweetshop::inbound::http::health::HealthState;
use sweetshop::outbound::persistence::{DbPool, run_pending_migrations};
use sweetshop::settings::AppSettings;

use server::{ServerConfig, create_server, signing_secret};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load_from_iter(std::env::args_os())
        .map_err(|err| eyre!("failed to load configuration: {err}"))?;
    let bind_addr = settings.bind_addr()?;
    let secret = signing_secret(&settings)?;
    let admin_password = settings.seed_admin_password()?;

    let mut config = ServerConfig::new(bind_addr, secret, settings.token_ttl())
        .with_seed_admin_password(admin_password);
    if let Some(url) = settings.database_url.as_deref() {
        run_pending_migrations(url)
            .await
            .wrap_err("failed to migrate database")?;
        let pool = DbPool::new(settings.pool_config(url))
            .await
            .wrap_err("failed to build database pool")?;
        config = config.with_db_pool(pool);
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)
        .await
        .wrap_err_with(|| format!("failed to start server on {bind_addr}"))?;
    info!(%bind_addr, "Sweet Shop Management API is running!");
    server.await.wrap_err("server terminated abnormally")
}
