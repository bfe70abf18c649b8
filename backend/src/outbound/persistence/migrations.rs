//! Embedded schema migrations applied at startup.

use diesel::{Connection, PgConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

/// Migrations compiled from `backend/migrations`.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Failures while applying migrations.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    /// The database could not be reached.
    #[error("failed to connect for migrations: {0}")]
    Connect(#[from] diesel::ConnectionError),
    /// A migration failed to apply.
    #[error("failed to apply migrations: {0}")]
    Apply(String),
    /// The blocking migration task panicked or was cancelled.
    #[error("migration task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Apply every pending migration to `database_url`.
///
/// Diesel's migration harness is synchronous, so the work runs on the
/// blocking pool over a dedicated connection.
///
/// # Errors
/// Returns [`MigrationError`] when connecting or applying fails.
pub async fn run_pending_migrations(database_url: &str) -> Result<(), MigrationError> {
    let url = database_url.to_owned();
    tokio::task::spawn_blocking(move || -> Result<(), MigrationError> {
        let mut conn = PgConnection::establish(&url)?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|err| MigrationError::Apply(err.to_string()))?;
        info!(count = applied.len(), "database migrations applied");
        Ok(())
    })
    .await?
}
