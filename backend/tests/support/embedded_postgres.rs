//! Embedded PostgreSQL for the Diesel adapter suites.
//!
//! Each test gets a temporary database on the process-wide shared cluster,
//! migrated with the same embedded migrations the server runs at startup.
//!
//! Set `SKIP_TEST_CLUSTER=1` to skip these suites where the cluster cannot
//! start; otherwise a setup failure fails the test so CI breakage is visible.

use std::time::Duration;

use pg_embedded_setup_unpriv::TemporaryDatabase;
use pg_embedded_setup_unpriv::test_support::shared_cluster_handle;
use sweetshop::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use tokio::runtime::Runtime;

const CLUSTER_RETRIES: usize = 5;
const CLUSTER_RETRY_DELAY: Duration = Duration::from_millis(500);

/// A migrated temporary database and a pool over it.
pub struct MigratedDatabase {
    pub runtime: Runtime,
    pub pool: DbPool,
    _database: TemporaryDatabase,
}

/// Returns true when `SKIP_TEST_CLUSTER` is "1", "true", or "yes".
fn should_skip_test_cluster() -> bool {
    std::env::var("SKIP_TEST_CLUSTER")
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Skip when allowed, otherwise panic with the setup failure.
pub fn handle_cluster_setup_failure<T>(reason: impl std::fmt::Display) -> Option<T> {
    if should_skip_test_cluster() {
        eprintln!("SKIP-TEST-CLUSTER: {reason}");
        None
    } else {
        panic!("Test cluster setup failed: {reason}. Set SKIP_TEST_CLUSTER=1 to skip.");
    }
}

fn temporary_database() -> Result<TemporaryDatabase, String> {
    let mut last_error = String::new();
    for attempt in 1..=CLUSTER_RETRIES {
        let provisioned = shared_cluster_handle()
            .map_err(|err| format!("start cluster: {err:?}"))
            .and_then(|cluster| {
                cluster
                    .temporary_database(format!("test_{}", uuid::Uuid::new_v4().simple()))
                    .map_err(|err| format!("create database: {err:?}"))
            });
        match provisioned {
            Ok(database) => return Ok(database),
            Err(error) => last_error = format!("attempt {attempt}/{CLUSTER_RETRIES}: {error}"),
        }
        std::thread::sleep(CLUSTER_RETRY_DELAY);
    }
    Err(last_error)
}

/// Provision, migrate, and pool a fresh database.
pub fn migrated_database(max_size: u32) -> Result<MigratedDatabase, String> {
    let runtime = Runtime::new().map_err(|err| err.to_string())?;
    let database = temporary_database()?;
    let url = database.url().to_string();

    let pool = runtime.block_on(async {
        run_pending_migrations(&url)
            .await
            .map_err(|err| err.to_string())?;
        DbPool::new(PoolConfig::new(url.as_str()).with_max_size(max_size))
            .await
            .map_err(|err| err.to_string())
    })?;

    Ok(MigratedDatabase {
        runtime,
        pool,
        _database: database,
    })
}
