//! PostgreSQL persistence adapters built on Diesel.
//!
//! Row structs and table definitions stay private to this module; only the
//! repositories, the pool, and the migration runner are exported.

mod diesel_error_mapping;
mod diesel_sweet_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_sweet_repository::DieselSweetRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
