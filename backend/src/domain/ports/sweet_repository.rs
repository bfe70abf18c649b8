//! Port abstraction for catalogue persistence adapters.
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{SearchFilters, StockAdjustment, StockOutcome, Sweet, SweetId, SweetPatch};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by sweet repository adapters.
    pub enum SweetRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "sweet repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "sweet repository query failed: {message}",
    }
}

/// Catalogue store.
///
/// Every listing is ordered newest first with ties broken by id.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SweetRepository: Send + Sync {
    /// All sweets.
    async fn list(&self) -> Result<Vec<Sweet>, SweetRepositoryError>;

    /// Sweets matching every filter.
    async fn search(&self, filters: &SearchFilters) -> Result<Vec<Sweet>, SweetRepositoryError>;

    /// Fetch one sweet.
    async fn find_by_id(&self, id: &SweetId) -> Result<Option<Sweet>, SweetRepositoryError>;

    /// Whether a sweet with exactly this name exists.
    async fn exists_by_name(&self, name: &str) -> Result<bool, SweetRepositoryError>;

    /// Persist a new sweet.
    async fn insert(&self, sweet: &Sweet) -> Result<(), SweetRepositoryError>;

    /// Apply `patch` in a single write; `None` when the sweet is missing.
    async fn update(
        &self,
        id: &SweetId,
        patch: &SweetPatch,
        now: DateTime<Utc>,
    ) -> Result<Option<Sweet>, SweetRepositoryError>;

    /// Remove a sweet; `false` when it did not exist.
    async fn delete(&self, id: &SweetId) -> Result<bool, SweetRepositoryError>;

    /// Atomically apply a stock adjustment.
    ///
    /// The check and the write happen as one step: a decrement only applies
    /// when enough stock is on hand and an increment only when the result
    /// stays within bounds. A refused adjustment changes nothing and reports
    /// the quantity observed.
    async fn adjust_stock(
        &self,
        id: &SweetId,
        adjustment: StockAdjustment,
        now: DateTime<Utc>,
    ) -> Result<StockOutcome, SweetRepositoryError>;
}
