//! In-process `SweetRepository` for development and tests.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ports::{SweetRepository, SweetRepositoryError};
use crate::domain::{
    SearchFilters, StockAdjustment, StockOutcome, Sweet, SweetId, SweetPatch, newest_first,
};

/// Sweets held in a lock-guarded map keyed by id.
///
/// Stock adjustments read, check, and write under one write lock, matching
/// the atomic conditional update of the PostgreSQL adapter.
#[derive(Clone, Default)]
pub struct MemorySweetRepository {
    storage: Arc<RwLock<HashMap<SweetId, Sweet>>>,
}

impl MemorySweetRepository {
    /// Empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn collect<F>(&self, keep: F) -> Result<Vec<Sweet>, SweetRepositoryError>
    where
        F: Fn(&Sweet) -> bool,
    {
        let storage = self.storage.read().map_err(|_| poisoned("read"))?;
        let mut sweets: Vec<Sweet> = storage.values().filter(|s| keep(s)).cloned().collect();
        sweets.sort_by(newest_first);
        Ok(sweets)
    }
}

fn poisoned(operation: &'static str) -> SweetRepositoryError {
    SweetRepositoryError::query(format!("sweet store lock poisoned during {operation}"))
}

#[async_trait]
impl SweetRepository for MemorySweetRepository {
    async fn list(&self) -> Result<Vec<Sweet>, SweetRepositoryError> {
        self.collect(|_| true)
    }

    async fn search(&self, filters: &SearchFilters) -> Result<Vec<Sweet>, SweetRepositoryError> {
        self.collect(|sweet| sweet.matches(filters))
    }

    async fn find_by_id(&self, id: &SweetId) -> Result<Option<Sweet>, SweetRepositoryError> {
        let storage = self.storage.read().map_err(|_| poisoned("read"))?;
        Ok(storage.get(id).cloned())
    }

    async fn exists_by_name(&self, name: &str) -> Result<bool, SweetRepositoryError> {
        let storage = self.storage.read().map_err(|_| poisoned("read"))?;
        Ok(storage.values().any(|sweet| sweet.name() == name))
    }

    async fn insert(&self, sweet: &Sweet) -> Result<(), SweetRepositoryError> {
        let mut storage = self.storage.write().map_err(|_| poisoned("insert"))?;
        storage.insert(sweet.id(), sweet.clone());
        Ok(())
    }

    async fn update(
        &self,
        id: &SweetId,
        patch: &SweetPatch,
        now: DateTime<Utc>,
    ) -> Result<Option<Sweet>, SweetRepositoryError> {
        let mut storage = self.storage.write().map_err(|_| poisoned("update"))?;
        Ok(storage.get_mut(id).map(|sweet| {
            *sweet = sweet.patched(patch, now);
            sweet.clone()
        }))
    }

    async fn delete(&self, id: &SweetId) -> Result<bool, SweetRepositoryError> {
        let mut storage = self.storage.write().map_err(|_| poisoned("delete"))?;
        Ok(storage.remove(id).is_some())
    }

    async fn adjust_stock(
        &self,
        id: &SweetId,
        adjustment: StockAdjustment,
        now: DateTime<Utc>,
    ) -> Result<StockOutcome, SweetRepositoryError> {
        let mut storage = self.storage.write().map_err(|_| poisoned("adjust_stock"))?;
        let Some(sweet) = storage.get_mut(id) else {
            return Ok(StockOutcome::NotFound);
        };
        let available = sweet.quantity();
        Ok(match available.apply(adjustment) {
            Some(level) => {
                *sweet = sweet.with_quantity(level, now);
                StockOutcome::Adjusted(sweet.clone())
            }
            None => StockOutcome::Rejected { available },
        })
    }
}
