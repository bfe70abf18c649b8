//! Driving port for catalogue reads.

use async_trait::async_trait;

use crate::domain::{Error, Identity, Sweet};

/// Raw search input. Blank text filters count as absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchRequest {
    /// Case-insensitive name substring.
    pub name: Option<String>,
    /// Case-insensitive category substring.
    pub category: Option<String>,
    /// Inclusive lower price bound.
    pub min_price: Option<f64>,
    /// Inclusive upper price bound.
    pub max_price: Option<f64>,
}

/// Catalogue read use cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InventoryQuery: Send + Sync {
    /// All sweets, newest first.
    async fn list(&self, caller: &Identity) -> Result<Vec<Sweet>, Error>;

    /// Sweets matching every supplied filter, newest first.
    async fn search(&self, caller: &Identity, request: SearchRequest) -> Result<Vec<Sweet>, Error>;
}
