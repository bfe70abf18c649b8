//! Driving port for catalogue mutations.
//!
//! Requests carry raw values; the service checks the caller's permission
//! before validating them, so an unauthorised caller learns nothing about
//! the payload.

use async_trait::async_trait;

use crate::domain::{Error, Identity, Sweet, SweetId, Units};

/// Raw sweet fields as received. Missing fields are `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SweetFields {
    /// Display name.
    pub name: Option<String>,
    /// Category.
    pub category: Option<String>,
    /// Unit price.
    pub price: Option<f64>,
    /// Stock on hand.
    pub quantity: Option<i64>,
}

/// Purchase or restock request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockRequest {
    /// Target sweet.
    pub sweet_id: SweetId,
    /// Requested amount; must be a positive integer.
    pub quantity: Option<i64>,
}

/// Result of a purchase or restock.
#[derive(Debug, Clone, PartialEq)]
pub struct StockChange {
    /// Sweet after the change.
    pub sweet: Sweet,
    /// Units moved.
    pub units: Units,
}

/// Catalogue mutation use cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InventoryCommand: Send + Sync {
    /// Add a sweet.
    async fn create(&self, caller: &Identity, fields: SweetFields) -> Result<Sweet, Error>;

    /// Change provided fields of a sweet.
    async fn update(
        &self,
        caller: &Identity,
        sweet_id: SweetId,
        fields: SweetFields,
    ) -> Result<Sweet, Error>;

    /// Remove a sweet. Admin only.
    async fn delete(&self, caller: &Identity, sweet_id: SweetId) -> Result<(), Error>;

    /// Buy stock.
    async fn purchase(&self, caller: &Identity, request: StockRequest)
    -> Result<StockChange, Error>;

    /// Add stock. Admin only.
    async fn restock(&self, caller: &Identity, request: StockRequest) -> Result<StockChange, Error>;
}
