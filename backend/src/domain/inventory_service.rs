//! Catalogue services implementing the inventory driving ports.
//!
//! Every operation checks the caller's permission first, then validates the
//! raw request, then talks to the repository. Stock changes go through the
//! repository's atomic adjustment so concurrent purchases cannot oversell.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{debug, info};

use crate::domain::ports::{
    InventoryCommand, InventoryQuery, SearchRequest, StockChange, StockRequest, SweetFields,
    SweetRepository, SweetRepositoryError,
};
use crate::domain::{
    Error, Identity, NewSweet, Permission, SearchFilters, StockAdjustment, StockOutcome, Sweet,
    SweetId, SweetPatch, Units, MAX_STOCK,
};

const SWEET_NOT_FOUND: &str = "Sweet not found";

fn map_repository_error(error: SweetRepositoryError) -> Error {
    match error {
        SweetRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("sweet repository unavailable: {message}"))
        }
        SweetRepositoryError::Query { message } => {
            Error::internal(format!("sweet repository error: {message}"))
        }
    }
}

fn not_found(sweet_id: SweetId) -> Error {
    Error::not_found(SWEET_NOT_FOUND).with_details(json!({ "id": sweet_id }))
}

fn require(caller: &Identity, permission: Permission) -> Result<(), Error> {
    caller.require(permission).map(|_| ()).map_err(Error::from)
}

/// Inventory service over a sweet repository.
#[derive(Clone)]
pub struct InventoryService<R> {
    sweets: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> InventoryService<R> {
    /// Create a service backed by `sweets`, stamping mutations with `clock`.
    pub fn new(sweets: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { sweets, clock }
    }
}

impl<R> InventoryService<R>
where
    R: SweetRepository,
{
    async fn adjust(
        &self,
        sweet_id: SweetId,
        adjustment: StockAdjustment,
    ) -> Result<StockChange, Error> {
        let outcome = self
            .sweets
            .adjust_stock(&sweet_id, adjustment, self.clock.utc())
            .await
            .map_err(map_repository_error)?;

        match outcome {
            StockOutcome::Adjusted(sweet) => Ok(StockChange {
                sweet,
                units: adjustment.units(),
            }),
            StockOutcome::NotFound => Err(not_found(sweet_id)),
            StockOutcome::Rejected { available } => Err(rejection(adjustment, available.get())),
        }
    }
}

fn rejection(adjustment: StockAdjustment, available: u32) -> Error {
    match adjustment {
        StockAdjustment::Decrement(_) if available == 0 => Error::invalid_request("Out of stock")
            .with_details(json!({ "code": "out_of_stock", "available": 0 })),
        StockAdjustment::Decrement(units) => Error::invalid_request(format!(
            "Insufficient stock. Only {available} items available"
        ))
        .with_details(json!({
            "code": "insufficient_stock",
            "available": available,
            "requested": units.get(),
        })),
        StockAdjustment::Increment(units) => Error::invalid_request(format!(
            "Restock would exceed the maximum stock of {MAX_STOCK}"
        ))
        .with_details(json!({
            "code": "stock_limit",
            "available": available,
            "requested": units.get(),
        })),
    }
}

#[async_trait]
impl<R> InventoryQuery for InventoryService<R>
where
    R: SweetRepository,
{
    async fn list(&self, caller: &Identity) -> Result<Vec<Sweet>, Error> {
        require(caller, Permission::ViewCatalog)?;
        self.sweets.list().await.map_err(map_repository_error)
    }

    async fn search(&self, caller: &Identity, request: SearchRequest) -> Result<Vec<Sweet>, Error> {
        require(caller, Permission::ViewCatalog)?;
        let filters = SearchFilters::try_from_parts(
            request.name.as_deref(),
            request.category.as_deref(),
            request.min_price,
            request.max_price,
        )?;
        debug!(?filters, "searching catalogue");
        self.sweets
            .search(&filters)
            .await
            .map_err(map_repository_error)
    }
}

#[async_trait]
impl<R> InventoryCommand for InventoryService<R>
where
    R: SweetRepository,
{
    async fn create(&self, caller: &Identity, fields: SweetFields) -> Result<Sweet, Error> {
        require(caller, Permission::EditCatalog)?;
        let draft = NewSweet::try_from_parts(
            fields.name.as_deref(),
            fields.category.as_deref(),
            fields.price,
            fields.quantity,
        )?;
        let sweet = Sweet::create(SweetId::random(), draft, self.clock.utc());
        self.sweets
            .insert(&sweet)
            .await
            .map_err(map_repository_error)?;
        info!(sweet_id = %sweet.id(), user_id = %caller.id(), "sweet created");
        Ok(sweet)
    }

    async fn update(
        &self,
        caller: &Identity,
        sweet_id: SweetId,
        fields: SweetFields,
    ) -> Result<Sweet, Error> {
        require(caller, Permission::EditCatalog)?;
        let patch = SweetPatch::try_from_parts(
            fields.name.as_deref(),
            fields.category.as_deref(),
            fields.price,
            fields.quantity,
        )?;
        let updated = self
            .sweets
            .update(&sweet_id, &patch, self.clock.utc())
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| not_found(sweet_id))?;
        info!(%sweet_id, user_id = %caller.id(), "sweet updated");
        Ok(updated)
    }

    async fn delete(&self, caller: &Identity, sweet_id: SweetId) -> Result<(), Error> {
        require(caller, Permission::DeleteSweet)?;
        let removed = self
            .sweets
            .delete(&sweet_id)
            .await
            .map_err(map_repository_error)?;
        if !removed {
            return Err(not_found(sweet_id));
        }
        info!(%sweet_id, user_id = %caller.id(), "sweet deleted");
        Ok(())
    }

    async fn purchase(
        &self,
        caller: &Identity,
        request: StockRequest,
    ) -> Result<StockChange, Error> {
        require(caller, Permission::Purchase)?;
        let units = Units::try_from_raw(request.quantity)?;
        let change = self
            .adjust(request.sweet_id, StockAdjustment::Decrement(units))
            .await?;
        info!(
            sweet_id = %request.sweet_id,
            user_id = %caller.id(),
            units = units.get(),
            remaining = change.sweet.quantity().get(),
            "sweet purchased"
        );
        Ok(change)
    }

    async fn restock(&self, caller: &Identity, request: StockRequest) -> Result<StockChange, Error> {
        require(caller, Permission::Restock)?;
        let units = Units::try_from_raw(request.quantity)?;
        let change = self
            .adjust(request.sweet_id, StockAdjustment::Increment(units))
            .await?;
        info!(
            sweet_id = %request.sweet_id,
            user_id = %caller.id(),
            units = units.get(),
            on_hand = change.sweet.quantity().get(),
            "sweet restocked"
        );
        Ok(change)
    }
}

#[cfg(test)]
#[path = "inventory_service_tests.rs"]
mod tests;
