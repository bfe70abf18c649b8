//! PostgreSQL-backed `SweetRepository`.
//!
//! Stock adjustments lock the row with `SELECT ... FOR UPDATE`, decide with
//! [`StockLevel::apply`], and write inside the same transaction. A refusal
//! reports the quantity that was locked, so concurrent restocks cannot leak
//! into the message.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::AsyncConnection as _;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::domain::ports::{SweetRepository, SweetRepositoryError};
use crate::domain::{
    Label, Price, SearchFilters, StockAdjustment, StockLevel, StockOutcome, Sweet,
    SweetId, SweetPatch,
};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewSweetRow, SweetChangeset, SweetRow};
use super::pool::DbPool;
use super::schema::sweets;

/// Diesel implementation of the catalogue store.
#[derive(Clone)]
pub struct DieselSweetRepository {
    pool: DbPool,
}

impl DieselSweetRepository {
    /// Create a repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn connection(
        &self,
    ) -> Result<
        diesel_async::pooled_connection::bb8::PooledConnection<'_, AsyncPgConnection>,
        SweetRepositoryError,
    > {
        self.pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, SweetRepositoryError::connection))
    }
}

fn map_error(error: diesel::result::Error) -> SweetRepositoryError {
    map_diesel_error(
        error,
        SweetRepositoryError::query,
        SweetRepositoryError::connection,
    )
}

fn column_quantity(level: u32) -> Result<i32, SweetRepositoryError> {
    i32::try_from(level)
        .map_err(|_| SweetRepositoryError::query(format!("quantity {level} exceeds column width")))
}

fn row_to_sweet(row: SweetRow) -> Result<Sweet, SweetRepositoryError> {
    let corrupt = |err: crate::domain::SweetValidationError| {
        SweetRepositoryError::query(format!("stored sweet is invalid: {err}"))
    };
    Ok(Sweet::from_parts(
        SweetId::from(row.id),
        Label::new(&row.name, "name").map_err(corrupt)?,
        Label::new(&row.category, "category").map_err(corrupt)?,
        Price::new(row.price).map_err(corrupt)?,
        StockLevel::new(i64::from(row.quantity)).map_err(corrupt)?,
        row.created_at,
        row.updated_at,
    ))
}

/// What the locked read decided inside the adjustment transaction.
enum LockedAdjustment {
    Missing,
    Refused(i32),
    Applied(SweetRow),
}

fn rows_to_sweets(rows: Vec<SweetRow>) -> Result<Vec<Sweet>, SweetRepositoryError> {
    rows.into_iter().map(row_to_sweet).collect()
}

/// Build an `ILIKE` pattern matching `needle` anywhere, escaping wildcards.
pub(crate) fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

#[async_trait]
impl SweetRepository for DieselSweetRepository {
    async fn list(&self) -> Result<Vec<Sweet>, SweetRepositoryError> {
        let mut conn = self.connection().await?;
        let rows = sweets::table
            .select(SweetRow::as_select())
            .order((sweets::created_at.desc(), sweets::id.asc()))
            .load::<SweetRow>(&mut conn)
            .await
            .map_err(map_error)?;
        rows_to_sweets(rows)
    }

    async fn search(&self, filters: &SearchFilters) -> Result<Vec<Sweet>, SweetRepositoryError> {
        let mut conn = self.connection().await?;
        let mut query = sweets::table.select(SweetRow::as_select()).into_boxed();
        if let Some(name) = filters.name() {
            query = query.filter(sweets::name.ilike(contains_pattern(name)));
        }
        if let Some(category) = filters.category() {
            query = query.filter(sweets::category.ilike(contains_pattern(category)));
        }
        if let Some(min) = filters.min_price() {
            query = query.filter(sweets::price.ge(min));
        }
        if let Some(max) = filters.max_price() {
            query = query.filter(sweets::price.le(max));
        }
        let rows = query
            .order((sweets::created_at.desc(), sweets::id.asc()))
            .load::<SweetRow>(&mut conn)
            .await
            .map_err(map_error)?;
        rows_to_sweets(rows)
    }

    async fn find_by_id(&self, id: &SweetId) -> Result<Option<Sweet>, SweetRepositoryError> {
        let mut conn = self.connection().await?;
        sweets::table
            .find(*id.as_uuid())
            .select(SweetRow::as_select())
            .first::<SweetRow>(&mut conn)
            .await
            .optional()
            .map_err(map_error)?
            .map(row_to_sweet)
            .transpose()
    }

    async fn exists_by_name(&self, name: &str) -> Result<bool, SweetRepositoryError> {
        let mut conn = self.connection().await?;
        diesel::select(diesel::dsl::exists(
            sweets::table.filter(sweets::name.eq(name)),
        ))
        .get_result::<bool>(&mut conn)
        .await
        .map_err(map_error)
    }

    async fn insert(&self, sweet: &Sweet) -> Result<(), SweetRepositoryError> {
        let mut conn = self.connection().await?;
        let row = NewSweetRow {
            id: *sweet.id().as_uuid(),
            name: sweet.name(),
            category: sweet.category(),
            price: sweet.price().value(),
            quantity: column_quantity(sweet.quantity().get())?,
            created_at: sweet.created_at(),
            updated_at: sweet.updated_at(),
        };
        diesel::insert_into(sweets::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_error)
    }

    async fn update(
        &self,
        id: &SweetId,
        patch: &SweetPatch,
        now: DateTime<Utc>,
    ) -> Result<Option<Sweet>, SweetRepositoryError> {
        let mut conn = self.connection().await?;
        let changes = SweetChangeset {
            name: patch.name(),
            category: patch.category(),
            price: patch.price().map(Price::value),
            quantity: patch
                .quantity()
                .map(|level| column_quantity(level.get()))
                .transpose()?,
            updated_at: now,
        };
        diesel::update(sweets::table.find(*id.as_uuid()))
            .set(&changes)
            .returning(SweetRow::as_returning())
            .get_result::<SweetRow>(&mut conn)
            .await
            .optional()
            .map_err(map_error)?
            .map(row_to_sweet)
            .transpose()
    }

    async fn delete(&self, id: &SweetId) -> Result<bool, SweetRepositoryError> {
        let mut conn = self.connection().await?;
        let removed = diesel::delete(sweets::table.find(*id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_error)?;
        Ok(removed > 0)
    }

    async fn adjust_stock(
        &self,
        id: &SweetId,
        adjustment: StockAdjustment,
        now: DateTime<Utc>,
    ) -> Result<StockOutcome, SweetRepositoryError> {
        let mut conn = self.connection().await?;
        let units = column_quantity(adjustment.units().get())?;
        let delta = match adjustment {
            StockAdjustment::Decrement(_) => -units,
            StockAdjustment::Increment(_) => units,
        };
        let uuid = *id.as_uuid();

        let locked = conn
            .transaction::<_, diesel::result::Error, _>(|conn| {
                async move {
                    let Some(quantity) = sweets::table
                        .find(uuid)
                        .select(sweets::quantity)
                        .for_update()
                        .first::<i32>(conn)
                        .await
                        .optional()?
                    else {
                        return Ok(LockedAdjustment::Missing);
                    };

                    let permitted = StockLevel::new(i64::from(quantity))
                        .ok()
                        .and_then(|level| level.apply(adjustment))
                        .is_some();
                    if !permitted {
                        return Ok(LockedAdjustment::Refused(quantity));
                    }

                    let row = diesel::update(sweets::table.find(uuid))
                        .set((
                            sweets::quantity.eq(sweets::quantity + delta),
                            sweets::updated_at.eq(now),
                        ))
                        .returning(SweetRow::as_returning())
                        .get_result::<SweetRow>(conn)
                        .await?;
                    Ok(LockedAdjustment::Applied(row))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_error)?;

        match locked {
            LockedAdjustment::Missing => Ok(StockOutcome::NotFound),
            LockedAdjustment::Applied(row) => row_to_sweet(row).map(StockOutcome::Adjusted),
            LockedAdjustment::Refused(quantity) => StockLevel::new(i64::from(quantity))
                .map(|available| StockOutcome::Rejected { available })
                .map_err(|err| SweetRepositoryError::query(format!("stored quantity invalid: {err}"))),
        }
    }
}
