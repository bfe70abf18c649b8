//! Catalogue entries and the stock arithmetic around them.
//!
//! Raw request values enter through the `try_from_parts` constructors, which
//! validate every field before anything is applied. The stock primitives
//! ([`StockLevel`], [`Units`], [`StockAdjustment`]) keep quantities inside
//! `0..=i32::MAX`, the width of the storage column.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use super::Error;

/// Largest quantity a sweet may hold.
pub const MAX_STOCK: u32 = i32::MAX.unsigned_abs();

/// Validation failures for sweet payloads and stock operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SweetValidationError {
    /// A create payload lacked one of the four fields.
    #[error("Please provide name, category, price, and quantity (all fields are required)")]
    MissingFields,
    /// Price or quantity below zero.
    #[error("Price and quantity must be non-negative numbers")]
    NegativeValues {
        /// Offending field name.
        field: &'static str,
    },
    /// Price was NaN or infinite.
    #[error("Price must be a finite number")]
    NonFinitePrice,
    /// Name or category blank once trimmed.
    #[error("{field} must not be empty")]
    BlankText {
        /// Offending field name.
        field: &'static str,
    },
    /// Quantity above the storage bound.
    #[error("Quantity must not exceed {max}")]
    QuantityTooLarge {
        /// Upper bound.
        max: u32,
    },
    /// Update body carried no recognised field.
    #[error("Please provide at least one of name, category, price, or quantity")]
    EmptyUpdate,
    /// Purchase or restock amount missing, zero, or negative.
    #[error("Quantity must be a positive integer")]
    InvalidUnits,
    /// Search price bound negative.
    #[error("Price filters must be non-negative numbers")]
    InvalidPriceFilter {
        /// Offending query parameter.
        field: &'static str,
    },
}

impl SweetValidationError {
    fn field(&self) -> Option<&'static str> {
        match self {
            Self::NegativeValues { field }
            | Self::BlankText { field }
            | Self::InvalidPriceFilter { field } => Some(field),
            Self::NonFinitePrice => Some("price"),
            Self::QuantityTooLarge { .. } | Self::InvalidUnits => Some("quantity"),
            Self::MissingFields | Self::EmptyUpdate => None,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::MissingFields => "missing_fields",
            Self::NegativeValues { .. } => "negative_value",
            Self::NonFinitePrice => "non_finite",
            Self::BlankText { .. } => "blank",
            Self::QuantityTooLarge { .. } => "too_large",
            Self::EmptyUpdate => "empty_update",
            Self::InvalidUnits => "not_positive",
            Self::InvalidPriceFilter { .. } => "invalid_filter",
        }
    }
}

impl From<SweetValidationError> for Error {
    fn from(value: SweetValidationError) -> Self {
        let details = match value.field() {
            Some(field) => json!({ "field": field, "code": value.code() }),
            None => json!({ "code": value.code() }),
        };
        Self::invalid_request(value.to_string()).with_details(details)
    }
}

/// Stable sweet identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SweetId(Uuid);

impl SweetId {
    /// Generate a new random identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an identifier; `None` when the text is not a UUID.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        Uuid::parse_str(raw.trim()).ok().map(Self)
    }

    /// Access the underlying UUID.
    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for SweetId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for SweetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Non-blank, trimmed text used for names and categories.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Label(String);

impl Label {
    /// Validate `raw` as the value of `field`.
    pub fn new(raw: &str, field: &'static str) -> Result<Self, SweetValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(SweetValidationError::BlankText { field });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for Label {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Non-negative, finite unit price.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Price(f64);

impl Price {
    /// Validate a raw price.
    pub fn new(raw: f64) -> Result<Self, SweetValidationError> {
        if !raw.is_finite() {
            return Err(SweetValidationError::NonFinitePrice);
        }
        if raw < 0.0 {
            return Err(SweetValidationError::NegativeValues { field: "price" });
        }
        Ok(Self(raw))
    }

    /// Raw value.
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}

/// Quantity on hand, within `0..=MAX_STOCK`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct StockLevel(u32);

impl StockLevel {
    /// Empty shelf.
    pub const ZERO: Self = Self(0);

    /// Validate a raw stock count.
    pub fn new(raw: i64) -> Result<Self, SweetValidationError> {
        if raw < 0 {
            return Err(SweetValidationError::NegativeValues { field: "quantity" });
        }
        u32::try_from(raw)
            .ok()
            .filter(|value| *value <= MAX_STOCK)
            .map(Self)
            .ok_or(SweetValidationError::QuantityTooLarge { max: MAX_STOCK })
    }

    /// Raw value.
    #[must_use]
    pub fn get(self) -> u32 {
        self.0
    }

    /// Apply an adjustment; `None` when the result would leave `0..=MAX_STOCK`.
    #[must_use]
    pub fn apply(self, adjustment: StockAdjustment) -> Option<Self> {
        match adjustment {
            StockAdjustment::Decrement(units) => self.0.checked_sub(units.get()).map(Self),
            StockAdjustment::Increment(units) => self
                .0
                .checked_add(units.get())
                .filter(|value| *value <= MAX_STOCK)
                .map(Self),
        }
    }
}

/// Strictly positive amount for a purchase or restock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Units(u32);

impl Units {
    /// Validate a raw amount; missing, zero, and negative values are rejected.
    pub fn try_from_raw(raw: Option<i64>) -> Result<Self, SweetValidationError> {
        match raw {
            Some(value) if value > 0 => u32::try_from(value)
                .ok()
                .filter(|units| *units <= MAX_STOCK)
                .map(Self)
                .ok_or(SweetValidationError::QuantityTooLarge { max: MAX_STOCK }),
            _ => Err(SweetValidationError::InvalidUnits),
        }
    }

    /// Raw value.
    #[must_use]
    pub fn get(self) -> u32 {
        self.0
    }
}

/// Direction and size of a stock change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockAdjustment {
    /// Purchase: remove units when enough are on hand.
    Decrement(Units),
    /// Restock: add units up to [`MAX_STOCK`].
    Increment(Units),
}

impl StockAdjustment {
    /// Units moved by the adjustment.
    #[must_use]
    pub fn units(self) -> Units {
        match self {
            Self::Decrement(units) | Self::Increment(units) => units,
        }
    }
}

/// Result of an atomic stock adjustment in the store.
#[derive(Debug, Clone, PartialEq)]
pub enum StockOutcome {
    /// The adjustment was applied.
    Adjusted(Sweet),
    /// No sweet with the given id exists.
    NotFound,
    /// The adjustment was refused; nothing changed.
    Rejected {
        /// Quantity on hand when the adjustment was evaluated.
        available: StockLevel,
    },
}

/// Catalogue entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Sweet {
    id: SweetId,
    name: Label,
    category: Label,
    price: Price,
    quantity: StockLevel,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Sweet {
    /// Materialise a freshly created sweet; both timestamps equal `now`.
    #[must_use]
    pub fn create(id: SweetId, draft: NewSweet, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: draft.name,
            category: draft.category,
            price: draft.price,
            quantity: draft.quantity,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuild a sweet from stored parts.
    #[must_use]
    pub fn from_parts(
        id: SweetId,
        name: Label,
        category: Label,
        price: Price,
        quantity: StockLevel,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            category,
            price,
            quantity,
            created_at,
            updated_at,
        }
    }

    /// Identifier.
    #[must_use]
    pub fn id(&self) -> SweetId {
        self.id
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_ref()
    }

    /// Category.
    #[must_use]
    pub fn category(&self) -> &str {
        self.category.as_ref()
    }

    /// Unit price.
    #[must_use]
    pub fn price(&self) -> Price {
        self.price
    }

    /// Stock on hand.
    #[must_use]
    pub fn quantity(&self) -> StockLevel {
        self.quantity
    }

    /// Creation time.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Last mutation time.
    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Return a copy with `patch` applied and `updated_at` set to `now`.
    #[must_use]
    pub fn patched(&self, patch: &SweetPatch, now: DateTime<Utc>) -> Self {
        Self {
            id: self.id,
            name: patch.name.clone().unwrap_or_else(|| self.name.clone()),
            category: patch.category.clone().unwrap_or_else(|| self.category.clone()),
            price: patch.price.unwrap_or(self.price),
            quantity: patch.quantity.unwrap_or(self.quantity),
            created_at: self.created_at,
            updated_at: now,
        }
    }

    /// Return a copy with `quantity` and `updated_at` replaced.
    #[must_use]
    pub fn with_quantity(&self, quantity: StockLevel, now: DateTime<Utc>) -> Self {
        Self {
            quantity,
            updated_at: now,
            ..self.clone()
        }
    }

    /// Whether the sweet satisfies every filter.
    #[must_use]
    pub fn matches(&self, filters: &SearchFilters) -> bool {
        let contains = |haystack: &str, needle: &Option<String>| {
            needle
                .as_deref()
                .is_none_or(|needle| haystack.to_lowercase().contains(needle))
        };
        let price = self.price.value();
        contains(self.name(), &filters.name)
            && contains(self.category(), &filters.category)
            && filters.min_price.is_none_or(|min| price >= min)
            && filters.max_price.is_none_or(|max| price <= max)
    }
}

/// Validated create payload.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSweet {
    name: Label,
    category: Label,
    price: Price,
    quantity: StockLevel,
}

impl NewSweet {
    /// Validate raw create fields.
    ///
    /// Presence is checked first so an incomplete payload always reports the
    /// missing-fields message, even when another field is negative.
    ///
    /// # Examples
    /// ```
    /// use sweetshop::domain::NewSweet;
    ///
    /// let draft = NewSweet::try_from_parts(Some("Fudge"), Some("Toffee"), Some(0.0), Some(0))
    ///     .expect("zero price and quantity are allowed");
    /// assert_eq!(draft.name(), "Fudge");
    /// assert!(NewSweet::try_from_parts(Some("Fudge"), None, Some(1.0), Some(1)).is_err());
    /// ```
    pub fn try_from_parts(
        name: Option<&str>,
        category: Option<&str>,
        price: Option<f64>,
        quantity: Option<i64>,
    ) -> Result<Self, SweetValidationError> {
        fn present(text: Option<&str>) -> Option<&str> {
            text.filter(|value| !value.trim().is_empty())
        }

        let (Some(name), Some(category), Some(price), Some(quantity)) =
            (present(name), present(category), price, quantity)
        else {
            return Err(SweetValidationError::MissingFields);
        };
        Ok(Self {
            name: Label::new(name, "name")?,
            category: Label::new(category, "category")?,
            price: Price::new(price)?,
            quantity: StockLevel::new(quantity)?,
        })
    }

    /// Requested name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_ref()
    }

    /// Requested category.
    #[must_use]
    pub fn category(&self) -> &str {
        self.category.as_ref()
    }
}

/// Validated partial update. Absent fields stay unchanged.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SweetPatch {
    name: Option<Label>,
    category: Option<Label>,
    price: Option<Price>,
    quantity: Option<StockLevel>,
}

impl SweetPatch {
    /// Validate every provided field before any is applied.
    pub fn try_from_parts(
        name: Option<&str>,
        category: Option<&str>,
        price: Option<f64>,
        quantity: Option<i64>,
    ) -> Result<Self, SweetValidationError> {
        if name.is_none() && category.is_none() && price.is_none() && quantity.is_none() {
            return Err(SweetValidationError::EmptyUpdate);
        }
        Ok(Self {
            name: name.map(|raw| Label::new(raw, "name")).transpose()?,
            category: category.map(|raw| Label::new(raw, "category")).transpose()?,
            price: price.map(Price::new).transpose()?,
            quantity: quantity.map(StockLevel::new).transpose()?,
        })
    }

    /// New name, if changing.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_ref().map(AsRef::as_ref)
    }

    /// New category, if changing.
    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.category.as_ref().map(AsRef::as_ref)
    }

    /// New price, if changing.
    #[must_use]
    pub fn price(&self) -> Option<Price> {
        self.price
    }

    /// New stock level, if changing.
    #[must_use]
    pub fn quantity(&self) -> Option<StockLevel> {
        self.quantity
    }
}

/// Conjunctive catalogue filters. Text filters are lowercase needles.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchFilters {
    name: Option<String>,
    category: Option<String>,
    min_price: Option<f64>,
    max_price: Option<f64>,
}

impl SearchFilters {
    /// Validate raw filters; blank text is treated as absent.
    pub fn try_from_parts(
        name: Option<&str>,
        category: Option<&str>,
        min_price: Option<f64>,
        max_price: Option<f64>,
    ) -> Result<Self, SweetValidationError> {
        let needle = |text: Option<&str>| {
            text.map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_lowercase)
        };
        let bound = |value: Option<f64>, field: &'static str| match value {
            Some(raw) if !raw.is_finite() || raw < 0.0 => {
                Err(SweetValidationError::InvalidPriceFilter { field })
            }
            other => Ok(other),
        };
        Ok(Self {
            name: needle(name),
            category: needle(category),
            min_price: bound(min_price, "minPrice")?,
            max_price: bound(max_price, "maxPrice")?,
        })
    }

    /// Lowercase name needle.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Lowercase category needle.
    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Inclusive lower price bound.
    #[must_use]
    pub fn min_price(&self) -> Option<f64> {
        self.min_price
    }

    /// Inclusive upper price bound.
    #[must_use]
    pub fn max_price(&self) -> Option<f64> {
        self.max_price
    }
}

/// Newest first; ties broken by id so ordering is total.
pub fn newest_first(left: &Sweet, right: &Sweet) -> std::cmp::Ordering {
    right
        .created_at
        .cmp(&left.created_at)
        .then_with(|| left.id.cmp(&right.id))
}

#[cfg(test)]
#[path = "sweet_tests.rs"]
mod tests;
