//! Sweet catalogue API handlers.
//!
//! ```text
//! GET    /api/sweets
//! GET    /api/sweets/search?name=choc&minPrice=2
//! POST   /api/sweets {"name":"Fudge","category":"Toffee","price":1.2,"quantity":40}
//! PUT    /api/sweets/{id} {"price":1.5}
//! DELETE /api/sweets/{id}
//! POST   /api/sweets/{id}/purchase {"quantity":2}
//! POST   /api/sweets/{id}/restock {"quantity":50}
//! ```
//!
//! Every route requires a bearer token. Ids that are not UUIDs cannot name a
//! stored sweet and are reported as not found.

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::domain::ports::{SearchRequest, StockChange, StockRequest, SweetFields};
use crate::domain::{Error, Sweet, SweetId, SweetValidationError};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::envelope::{Acknowledgement, Envelope, ErrorEnvelope};
use crate::inbound::http::state::HttpState;

/// Public sweet representation.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SweetResponse {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub quantity: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Sweet> for SweetResponse {
    fn from(sweet: &Sweet) -> Self {
        Self {
            id: *sweet.id().as_uuid(),
            name: sweet.name().to_owned(),
            category: sweet.category().to_owned(),
            price: sweet.price().value(),
            quantity: sweet.quantity().get(),
            created_at: sweet.created_at(),
            updated_at: sweet.updated_at(),
        }
    }
}

/// Sweet after a purchase plus the amount taken.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PurchaseResponse {
    pub sweet: SweetResponse,
    pub purchased: u32,
}

/// Sweet after a restock plus the amount added.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RestockResponse {
    pub sweet: SweetResponse,
    pub restocked: u32,
}

/// Create and update body. Fields are optional so missing values are reported
/// by domain validation rather than by the JSON extractor.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SweetBody {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub quantity: Option<i64>,
}

impl From<SweetBody> for SweetFields {
    fn from(value: SweetBody) -> Self {
        Self {
            name: value.name,
            category: value.category,
            price: value.price,
            quantity: value.quantity,
        }
    }
}

/// Purchase and restock body.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct QuantityBody {
    pub quantity: Option<i64>,
}

/// Search filters; all optional and combined conjunctively.
#[derive(Debug, Default, Deserialize, Serialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    /// Case-insensitive substring of the name.
    pub name: Option<String>,
    /// Case-insensitive substring of the category.
    pub category: Option<String>,
    /// Inclusive lower price bound.
    pub min_price: Option<String>,
    /// Inclusive upper price bound.
    pub max_price: Option<String>,
}

fn parse_bound(raw: Option<String>, field: &'static str) -> Result<Option<f64>, Error> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<f64>()
        .map(Some)
        .map_err(|_| SweetValidationError::InvalidPriceFilter { field }.into())
}

impl TryFrom<SearchParams> for SearchRequest {
    type Error = Error;

    fn try_from(value: SearchParams) -> Result<Self, Self::Error> {
        Ok(Self {
            name: value.name,
            category: value.category,
            min_price: parse_bound(value.min_price, "minPrice")?,
            max_price: parse_bound(value.max_price, "maxPrice")?,
        })
    }
}

fn sweet_id(raw: &str) -> Result<SweetId, Error> {
    SweetId::parse(raw)
        .ok_or_else(|| Error::not_found("Sweet not found").with_details(json!({ "id": raw })))
}

fn listing(sweets: &[Sweet], message: &str) -> HttpResponse {
    let data: Vec<SweetResponse> = sweets.iter().map(SweetResponse::from).collect();
    HttpResponse::Ok().json(Envelope::ok(data).with_message(message))
}

/// List every sweet, newest first.
#[utoipa::path(
    get,
    path = "/api/sweets",
    responses(
        (status = 200, description = "Sweets", body = Envelope<Vec<SweetResponse>>),
        (status = 401, description = "Missing or invalid token", body = ErrorEnvelope)
    ),
    tags = ["sweets"],
    operation_id = "listSweets"
)]
#[get("/sweets")]
pub async fn list_sweets(
    state: web::Data<HttpState>,
    caller: Authenticated,
) -> ApiResult<HttpResponse> {
    let sweets = state.catalogue.list(caller.identity()).await?;
    Ok(listing(&sweets, "Sweets retrieved successfully"))
}

/// Search sweets by name, category, and price range.
#[utoipa::path(
    get,
    path = "/api/sweets/search",
    params(SearchParams),
    responses(
        (status = 200, description = "Matching sweets", body = Envelope<Vec<SweetResponse>>),
        (status = 400, description = "Invalid price filter", body = ErrorEnvelope),
        (status = 401, description = "Missing or invalid token", body = ErrorEnvelope)
    ),
    tags = ["sweets"],
    operation_id = "searchSweets"
)]
#[get("/sweets/search")]
pub async fn search_sweets(
    state: web::Data<HttpState>,
    caller: Authenticated,
    params: web::Query<SearchParams>,
) -> ApiResult<HttpResponse> {
    let request = SearchRequest::try_from(params.into_inner())?;
    let sweets = state.catalogue.search(caller.identity(), request).await?;
    Ok(listing(&sweets, "Search completed successfully"))
}

/// Add a sweet to the catalogue.
#[utoipa::path(
    post,
    path = "/api/sweets",
    request_body = SweetBody,
    responses(
        (status = 201, description = "Sweet created", body = Envelope<SweetResponse>),
        (status = 400, description = "Invalid sweet", body = ErrorEnvelope),
        (status = 401, description = "Missing or invalid token", body = ErrorEnvelope)
    ),
    tags = ["sweets"],
    operation_id = "createSweet"
)]
#[post("/sweets")]
pub async fn create_sweet(
    state: web::Data<HttpState>,
    caller: Authenticated,
    payload: web::Json<SweetBody>,
) -> ApiResult<HttpResponse> {
    let sweet = state
        .inventory
        .create(caller.identity(), payload.into_inner().into())
        .await?;
    Ok(HttpResponse::Created().json(
        Envelope::ok(SweetResponse::from(&sweet)).with_message("Sweet created successfully"),
    ))
}

/// Change some fields of a sweet.
#[utoipa::path(
    put,
    path = "/api/sweets/{id}",
    params(("id" = String, Path, description = "Sweet id")),
    request_body = SweetBody,
    responses(
        (status = 200, description = "Sweet updated", body = Envelope<SweetResponse>),
        (status = 400, description = "Invalid fields", body = ErrorEnvelope),
        (status = 401, description = "Missing or invalid token", body = ErrorEnvelope),
        (status = 404, description = "Unknown sweet", body = ErrorEnvelope)
    ),
    tags = ["sweets"],
    operation_id = "updateSweet"
)]
#[put("/sweets/{id}")]
pub async fn update_sweet(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<String>,
    payload: web::Json<SweetBody>,
) -> ApiResult<HttpResponse> {
    let id = sweet_id(&path)?;
    let sweet = state
        .inventory
        .update(caller.identity(), id, payload.into_inner().into())
        .await?;
    Ok(HttpResponse::Ok().json(
        Envelope::ok(SweetResponse::from(&sweet)).with_message("Sweet updated successfully"),
    ))
}

/// Remove a sweet. Admin only.
#[utoipa::path(
    delete,
    path = "/api/sweets/{id}",
    params(("id" = String, Path, description = "Sweet id")),
    responses(
        (status = 200, description = "Sweet deleted", body = Acknowledgement),
        (status = 401, description = "Missing or invalid token", body = ErrorEnvelope),
        (status = 403, description = "Admin privileges required", body = ErrorEnvelope),
        (status = 404, description = "Unknown sweet", body = ErrorEnvelope)
    ),
    tags = ["sweets"],
    operation_id = "deleteSweet"
)]
#[delete("/sweets/{id}")]
pub async fn delete_sweet(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = sweet_id(&path)?;
    state.inventory.delete(caller.identity(), id).await?;
    Ok(HttpResponse::Ok().json(Acknowledgement::new("Sweet deleted successfully")))
}

/// Buy some units of a sweet.
#[utoipa::path(
    post,
    path = "/api/sweets/{id}/purchase",
    params(("id" = String, Path, description = "Sweet id")),
    request_body = QuantityBody,
    responses(
        (status = 200, description = "Purchase recorded", body = Envelope<PurchaseResponse>),
        (status = 400, description = "Invalid quantity or not enough stock", body = ErrorEnvelope),
        (status = 401, description = "Missing or invalid token", body = ErrorEnvelope),
        (status = 404, description = "Unknown sweet", body = ErrorEnvelope)
    ),
    tags = ["sweets"],
    operation_id = "purchaseSweet"
)]
#[post("/sweets/{id}/purchase")]
pub async fn purchase_sweet(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<String>,
    payload: web::Json<QuantityBody>,
) -> ApiResult<HttpResponse> {
    let request = StockRequest {
        sweet_id: sweet_id(&path)?,
        quantity: payload.quantity,
    };
    let StockChange { sweet, units } = state.inventory.purchase(caller.identity(), request).await?;
    let data = PurchaseResponse {
        sweet: SweetResponse::from(&sweet),
        purchased: units.get(),
    };
    Ok(HttpResponse::Ok().json(Envelope::ok(data).with_message("Purchase successful")))
}

/// Add units to a sweet. Admin only.
#[utoipa::path(
    post,
    path = "/api/sweets/{id}/restock",
    params(("id" = String, Path, description = "Sweet id")),
    request_body = QuantityBody,
    responses(
        (status = 200, description = "Restock recorded", body = Envelope<RestockResponse>),
        (status = 400, description = "Invalid quantity", body = ErrorEnvelope),
        (status = 401, description = "Missing or invalid token", body = ErrorEnvelope),
        (status = 403, description = "Admin privileges required", body = ErrorEnvelope),
        (status = 404, description = "Unknown sweet", body = ErrorEnvelope)
    ),
    tags = ["sweets"],
    operation_id = "restockSweet"
)]
#[post("/sweets/{id}/restock")]
pub async fn restock_sweet(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<String>,
    payload: web::Json<QuantityBody>,
) -> ApiResult<HttpResponse> {
    let request = StockRequest {
        sweet_id: sweet_id(&path)?,
        quantity: payload.quantity,
    };
    let StockChange { sweet, units } = state.inventory.restock(caller.identity(), request).await?;
    let data = RestockResponse {
        sweet: SweetResponse::from(&sweet),
        restocked: units.get(),
    };
    Ok(HttpResponse::Ok().json(Envelope::ok(data).with_message("Restock successful")))
}

#[cfg(test)]
#[path = "sweets_tests.rs"]
mod tests;
