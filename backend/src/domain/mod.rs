//! Domain primitives, services, and ports.
//!
//! Purpose: hold the inventory rules independent of HTTP and storage. Types
//! validate on construction so services only see well-formed values.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failures with stable codes.
//! - User, Identity, Permission: accounts and what they may do.
//! - Sweet and its stock primitives: catalogue entries and quantity rules.
//! - Services implementing the driving ports in [`ports`].

pub mod access;
mod access_gate_service;
mod account_service;
pub mod auth;
pub mod error;
mod inventory_service;
pub mod ports;
pub mod sweet;
pub mod trace_id;
pub mod user;

pub use self::access::{AccessError, Identity, Permission};
pub use self::access_gate_service::{TokenAccessGate, bearer_token};
pub use self::account_service::AccountService;
pub use self::auth::{AccountSession, CredentialsError, IssuedToken, LoginCredentials, Registration, TokenClaims};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::inventory_service::InventoryService;
pub use self::sweet::{
    Label, MAX_STOCK, NewSweet, Price, SearchFilters, StockAdjustment, StockLevel, StockOutcome,
    Sweet, SweetId, SweetPatch, SweetValidationError, Units, newest_first,
};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{EmailAddress, PasswordDigest, Role, User, UserId, UserValidationError, Username};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use sweetshop::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("Access denied. Admin privileges required."))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
