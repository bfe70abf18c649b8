//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`PasswordHasher`], [`TokenService`]) are
//! implemented by outbound adapters. Driving ports ([`AccessGate`],
//! [`AccountCommand`], [`InventoryCommand`], [`InventoryQuery`]) are called by
//! inbound adapters and implemented by domain services.

mod macros;
pub(crate) use macros::define_port_error;

mod access_gate;
mod account_command;
mod inventory_command;
mod inventory_query;
mod password_hasher;
mod sweet_repository;
mod token_service;
mod user_repository;

pub use access_gate::AccessGate;
#[cfg(test)]
pub use account_command::MockAccountCommand;
pub use account_command::{AccountCommand, LoginRequest, RegisterRequest};
#[cfg(test)]
pub use inventory_command::MockInventoryCommand;
pub use inventory_command::{InventoryCommand, StockChange, StockRequest, SweetFields};
#[cfg(test)]
pub use inventory_query::MockInventoryQuery;
pub use inventory_query::{InventoryQuery, SearchRequest};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHasher, PasswordHasherError};
#[cfg(test)]
pub use sweet_repository::MockSweetRepository;
pub use sweet_repository::{SweetRepository, SweetRepositoryError};
#[cfg(test)]
pub use token_service::MockTokenService;
pub use token_service::{TokenService, TokenServiceError};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserRepository, UserRepositoryError};
