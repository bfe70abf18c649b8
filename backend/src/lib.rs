//! Sweet shop inventory backend.
//!
//! Layout follows ports and adapters: [`domain`] holds the rules and port
//! traits, [`inbound`] drives them over HTTP, and [`outbound`] implements the
//! stores, hashing, and tokens.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod seed;
pub mod settings;

#[cfg(test)]
mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
