//! Driving port that turns an `Authorization` header into an identity.

use async_trait::async_trait;

use crate::domain::{AccessError, Identity};

/// Authenticates callers.
#[async_trait]
pub trait AccessGate: Send + Sync {
    /// Resolve the raw `Authorization` header value to an identity.
    ///
    /// `None` means the header was absent.
    async fn authenticate(&self, authorization: Option<&str>) -> Result<Identity, AccessError>;
}
