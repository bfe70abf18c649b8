//! JSON response envelope shared by every `/api` endpoint.
//!
//! Successful responses look like `{"success":true,"message":"...","data":...}`;
//! failures are produced by the error adapter with `success: false` and an
//! `error` code.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::Error;

/// Successful response body.
///
/// # Examples
/// ```
/// use sweetshop::inbound::http::envelope::Envelope;
///
/// let body = Envelope::ok(vec![1, 2, 3]).with_message("Numbers retrieved");
/// let json = serde_json::to_value(&body).expect("serialise");
/// assert_eq!(json["success"], true);
/// assert_eq!(json["data"][2], 3);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Envelope<T> {
    /// Always `true` for this shape.
    pub success: bool,
    /// Human-readable summary.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Endpoint payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    /// Wrap `data` in a successful envelope.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    /// Attach a summary message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Successful response carrying only a message.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Acknowledgement {
    /// Always `true`.
    pub success: bool,
    /// Human-readable summary.
    pub message: String,
}

impl Acknowledgement {
    /// Build an acknowledgement with `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// Failure response body.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
    /// Always `false`.
    pub success: bool,
    /// Human-readable reason.
    pub message: String,
    /// Stable machine-readable code, e.g. `invalid_request`.
    pub error: String,
    /// Field-level context.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub details: Option<Value>,
    /// Request correlation id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
}

impl From<&Error> for ErrorEnvelope {
    fn from(error: &Error) -> Self {
        Self {
            success: false,
            message: error.message().to_owned(),
            error: error.code().as_str().to_owned(),
            details: error.details().cloned(),
            trace_id: error.trace_id().map(str::to_owned),
        }
    }
}
