//! HTTP adapter mapping for domain errors.
//!
//! Purpose: keep the domain error type HTTP-agnostic while allowing Actix
//! handlers to turn domain failures into consistent envelope responses and
//! status codes.

use actix_web::error::{JsonPayloadError, QueryPayloadError};
use actix_web::{HttpRequest, HttpResponse, ResponseError, http::StatusCode, http::header};
use serde_json::json;
use tracing::{error, warn};

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

use super::envelope::ErrorEnvelope;

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

const INTERNAL_MESSAGE: &str = "Internal server error";
const UNAVAILABLE_MESSAGE: &str = "Service temporarily unavailable";

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn redact_if_internal(error: &Error) -> Error {
    let generic = match error.code() {
        ErrorCode::InternalError => Error::internal(INTERNAL_MESSAGE),
        ErrorCode::ServiceUnavailable => Error::service_unavailable(UNAVAILABLE_MESSAGE),
        _ => return error.clone(),
    };
    match error.trace_id() {
        Some(id) => generic.with_trace_id(id.to_owned()),
        None => generic,
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let redacted = redact_if_internal(self);
        if redacted.message() != self.message() {
            error!(
                code = self.code().as_str(),
                trace_id = self.trace_id().unwrap_or_default(),
                detail = self.message(),
                "request failed"
            );
        }

        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        if matches!(self.code(), ErrorCode::Unauthorized) {
            builder.insert_header((header::WWW_AUTHENTICATE, "Bearer"));
        }

        builder.json(ErrorEnvelope::from(&redacted))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        // Do not leak implementation details to clients.
        error!(error = %err, "actix error promoted to domain error");
        Error::internal(INTERNAL_MESSAGE)
    }
}

/// Report unreadable JSON bodies in the envelope format.
///
/// Registered through `web::JsonConfig::error_handler`.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    warn!(error = %err, "rejected JSON payload");
    let (message, code) = match &err {
        JsonPayloadError::ContentType => ("Content type must be application/json", "content_type"),
        JsonPayloadError::OverflowKnownLength { .. } | JsonPayloadError::Overflow { .. } => {
            ("Request body is too large", "payload_too_large")
        }
        _ => ("Request body must be valid JSON", "malformed_json"),
    };
    Error::invalid_request(message)
        .with_details(json!({ "code": code }))
        .into()
}

/// Report unparsable query strings in the envelope format.
///
/// Registered through `web::QueryConfig::error_handler`.
pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    warn!(error = %err, "rejected query string");
    Error::invalid_request("Query string could not be parsed")
        .with_details(json!({ "code": "malformed_query" }))
        .into()
}
