//! Tests for domain error construction and trace capture.

use super::*;
use rstest::{fixture, rstest};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn expected_trace_id() -> String {
    TRACE_ID.to_owned()
}

#[fixture]
fn base_error() -> Error {
    Error::invalid_request("bad")
}

#[rstest]
#[case(Error::invalid_request("x"), ErrorCode::InvalidRequest, "invalid_request")]
#[case(Error::unauthorized("x"), ErrorCode::Unauthorized, "unauthorized")]
#[case(Error::forbidden("x"), ErrorCode::Forbidden, "forbidden")]
#[case(Error::not_found("x"), ErrorCode::NotFound, "not_found")]
#[case(
    Error::service_unavailable("x"),
    ErrorCode::ServiceUnavailable,
    "service_unavailable"
)]
#[case(Error::internal("x"), ErrorCode::InternalError, "internal_error")]
fn constructors_set_code(#[case] error: Error, #[case] code: ErrorCode, #[case] wire: &str) {
    assert_eq!(error.code(), code);
    assert_eq!(code.as_str(), wire);
    let serialised = serde_json::to_value(code).expect("serialise code");
    assert_eq!(serialised, json!(wire));
}

#[rstest]
fn try_new_rejects_empty_messages() {
    let result = Error::try_new(ErrorCode::InvalidRequest, "   ");
    assert!(matches!(result, Err(ErrorValidationError::EmptyMessage)));
}

#[rstest]
fn try_with_trace_id_rejects_empty_values(base_error: Error) {
    let result = base_error.try_with_trace_id("   ");
    assert!(matches!(result, Err(ErrorValidationError::EmptyTraceId)));
}

#[rstest]
fn new_has_no_trace_id_out_of_scope() {
    let error = Error::internal("boom");
    assert!(error.trace_id().is_none());
}

#[rstest]
#[tokio::test]
async fn new_captures_trace_id_in_scope(expected_trace_id: String) {
    let trace_id: TraceId = expected_trace_id
        .parse()
        .expect("fixtures provide a valid UUID");
    let error = TraceId::scope(trace_id, async move {
        Error::try_new(ErrorCode::InternalError, "boom")
            .expect("validation accepts non-empty message")
    })
    .await;

    assert_eq!(error.trace_id(), Some(expected_trace_id.as_str()));
}

#[rstest]
#[tokio::test]
async fn deserialising_ignores_ambient_trace(expected_trace_id: String) {
    let trace_id: TraceId = expected_trace_id
        .parse()
        .expect("fixtures provide a valid UUID");
    let payload = json!({"code": "not_found", "message": "Sweet not found"});
    let error: Error = TraceId::scope(trace_id, async move {
        serde_json::from_value(payload).expect("payload deserialises")
    })
    .await;

    assert!(error.trace_id().is_none());
    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
fn serialises_camel_case_fields(expected_trace_id: String) {
    let error = Error::invalid_request("Price must be non-negative")
        .with_trace_id(expected_trace_id.clone())
        .with_details(json!({"field": "price", "code": "negative"}));

    let value = serde_json::to_value(&error).expect("serialise error");
    assert_eq!(value["code"], "invalid_request");
    assert_eq!(value["traceId"], expected_trace_id.as_str());
    assert_eq!(value["details"]["field"], "price");
}

#[rstest]
fn deserialising_rejects_blank_message() {
    let payload = json!({"code": "forbidden", "message": " "});
    let result = serde_json::from_value::<Error>(payload);
    assert!(result.is_err());
}
