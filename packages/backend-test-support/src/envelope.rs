//! Assertions for the JSON response envelope.
//!
//! Success: `{"status":"success","message":...,"data":...}`
//! Error:   `{"status":"error","message":...,"code":...,"errors"?:{...}}`
//!
//! Kept independent of backend types so the contract is checked from the
//! outside, the way a client sees it.

use actix_web::body::MessageBody;
use actix_web::dev::ServiceResponse;
use actix_web::http::StatusCode;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
struct ErrorEnvelopeLike {
    status: String,
    message: String,
    code: String,
    #[serde(default)]
    errors: Option<serde_json::Map<String, Value>>,
}

/// Expected shape of an error response.
#[derive(Debug, Default)]
pub struct ExpectedError<'a> {
    pub code: &'a str,
    pub message_contains: Option<&'a str>,
    /// Field names that must appear under `errors`.
    pub fields: &'a [&'a str],
}

/// Assert an error response: status, `x-trace-id` header and envelope fields.
/// Returns the parsed body for further checks.
pub async fn assert_error_envelope<B: MessageBody>(
    resp: ServiceResponse<B>,
    expected_status: StatusCode,
    expected: ExpectedError<'_>,
) -> Value {
    let status = resp.status();
    let trace_id = resp
        .headers()
        .get("x-trace-id")
        .map(|v| v.to_str().expect("x-trace-id should be ASCII").to_string());
    let body = actix_web::test::read_body(resp).await;

    assert_eq!(
        status,
        expected_status,
        "unexpected status; body: {}",
        String::from_utf8_lossy(&body)
    );
    let trace_id = trace_id.expect("x-trace-id header should be present on errors");
    assert!(!trace_id.is_empty());

    let value: Value =
        serde_json::from_slice(&body).expect("error body should be valid JSON");
    let env: ErrorEnvelopeLike =
        serde_json::from_value(value.clone()).expect("error body should match the envelope");

    assert_eq!(env.status, "error");
    assert_eq!(env.code, expected.code);
    if let Some(fragment) = expected.message_contains {
        assert!(
            env.message.contains(fragment),
            "expected message to contain '{fragment}', got '{}'",
            env.message
        );
    }
    if !expected.fields.is_empty() {
        let errors = env.errors.expect("expected a field error map");
        for field in expected.fields {
            assert!(
                errors.contains_key(*field),
                "expected field error for '{field}', got {errors:?}"
            );
        }
    }
    value
}

/// Assert a success response and return its `data` member.
pub async fn assert_success_envelope<B: MessageBody>(
    resp: ServiceResponse<B>,
    expected_status: StatusCode,
) -> Value {
    let status = resp.status();
    let body = actix_web::test::read_body(resp).await;
    assert_eq!(
        status,
        expected_status,
        "unexpected status; body: {}",
        String::from_utf8_lossy(&body)
    );
    let value: Value = serde_json::from_slice(&body).expect("body should be valid JSON");
    assert_eq!(value["status"], "success", "body: {value}");
    value.get("data").cloned().unwrap_or(Value::Null)
}
