#![allow(dead_code)]

use actix_web::dev::ServiceResponse;

// Logging is auto-installed for every test binary
#[ctor::ctor]
fn init_logging() {
    backend_test_support::logging::init();
}

/// Assert the security headers and request id every response carries.
pub fn assert_standard_headers<B>(resp: &ServiceResponse<B>) {
    let headers = resp.headers();
    for name in [
        "x-request-id",
        "x-content-type-options",
        "x-frame-options",
        "content-security-policy",
        "referrer-policy",
    ] {
        assert!(headers.contains_key(name), "missing header {name}");
    }
    assert_eq!(headers.get("x-content-type-options").unwrap(), "nosniff");
}
