use actix_web::http::header::CONTENT_TYPE;
use actix_web::http::StatusCode;
use actix_web::test;
use backend_test_support::envelope::{assert_error_envelope, ExpectedError};

use crate::common::assert_standard_headers;
use crate::support::app_builder::create_test_app;
use crate::support::auth::register_admin;
use crate::support::test_state::build_test_state;

#[actix_web::test]
async fn unknown_routes_use_the_error_envelope() {
    let app = create_test_app(build_test_state().await).build().await;

    for uri in ["/nope", "/api/nope"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_standard_headers(&resp);
        assert_error_envelope(
            resp,
            StatusCode::NOT_FOUND,
            ExpectedError {
                code: "NOT_FOUND",
                message_contains: Some(uri),
                ..Default::default()
            },
        )
        .await;
    }
}

#[actix_web::test]
async fn malformed_json_is_a_bad_request() {
    let app = create_test_app(build_test_state().await).build().await;
    let admin = register_admin(&app).await;

    let req = test::TestRequest::post()
        .uri("/api/categories")
        .insert_header(admin.bearer())
        .insert_header((CONTENT_TYPE, "application/json"))
        .set_payload("{\"name\": ")
        .to_request();
    assert_error_envelope(
        test::call_service(&app, req).await,
        StatusCode::BAD_REQUEST,
        ExpectedError {
            code: "INVALID_JSON",
            message_contains: Some("Malformed JSON"),
            ..Default::default()
        },
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/categories")
        .insert_header(admin.bearer())
        .insert_header((CONTENT_TYPE, "application/json"))
        .to_request();
    assert_error_envelope(
        test::call_service(&app, req).await,
        StatusCode::BAD_REQUEST,
        ExpectedError {
            code: "INVALID_JSON",
            message_contains: Some("required"),
            ..Default::default()
        },
    )
    .await;
}

#[actix_web::test]
async fn bad_query_parameters_are_a_bad_request() {
    let app = create_test_app(build_test_state().await).build().await;

    let req = test::TestRequest::get()
        .uri("/api/projects?featured=maybe")
        .to_request();
    assert_error_envelope(
        test::call_service(&app, req).await,
        StatusCode::BAD_REQUEST,
        ExpectedError {
            code: "BAD_REQUEST",
            ..Default::default()
        },
    )
    .await;
}

#[actix_web::test]
async fn oversized_page_limit_is_clamped() {
    let app = create_test_app(build_test_state().await).build().await;

    let req = test::TestRequest::get()
        .uri("/api/skills?limit=1000&page=0")
        .to_request();
    let data = backend_test_support::envelope::assert_success_envelope(
        test::call_service(&app, req).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(data["pagination"]["limit"], 100);
    assert_eq!(data["pagination"]["page"], 1);
}
