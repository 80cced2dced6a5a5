use actix_web::http::StatusCode;
use actix_web::test;
use backend::infra::state::build_state;
use serde_json::Value;

use crate::common::assert_standard_headers;
use crate::support::app_builder::create_test_app;
use crate::support::test_state::build_test_state;

#[actix_web::test]
async fn reports_database_and_migration() {
    let app = create_test_app(build_test_state().await).build().await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_standard_headers(&resp);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["db"], "ok");
    assert_eq!(body["environment"], "test");
    assert!(body["migration"].as_str().unwrap().starts_with("m2025"));
    assert!(body.get("dbError").is_none());
}

#[actix_web::test]
async fn stays_live_without_a_database() {
    let state = build_state().build().await.unwrap();
    let app = create_test_app(state).build().await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["db"], "error");
    assert!(body["dbError"].is_string());
}
