use actix_web::http::StatusCode;
use actix_web::test;
use backend_test_support::envelope::{assert_error_envelope, assert_success_envelope, ExpectedError};
use serde_json::json;

use crate::support::app_builder::create_test_app;
use crate::support::auth::register_admin;
use crate::support::factory::{self, id_of};
use crate::support::test_state::build_test_state;

#[actix_web::test]
async fn full_lifecycle() {
    let app = create_test_app(build_test_state().await).build().await;
    let admin = register_admin(&app).await;

    let created = factory::create(&app, &admin, "/api/education", factory::education("State University")).await;
    let id = id_of(&created);
    assert_eq!(created["endDate"], "2014-06-30");

    let req = test::TestRequest::put()
        .uri(&format!("/api/education/{id}"))
        .insert_header(admin.bearer())
        .set_json(json!({
            "institution": "State University",
            "degree": "MSc Computer Science",
            "startDate": "2014-09-01",
            "grade": "Distinction",
        }))
        .to_request();
    let data = assert_success_envelope(test::call_service(&app, req).await, StatusCode::OK).await;
    assert_eq!(data["degree"], "MSc Computer Science");
    assert!(data["endDate"].is_null());
    assert_eq!(data["grade"], "Distinction");

    let req = test::TestRequest::delete()
        .uri(&format!("/api/education/{id}"))
        .insert_header(admin.bearer())
        .to_request();
    assert_success_envelope(test::call_service(&app, req).await, StatusCode::OK).await;

    let req = test::TestRequest::get()
        .uri(&format!("/api/education/{id}"))
        .to_request();
    assert_error_envelope(
        test::call_service(&app, req).await,
        StatusCode::NOT_FOUND,
        ExpectedError {
            code: "EDUCATION_NOT_FOUND",
            ..Default::default()
        },
    )
    .await;
}

#[actix_web::test]
async fn invalid_dates_are_field_errors() {
    let app = create_test_app(build_test_state().await).build().await;
    let admin = register_admin(&app).await;

    let req = test::TestRequest::post()
        .uri("/api/education")
        .insert_header(admin.bearer())
        .set_json(json!({
            "institution": "College",
            "degree": "BA",
            "startDate": "yesterday",
        }))
        .to_request();
    assert_error_envelope(
        test::call_service(&app, req).await,
        StatusCode::BAD_REQUEST,
        ExpectedError {
            code: "VALIDATION_ERROR",
            fields: &["startDate"],
            ..Default::default()
        },
    )
    .await;
}
