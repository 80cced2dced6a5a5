use actix_web::http::StatusCode;
use actix_web::test;
use backend_test_support::envelope::{assert_error_envelope, assert_success_envelope, ExpectedError};
use serde_json::json;

use crate::support::app_builder::create_test_app;
use crate::support::auth::register_admin;
use crate::support::factory::{self, id_of};
use crate::support::test_state::build_test_state;

#[actix_web::test]
async fn bulk_create_inserts_every_item() {
    let app = create_test_app(build_test_state().await).build().await;
    let admin = register_admin(&app).await;

    let req = test::TestRequest::post()
        .uri("/api/categories/bulk")
        .insert_header(admin.bearer())
        .set_json(json!({"items": [factory::category("Mobile"), factory::category("Desktop")]}))
        .to_request();
    let data = assert_success_envelope(test::call_service(&app, req).await, StatusCode::CREATED).await;
    assert_eq!(data.as_array().unwrap().len(), 2);
}

#[actix_web::test]
async fn bulk_create_reports_item_errors_and_writes_nothing() {
    let app = create_test_app(build_test_state().await).build().await;
    let admin = register_admin(&app).await;

    let req = test::TestRequest::post()
        .uri("/api/projects/bulk")
        .insert_header(admin.bearer())
        .set_json(json!({"items": [factory::project("Good"), {"description": "no title"}]}))
        .to_request();
    assert_error_envelope(
        test::call_service(&app, req).await,
        StatusCode::BAD_REQUEST,
        ExpectedError {
            code: "VALIDATION_ERROR",
            fields: &["items[1].title"],
            ..Default::default()
        },
    )
    .await;

    let req = test::TestRequest::get().uri("/api/projects").to_request();
    let data = assert_success_envelope(test::call_service(&app, req).await, StatusCode::OK).await;
    assert_eq!(data["pagination"]["total"], 0);
}

#[actix_web::test]
async fn bulk_create_is_all_or_nothing_on_duplicates() {
    let app = create_test_app(build_test_state().await).build().await;
    let admin = register_admin(&app).await;
    factory::create(&app, &admin, "/api/education", factory::education("Existing College")).await;

    let req = test::TestRequest::post()
        .uri("/api/education/bulk")
        .insert_header(admin.bearer())
        .set_json(json!({"items": [
            factory::education("Fresh Institute"),
            factory::education("EXISTING college"),
        ]}))
        .to_request();
    assert_error_envelope(
        test::call_service(&app, req).await,
        StatusCode::CONFLICT,
        ExpectedError {
            code: "DUPLICATE_ENTRY",
            ..Default::default()
        },
    )
    .await;

    let req = test::TestRequest::get().uri("/api/education").to_request();
    let data = assert_success_envelope(test::call_service(&app, req).await, StatusCode::OK).await;
    assert_eq!(data["pagination"]["total"], 1);

    let req = test::TestRequest::post()
        .uri("/api/education/bulk")
        .insert_header(admin.bearer())
        .set_json(json!({"items": [factory::education("Twin"), factory::education("twin")]}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CONFLICT);
}

#[actix_web::test]
async fn bulk_create_rejects_empty_batches() {
    let app = create_test_app(build_test_state().await).build().await;
    let admin = register_admin(&app).await;

    let req = test::TestRequest::post()
        .uri("/api/skills/bulk")
        .insert_header(admin.bearer())
        .set_json(json!({"items": []}))
        .to_request();
    assert_error_envelope(
        test::call_service(&app, req).await,
        StatusCode::BAD_REQUEST,
        ExpectedError {
            code: "VALIDATION_ERROR",
            fields: &["items"],
            ..Default::default()
        },
    )
    .await;
}

#[actix_web::test]
async fn bulk_toggle_returns_modified_count() {
    let app = create_test_app(build_test_state().await).build().await;
    let admin = register_admin(&app).await;
    let mut ids = Vec::new();
    for company in ["A Corp", "B Corp", "C Corp"] {
        let record = factory::create(
            &app,
            &admin,
            "/api/experience",
            factory::experience(company, "2019-01-01", None),
        )
        .await;
        ids.push(id_of(&record));
    }

    let req = test::TestRequest::patch()
        .uri("/api/experience/bulk/toggle-status")
        .insert_header(admin.bearer())
        .set_json(json!({"ids": &ids[..2], "isActive": false}))
        .to_request();
    let data = assert_success_envelope(test::call_service(&app, req).await, StatusCode::OK).await;
    assert_eq!(data["modifiedCount"], 2);

    let req = test::TestRequest::get()
        .uri("/api/experience?isActive=true")
        .to_request();
    let data = assert_success_envelope(test::call_service(&app, req).await, StatusCode::OK).await;
    assert_eq!(data["pagination"]["total"], 1);
    assert_eq!(data["items"][0]["company"], "C Corp");
}

#[actix_web::test]
async fn bulk_toggle_validates_ids() {
    let app = create_test_app(build_test_state().await).build().await;
    let admin = register_admin(&app).await;

    let req = test::TestRequest::patch()
        .uri("/api/categories/bulk/toggle-status")
        .insert_header(admin.bearer())
        .set_json(json!({"ids": ["nope"]}))
        .to_request();
    assert_error_envelope(
        test::call_service(&app, req).await,
        StatusCode::BAD_REQUEST,
        ExpectedError {
            code: "VALIDATION_ERROR",
            fields: &["ids", "isActive"],
            ..Default::default()
        },
    )
    .await;
}
