use actix_web::http::StatusCode;
use actix_web::test;
use backend_test_support::envelope::{assert_error_envelope, assert_success_envelope, ExpectedError};
use serde_json::json;

use crate::support::app_builder::create_test_app;
use crate::support::auth::register_admin;
use crate::support::factory::{self, id_of};
use crate::support::test_state::build_test_state;

#[actix_web::test]
async fn end_date_before_start_date_is_rejected() {
    let app = create_test_app(build_test_state().await).build().await;
    let admin = register_admin(&app).await;

    let req = test::TestRequest::post()
        .uri("/api/experience")
        .insert_header(admin.bearer())
        .set_json(factory::experience("Acme", "2020-05-01", Some("2019-01-01")))
        .to_request();
    assert_error_envelope(
        test::call_service(&app, req).await,
        StatusCode::BAD_REQUEST,
        ExpectedError {
            code: "VALIDATION_ERROR",
            fields: &["endDate"],
            ..Default::default()
        },
    )
    .await;
}

#[actix_web::test]
async fn current_role_has_no_end_date() {
    let app = create_test_app(build_test_state().await).build().await;
    let admin = register_admin(&app).await;

    let mut body = factory::experience("Initech", "2021-01-15", Some("2022-01-01"));
    body["isCurrent"] = json!(true);
    let created = factory::create(&app, &admin, "/api/experience", body).await;
    assert_eq!(created["isCurrent"], true);
    assert!(created["endDate"].is_null());
    assert_eq!(created["startDate"], "2021-01-15");
    assert_eq!(created["employmentType"], "full-time");

    let req = test::TestRequest::patch()
        .uri(&format!("/api/experience/{}", id_of(&created)))
        .insert_header(admin.bearer())
        .set_json(json!({"endDate": "2023-03-31"}))
        .to_request();
    let data = assert_success_envelope(test::call_service(&app, req).await, StatusCode::OK).await;
    assert_eq!(data["isCurrent"], false);
    assert_eq!(data["endDate"], "2023-03-31");
}

#[actix_web::test]
async fn company_and_position_form_the_natural_key() {
    let app = create_test_app(build_test_state().await).build().await;
    let admin = register_admin(&app).await;
    factory::create(
        &app,
        &admin,
        "/api/experience",
        factory::experience("Globex", "2018-01-01", None),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/experience")
        .insert_header(admin.bearer())
        .set_json(factory::experience("GLOBEX", "2019-01-01", None))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CONFLICT);

    let mut other_role = factory::experience("Globex", "2019-01-01", None);
    other_role["position"] = json!("Staff Engineer");
    factory::create(&app, &admin, "/api/experience", other_role).await;
}

#[actix_web::test]
async fn list_is_most_recent_first() {
    let app = create_test_app(build_test_state().await).build().await;
    let admin = register_admin(&app).await;
    for (company, start) in [("Old Co", "2012-01-01"), ("New Co", "2022-06-01"), ("Mid Co", "2017-03-01")] {
        factory::create(&app, &admin, "/api/experience", factory::experience(company, start, None)).await;
    }

    let req = test::TestRequest::get().uri("/api/experience").to_request();
    let data = assert_success_envelope(test::call_service(&app, req).await, StatusCode::OK).await;
    let companies: Vec<_> = data["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["company"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(companies, vec!["New Co", "Mid Co", "Old Co"]);
}

#[actix_web::test]
async fn unknown_employment_type_is_rejected() {
    let app = create_test_app(build_test_state().await).build().await;
    let admin = register_admin(&app).await;
    let mut body = factory::experience("Hooli", "2020-01-01", None);
    body["employmentType"] = json!("volunteer");

    let req = test::TestRequest::post()
        .uri("/api/experience")
        .insert_header(admin.bearer())
        .set_json(body)
        .to_request();
    assert_error_envelope(
        test::call_service(&app, req).await,
        StatusCode::BAD_REQUEST,
        ExpectedError {
            code: "VALIDATION_ERROR",
            fields: &["employmentType"],
            ..Default::default()
        },
    )
    .await;
}

#[actix_web::test]
async fn search_covers_company_and_position() {
    let app = create_test_app(build_test_state().await).build().await;
    let admin = register_admin(&app).await;
    factory::create(
        &app,
        &admin,
        "/api/experience",
        factory::experience("Müller GmbH", "2018-01-01", Some("2019-01-01")),
    )
    .await;
    let mut lead = factory::experience("Acme", "2020-01-01", None);
    lead["position"] = json!("Tech Lead");
    factory::create(&app, &admin, "/api/experience", lead).await;

    let req = test::TestRequest::get()
        .uri("/api/experience?search=M%C3%9CLLER")
        .to_request();
    let data = assert_success_envelope(test::call_service(&app, req).await, StatusCode::OK).await;
    assert_eq!(data["pagination"]["total"], 1);
    assert_eq!(data["items"][0]["company"], "Müller GmbH");

    let req = test::TestRequest::get()
        .uri("/api/experience?search=lead")
        .to_request();
    let data = assert_success_envelope(test::call_service(&app, req).await, StatusCode::OK).await;
    assert_eq!(data["pagination"]["total"], 1);
    assert_eq!(data["items"][0]["company"], "Acme");
}
