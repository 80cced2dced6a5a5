use actix_web::http::StatusCode;
use actix_web::test;
use backend_test_support::envelope::{assert_error_envelope, assert_success_envelope, ExpectedError};
use serde_json::json;
use uuid::Uuid;

use crate::common::assert_standard_headers;
use crate::support::app_builder::create_test_app;
use crate::support::auth::register_admin;
use crate::support::factory::{self, id_of};
use crate::support::test_state::build_test_state;

#[actix_web::test]
async fn create_then_get_and_list() {
    let app = create_test_app(build_test_state().await).build().await;
    let admin = register_admin(&app).await;

    let created = factory::create(&app, &admin, "/api/categories", factory::category("Frontend")).await;
    assert_eq!(created["name"], "Frontend");
    assert_eq!(created["isActive"], true);
    let id = id_of(&created);

    let req = test::TestRequest::get()
        .uri(&format!("/api/categories/{id}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_standard_headers(&resp);
    let data = assert_success_envelope(resp, StatusCode::OK).await;
    assert_eq!(data["id"], id.as_str());

    let req = test::TestRequest::get().uri("/api/categories").to_request();
    let data = assert_success_envelope(test::call_service(&app, req).await, StatusCode::OK).await;
    assert_eq!(data["items"].as_array().unwrap().len(), 1);
    assert_eq!(data["pagination"]["total"], 1);
    assert_eq!(data["pagination"]["page"], 1);
    assert_eq!(data["pagination"]["limit"], 10);
    assert_eq!(data["pagination"]["totalPages"], 1);
}

#[actix_web::test]
async fn names_are_unique_ignoring_case() {
    let app = create_test_app(build_test_state().await).build().await;
    let admin = register_admin(&app).await;
    factory::create(&app, &admin, "/api/categories", factory::category("React")).await;

    let req = test::TestRequest::post()
        .uri("/api/categories")
        .insert_header(admin.bearer())
        .set_json(factory::category("react"))
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
}

#[actix_web::test]
async fn non_ascii_names_are_unique_ignoring_case() {
    let app = create_test_app(build_test_state().await).build().await;
    let admin = register_admin(&app).await;
    factory::create(&app, &admin, "/api/categories", factory::category("Éclair")).await;

    for name in ["Éclair", "ÉCLAIR", " éclair "] {
        let req = test::TestRequest::post()
            .uri("/api/categories")
            .insert_header(admin.bearer())
            .set_json(factory::category(name))
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
    }

    let req = test::TestRequest::get()
        .uri("/api/categories?search=%C3%89CL")
        .to_request();
    let data = assert_success_envelope(test::call_service(&app, req).await, StatusCode::OK).await;
    assert_eq!(data["items"].as_array().unwrap().len(), 1);
    assert_eq!(data["items"][0]["name"], "Éclair");
    assert!(data["items"][0].get("lookupKey").is_none());
}

#[actix_web::test]
async fn search_matches_wildcards_literally() {
    let app = create_test_app(build_test_state().await).build().await;
    let admin = register_admin(&app).await;
    factory::create(&app, &admin, "/api/categories", factory::category("100% Rust")).await;
    factory::create(&app, &admin, "/api/categories", factory::category("Frontend")).await;

    let req = test::TestRequest::get()
        .uri("/api/categories?search=%25")
        .to_request();
    let data = assert_success_envelope(test::call_service(&app, req).await, StatusCode::OK).await;
    assert_eq!(data["pagination"]["total"], 1);
    assert_eq!(data["items"][0]["name"], "100% Rust");

    let req = test::TestRequest::get()
        .uri("/api/categories?search=_")
        .to_request();
    let data = assert_success_envelope(test::call_service(&app, req).await, StatusCode::OK).await;
    assert_eq!(data["pagination"]["total"], 0);
}

#[actix_web::test]
async fn update_may_keep_its_own_name() {
    let app = create_test_app(build_test_state().await).build().await;
    let admin = register_admin(&app).await;
    let created = factory::create(&app, &admin, "/api/categories", factory::category("Tools")).await;
    let id = id_of(&created);

    let req = test::TestRequest::put()
        .uri(&format!("/api/categories/{id}"))
        .insert_header(admin.bearer())
        .set_json(json!({"name": "TOOLS", "sortOrder": 5}))
        .to_request();
    let data = assert_success_envelope(test::call_service(&app, req).await, StatusCode::OK).await;
    assert_eq!(data["name"], "TOOLS");
    assert_eq!(data["sortOrder"], 5);
    assert!(data["description"].is_null());
}

#[actix_web::test]
async fn patch_only_touches_supplied_fields() {
    let app = create_test_app(build_test_state().await).build().await;
    let admin = register_admin(&app).await;
    let created = factory::create(&app, &admin, "/api/categories", factory::category("Backend")).await;
    let id = id_of(&created);

    let req = test::TestRequest::patch()
        .uri(&format!("/api/categories/{id}"))
        .insert_header(admin.bearer())
        .set_json(json!({"icon": "server"}))
        .to_request();
    let data = assert_success_envelope(test::call_service(&app, req).await, StatusCode::OK).await;
    assert_eq!(data["icon"], "server");
    assert_eq!(data["name"], "Backend");
    assert_eq!(data["description"], "Things I use");
}

#[actix_web::test]
async fn missing_and_malformed_ids_are_not_found() {
    let app = create_test_app(build_test_state().await).build().await;

    let req = test::TestRequest::get().uri("/api/categories/not-an-id").to_request();
    assert_error_envelope(
        test::call_service(&app, req).await,
        StatusCode::NOT_FOUND,
        ExpectedError {
            code: "NOT_FOUND",
            ..Default::default()
        },
    )
    .await;

    let req = test::TestRequest::get()
        .uri(&format!("/api/categories/{}", Uuid::new_v4()))
        .to_request();
    assert_error_envelope(
        test::call_service(&app, req).await,
        StatusCode::NOT_FOUND,
        ExpectedError {
            code: "CATEGORY_NOT_FOUND",
            ..Default::default()
        },
    )
    .await;
}

#[actix_web::test]
async fn writes_require_authentication() {
    let app = create_test_app(build_test_state().await).build().await;
    let req = test::TestRequest::post()
        .uri("/api/categories")
        .set_json(factory::category("Anon"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn validation_reports_every_field() {
    let app = create_test_app(build_test_state().await).build().await;
    let admin = register_admin(&app).await;
    let req = test::TestRequest::post()
        .uri("/api/categories")
        .insert_header(admin.bearer())
        .set_json(json!({"name": "x", "sortOrder": -1}))
        .to_request();
    assert_error_envelope(
        test::call_service(&app, req).await,
        StatusCode::BAD_REQUEST,
        ExpectedError {
            code: "VALIDATION_ERROR",
            fields: &["name", "sortOrder"],
            ..Default::default()
        },
    )
    .await;
}

#[actix_web::test]
async fn category_in_use_cannot_be_deleted() {
    let app = create_test_app(build_test_state().await).build().await;
    let admin = register_admin(&app).await;
    let category = factory::create(&app, &admin, "/api/categories", factory::category("Languages")).await;
    let category_id = id_of(&category);
    let skill = factory::create(&app, &admin, "/api/skills", factory::skill("Rust", &category_id)).await;

    let delete_category = || {
        test::TestRequest::delete()
            .uri(&format!("/api/categories/{category_id}"))
            .insert_header(admin.bearer())
            .to_request()
    };
    assert_error_envelope(
        test::call_service(&app, delete_category()).await,
        StatusCode::CONFLICT,
        ExpectedError {
            code: "CATEGORY_IN_USE",
            ..Default::default()
        },
    )
    .await;

    let req = test::TestRequest::delete()
        .uri(&format!("/api/skills/{}", id_of(&skill)))
        .insert_header(admin.bearer())
        .to_request();
    assert_success_envelope(test::call_service(&app, req).await, StatusCode::OK).await;

    assert_success_envelope(test::call_service(&app, delete_category()).await, StatusCode::OK).await;
}

#[actix_web::test]
async fn toggle_status_flips_is_active() {
    let app = create_test_app(build_test_state().await).build().await;
    let admin = register_admin(&app).await;
    let category = factory::create(&app, &admin, "/api/categories", factory::category("Cloud")).await;
    let id = id_of(&category);

    for expected in [false, true] {
        let req = test::TestRequest::patch()
            .uri(&format!("/api/categories/{id}/toggle-status"))
            .insert_header(admin.bearer())
            .to_request();
        let data = assert_success_envelope(test::call_service(&app, req).await, StatusCode::OK).await;
        assert_eq!(data["isActive"], expected);
    }
}

#[actix_web::test]
async fn list_filters_by_search_and_status() {
    let app = create_test_app(build_test_state().await).build().await;
    let admin = register_admin(&app).await;
    for name in ["Databases", "Data Science", "Design"] {
        factory::create(&app, &admin, "/api/categories", factory::category(name)).await;
    }
    factory::create(
        &app,
        &admin,
        "/api/categories",
        json!({"name": "Dormant", "isActive": false}),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/categories?search=DATA").to_request();
    let data = assert_success_envelope(test::call_service(&app, req).await, StatusCode::OK).await;
    assert_eq!(data["pagination"]["total"], 2);

    let req = test::TestRequest::get()
        .uri("/api/categories?isActive=false")
        .to_request();
    let data = assert_success_envelope(test::call_service(&app, req).await, StatusCode::OK).await;
    assert_eq!(data["items"][0]["name"], "Dormant");

    let req = test::TestRequest::get()
        .uri("/api/categories?limit=2&page=2")
        .to_request();
    let data = assert_success_envelope(test::call_service(&app, req).await, StatusCode::OK).await;
    assert_eq!(data["items"].as_array().unwrap().len(), 2);
    assert_eq!(data["pagination"]["totalPages"], 2);
}
