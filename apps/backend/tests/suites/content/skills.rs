use actix_web::http::StatusCode;
use actix_web::test;
use backend_test_support::envelope::{assert_error_envelope, assert_success_envelope, ExpectedError};
use serde_json::json;
use uuid::Uuid;

use crate::support::app_builder::create_test_app;
use crate::support::auth::register_admin;
use crate::support::factory::{self, id_of};
use crate::support::test_state::build_test_state;

#[actix_web::test]
async fn skill_requires_existing_category() {
    let app = create_test_app(build_test_state().await).build().await;
    let admin = register_admin(&app).await;

    let req = test::TestRequest::post()
        .uri("/api/skills")
        .insert_header(admin.bearer())
        .set_json(factory::skill("Rust", &Uuid::new_v4().to_string()))
        .to_request();
    assert_error_envelope(
        test::call_service(&app, req).await,
        StatusCode::BAD_REQUEST,
        ExpectedError {
            fields: &["categoryId"],
            message_contains: Some("Category not found"),
            code: "VALIDATION_ERROR",
        },
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/skills")
        .insert_header(admin.bearer())
        .set_json(factory::skill("Rust", "garbage"))
        .to_request();
    assert_error_envelope(
        test::call_service(&app, req).await,
        StatusCode::BAD_REQUEST,
        ExpectedError {
            code: "VALIDATION_ERROR",
            fields: &["categoryId"],
            ..Default::default()
        },
    )
    .await;
}

#[actix_web::test]
async fn proficiency_defaults_and_bounds() {
    let app = create_test_app(build_test_state().await).build().await;
    let admin = register_admin(&app).await;
    let category = factory::create(&app, &admin, "/api/categories", factory::category("Languages")).await;
    let category_id = id_of(&category);

    let skill = factory::create(
        &app,
        &admin,
        "/api/skills",
        json!({"name": "Go", "categoryId": category_id}),
    )
    .await;
    assert_eq!(skill["proficiency"], 50);
    assert!(skill["yearsOfExperience"].is_null());

    let req = test::TestRequest::post()
        .uri("/api/skills")
        .insert_header(admin.bearer())
        .set_json(json!({"name": "Zig", "categoryId": category_id, "proficiency": 101, "yearsOfExperience": 61}))
        .to_request();
    assert_error_envelope(
        test::call_service(&app, req).await,
        StatusCode::BAD_REQUEST,
        ExpectedError {
            code: "VALIDATION_ERROR",
            fields: &["proficiency", "yearsOfExperience"],
            ..Default::default()
        },
    )
    .await;
}

#[actix_web::test]
async fn list_filters_by_category_and_sorts_by_name() {
    let app = create_test_app(build_test_state().await).build().await;
    let admin = register_admin(&app).await;
    let langs = id_of(&factory::create(&app, &admin, "/api/categories", factory::category("Languages")).await);
    let tools = id_of(&factory::create(&app, &admin, "/api/categories", factory::category("Tools")).await);

    for name in ["TypeScript", "Python", "Rust"] {
        factory::create(&app, &admin, "/api/skills", factory::skill(name, &langs)).await;
    }
    factory::create(&app, &admin, "/api/skills", factory::skill("Docker", &tools)).await;

    let req = test::TestRequest::get()
        .uri(&format!("/api/skills?category={langs}"))
        .to_request();
    let data = assert_success_envelope(test::call_service(&app, req).await, StatusCode::OK).await;
    let names: Vec<_> = data["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["Python", "Rust", "TypeScript"]);
}

#[actix_web::test]
async fn duplicate_skill_name_conflicts() {
    let app = create_test_app(build_test_state().await).build().await;
    let admin = register_admin(&app).await;
    let category_id = id_of(&factory::create(&app, &admin, "/api/categories", factory::category("Web")).await);
    factory::create(&app, &admin, "/api/skills", factory::skill("React", &category_id)).await;

    let req = test::TestRequest::post()
        .uri("/api/skills")
        .insert_header(admin.bearer())
        .set_json(factory::skill("  react ", &category_id))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CONFLICT);
}
