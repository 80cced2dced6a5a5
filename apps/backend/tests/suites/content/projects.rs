use actix_web::http::StatusCode;
use actix_web::test;
use backend_test_support::envelope::{assert_error_envelope, assert_success_envelope, ExpectedError};
use backend_test_support::unique_helpers::unique_str;
use serde_json::json;

use crate::support::app_builder::create_test_app;
use crate::support::auth::register_admin;
use crate::support::factory::{self, id_of};
use crate::support::test_state::build_test_state;

#[actix_web::test]
async fn create_applies_defaults() {
    let app = create_test_app(build_test_state().await).build().await;
    let admin = register_admin(&app).await;

    let title = unique_str("portfolio");
    let project = factory::create(&app, &admin, "/api/projects", factory::project(&title)).await;
    assert_eq!(project["title"], title.as_str());
    assert_eq!(project["status"], "completed");
    assert_eq!(project["featured"], false);
    assert_eq!(project["technologies"], json!(["Rust", "SQL"]));
    assert!(project["imageUrl"].is_null());
}

#[actix_web::test]
async fn filters_by_featured_and_status() {
    let app = create_test_app(build_test_state().await).build().await;
    let admin = register_admin(&app).await;

    let mut featured = factory::project("Compiler");
    featured["featured"] = json!(true);
    featured["status"] = json!("in-progress");
    factory::create(&app, &admin, "/api/projects", featured).await;
    factory::create(&app, &admin, "/api/projects", factory::project("Blog")).await;

    let req = test::TestRequest::get().uri("/api/projects?featured=true").to_request();
    let data = assert_success_envelope(test::call_service(&app, req).await, StatusCode::OK).await;
    assert_eq!(data["pagination"]["total"], 1);
    assert_eq!(data["items"][0]["title"], "Compiler");

    let req = test::TestRequest::get().uri("/api/projects?status=completed").to_request();
    let data = assert_success_envelope(test::call_service(&app, req).await, StatusCode::OK).await;
    assert_eq!(data["items"][0]["title"], "Blog");
}

#[actix_web::test]
async fn sort_order_then_newest() {
    let app = create_test_app(build_test_state().await).build().await;
    let admin = register_admin(&app).await;

    for (title, order) in [("Third", 3), ("First", 1), ("Second", 2)] {
        let mut body = factory::project(title);
        body["sortOrder"] = json!(order);
        factory::create(&app, &admin, "/api/projects", body).await;
    }

    let req = test::TestRequest::get().uri("/api/projects").to_request();
    let data = assert_success_envelope(test::call_service(&app, req).await, StatusCode::OK).await;
    let titles: Vec<_> = data["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["title"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(titles, vec!["First", "Second", "Third"]);
}

#[actix_web::test]
async fn rejects_bad_status_and_urls() {
    let app = create_test_app(build_test_state().await).build().await;
    let admin = register_admin(&app).await;

    let mut body = factory::project("Broken");
    body["status"] = json!("abandoned");
    body["liveUrl"] = json!("javascript:alert(1)");
    let req = test::TestRequest::post()
        .uri("/api/projects")
        .insert_header(admin.bearer())
        .set_json(body)
        .to_request();
    assert_error_envelope(
        test::call_service(&app, req).await,
        StatusCode::BAD_REQUEST,
        ExpectedError {
            code: "VALIDATION_ERROR",
            fields: &["status", "liveUrl"],
            ..Default::default()
        },
    )
    .await;
}

#[actix_web::test]
async fn patch_can_clear_a_url() {
    let app = create_test_app(build_test_state().await).build().await;
    let admin = register_admin(&app).await;
    let project = factory::create(&app, &admin, "/api/projects", factory::project("Tool")).await;

    let req = test::TestRequest::patch()
        .uri(&format!("/api/projects/{}", id_of(&project)))
        .insert_header(admin.bearer())
        .set_json(json!({"githubUrl": null, "featured": true}))
        .to_request();
    let data = assert_success_envelope(test::call_service(&app, req).await, StatusCode::OK).await;
    assert!(data["githubUrl"].is_null());
    assert_eq!(data["featured"], true);
    assert_eq!(data["description"], "A thing I built");
}
