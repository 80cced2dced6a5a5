use actix_web::http::StatusCode;
use actix_web::test;
use backend_test_support::envelope::{assert_error_envelope, assert_success_envelope, ExpectedError};
use backend_test_support::unique_helpers::unique_email;
use serde_json::json;

use crate::support::app_builder::create_test_app;
use crate::support::auth::{register_admin, ADMIN_PASSWORD};
use crate::support::test_state::build_test_state;

#[actix_web::test]
async fn profile_update_is_partial_and_lowercases_email() {
    let app = create_test_app(build_test_state().await).build().await;
    let admin = register_admin(&app).await;
    let email = unique_email("me");

    let req = test::TestRequest::put()
        .uri("/api/auth/profile")
        .insert_header(admin.bearer())
        .set_json(json!({"title": "Backend Engineer", "email": email.to_uppercase()}))
        .to_request();
    let data = assert_success_envelope(test::call_service(&app, req).await, StatusCode::OK).await;
    assert_eq!(data["email"], email.as_str());
    assert_eq!(data["title"], "Backend Engineer");
    assert_eq!(data["name"], "Site Admin");

    let req = test::TestRequest::put()
        .uri("/api/auth/profile")
        .insert_header(admin.bearer())
        .set_json(json!({"title": null}))
        .to_request();
    let data = assert_success_envelope(test::call_service(&app, req).await, StatusCode::OK).await;
    assert!(data["title"].is_null());
    assert_eq!(data["email"], email.as_str());
}

#[actix_web::test]
async fn profile_rejects_invalid_urls() {
    let app = create_test_app(build_test_state().await).build().await;
    let admin = register_admin(&app).await;

    let req = test::TestRequest::put()
        .uri("/api/auth/profile")
        .insert_header(admin.bearer())
        .set_json(json!({"githubUrl": "ftp://example.com", "email": "bad"}))
        .to_request();
    assert_error_envelope(
        test::call_service(&app, req).await,
        StatusCode::BAD_REQUEST,
        ExpectedError {
            code: "VALIDATION_ERROR",
            fields: &["githubUrl", "email"],
            ..Default::default()
        },
    )
    .await;
}

#[actix_web::test]
async fn change_password_checks_current_password() {
    let app = create_test_app(build_test_state().await).build().await;
    let admin = register_admin(&app).await;

    let req = test::TestRequest::put()
        .uri("/api/auth/change-password")
        .insert_header(admin.bearer())
        .set_json(json!({"currentPassword": "not-it", "newPassword": "brand-new-pass"}))
        .to_request();
    assert_error_envelope(
        test::call_service(&app, req).await,
        StatusCode::BAD_REQUEST,
        ExpectedError {
            code: "INVALID_CREDENTIALS",
            fields: &["currentPassword"],
            ..Default::default()
        },
    )
    .await;

    let req = test::TestRequest::put()
        .uri("/api/auth/change-password")
        .insert_header(admin.bearer())
        .set_json(json!({"currentPassword": ADMIN_PASSWORD, "newPassword": "brand-new-pass"}))
        .to_request();
    assert_success_envelope(test::call_service(&app, req).await, StatusCode::OK).await;

    let login = |password: &'static str| {
        test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({"email": "admin@example.com", "password": password}))
            .to_request()
    };
    assert_eq!(
        test::call_service(&app, login(ADMIN_PASSWORD)).await.status(),
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        test::call_service(&app, login("brand-new-pass")).await.status(),
        StatusCode::OK
    );
}

#[actix_web::test]
async fn change_password_enforces_minimum_length() {
    let app = create_test_app(build_test_state().await).build().await;
    let admin = register_admin(&app).await;

    let req = test::TestRequest::put()
        .uri("/api/auth/change-password")
        .insert_header(admin.bearer())
        .set_json(json!({"currentPassword": ADMIN_PASSWORD, "newPassword": "123"}))
        .to_request();
    assert_error_envelope(
        test::call_service(&app, req).await,
        StatusCode::BAD_REQUEST,
        ExpectedError {
            code: "VALIDATION_ERROR",
            fields: &["newPassword"],
            ..Default::default()
        },
    )
    .await;
}
