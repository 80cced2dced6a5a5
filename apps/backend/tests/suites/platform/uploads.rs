use std::sync::Arc;

use actix_web::http::header::CONTENT_TYPE;
use actix_web::http::StatusCode;
use actix_web::test;
use backend::uploads::InMemoryMediaStore;
use backend_test_support::envelope::{assert_error_envelope, assert_success_envelope, ExpectedError};
use uuid::Uuid;

use crate::support::app_builder::create_test_app;
use crate::support::auth::register_admin;
use crate::support::factory::{self, id_of};
use crate::support::multipart::{self, Part};
use crate::support::test_state::build_test_state_with_media;

#[actix_web::test]
async fn identical_avatars_are_stored_once() {
    let media = Arc::new(InMemoryMediaStore::new());
    let app = create_test_app(build_test_state_with_media(media.clone()).await)
        .build()
        .await;
    let admin = register_admin(&app).await;
    let png = multipart::png(640, 480);

    let mut urls = Vec::new();
    for expect_dedup in [false, true] {
        let (content_type, body) = multipart::body(&[Part::file("me.png", "image/png", &png)]);
        let req = test::TestRequest::post()
            .uri("/api/auth/avatar")
            .insert_header(admin.bearer())
            .insert_header((CONTENT_TYPE, content_type))
            .set_payload(body)
            .to_request();
        let data = assert_success_envelope(test::call_service(&app, req).await, StatusCode::OK).await;
        assert_eq!(data["upload"]["deduplicated"], expect_dedup);
        assert!(data["upload"]["publicId"].as_str().unwrap().starts_with("avatar_"));
        assert_eq!(data["user"]["avatarUrl"], data["upload"]["url"]);
        urls.push(data["upload"]["url"].as_str().unwrap().to_string());
    }

    assert_eq!(urls[0], urls[1]);
    assert_eq!(media.upload_count(), 1);
}

#[actix_web::test]
async fn resume_accepts_pdf_only() {
    let media = Arc::new(InMemoryMediaStore::new());
    let app = create_test_app(build_test_state_with_media(media.clone()).await)
        .build()
        .await;
    let admin = register_admin(&app).await;

    let png = multipart::png(10, 10);
    let (content_type, body) = multipart::body(&[Part::file("cv.png", "image/png", &png)]);
    let req = test::TestRequest::post()
        .uri("/api/auth/resume")
        .insert_header(admin.bearer())
        .insert_header((CONTENT_TYPE, content_type))
        .set_payload(body)
        .to_request();
    assert_error_envelope(
        test::call_service(&app, req).await,
        StatusCode::BAD_REQUEST,
        ExpectedError {
            code: "INVALID_UPLOAD",
            fields: &["file"],
            ..Default::default()
        },
    )
    .await;
    assert_eq!(media.upload_count(), 0);

    let pdf = b"%PDF-1.4\n% resume\n".to_vec();
    let (content_type, body) = multipart::body(&[
        Part::text("note", "ignored"),
        Part::file("cv.pdf", "application/pdf", &pdf),
    ]);
    let req = test::TestRequest::post()
        .uri("/api/auth/resume")
        .insert_header(admin.bearer())
        .insert_header((CONTENT_TYPE, content_type))
        .set_payload(body)
        .to_request();
    let data = assert_success_envelope(test::call_service(&app, req).await, StatusCode::OK).await;
    assert_eq!(data["upload"]["bytes"], pdf.len());
    assert_eq!(data["user"]["resumeUrl"], data["upload"]["url"]);
}

#[actix_web::test]
async fn missing_file_field_is_rejected() {
    let app = create_test_app(build_test_state_with_media(Arc::new(InMemoryMediaStore::new())).await)
        .build()
        .await;
    let admin = register_admin(&app).await;

    let (content_type, body) = multipart::body(&[Part::text("caption", "hello")]);
    let req = test::TestRequest::post()
        .uri("/api/auth/avatar")
        .insert_header(admin.bearer())
        .insert_header((CONTENT_TYPE, content_type))
        .set_payload(body)
        .to_request();
    assert_error_envelope(
        test::call_service(&app, req).await,
        StatusCode::BAD_REQUEST,
        ExpectedError {
            code: "INVALID_UPLOAD",
            message_contains: Some("No file uploaded"),
            fields: &["file"],
        },
    )
    .await;
}

#[actix_web::test]
async fn uploads_require_authentication() {
    let media = Arc::new(InMemoryMediaStore::new());
    let app = create_test_app(build_test_state_with_media(media.clone()).await)
        .build()
        .await;

    let png = multipart::png(8, 8);
    let (content_type, body) = multipart::body(&[Part::file("a.png", "image/png", &png)]);
    let req = test::TestRequest::post()
        .uri("/api/auth/avatar")
        .insert_header((CONTENT_TYPE, content_type))
        .set_payload(body)
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(media.upload_count(), 0);
}

#[actix_web::test]
async fn project_image_sets_image_url() {
    let media = Arc::new(InMemoryMediaStore::new());
    let app = create_test_app(build_test_state_with_media(media.clone()).await)
        .build()
        .await;
    let admin = register_admin(&app).await;
    let project = factory::create(&app, &admin, "/api/projects", factory::project("Gallery")).await;
    let png = multipart::png(1600, 1200);

    let (content_type, body) = multipart::body(&[Part::file("shot.png", "image/png", &png)]);
    let req = test::TestRequest::post()
        .uri(&format!("/api/projects/{}/image", id_of(&project)))
        .insert_header(admin.bearer())
        .insert_header((CONTENT_TYPE, content_type))
        .set_payload(body)
        .to_request();
    let data = assert_success_envelope(test::call_service(&app, req).await, StatusCode::OK).await;
    assert!(data["upload"]["publicId"].as_str().unwrap().starts_with("project_"));
    assert_eq!(data["project"]["imageUrl"], data["upload"]["url"]);

    let (content_type, body) = multipart::body(&[Part::file("shot.png", "image/png", &png)]);
    let req = test::TestRequest::post()
        .uri(&format!("/api/projects/{}/image", Uuid::new_v4()))
        .insert_header(admin.bearer())
        .insert_header((CONTENT_TYPE, content_type))
        .set_payload(body)
        .to_request();
    assert_error_envelope(
        test::call_service(&app, req).await,
        StatusCode::NOT_FOUND,
        ExpectedError {
            code: "PROJECT_NOT_FOUND",
            ..Default::default()
        },
    )
    .await;
    assert_eq!(media.upload_count(), 1);
}

#[actix_web::test]
async fn size_limit_is_per_kind_and_inclusive() {
    const MIB: usize = 1024 * 1024;
    let media = Arc::new(InMemoryMediaStore::new());
    let app = create_test_app(build_test_state_with_media(media.clone()).await)
        .build()
        .await;
    let admin = register_admin(&app).await;

    let over = vec![0u8; 5 * MIB + 1];
    let (content_type, body) = multipart::body(&[Part::file("big.png", "image/png", &over)]);
    let req = test::TestRequest::post()
        .uri("/api/auth/avatar")
        .insert_header(admin.bearer())
        .insert_header((CONTENT_TYPE, content_type))
        .set_payload(body)
        .to_request();
    assert_error_envelope(
        test::call_service(&app, req).await,
        StatusCode::BAD_REQUEST,
        ExpectedError {
            code: "INVALID_UPLOAD",
            message_contains: Some("Maximum size is 5 MB"),
            fields: &["file"],
        },
    )
    .await;
    assert_eq!(media.upload_count(), 0);

    // Undecodable, so the original bytes are stored as-is.
    let exact = vec![0u8; 5 * MIB];
    let (content_type, body) = multipart::body(&[Part::file("edge.png", "image/png", &exact)]);
    let req = test::TestRequest::post()
        .uri("/api/auth/avatar")
        .insert_header(admin.bearer())
        .insert_header((CONTENT_TYPE, content_type))
        .set_payload(body)
        .to_request();
    let data = assert_success_envelope(test::call_service(&app, req).await, StatusCode::OK).await;
    assert_eq!(data["upload"]["bytes"], 5 * MIB);

    // The same byte count is well within the resume limit.
    let mut pdf = b"%PDF-1.4\n".to_vec();
    pdf.resize(5 * MIB + 1, b' ');
    let (content_type, body) = multipart::body(&[Part::file("cv.pdf", "application/pdf", &pdf)]);
    let req = test::TestRequest::post()
        .uri("/api/auth/resume")
        .insert_header(admin.bearer())
        .insert_header((CONTENT_TYPE, content_type))
        .set_payload(body)
        .to_request();
    let data = assert_success_envelope(test::call_service(&app, req).await, StatusCode::OK).await;
    assert_eq!(data["upload"]["bytes"], 5 * MIB + 1);
    assert_eq!(media.upload_count(), 2);
}

#[actix_web::test]
async fn anonymous_upload_is_refused_before_the_body_is_read() {
    let media = Arc::new(InMemoryMediaStore::new());
    let app = create_test_app(build_test_state_with_media(media.clone()).await)
        .build()
        .await;
    let admin = register_admin(&app).await;
    let project = factory::create(&app, &admin, "/api/projects", factory::project("Locked")).await;

    // Over every size cap: a staged body would fail with 400 instead.
    let oversized = vec![0u8; 11 * 1024 * 1024];
    let uris = [
        "/api/auth/avatar".to_string(),
        "/api/auth/resume".to_string(),
        format!("/api/projects/{}/image", id_of(&project)),
    ];
    for uri in &uris {
        let (content_type, body) =
            multipart::body(&[Part::file("big.bin", "image/png", &oversized)]);
        let req = test::TestRequest::post()
            .uri(uri)
            .insert_header((CONTENT_TYPE, content_type))
            .set_payload(body)
            .to_request();
        assert_error_envelope(
            test::call_service(&app, req).await,
            StatusCode::UNAUTHORIZED,
            ExpectedError {
                code: "UNAUTHORIZED_MISSING_BEARER",
                ..Default::default()
            },
        )
        .await;
    }
    assert_eq!(media.upload_count(), 0);
}
