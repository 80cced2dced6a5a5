use std::net::SocketAddr;

use actix_web::http::StatusCode;
use actix_web::test;
use backend_test_support::envelope::{assert_error_envelope, ExpectedError};
use serde_json::json;

use crate::support::app_builder::create_test_app;
use crate::support::auth::{register_admin, ADMIN_PASSWORD};
use crate::support::test_state::build_test_state;

fn client(n: u8) -> SocketAddr {
    SocketAddr::from(([10, 0, 0, n], 40000))
}

fn login(addr: SocketAddr, password: &str) -> actix_http::Request {
    test::TestRequest::post()
        .uri("/api/auth/login")
        .peer_addr(addr)
        .set_json(json!({"email": "admin@example.com", "password": password}))
        .to_request()
}

#[actix_web::test]
async fn login_limiter_counts_failures_only() {
    let app = create_test_app(build_test_state().await)
        .with_rate_limits()
        .build()
        .await;
    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .peer_addr(client(9))
        .set_json(json!({"name": "Site Admin", "email": "admin@example.com", "password": ADMIN_PASSWORD}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

    let addr = client(1);
    for _ in 0..6 {
        let resp = test::call_service(&app, login(addr, ADMIN_PASSWORD)).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }
    for _ in 0..5 {
        let resp = test::call_service(&app, login(addr, "wrong")).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    let resp = test::call_service(&app, login(addr, ADMIN_PASSWORD)).await;
    let retry_after: u64 = resp
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
        .expect("retry-after header");
    assert!(retry_after <= 900);
    assert_eq!(resp.headers().get("x-ratelimit-remaining").unwrap(), "0");
    assert_error_envelope(
        resp,
        StatusCode::TOO_MANY_REQUESTS,
        ExpectedError {
            code: "RATE_LIMITED",
            message_contains: Some("login attempts"),
            ..Default::default()
        },
    )
    .await;

    // Counters are per client.
    let resp = test::call_service(&app, login(client(2), ADMIN_PASSWORD)).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn strict_limiter_guards_registration() {
    let app = create_test_app(build_test_state().await)
        .with_rate_limits()
        .build()
        .await;
    let register = || {
        test::TestRequest::post()
            .uri("/api/auth/register")
            .peer_addr(client(3))
            .set_json(json!({"name": "Site Admin", "email": "admin@example.com", "password": ADMIN_PASSWORD}))
            .to_request()
    };

    let statuses = [
        StatusCode::CREATED,
        StatusCode::FORBIDDEN,
        StatusCode::FORBIDDEN,
        StatusCode::TOO_MANY_REQUESTS,
    ];
    for expected in statuses {
        assert_eq!(test::call_service(&app, register()).await.status(), expected);
    }
}

#[actix_web::test]
async fn limiters_are_off_outside_production() {
    let app = create_test_app(build_test_state().await).build().await;
    register_admin(&app).await;

    for _ in 0..10 {
        let resp = test::call_service(&app, login(client(4), "wrong")).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(resp.headers().get("x-ratelimit-limit").is_none());
    }
}
