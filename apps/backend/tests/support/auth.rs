use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{test, Error};
use backend_test_support::envelope::assert_success_envelope;
use serde_json::{json, Value};

pub const ADMIN_PASSWORD: &str = "correct-horse";

pub struct Admin {
    pub token: String,
    pub user: Value,
    pub email: String,
}

impl Admin {
    pub fn bearer(&self) -> (&'static str, String) {
        ("Authorization", format!("Bearer {}", self.token))
    }
}

/// Register the one admin account through the API.
pub async fn register_admin<S>(app: &S) -> Admin
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = Error>,
{
    let email = "admin@example.com".to_string();
    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({
            "name": "Site Admin",
            "email": email,
            "password": ADMIN_PASSWORD,
        }))
        .to_request();
    let data = assert_success_envelope(test::call_service(app, req).await, StatusCode::CREATED).await;
    Admin {
        token: data["token"].as_str().expect("token").to_string(),
        user: data["user"].clone(),
        email,
    }
}
