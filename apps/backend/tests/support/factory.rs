//! Request bodies and API shortcuts for seeding content.

use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{test, Error};
use backend_test_support::envelope::assert_success_envelope;
use serde_json::{json, Value};

use super::auth::Admin;

pub fn category(name: &str) -> Value {
    json!({ "name": name, "description": "Things I use", "sortOrder": 1 })
}

pub fn skill(name: &str, category_id: &str) -> Value {
    json!({ "name": name, "categoryId": category_id, "proficiency": 80 })
}

pub fn experience(company: &str, start: &str, end: Option<&str>) -> Value {
    json!({
        "company": company,
        "position": "Engineer",
        "startDate": start,
        "endDate": end,
        "technologies": ["Rust"],
    })
}

pub fn education(institution: &str) -> Value {
    json!({
        "institution": institution,
        "degree": "BSc Computer Science",
        "startDate": "2010-09-01",
        "endDate": "2014-06-30",
    })
}

pub fn project(title: &str) -> Value {
    json!({
        "title": title,
        "description": "A thing I built",
        "technologies": ["Rust", "SQL"],
        "githubUrl": "https://github.com/example/project",
    })
}

/// POST `body` to `uri` as the admin and return the created record.
pub async fn create<S>(app: &S, admin: &Admin, uri: &str, body: Value) -> Value
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = Error>,
{
    let req = test::TestRequest::post()
        .uri(uri)
        .insert_header(admin.bearer())
        .set_json(body)
        .to_request();
    assert_success_envelope(test::call_service(app, req).await, StatusCode::CREATED).await
}

pub fn id_of(record: &Value) -> String {
    record["id"].as_str().expect("record id").to_string()
}
