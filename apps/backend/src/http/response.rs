//! Success envelope: `{"status":"success","message":..., "data":...}`.

use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct SuccessEnvelope<T: Serialize> {
    pub status: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

fn respond<T: Serialize>(status: StatusCode, message: String, data: Option<T>) -> HttpResponse {
    HttpResponse::build(status).json(SuccessEnvelope {
        status: "success",
        message,
        data,
    })
}

pub fn ok<T: Serialize>(message: impl Into<String>, data: T) -> HttpResponse {
    respond(StatusCode::OK, message.into(), Some(data))
}

pub fn created<T: Serialize>(message: impl Into<String>, data: T) -> HttpResponse {
    respond(StatusCode::CREATED, message.into(), Some(data))
}

/// 200 with no `data` member.
pub fn message(message: impl Into<String>) -> HttpResponse {
    respond::<()>(StatusCode::OK, message.into(), None)
}
