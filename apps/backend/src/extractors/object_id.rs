use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};
use uuid::Uuid;

use crate::error::AppError;
use crate::errors::ErrorCode;

/// The `{id}` path segment as a UUID. A malformed id cannot name an existing
/// record, so it is reported as 404 rather than 400.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectId(pub Uuid);

impl FromRequest for ObjectId {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let parsed = req
            .match_info()
            .get("id")
            .and_then(|raw| Uuid::parse_str(raw).ok())
            .map(ObjectId)
            .ok_or_else(|| AppError::not_found(ErrorCode::NotFound, "Resource not found"));
        ready(parsed)
    }
}
