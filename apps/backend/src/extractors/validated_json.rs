use std::future::Future;
use std::ops::{Deref, DerefMut};
use std::pin::Pin;

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use bytes::BytesMut;
use futures_util::StreamExt;
use serde::de::DeserializeOwned;
use serde_json::error::Category;
use tracing::debug;

use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::logging::pii::Redacted;
use crate::trace_ctx;

/// Request bodies above this size are rejected before parsing.
pub const MAX_JSON_BYTES: usize = 1024 * 1024;

/// JSON body extractor whose failures become a 400 `INVALID_JSON` error
/// envelope with a sanitized message.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

impl<T> ValidatedJson<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for ValidatedJson<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> DerefMut for ValidatedJson<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

fn invalid(message: impl Into<String>) -> AppError {
    AppError::bad_request(ErrorCode::InvalidJson, message)
}

impl<T> FromRequest for ValidatedJson<T>
where
    T: DeserializeOwned + 'static,
{
    type Error = AppError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(_req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let mut payload = payload.take();

        Box::pin(async move {
            let mut body = BytesMut::new();
            while let Some(chunk) = payload.next().await {
                let chunk = chunk.map_err(|_| invalid("Failed to read request body"))?;
                if body.len() + chunk.len() > MAX_JSON_BYTES {
                    return Err(invalid("Request body too large"));
                }
                body.extend_from_slice(&chunk);
            }

            if body.iter().all(u8::is_ascii_whitespace) {
                return Err(invalid("Request body is required"));
            }

            let parsed = serde_json::from_slice::<T>(&body).map_err(|e| {
                debug!(
                    trace_id = %trace_ctx::trace_id(),
                    error = %Redacted(&e.to_string()),
                    body_size = body.len(),
                    "JSON body rejected"
                );
                invalid(sanitize(&e))
            })?;

            Ok(ValidatedJson(parsed))
        })
    }
}

/// Message safe to echo back: the error class and position, never input text.
fn sanitize(error: &serde_json::Error) -> String {
    match error.classify() {
        Category::Syntax => format!(
            "Malformed JSON at line {} column {}",
            error.line(),
            error.column()
        ),
        Category::Eof => "Malformed JSON: unexpected end of input".to_string(),
        Category::Data => "Invalid JSON: one or more fields have the wrong type".to_string(),
        Category::Io => "Invalid JSON: failed to read body".to_string(),
    }
}
