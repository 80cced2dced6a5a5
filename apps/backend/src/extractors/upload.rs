//! Multipart extractor that spools the `file` field to a temp file.
//!
//! The upload kind comes from route `app_data`:
//!
//! ```ignore
//! web::resource("/avatar").app_data(UploadKind::Avatar).route(web::post().to(upload_avatar))
//! ```

use std::future::Future;
use std::io::Write;
use std::pin::Pin;

use actix_multipart::Multipart;
use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpRequest};
use futures_util::StreamExt;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::uploads::{StagedUpload, UploadKind};

pub const FILE_FIELD: &str = "file";

fn file_error(message: impl Into<String>) -> AppError {
    AppError::invalid_field(ErrorCode::InvalidUpload, FILE_FIELD, message)
}

fn io_error(e: std::io::Error) -> AppError {
    AppError::internal(format!("failed to spool upload: {e}"))
}

fn mebibytes(bytes: u64) -> u64 {
    bytes / (1024 * 1024)
}

impl FromRequest for StagedUpload {
    type Error = AppError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let kind = req.app_data::<UploadKind>().copied();
        let multipart = Multipart::new(req.headers(), payload.take());

        Box::pin(async move {
            let kind = kind
                .ok_or_else(|| AppError::internal("upload kind not configured for this route"))?;
            stage(kind, multipart).await
        })
    }
}

async fn stage(kind: UploadKind, mut multipart: Multipart) -> Result<StagedUpload, AppError> {
    while let Some(field) = multipart.next().await {
        let mut field = field.map_err(|e| file_error(format!("Malformed upload: {e}")))?;

        if field.name() != Some(FILE_FIELD) {
            while let Some(chunk) = field.next().await {
                chunk.map_err(|e| file_error(format!("Malformed upload: {e}")))?;
            }
            continue;
        }

        let content_type = field
            .content_type()
            .map(|m| m.to_string())
            .unwrap_or_default();
        if !kind.accepts(&content_type) {
            return Err(file_error(format!(
                "Invalid file type. Allowed types: {}",
                kind.allowed_mime().join(", ")
            )));
        }
        let file_name = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_string);

        let limit = kind.max_bytes();
        let mut size: u64 = 0;
        let mut file = web::block(NamedTempFile::new).await?.map_err(io_error)?;

        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|e| file_error(format!("Malformed upload: {e}")))?;
            size += chunk.len() as u64;
            if size > limit {
                return Err(file_error(format!(
                    "File too large. Maximum size is {} MB",
                    mebibytes(limit)
                )));
            }
            file = web::block(move || file.write_all(&chunk).map(|_| file))
                .await?
                .map_err(io_error)?;
        }

        if size == 0 {
            return Err(file_error("Uploaded file is empty"));
        }

        debug!(kind = %kind, size, content_type = %content_type, "upload staged");
        return Ok(StagedUpload {
            kind,
            file,
            content_type,
            size,
            file_name,
        });
    }

    Err(file_error("No file uploaded"))
}
