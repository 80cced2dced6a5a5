use std::sync::Arc;

use actix_web::web;
use bytes::Bytes;
use md5::{Digest, Md5};
use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::{debug, error, info, warn};

use crate::error::AppError;
use crate::trace_ctx;
use crate::uploads::optimizer::ImageOptimizer;
use crate::uploads::policy::UploadKind;
use crate::uploads::storage::{MediaStore, UploadRequest};

/// A validated upload spooled to a local temp file. Dropping it deletes the file.
#[derive(Debug)]
pub struct StagedUpload {
    pub kind: UploadKind,
    pub file: NamedTempFile,
    pub content_type: String,
    pub size: u64,
    pub file_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadOutcome {
    pub url: String,
    pub public_id: String,
    pub bytes: u64,
    /// `true` when an identical object already existed and nothing was uploaded.
    pub deduplicated: bool,
}

/// Final bytes after optional optimization.
struct Prepared {
    data: Bytes,
    content_type: String,
    md5_hex: String,
}

/// Blocking part: optimize into a second temp file, read final bytes, hash.
/// Both temp files are owned here and removed when this returns.
fn prepare(
    staged: StagedUpload,
    optimizer: Arc<dyn ImageOptimizer>,
    trace_id: &str,
) -> std::io::Result<Prepared> {
    let StagedUpload {
        kind,
        file,
        content_type,
        ..
    } = staged;

    let mut optimized = None;
    if let Some(options) = kind.optimize() {
        let out = NamedTempFile::new()?;
        match optimizer.optimize(file.path(), out.path(), &options) {
            Ok(()) => {
                optimized = Some((
                    std::fs::read(out.path())?,
                    optimizer.output_content_type().to_string(),
                ));
            }
            Err(e) => {
                warn!(trace_id, kind = %kind, error = %e, "image optimization failed; uploading original");
            }
        }
    }

    let (data, content_type) = match optimized {
        Some(found) => found,
        None => (std::fs::read(file.path())?, content_type),
    };

    let md5_hex = hex::encode(Md5::digest(&data));
    Ok(Prepared {
        data: Bytes::from(data),
        content_type,
        md5_hex,
    })
}

/// Optimize, hash and store `staged`, reusing an existing object with the
/// same content hash when there is one.
pub async fn process_upload(
    store: &dyn MediaStore,
    optimizer: Arc<dyn ImageOptimizer>,
    staged: StagedUpload,
) -> Result<UploadOutcome, AppError> {
    let kind = staged.kind;
    let trace_id = trace_ctx::trace_id();

    let blocking_trace_id = trace_id.clone();
    let prepared = web::block(move || prepare(staged, optimizer, &blocking_trace_id))
        .await?
        .map_err(|e| AppError::internal(format!("failed to read upload: {e}")))?;

    let public_id = kind.public_id(&prepared.md5_hex);
    let bytes = prepared.data.len() as u64;

    match store
        .find(kind.folder(), &public_id, kind.resource_type())
        .await
    {
        Ok(Some(existing)) => {
            info!(trace_id = %trace_id, public_id = %public_id, "upload deduplicated");
            return Ok(UploadOutcome {
                url: existing.url,
                public_id,
                bytes,
                deduplicated: true,
            });
        }
        Ok(None) => {}
        Err(e) => {
            warn!(trace_id = %trace_id, error = %e, "media search failed; uploading anyway");
        }
    }

    let stored = store
        .upload(UploadRequest {
            folder: kind.folder(),
            public_id: &public_id,
            resource_type: kind.resource_type(),
            content_type: &prepared.content_type,
            data: prepared.data,
        })
        .await
        .map_err(|e| {
            error!(trace_id = %trace_id, error = %e, "media upload failed");
            AppError::upload(format!("Upload failed: {e}"))
        })?;

    debug!(trace_id = %trace_id, public_id = %public_id, bytes, "uploaded");
    Ok(UploadOutcome {
        url: stored.url,
        public_id,
        bytes,
        deduplicated: false,
    })
}
