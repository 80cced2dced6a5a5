//! Cloudinary-compatible HTTP media store.
//!
//! Lookups use the Admin API (basic auth); uploads use the signed Upload API
//! with `overwrite=false` and a SHA-256 signature.

use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tracing::debug;
use url::Url;

use crate::config::CloudinaryConfig;
use crate::uploads::storage::{MediaStore, StorageError, StoredMedia, UploadRequest};

pub const DEFAULT_API_BASE: &str = "https://api.cloudinary.com";

#[derive(Debug, Deserialize)]
struct ResourceResponse {
    secure_url: String,
    public_id: String,
    #[serde(default)]
    bytes: u64,
}

impl From<ResourceResponse> for StoredMedia {
    fn from(r: ResourceResponse) -> Self {
        StoredMedia {
            url: r.secure_url,
            public_id: r.public_id,
            bytes: r.bytes,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CloudinaryStore {
    client: Client,
    config: CloudinaryConfig,
    api_base: Url,
}

impl CloudinaryStore {
    pub fn new(config: CloudinaryConfig) -> Result<Self, StorageError> {
        let api_base = Url::parse(DEFAULT_API_BASE)
            .map_err(|e| StorageError::Unavailable(format!("bad api base: {e}")))?;
        Ok(Self::with_base(Client::new(), config, api_base))
    }

    pub fn with_base(client: Client, config: CloudinaryConfig, api_base: Url) -> Self {
        Self {
            client,
            config,
            api_base,
        }
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, StorageError> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|_| StorageError::Unavailable("api base cannot be a base URL".into()))?
            .pop_if_empty()
            .push("v1_1")
            .push(&self.config.cloud_name)
            .extend(segments);
        Ok(url)
    }
}

/// Sign upload parameters: sort by key, join as `k=v&...`, append the
/// secret, SHA-256, lowercase hex.
pub fn sign_params(params: &[(&str, &str)], api_secret: &str) -> String {
    let mut sorted: Vec<_> = params.iter().filter(|(_, v)| !v.is_empty()).collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0));
    let joined = sorted
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(joined.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}

async fn error_from(resp: reqwest::Response) -> StorageError {
    let status = resp.status().as_u16();
    let body = resp.text().await.unwrap_or_default();
    StorageError::Status { status, body }
}

#[async_trait]
impl MediaStore for CloudinaryStore {
    async fn find(
        &self,
        folder: &str,
        public_id: &str,
        resource_type: &str,
    ) -> Result<Option<StoredMedia>, StorageError> {
        let full_id = format!("{folder}/{public_id}");
        let mut segments = vec!["resources", resource_type, "upload"];
        segments.extend(full_id.split('/'));
        let url = self.endpoint(&segments)?;

        let resp = self
            .client
            .get(url)
            .basic_auth(&self.config.api_key, Some(&self.config.api_secret))
            .send()
            .await?;

        match resp.status() {
            StatusCode::NOT_FOUND => Ok(None),
            s if s.is_success() => {
                let resource: ResourceResponse = resp.json().await?;
                Ok(Some(resource.into()))
            }
            _ => Err(error_from(resp).await),
        }
    }

    async fn upload(&self, request: UploadRequest<'_>) -> Result<StoredMedia, StorageError> {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default()
            .to_string();

        let signed = [
            ("folder", request.folder),
            ("overwrite", "false"),
            ("public_id", request.public_id),
            ("timestamp", timestamp.as_str()),
        ];
        let signature = sign_params(&signed, &self.config.api_secret);

        let part = Part::bytes(request.data.to_vec())
            .file_name(request.public_id.to_string())
            .mime_str(request.content_type)?;

        let mut form = Form::new().part("file", part);
        for (key, value) in signed {
            form = form.text(key.to_string(), value.to_string());
        }
        let form = form
            .text("api_key", self.config.api_key.clone())
            .text("signature", signature)
            .text("signature_algorithm", "sha256");

        let url = self.endpoint(&[request.resource_type, "upload"])?;
        debug!(public_id = request.public_id, folder = request.folder, "uploading to media store");

        let resp = self.client.post(url).multipart(form).send().await?;
        if !resp.status().is_success() {
            return Err(error_from(resp).await);
        }
        let resource: ResourceResponse = resp.json().await?;
        Ok(resource.into())
    }
}
