use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("storage returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// A stored object as the store reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredMedia {
    pub url: String,
    pub public_id: String,
    pub bytes: u64,
}

#[derive(Debug, Clone)]
pub struct UploadRequest<'a> {
    pub folder: &'a str,
    pub public_id: &'a str,
    pub resource_type: &'a str,
    pub content_type: &'a str,
    pub data: Bytes,
}

/// Remote object storage addressed by `<folder>/<public_id>`.
#[async_trait]
pub trait MediaStore: Send + Sync {
    async fn find(
        &self,
        folder: &str,
        public_id: &str,
        resource_type: &str,
    ) -> Result<Option<StoredMedia>, StorageError>;

    /// Create the object. Never overwrites an existing one.
    async fn upload(&self, request: UploadRequest<'_>) -> Result<StoredMedia, StorageError>;
}

/// Map-backed store for local runs and tests. Counts remote writes so
/// dedup can be asserted.
#[derive(Debug, Default)]
pub struct InMemoryMediaStore {
    objects: DashMap<String, StoredMedia>,
    uploads: AtomicUsize,
    fail_find: AtomicBool,
}

impl InMemoryMediaStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `upload` calls that created an object.
    pub fn upload_count(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Make every `find` fail, to exercise the search-failure path.
    pub fn set_fail_find(&self, fail: bool) {
        self.fail_find.store(fail, Ordering::SeqCst);
    }
}

fn object_key(folder: &str, public_id: &str) -> String {
    format!("{folder}/{public_id}")
}

#[async_trait]
impl MediaStore for InMemoryMediaStore {
    async fn find(
        &self,
        folder: &str,
        public_id: &str,
        _resource_type: &str,
    ) -> Result<Option<StoredMedia>, StorageError> {
        if self.fail_find.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("search disabled".into()));
        }
        Ok(self
            .objects
            .get(&object_key(folder, public_id))
            .map(|entry| entry.value().clone()))
    }

    async fn upload(&self, request: UploadRequest<'_>) -> Result<StoredMedia, StorageError> {
        let key = object_key(request.folder, request.public_id);
        let entry = self.objects.entry(key.clone()).or_insert_with(|| {
            self.uploads.fetch_add(1, Ordering::SeqCst);
            StoredMedia {
                url: format!("memory://{key}"),
                public_id: key.clone(),
                bytes: request.data.len() as u64,
            }
        });
        Ok(entry.value().clone())
    }
}
