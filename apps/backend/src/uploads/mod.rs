//! Content-addressed upload pipeline.
//!
//! stage (multipart -> temp file) -> optimize -> md5 -> find-or-upload.

pub mod cloudinary;
pub mod optimizer;
pub mod pipeline;
pub mod policy;
pub mod storage;

pub use cloudinary::CloudinaryStore;
pub use optimizer::{ImageOptimizer, OptimizeError, RasterOptimizer};
pub use pipeline::{process_upload, StagedUpload, UploadOutcome};
pub use policy::{OptimizeOptions, UploadKind};
pub use storage::{InMemoryMediaStore, MediaStore, StorageError, StoredMedia, UploadRequest};
