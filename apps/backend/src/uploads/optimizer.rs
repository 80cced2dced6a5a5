//! Image downscale + JPEG re-encode behind a trait so the pipeline can be
//! tested with a failing or recording optimizer.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::ImageReader;
use thiserror::Error;

use crate::uploads::policy::OptimizeOptions;

#[derive(Debug, Error)]
pub enum OptimizeError {
    #[error("image decode/encode failed: {0}")]
    Image(#[from] image::ImageError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Synchronous and CPU-bound; callers run it on the blocking pool.
pub trait ImageOptimizer: Send + Sync {
    /// Read `input`, write the optimized image to `output`.
    fn optimize(
        &self,
        input: &Path,
        output: &Path,
        options: &OptimizeOptions,
    ) -> Result<(), OptimizeError>;

    /// MIME type of what `optimize` writes.
    fn output_content_type(&self) -> &'static str {
        "image/jpeg"
    }
}

/// `image`-crate implementation: fit within bounds (never upscale), flatten
/// to RGB, encode JPEG at the requested quality. Same input and options
/// always give the same bytes.
#[derive(Debug, Default, Clone, Copy)]
pub struct RasterOptimizer;

impl ImageOptimizer for RasterOptimizer {
    fn optimize(
        &self,
        input: &Path,
        output: &Path,
        options: &OptimizeOptions,
    ) -> Result<(), OptimizeError> {
        let img = ImageReader::open(input)?.with_guessed_format()?.decode()?;

        let img = if img.width() > options.max_width || img.height() > options.max_height {
            img.resize(options.max_width, options.max_height, FilterType::Lanczos3)
        } else {
            img
        };

        let rgb = img.to_rgb8();
        let mut writer = BufWriter::new(File::create(output)?);
        JpegEncoder::new_with_quality(&mut writer, options.quality).encode_image(&rgb)?;
        writer.flush()?;
        Ok(())
    }
}
