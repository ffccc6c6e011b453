// SPDX-License-Identifier: MPL-2.0

//! Async photo capture pipeline
//!
//! This pipeline implements a fully asynchronous photo workflow:
//!
//! ```text
//! Camera Backend → Crop + Orient → Encoding → Disk I/O
//!       ↓
//! Preview continues uninterrupted
//! ```
//!
//! # Pipeline Stages
//!
//! 1. **Processing**: Center-crop the raw frame to the preview box and rotate
//!    it upright for the device pose (async)
//! 2. **Encoding**: Convert to JPEG/PNG format (async)
//! 3. **Disk I/O**: Save under a timestamped name (async)
//!
//! Every stage runs off the runtime threads, so the live preview never
//! pauses while a capture is in flight.

pub mod encoding;
pub mod orientation;
pub mod processing;

pub use encoding::{EncodedImage, EncodingFormat, EncodingQuality, PhotoEncoder};
pub use orientation::{CaptureOrientation, orientation_for_capture};
pub use processing::{PendingCapture, ProcessedPhoto};

use crate::errors::PhotoError;
use std::path::PathBuf;
use tracing::info;

/// Complete photo capture pipeline
///
/// Orchestrates the process → encode → save workflow for a pending capture.
pub struct PhotoPipeline {
    encoder: PhotoEncoder,
}

impl PhotoPipeline {
    /// Create a new photo pipeline with default settings (JPEG, high quality)
    pub fn new() -> Self {
        Self {
            encoder: PhotoEncoder::new(),
        }
    }

    /// Create a new photo pipeline with custom encoding settings
    pub fn with_encoding(format: EncodingFormat, quality: EncodingQuality) -> Self {
        let mut encoder = PhotoEncoder::new();
        encoder.set_format(format);
        encoder.set_quality(quality);
        Self { encoder }
    }

    /// Update the encoding format
    pub fn set_format(&mut self, format: EncodingFormat) {
        self.encoder.set_format(format);
    }

    /// Update the encoding quality
    pub fn set_quality(&mut self, quality: EncodingQuality) {
        self.encoder.set_quality(quality);
    }

    /// Run a pending capture through the full pipeline
    ///
    /// # Arguments
    /// * `capture` - Raw frame plus the geometry decided at shutter time
    /// * `output_dir` - Directory to save the photo into
    ///
    /// # Returns
    /// * `Ok(PathBuf)` - Path to the saved photo
    /// * `Err(PhotoError)` - A stage failed; nothing was saved
    pub async fn process_and_save(
        &self,
        capture: PendingCapture,
        output_dir: PathBuf,
    ) -> Result<PathBuf, PhotoError> {
        // Stage 1: Crop and orient (async, CPU-bound)
        let processed = processing::process(capture).await?;

        // Stage 2: Encode (async, CPU-bound)
        let encoded = self.encoder.encode(processed).await?;

        // Stage 3: Save to disk (async, I/O-bound)
        let output_path = crate::storage::save_photo(encoded, output_dir).await?;

        info!(path = %output_path.display(), "Photo capture complete");
        Ok(output_path)
    }
}

impl Default for PhotoPipeline {
    fn default() -> Self {
        Self::new()
    }
}
