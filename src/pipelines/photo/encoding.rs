// SPDX-License-Identifier: GPL-3.0-only

//! Photo encoding stage
//!
//! Turns a processed capture into file bytes, either JPEG at a preset
//! quality or lossless PNG. The compression work runs on the blocking pool
//! to avoid stalling the runtime.

use super::processing::ProcessedPhoto;
use crate::config::{PhotoOutputFormat, PhotoQuality};
use crate::errors::PhotoError;
use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageFormat, RgbImage};
use std::io::Cursor;
use tracing::debug;

/// Output formats the encoder can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodingFormat {
    /// JPEG, lossy with adjustable quality
    Jpeg,
    /// PNG, lossless
    Png,
}

impl EncodingFormat {
    /// File extension written for this format
    pub fn extension(&self) -> &'static str {
        match self {
            EncodingFormat::Jpeg => "jpg",
            EncodingFormat::Png => "png",
        }
    }

    /// Convert to image crate's ImageFormat
    fn to_image_format(&self) -> ImageFormat {
        match self {
            EncodingFormat::Jpeg => ImageFormat::Jpeg,
            EncodingFormat::Png => ImageFormat::Png,
        }
    }
}

impl From<PhotoOutputFormat> for EncodingFormat {
    fn from(format: PhotoOutputFormat) -> Self {
        match format {
            PhotoOutputFormat::Jpeg => EncodingFormat::Jpeg,
            PhotoOutputFormat::Png => EncodingFormat::Png,
        }
    }
}

/// Encoding quality presets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodingQuality {
    /// Low quality, small file size
    Low,
    /// Medium quality
    Medium,
    /// High quality (recommended)
    High,
    /// Maximum quality, large file size
    Maximum,
}

impl EncodingQuality {
    /// JPEG quality setting on the 0-100 scale
    pub fn jpeg_quality(&self) -> u8 {
        match self {
            EncodingQuality::Low => 60,
            EncodingQuality::Medium => 80,
            EncodingQuality::High => 92,
            EncodingQuality::Maximum => 98,
        }
    }
}

impl From<PhotoQuality> for EncodingQuality {
    fn from(quality: PhotoQuality) -> Self {
        match quality {
            PhotoQuality::Low => EncodingQuality::Low,
            PhotoQuality::Medium => EncodingQuality::Medium,
            PhotoQuality::High => EncodingQuality::High,
            PhotoQuality::Maximum => EncodingQuality::Maximum,
        }
    }
}

/// Encoded image data ready to be written to disk
#[derive(Debug, Clone)]
pub struct EncodedImage {
    /// Encoded bytes
    pub data: Vec<u8>,
    /// Format the data was encoded in
    pub format: EncodingFormat,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
}

/// Asynchronous photo encoder
pub struct PhotoEncoder {
    format: EncodingFormat,
    quality: EncodingQuality,
}

impl PhotoEncoder {
    /// Create a new encoder with default settings (JPEG, high quality)
    pub fn new() -> Self {
        Self {
            format: EncodingFormat::Jpeg,
            quality: EncodingQuality::High,
        }
    }

    /// Set the output format
    pub fn set_format(&mut self, format: EncodingFormat) {
        self.format = format;
    }

    /// Set the encoding quality
    pub fn set_quality(&mut self, quality: EncodingQuality) {
        self.quality = quality;
    }

    /// Get the current output format
    pub fn format(&self) -> EncodingFormat {
        self.format
    }

    /// Encode a processed photo to the configured format
    ///
    /// # Returns
    /// * `Ok(EncodedImage)` - Encoded bytes with their dimensions
    /// * `Err(PhotoError)` - Encoding failed
    pub async fn encode(&self, photo: ProcessedPhoto) -> Result<EncodedImage, PhotoError> {
        let format = self.format;
        let quality = self.quality;

        let encoded = tokio::task::spawn_blocking(move || {
            let data = match format {
                EncodingFormat::Jpeg => encode_jpeg(&photo.image, quality.jpeg_quality())?,
                EncodingFormat::Png => encode_png(&photo.image)?,
            };
            Ok::<_, PhotoError>(EncodedImage {
                data,
                format,
                width: photo.width,
                height: photo.height,
            })
        })
        .await
        .map_err(|e| PhotoError::EncodingFailed(format!("encoding task panicked: {}", e)))??;

        debug!(
            format = ?encoded.format,
            bytes = encoded.data.len(),
            "Encoded {}x{} photo",
            encoded.width,
            encoded.height
        );
        Ok(encoded)
    }
}

impl Default for PhotoEncoder {
    fn default() -> Self {
        Self::new()
    }
}

fn encode_jpeg(image: &RgbImage, quality: u8) -> Result<Vec<u8>, PhotoError> {
    let mut buffer = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
    encoder
        .encode(
            image.as_raw(),
            image.width(),
            image.height(),
            ExtendedColorType::Rgb8,
        )
        .map_err(|e| PhotoError::EncodingFailed(format!("JPEG encoding failed: {}", e)))?;
    Ok(buffer)
}

fn encode_png(image: &RgbImage) -> Result<Vec<u8>, PhotoError> {
    let mut buffer = Vec::new();
    image
        .write_to(
            &mut Cursor::new(&mut buffer),
            EncodingFormat::Png.to_image_format(),
        )
        .map_err(|e| PhotoError::EncodingFailed(format!("PNG encoding failed: {}", e)))?;
    Ok(buffer)
}
