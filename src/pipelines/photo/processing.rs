// SPDX-License-Identifier: MPL-2.0

//! Crop-and-orient processing for captured photos
//!
//! Raw sensor frames arrive in the sensor's native size and layout. Before a
//! capture is encoded it is scaled and center-cropped so it exactly fills the
//! preview box the user composed against, then rotated upright for the pose
//! the device was held in. The heavy pixel work runs on the blocking pool so
//! the live preview stream never pauses.
//!
//! ```text
//! CameraFrame ──▶ crop_to_fill ──▶ apply_rotation ──▶ RGB strip ──▶ encoder
//! ```

use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbImage, RgbaImage};
use tracing::{debug, warn};

use super::orientation::CaptureOrientation;
use crate::backends::camera::types::{CameraFrame, Rotation};
use crate::errors::PhotoError;

/// A capture waiting to be processed
///
/// Carries the raw frame together with the geometry that was decided at
/// shutter time: the preview box dimensions and the resolved orientation.
#[derive(Debug, Clone)]
pub struct PendingCapture {
    pub frame: CameraFrame,
    pub target_width: u32,
    pub target_height: u32,
    pub orientation: CaptureOrientation,
}

/// Output of the processing stage, ready for encoding
#[derive(Debug, Clone)]
pub struct ProcessedPhoto {
    /// Upright RGB image cropped to the requested box
    pub image: RgbImage,
    pub width: u32,
    pub height: u32,
    pub orientation: CaptureOrientation,
}

/// Process a pending capture without blocking the async runtime
///
/// # Returns
/// * `Ok(ProcessedPhoto)` - Cropped and oriented image
/// * `Err(PhotoError)` - The processing task could not be run
pub async fn process(capture: PendingCapture) -> Result<ProcessedPhoto, PhotoError> {
    tokio::task::spawn_blocking(move || process_sync(capture))
        .await
        .map_err(|e| PhotoError::CaptureFailed(format!("processing task panicked: {}", e)))
}

fn process_sync(capture: PendingCapture) -> ProcessedPhoto {
    let target_width = capture.target_width.max(1);
    let target_height = capture.target_height.max(1);

    let source = match capture.frame.to_rgba_image() {
        Some(image) => image,
        None => {
            warn!(
                width = capture.frame.width,
                height = capture.frame.height,
                "Capture frame is not drawable, substituting a blank image"
            );
            RgbaImage::new(target_width, target_height)
        }
    };

    let cropped = crop_to_fill(&source, target_width, target_height);
    let oriented = apply_rotation(cropped, capture.orientation.rotation());
    let (width, height) = oriented.dimensions();
    debug!(width, height, orientation = %capture.orientation, "Processed capture");

    ProcessedPhoto {
        image: convert_rgba_to_rgb(oriented),
        width,
        height,
        orientation: capture.orientation,
    }
}

/// Minimal uniform scale at which a source covers a target box
///
/// Returns the larger of the two per-axis ratios. Scaling the source by this
/// factor leaves both dimensions at or above the target, with at least one
/// axis fitting exactly.
pub fn cover_scale(
    source_width: u32,
    source_height: u32,
    target_width: u32,
    target_height: u32,
) -> f64 {
    if source_width == 0 || source_height == 0 {
        return 1.0;
    }
    let horizontal = target_width as f64 / source_width as f64;
    let vertical = target_height as f64 / source_height as f64;
    horizontal.max(vertical)
}

/// Scale and center-crop an image so it exactly fills a target box
///
/// The aspect ratio is preserved: the source is scaled by the smallest factor
/// that covers the box, then the overhang is trimmed evenly from both sides.
/// The output dimensions always equal the target dimensions. An empty source
/// yields a blank canvas of the target size.
pub fn crop_to_fill(source: &RgbaImage, target_width: u32, target_height: u32) -> RgbaImage {
    if target_width == 0 || target_height == 0 {
        return RgbaImage::new(target_width, target_height);
    }

    let (source_width, source_height) = source.dimensions();
    if source_width == 0 || source_height == 0 {
        warn!(target_width, target_height, "Cropping an empty source, producing a blank canvas");
        return RgbaImage::new(target_width, target_height);
    }

    let scale = cover_scale(source_width, source_height, target_width, target_height);
    // Round up so the scaled image is never short of the box
    let scaled_width = ((source_width as f64 * scale).ceil() as u32).max(target_width);
    let scaled_height = ((source_height as f64 * scale).ceil() as u32).max(target_height);

    let scaled = if (scaled_width, scaled_height) == (source_width, source_height) {
        source.clone()
    } else {
        imageops::resize(source, scaled_width, scaled_height, FilterType::Triangle)
    };

    let offset_x = (scaled_width - target_width) / 2;
    let offset_y = (scaled_height - target_height) / 2;
    imageops::crop_imm(&scaled, offset_x, offset_y, target_width, target_height).to_image()
}

/// Rotate a frame upright
///
/// `Rotate90` and `Rotate270` swap the output dimensions.
pub fn apply_rotation(image: RgbaImage, rotation: Rotation) -> RgbaImage {
    match rotation {
        Rotation::None => image,
        Rotation::Rotate90 => imageops::rotate90(&image),
        Rotation::Rotate180 => imageops::rotate180(&image),
        Rotation::Rotate270 => imageops::rotate270(&image),
    }
}

/// Strip the alpha channel ahead of encoding
pub fn convert_rgba_to_rgb(image: RgbaImage) -> RgbImage {
    DynamicImage::ImageRgba8(image).to_rgb8()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use std::time::Instant;

    fn solid(width: u32, height: u32, color: [u8; 4]) -> RgbaImage {
        RgbaImage::from_pixel(width, height, Rgba(color))
    }

    #[test]
    fn test_crop_output_matches_target_exactly() {
        let cases = [
            (4000, 3000, 390, 450),
            (1280, 960, 450, 844),
            (640, 480, 450, 450),
            (101, 47, 33, 77),
            (2, 2, 400, 400),
        ];
        for (sw, sh, tw, th) in cases {
            let cropped = crop_to_fill(&solid(sw, sh, [128, 64, 32, 255]), tw, th);
            assert_eq!(
                cropped.dimensions(),
                (tw, th),
                "source {}x{} cropped to {}x{}",
                sw,
                sh,
                tw,
                th
            );
        }
    }

    #[test]
    fn test_cover_scale_is_minimal() {
        let (sw, sh, tw, th) = (4000u32, 3000u32, 390u32, 450u32);
        let scale = cover_scale(sw, sh, tw, th);

        // Covers both axes
        assert!(sw as f64 * scale >= tw as f64);
        assert!(sh as f64 * scale >= th as f64);

        // Touches the box on at least one axis, so no smaller scale covers
        let fits_width = (sw as f64 * scale - tw as f64).abs() < 1e-9;
        let fits_height = (sh as f64 * scale - th as f64).abs() < 1e-9;
        assert!(fits_width || fits_height);
    }

    #[test]
    fn test_crop_trims_overhang_evenly() {
        // Left half red, right half blue, already at target height
        let mut source = solid(4, 2, [255, 0, 0, 255]);
        for y in 0..2 {
            for x in 2..4 {
                source.put_pixel(x, y, Rgba([0, 0, 255, 255]));
            }
        }

        let cropped = crop_to_fill(&source, 2, 2);
        assert_eq!(cropped.dimensions(), (2, 2));
        // One column from each half survives the centered trim
        assert_eq!(cropped.get_pixel(0, 0)[0], 255, "left column stays red");
        assert_eq!(cropped.get_pixel(1, 0)[2], 255, "right column stays blue");
    }

    #[test]
    fn test_crop_empty_source_yields_blank_canvas() {
        let cropped = crop_to_fill(&RgbaImage::new(0, 0), 390, 450);
        assert_eq!(cropped.dimensions(), (390, 450));
        assert!(cropped.pixels().all(|p| p[0] == 0 && p[1] == 0 && p[2] == 0));
    }

    #[test]
    fn test_rotation_dimension_swap() {
        let image = solid(4, 2, [1, 2, 3, 255]);
        assert_eq!(apply_rotation(image.clone(), Rotation::Rotate90).dimensions(), (2, 4));
        assert_eq!(apply_rotation(image.clone(), Rotation::Rotate270).dimensions(), (2, 4));
        assert_eq!(apply_rotation(image.clone(), Rotation::Rotate180).dimensions(), (4, 2));
        assert_eq!(apply_rotation(image, Rotation::None).dimensions(), (4, 2));
    }

    #[test]
    fn test_process_undrawable_frame_substitutes_blank() {
        let capture = PendingCapture {
            frame: CameraFrame {
                width: 0,
                height: 0,
                data: Vec::new().into(),
                stride: 0,
                captured_at: Instant::now(),
            },
            target_width: 390,
            target_height: 450,
            orientation: CaptureOrientation::Up,
        };

        let processed = process_sync(capture);
        assert_eq!((processed.width, processed.height), (390, 450));
        assert!(processed.image.pixels().all(|p| p.0 == [0, 0, 0]));
    }

    #[test]
    fn test_process_applies_orientation() {
        let capture = PendingCapture {
            frame: CameraFrame::from_rgba(8, 8, vec![200u8; 8 * 8 * 4]),
            target_width: 4,
            target_height: 6,
            orientation: CaptureOrientation::Left,
        };

        // Rotate270 swaps the cropped 4x6 box to 6x4
        let processed = process_sync(capture);
        assert_eq!((processed.width, processed.height), (6, 4));
        assert_eq!(processed.orientation, CaptureOrientation::Left);
    }
}
