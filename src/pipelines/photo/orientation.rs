// SPDX-License-Identifier: GPL-3.0-only

//! Capture orientation resolution
//!
//! Sensors deliver frames in their native landscape layout regardless of how
//! the device is held. Before a photo is saved, the frame has to be rotated so
//! that "up" in the image matches "up" for the photographer. The mapping
//! depends on both the physical device orientation and which camera took the
//! picture: the front sensor is mirrored relative to the back sensor, so left
//! and right swap.

use crate::backends::camera::types::{DeviceOrientation, Facing, Rotation};

/// Orientation tag resolved for a single capture
///
/// Named from the photographer's point of view: `Up` means the frame is
/// already upright and needs no rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaptureOrientation {
    #[default]
    Up,
    Down,
    Left,
    Right,
}

impl CaptureOrientation {
    /// Rotation that brings a frame with this orientation upright
    pub fn rotation(&self) -> Rotation {
        match self {
            Self::Up => Rotation::None,
            Self::Right => Rotation::Rotate90,
            Self::Down => Rotation::Rotate180,
            Self::Left => Rotation::Rotate270,
        }
    }
}

impl std::fmt::Display for CaptureOrientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Up => write!(f, "up"),
            Self::Down => write!(f, "down"),
            Self::Left => write!(f, "left"),
            Self::Right => write!(f, "right"),
        }
    }
}

/// Resolve the capture orientation for a camera and device pose
///
/// Face-up, face-down and regular portrait all map to `Up`; only the
/// sideways and upside-down poses need a correction. The front camera
/// mirrors the horizontal cases.
pub fn orientation_for_capture(
    facing: Facing,
    device_orientation: DeviceOrientation,
) -> CaptureOrientation {
    match (facing, device_orientation) {
        (Facing::Back, DeviceOrientation::LandscapeLeft) => CaptureOrientation::Left,
        (Facing::Back, DeviceOrientation::LandscapeRight) => CaptureOrientation::Right,
        (Facing::Front, DeviceOrientation::LandscapeLeft) => CaptureOrientation::Right,
        (Facing::Front, DeviceOrientation::LandscapeRight) => CaptureOrientation::Left,
        (_, DeviceOrientation::PortraitUpsideDown) => CaptureOrientation::Down,
        _ => CaptureOrientation::Up,
    }
}
