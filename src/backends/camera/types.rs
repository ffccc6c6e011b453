// SPDX-License-Identifier: GPL-3.0-only

//! Types shared between the capture session and the device layer

use crate::errors::CameraError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

/// Which way the active camera points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facing {
    /// Away from the user (main camera)
    #[default]
    Back,
    /// Toward the user (selfie camera)
    Front,
}

impl Facing {
    /// Get both facings for UI iteration
    pub const ALL: [Facing; 2] = [Facing::Back, Facing::Front];

    /// The opposite facing (camera switch control)
    pub fn toggled(&self) -> Self {
        match self {
            Facing::Back => Facing::Front,
            Facing::Front => Facing::Back,
        }
    }

    /// Title label shown on the switch-facing control
    pub fn title(&self) -> &'static str {
        match self {
            Facing::Back => "Rear",
            Facing::Front => "Front",
        }
    }
}

impl std::fmt::Display for Facing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Facing::Back => write!(f, "back"),
            Facing::Front => write!(f, "front"),
        }
    }
}

/// Physical orientation of the device at capture time
///
/// Reported by the embedding platform's motion service. Face-up, face-down
/// and unknown attitudes carry no useful rotation information and are
/// treated like portrait by the orientation table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeviceOrientation {
    #[default]
    Portrait,
    PortraitUpsideDown,
    LandscapeLeft,
    LandscapeRight,
    FaceUp,
    FaceDown,
}

impl std::fmt::Display for DeviceOrientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DeviceOrientation::Portrait => "portrait",
            DeviceOrientation::PortraitUpsideDown => "portrait-upside-down",
            DeviceOrientation::LandscapeLeft => "landscape-left",
            DeviceOrientation::LandscapeRight => "landscape-right",
            DeviceOrientation::FaceUp => "face-up",
            DeviceOrientation::FaceDown => "face-down",
        };
        write!(f, "{}", name)
    }
}

/// Flash mode for still captures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashMode {
    /// Flash disabled
    #[default]
    Off,
    /// Flash fires on every capture
    On,
    /// Flash fires when the scene is dark
    Auto,
}

impl FlashMode {
    /// Get all modes for UI iteration
    pub const ALL: [FlashMode; 3] = [FlashMode::Off, FlashMode::On, FlashMode::Auto];

    /// The mode reached by tapping the flash control
    ///
    /// Off toggles to On and back; Auto falls back to Off since the
    /// control is a two-state toggle.
    pub fn toggled(&self) -> Self {
        match self {
            FlashMode::Off => FlashMode::On,
            FlashMode::On => FlashMode::Off,
            FlashMode::Auto => FlashMode::Off,
        }
    }

    /// Label shown on the flash control
    pub fn label(&self) -> &'static str {
        match self {
            FlashMode::Off => "Flash: Off",
            FlashMode::On => "Flash: On",
            FlashMode::Auto => "Flash: Auto",
        }
    }
}

impl std::fmt::Display for FlashMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FlashMode::Off => write!(f, "off"),
            FlashMode::On => write!(f, "on"),
            FlashMode::Auto => write!(f, "auto"),
        }
    }
}

/// Media kind carried by a session input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Video,
    Audio,
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaKind::Video => write!(f, "video"),
            MediaKind::Audio => write!(f, "audio"),
        }
    }
}

/// An input wired into the capture session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionInput {
    pub kind: MediaKind,
    pub device_id: String,
    pub device_name: String,
}

/// A camera the backend can wire into the session
#[derive(Debug, Clone)]
pub struct CameraDevice {
    /// Stable identifier within the backend
    pub id: String,
    /// Human-readable device name
    pub name: String,
    /// Which way the camera points
    pub facing: Facing,
    /// Native sensor width in pixels
    pub sensor_width: u32,
    /// Native sensor height in pixels
    pub sensor_height: u32,
    /// True if the device has a flash unit
    pub has_flash: bool,
}

/// A microphone the backend can wire into the session
#[derive(Debug, Clone)]
pub struct AudioDevice {
    pub id: String,
    pub name: String,
}

/// Per-capture settings passed to the backend with each still capture
#[derive(Debug, Clone, Copy)]
pub struct PhotoSettings {
    /// Requested flash mode; only honored if the device has flash
    pub flash: FlashMode,
    /// Automatic still-image stabilization
    pub stabilization: bool,
    /// Request the sensor's full-resolution output
    pub high_resolution: bool,
}

impl Default for PhotoSettings {
    fn default() -> Self {
        Self {
            flash: FlashMode::Off,
            stabilization: true,
            high_resolution: true,
        }
    }
}

/// Focus policy applied to the wired video device
///
/// Set inside the configuration window. Devices without focus control
/// treat it as a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusMode {
    /// Refocus continuously as the scene changes
    #[default]
    Continuous,
    /// Focus once when applied, then hold
    Auto,
    /// Hold the current lens position
    Locked,
}

impl std::fmt::Display for FocusMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FocusMode::Continuous => write!(f, "continuous"),
            FocusMode::Auto => write!(f, "auto"),
            FocusMode::Locked => write!(f, "locked"),
        }
    }
}

/// Image rotation in degrees (clockwise)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rotation {
    /// No rotation
    #[default]
    None,
    /// 90 degrees clockwise
    Rotate90,
    /// 180 degrees (upside down)
    Rotate180,
    /// 270 degrees clockwise (90 degrees counter-clockwise)
    Rotate270,
}

impl Rotation {
    /// Create rotation from an integer degree value (normalised to 0-360)
    pub fn from_degrees_int(degrees: i32) -> Self {
        match degrees.rem_euclid(360) {
            90 => Rotation::Rotate90,
            180 => Rotation::Rotate180,
            270 => Rotation::Rotate270,
            _ => Rotation::None,
        }
    }

    /// Get the rotation in degrees
    pub fn degrees(&self) -> u32 {
        match self {
            Rotation::None => 0,
            Rotation::Rotate90 => 90,
            Rotation::Rotate180 => 180,
            Rotation::Rotate270 => 270,
        }
    }

    /// Check if rotation swaps width and height
    pub fn swaps_dimensions(&self) -> bool {
        matches!(self, Rotation::Rotate90 | Rotation::Rotate270)
    }
}

impl std::fmt::Display for Rotation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}°", self.degrees())
    }
}

/// One frame delivered by the capture feed
///
/// Pixel data is tightly packed RGBA unless `stride` says otherwise.
#[derive(Debug, Clone)]
pub struct CameraFrame {
    pub width: u32,
    pub height: u32,
    /// RGBA pixel data
    pub data: Arc<[u8]>,
    /// Row stride in bytes (may include padding)
    pub stride: u32,
    /// Timestamp when the frame was captured (for latency diagnostics)
    pub captured_at: Instant,
}

impl CameraFrame {
    /// Create a frame from tightly packed RGBA bytes
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            data: Arc::from(data.into_boxed_slice()),
            stride: width * 4,
            captured_at: Instant::now(),
        }
    }

    /// Check if the frame carries no drawable pixel data
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.data.is_empty()
    }

    /// View the frame as an RGBA image, honoring row stride
    ///
    /// # Returns
    /// * `Some(RgbaImage)` - Pixel data copied into an image buffer
    /// * `None` - Frame is empty or the buffer is shorter than its dimensions claim
    pub fn to_rgba_image(&self) -> Option<image::RgbaImage> {
        if self.is_empty() {
            return None;
        }

        let row_bytes = (self.width as usize) * 4;
        if self.stride as usize == row_bytes {
            if self.data.len() < row_bytes * self.height as usize {
                return None;
            }
            return image::RgbaImage::from_raw(
                self.width,
                self.height,
                self.data[..row_bytes * self.height as usize].to_vec(),
            );
        }

        // Padded rows: copy the visible pixels out of each stride
        let stride = self.stride as usize;
        if self.data.len() < stride * (self.height as usize - 1) + row_bytes {
            return None;
        }
        let mut pixels = Vec::with_capacity(row_bytes * self.height as usize);
        for row in 0..self.height as usize {
            let start = row * stride;
            pixels.extend_from_slice(&self.data[start..start + row_bytes]);
        }
        image::RgbaImage::from_raw(self.width, self.height, pixels)
    }
}

/// Receiving end of a preview stream
pub type FrameReceiver = futures::channel::mpsc::Receiver<CameraFrame>;

/// Sending end of a preview stream
pub type FrameSender = futures::channel::mpsc::Sender<CameraFrame>;

/// Result alias for device layer calls
pub type BackendResult<T> = Result<T, BackendError>;

/// Failures raised by the device layer
#[derive(Debug, Clone)]
pub enum BackendError {
    /// No usable backend on this system
    NotAvailable(String),
    /// Backend setup did not complete
    InitializationFailed(String),
    /// The requested device is gone
    DeviceNotFound(String),
    /// Device could not be locked for configuration
    ConfigurationLock(String),
    /// The capture feed is not running
    NotRunning,
    /// A recording is already in flight
    RecordingInProgress,
    /// No recording in progress
    NoRecordingInProgress,
    /// General I/O error
    IoError(String),
    /// Other errors
    Other(String),
}

impl std::fmt::Display for BackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendError::NotAvailable(msg) => write!(f, "Backend not available: {}", msg),
            BackendError::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            BackendError::DeviceNotFound(msg) => write!(f, "Device not found: {}", msg),
            BackendError::ConfigurationLock(msg) => {
                write!(f, "Failed to lock device for configuration: {}", msg)
            }
            BackendError::NotRunning => write!(f, "Session is not running"),
            BackendError::RecordingInProgress => write!(f, "Recording already in progress"),
            BackendError::NoRecordingInProgress => write!(f, "No recording in progress"),
            BackendError::IoError(msg) => write!(f, "I/O error: {}", msg),
            BackendError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for BackendError {}

impl From<std::io::Error> for BackendError {
    fn from(err: std::io::Error) -> Self {
        BackendError::IoError(err.to_string())
    }
}

impl From<BackendError> for CameraError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::DeviceNotFound(_) => CameraError::NoCameraFound,
            BackendError::ConfigurationLock(_) => CameraError::Busy,
            BackendError::InitializationFailed(msg) => CameraError::InitializationFailed(msg),
            other => CameraError::BackendError(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_facing_toggle_round_trip() {
        let facing = Facing::Back;
        assert_eq!(facing.toggled().toggled(), facing);
        assert_eq!(facing.toggled().toggled().title(), "Rear");
    }

    #[test]
    fn test_flash_toggle() {
        assert_eq!(FlashMode::Off.toggled(), FlashMode::On);
        assert_eq!(FlashMode::On.toggled(), FlashMode::Off);
        // Auto is not part of the toggle cycle; tapping leaves it off
        assert_eq!(FlashMode::Auto.toggled(), FlashMode::Off);
    }

    #[test]
    fn test_flash_labels() {
        assert_eq!(FlashMode::Off.toggled().label(), "Flash: On");
        assert_eq!(FlashMode::On.toggled().label(), "Flash: Off");
    }

    #[test]
    fn test_rotation_from_degrees() {
        assert_eq!(Rotation::from_degrees_int(90), Rotation::Rotate90);
        assert_eq!(Rotation::from_degrees_int(-90), Rotation::Rotate270);
        assert_eq!(Rotation::from_degrees_int(450), Rotation::Rotate90);
        assert_eq!(Rotation::from_degrees_int(0), Rotation::None);
    }

    #[test]
    fn test_rotation_dimension_swap() {
        assert!(Rotation::Rotate90.swaps_dimensions());
        assert!(Rotation::Rotate270.swaps_dimensions());
        assert!(!Rotation::Rotate180.swaps_dimensions());
        assert!(!Rotation::None.swaps_dimensions());
    }

    #[test]
    fn test_frame_emptiness() {
        let frame = CameraFrame::from_rgba(2, 2, vec![0u8; 16]);
        assert!(!frame.is_empty());
        let degenerate = CameraFrame::from_rgba(0, 0, Vec::new());
        assert!(degenerate.is_empty());
    }

    #[test]
    fn test_frame_to_image_strips_stride_padding() {
        // Two 2x1 rows padded to 12 bytes each
        let mut data = vec![0u8; 24];
        data[0] = 10; // first pixel, first row
        data[12] = 20; // first pixel, second row
        let frame = CameraFrame {
            width: 2,
            height: 2,
            data: data.into(),
            stride: 12,
            captured_at: std::time::Instant::now(),
        };

        let image = frame.to_rgba_image().unwrap();
        assert_eq!(image.dimensions(), (2, 2));
        assert_eq!(image.get_pixel(0, 0)[0], 10);
        assert_eq!(image.get_pixel(0, 1)[0], 20);
    }

    #[test]
    fn test_frame_to_image_rejects_short_buffer() {
        let frame = CameraFrame {
            width: 4,
            height: 4,
            data: vec![0u8; 16].into(),
            stride: 16,
            captured_at: std::time::Instant::now(),
        };
        assert!(frame.to_rgba_image().is_none());
    }
}
