// SPDX-License-Identifier: MPL-2.0
// Trait seam so a hardware backend can replace the synthetic one
#![allow(dead_code)]

//! Camera backend abstraction
//!
//! This module provides a trait-based abstraction over the device camera and
//! microphone hardware. The capture session drives it through the input
//! wiring and lifecycle calls; concrete implementations deliver frames.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────┐
//! │   CaptureSession    │  ← Facing/mode switches, reconfiguration
//! └──────────┬──────────┘
//!            │
//!            ▼
//! ┌─────────────────────┐
//! │  CameraBackend Trait│  ← Common interface
//! └──────────┬──────────┘
//!            │
//!            ▼
//!       ┌─────────┐
//!       │Synthetic│  ← Deterministic in-tree implementation
//!       └─────────┘
//! ```

pub mod synthetic;
pub mod types;

pub use synthetic::SyntheticBackend;
pub use types::*;

use std::path::PathBuf;

/// Contract between the capture session and a device implementation
///
/// Covers device enumeration with facing metadata, input wiring under a
/// begin/commit configuration window, the start/stop lifecycle, still and
/// video capture, and preview streaming.
pub trait CameraBackend: Send + Sync {
    // ===== Enumeration =====

    /// Enumerate available camera devices
    fn video_devices(&self) -> Vec<CameraDevice>;

    /// Get the default wide-angle camera for a facing
    ///
    /// # Returns
    /// * `Some(CameraDevice)` - The preferred device for that facing
    /// * `None` - No device points that way
    fn default_video_device(&self, facing: Facing) -> Option<CameraDevice>;

    /// Get the default microphone for video recording
    fn default_audio_device(&self) -> Option<AudioDevice>;

    // ===== Configuration =====

    /// Open a configuration window
    ///
    /// Input changes are staged until `commit_configuration` and the
    /// backend may defer hardware work until then.
    fn begin_configuration(&mut self);

    /// Wire a camera device into the session
    ///
    /// Acquires the device and locks it for configuration.
    ///
    /// # Returns
    /// * `Ok(())` - Input added
    /// * `Err(BackendError::ConfigurationLock)` - Device is held elsewhere
    /// * `Err(BackendError::DeviceNotFound)` - Device disappeared
    fn add_video_input(&mut self, device: &CameraDevice) -> BackendResult<()>;

    /// Wire a microphone into the session
    fn add_audio_input(&mut self, device: &AudioDevice) -> BackendResult<()>;

    /// Apply a focus policy to the wired video device
    ///
    /// # Returns
    /// * `Ok(())` - Policy applied (or ignored by a fixed-focus device)
    /// * `Err(BackendError::ConfigurationLock)` - No configuration window open
    /// * `Err(BackendError::DeviceNotFound)` - No video input wired
    fn set_focus_mode(&mut self, mode: FocusMode) -> BackendResult<()>;

    /// Remove all wired inputs, releasing their devices
    fn remove_inputs(&mut self);

    /// Commit the staged configuration
    ///
    /// # Returns
    /// * `Ok(())` - Configuration applied
    /// * `Err(BackendError::InitializationFailed)` - No video input wired
    fn commit_configuration(&mut self) -> BackendResult<()>;

    /// Inputs currently wired into the session
    fn inputs(&self) -> Vec<SessionInput>;

    // ===== Lifecycle =====

    /// Start the capture feed
    ///
    /// Requires a committed configuration with a video input. Starting an
    /// already-running backend is a no-op.
    fn start(&mut self) -> BackendResult<()>;

    /// Stop the capture feed
    ///
    /// Stops any active recording and the preview stream. Inputs stay wired.
    fn stop(&mut self);

    /// Check if the capture feed is running
    fn is_running(&self) -> bool;

    // ===== Capture: Photo =====

    /// Capture a single still frame with the given settings
    ///
    /// The frame data is copied immediately so the preview is not blocked.
    /// The frame is RGBA and ready for the photo pipeline.
    ///
    /// # Returns
    /// * `Ok(CameraFrame)` - Frame captured successfully
    /// * `Err(BackendError::NotRunning)` - Feed is not running
    fn capture_photo(&self, settings: &PhotoSettings) -> BackendResult<CameraFrame>;

    // ===== Capture: Video =====

    /// Start recording to a file
    ///
    /// Preview continues uninterrupted during recording. Only one recording
    /// can be active at a time.
    ///
    /// # Arguments
    /// * `output_path` - Path where the video file will be written
    ///
    /// # Returns
    /// * `Ok(())` - Recording started successfully
    /// * `Err(BackendError::RecordingInProgress)` - Already recording
    fn start_recording(&mut self, output_path: PathBuf) -> BackendResult<()>;

    /// Stop recording and finalize the file
    ///
    /// # Returns
    /// * `Ok(PathBuf)` - Path to the finished video file
    /// * `Err(BackendError::NoRecordingInProgress)` - No active recording
    fn stop_recording(&mut self) -> BackendResult<PathBuf>;

    /// Check if currently recording
    fn is_recording(&self) -> bool;

    // ===== Preview =====

    /// Take a receiver for preview frames
    ///
    /// The receiver gets frames while the feed is running. Each call
    /// replaces the previous stream.
    ///
    /// # Returns
    /// * `Some(FrameReceiver)` - Stream of preview frames
    /// * `None` - No video input wired
    fn preview_receiver(&mut self) -> Option<FrameReceiver>;

    // ===== Metadata =====

    /// Get the currently wired camera device (if any)
    fn current_device(&self) -> Option<&CameraDevice>;
}

/// Get a concrete backend instance
pub fn get_backend() -> Box<dyn CameraBackend> {
    Box::new(SyntheticBackend::new())
}
