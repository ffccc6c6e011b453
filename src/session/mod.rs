// SPDX-License-Identifier: GPL-3.0-only

//! Capture session management
//!
//! The capture session owns the camera backend and drives it through its
//! lifecycle. Every change that touches the input wiring, switching cameras
//! or flipping between photo and video, goes through the same choreography:
//!
//! 1. Remove all inputs and stop the backend
//! 2. Select the device for the requested facing (plus a microphone in
//!    video mode)
//! 3. Wire the new inputs and rebuild the preview stream
//! 4. Commit the configuration and start the backend
//!
//! Only after the backend is running again does the session adopt the new
//! facing and mode, so a failed reconfiguration leaves the previous settings
//! intact with the session stopped.
//!
//! # State machine
//!
//! ```text
//!             ┌──────────────────── failure ─────────────────┐
//!             ▼                                              │
//!         Stopped ──reconfigure──▶ Configuring ──started──▶ Running
//!             ▲                                              │
//!             └──────────────────── stop ────────────────────┘
//! ```

pub mod preview;
pub mod recording;

pub use preview::{InterfaceOrientation, PreviewLayout};
pub use recording::{RecordTimer, RecordingState};

use crate::backends::camera::types::{
    CameraDevice, DeviceOrientation, Facing, FlashMode, FocusMode, FrameReceiver, PhotoSettings,
    SessionInput,
};
use crate::backends::camera::CameraBackend;
use crate::errors::{AppResult, CameraError, RecordingError};
use crate::pipelines::photo::orientation::orientation_for_capture;
use crate::pipelines::photo::processing::PendingCapture;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{error, info, warn};

/// What the session is wired to capture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaptureMode {
    #[default]
    Photo,
    Video,
}

impl CaptureMode {
    /// The other mode (photo/video toggle control)
    pub fn toggled(&self) -> Self {
        match self {
            CaptureMode::Photo => CaptureMode::Video,
            CaptureMode::Video => CaptureMode::Photo,
        }
    }
}

impl std::fmt::Display for CaptureMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CaptureMode::Photo => write!(f, "photo"),
            CaptureMode::Video => write!(f, "video"),
        }
    }
}

/// Lifecycle state of the capture session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Backend is not delivering frames
    #[default]
    Stopped,
    /// Inputs are being rewired
    Configuring,
    /// Backend is delivering frames
    Running,
}

/// Owns the camera backend and the capture state around it
pub struct CaptureSession {
    backend: Box<dyn CameraBackend>,
    state: SessionState,
    facing: Facing,
    mode: CaptureMode,
    flash: FlashMode,
    device_orientation: DeviceOrientation,
    layout: PreviewLayout,
    mirror_front_preview: bool,
    preview: Option<FrameReceiver>,
    recording: RecordingState,
}

impl CaptureSession {
    /// Create a stopped session around a backend
    pub fn new(backend: Box<dyn CameraBackend>) -> Self {
        Self {
            backend,
            state: SessionState::Stopped,
            facing: Facing::default(),
            mode: CaptureMode::default(),
            flash: FlashMode::default(),
            device_orientation: DeviceOrientation::default(),
            layout: PreviewLayout::default(),
            mirror_front_preview: true,
            preview: None,
            recording: RecordingState::Idle,
        }
    }

    /// Create a stopped session with restored settings
    pub fn with_settings(
        backend: Box<dyn CameraBackend>,
        facing: Facing,
        flash: FlashMode,
    ) -> Self {
        let mut session = Self::new(backend);
        session.facing = facing;
        session.flash = flash;
        session
    }

    // ===== Lifecycle =====

    /// Wire inputs for the current facing and mode and start the backend
    pub fn start(&mut self) -> AppResult<()> {
        self.reconfigure(self.facing, self.mode)
    }

    /// Stop the backend and drop the preview stream
    ///
    /// An active recording is finalized first.
    pub fn stop(&mut self) {
        self.abandon_recording();
        self.backend.stop();
        self.preview = None;
        self.state = SessionState::Stopped;
        info!("Capture session stopped");
    }

    /// Switch between the back and front camera
    ///
    /// On failure the session is left stopped with the previous facing
    /// still selected.
    pub fn switch_facing(&mut self) -> AppResult<()> {
        self.reconfigure(self.facing.toggled(), self.mode)
    }

    /// Switch between photo and video capture
    ///
    /// Video mode additionally wires a microphone input. Switching to the
    /// mode already active while running is a no-op.
    pub fn set_mode(&mut self, mode: CaptureMode) -> AppResult<()> {
        if mode == self.mode && self.state == SessionState::Running {
            return Ok(());
        }
        self.reconfigure(self.facing, mode)
    }

    fn reconfigure(&mut self, facing: Facing, mode: CaptureMode) -> AppResult<()> {
        info!(facing = %facing, mode = %mode, "Reconfiguring capture session");
        self.abandon_recording();
        self.state = SessionState::Configuring;
        self.preview = None;

        // Tear the old wiring down before touching device selection
        self.backend.remove_inputs();
        self.backend.stop();

        match self.wire_and_start(facing, mode) {
            Ok(()) => {
                self.facing = facing;
                self.mode = mode;
                self.state = SessionState::Running;
                info!(facing = %facing, mode = %mode, "Capture session running");
                Ok(())
            }
            Err(e) => {
                error!(error = %e, facing = %facing, mode = %mode, "Session reconfiguration failed");
                self.backend.remove_inputs();
                self.preview = None;
                self.state = SessionState::Stopped;
                Err(e)
            }
        }
    }

    fn wire_and_start(&mut self, facing: Facing, mode: CaptureMode) -> AppResult<()> {
        self.backend.begin_configuration();

        let device = self
            .backend
            .default_video_device(facing)
            .ok_or(CameraError::NoCameraFound)?;
        self.backend
            .add_video_input(&device)
            .map_err(CameraError::from)?;

        if mode == CaptureMode::Video {
            let microphone = self
                .backend
                .default_audio_device()
                .ok_or(RecordingError::NoAudioDevice)?;
            self.backend
                .add_audio_input(&microphone)
                .map_err(CameraError::from)?;
        }

        self.backend
            .set_focus_mode(FocusMode::Continuous)
            .map_err(CameraError::from)?;

        // The preview stream is tied to the input wiring, rebuild it now
        self.preview = self.backend.preview_receiver();
        if self.preview.is_none() {
            warn!("Backend did not provide a preview stream");
        }

        self.backend.commit_configuration().map_err(CameraError::from)?;
        self.backend.start().map_err(CameraError::from)?;
        Ok(())
    }

    // ===== Photo capture =====

    /// Freeze the current frame into a pending capture
    ///
    /// The pending capture carries the crop target of the preview pane and
    /// the orientation resolved from the device pose, ready for the photo
    /// pipeline. Flash is only requested when the active device has one.
    pub fn capture_photo(&mut self) -> Result<PendingCapture, CameraError> {
        let flash = match self.backend.current_device() {
            Some(device) if device.has_flash => self.flash,
            _ => FlashMode::Off,
        };
        let settings = PhotoSettings {
            flash,
            ..PhotoSettings::default()
        };

        let frame = self.backend.capture_photo(&settings)?;
        let (target_width, target_height) = self.layout.crop_target();
        let orientation = orientation_for_capture(self.facing, self.device_orientation);

        info!(
            facing = %self.facing,
            orientation = %orientation,
            target_width,
            target_height,
            "Captured photo frame"
        );

        Ok(PendingCapture {
            frame,
            target_width,
            target_height,
            orientation,
        })
    }

    // ===== Video recording =====

    /// Start recording into a fresh timestamped file under `video_dir`
    ///
    /// # Returns
    /// * `Ok(PathBuf)` - Path frames are being written to
    /// * `Err(RecordingError)` - Session not in video mode, not running, or
    ///   already recording
    pub fn start_recording(&mut self, video_dir: &Path) -> Result<PathBuf, RecordingError> {
        if self.mode != CaptureMode::Video {
            return Err(RecordingError::StartFailed(
                "session is not in video mode".to_string(),
            ));
        }
        if self.state != SessionState::Running {
            return Err(RecordingError::StartFailed(
                "session is not running".to_string(),
            ));
        }
        if self.recording.is_recording() {
            return Err(RecordingError::AlreadyRecording);
        }

        let output_path = crate::storage::allocate_video_path(video_dir)?;
        self.backend
            .start_recording(output_path.clone())
            .map_err(|e| RecordingError::StartFailed(e.to_string()))?;

        info!(path = %output_path.display(), "Recording started");
        self.recording = RecordingState::Recording {
            started_at: Instant::now(),
            output_path: output_path.clone(),
            timer: RecordTimer::new(),
        };
        Ok(output_path)
    }

    /// Stop the active recording and finalize its file
    ///
    /// # Returns
    /// * `Ok(PathBuf)` - Path of the finished recording
    /// * `Err(RecordingError)` - Nothing was recording or the writer failed
    pub fn stop_recording(&mut self) -> Result<PathBuf, RecordingError> {
        match std::mem::replace(&mut self.recording, RecordingState::Idle) {
            RecordingState::Idle => Err(RecordingError::NotRecording),
            RecordingState::Recording {
                started_at, timer, ..
            } => {
                let path = self
                    .backend
                    .stop_recording()
                    .map_err(|e| RecordingError::StopFailed(e.to_string()))?;
                info!(
                    path = %path.display(),
                    duration = %timer.label(),
                    elapsed_secs = started_at.elapsed().as_secs(),
                    "Recording stopped"
                );
                Ok(path)
            }
        }
    }

    /// Advance the recording timer by one second
    ///
    /// # Returns
    /// * `Some(String)` - Updated `HH:MM:SS` label
    /// * `None` - Nothing is recording
    pub fn tick(&mut self) -> Option<String> {
        self.recording.tick()
    }

    // Finalize a recording during teardown without surfacing errors
    fn abandon_recording(&mut self) {
        if let RecordingState::Recording { output_path, .. } =
            std::mem::replace(&mut self.recording, RecordingState::Idle)
        {
            match self.backend.stop_recording() {
                Ok(path) => {
                    info!(path = %path.display(), "Recording finalized during teardown");
                }
                Err(e) => {
                    warn!(
                        error = %e,
                        path = %output_path.display(),
                        "Failed to finalize recording during teardown"
                    );
                }
            }
        }
    }

    // ===== Controls =====

    /// Cycle the flash control and return the new mode
    ///
    /// Off and On toggle into each other; Auto falls back to Off.
    pub fn toggle_flash(&mut self) -> FlashMode {
        self.flash = self.flash.toggled();
        info!(flash = %self.flash, "Flash toggled");
        self.flash
    }

    /// Record the physical device pose for the next capture
    pub fn set_device_orientation(&mut self, orientation: DeviceOrientation) {
        self.device_orientation = orientation;
    }

    /// Adopt a new preview pane layout
    pub fn set_layout(&mut self, layout: PreviewLayout) {
        self.layout = layout;
    }

    /// Enable or disable front-camera preview mirroring
    pub fn set_mirror_front_preview(&mut self, mirror: bool) {
        self.mirror_front_preview = mirror;
    }

    // ===== Inspection =====

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == SessionState::Running
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    /// Title for the switch-facing control ("Rear" or "Front")
    pub fn facing_title(&self) -> &'static str {
        self.facing.title()
    }

    pub fn mode(&self) -> CaptureMode {
        self.mode
    }

    pub fn flash(&self) -> FlashMode {
        self.flash
    }

    /// Label for the flash control, or None when the active device has no
    /// flash and the control should be hidden
    pub fn flash_label(&self) -> Option<&'static str> {
        match self.backend.current_device() {
            Some(device) if device.has_flash => Some(self.flash.label()),
            _ => None,
        }
    }

    /// Whether a UI should mirror the preview horizontally
    ///
    /// Front previews move like a mirror; back previews never mirror.
    pub fn preview_mirrored(&self) -> bool {
        self.mirror_front_preview && self.facing == Facing::Front
    }

    pub fn is_recording(&self) -> bool {
        self.recording.is_recording()
    }

    /// Current recording timer label, if recording
    pub fn timer_label(&self) -> Option<String> {
        self.recording.timer_label()
    }

    pub fn layout(&self) -> PreviewLayout {
        self.layout
    }

    pub fn current_device(&self) -> Option<&CameraDevice> {
        self.backend.current_device()
    }

    /// Inputs currently wired into the backend
    pub fn inputs(&self) -> Vec<SessionInput> {
        self.backend.inputs()
    }

    /// Take the live preview stream
    ///
    /// The stream belongs to the caller until the next reconfiguration
    /// rebuilds it.
    pub fn take_preview(&mut self) -> Option<FrameReceiver> {
        self.preview.take()
    }

    /// Devices the backend can see, for enumeration commands
    pub fn video_devices(&self) -> Vec<CameraDevice> {
        self.backend.video_devices()
    }
}

impl Drop for CaptureSession {
    fn drop(&mut self) {
        self.abandon_recording();
        self.backend.stop();
    }
}
