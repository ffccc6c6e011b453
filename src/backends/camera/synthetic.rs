// SPDX-License-Identifier: GPL-3.0-only

//! Synthetic camera backend
//!
//! A deterministic in-tree implementation of [`CameraBackend`] used for
//! tests, demos and headless CLI runs. Frames are either a generated
//! gradient pattern per device sensor size or a still image loaded from
//! disk. Recording appends JPEG frames to the output file as a
//! motion-JPEG stream.

use super::CameraBackend;
use super::types::*;
use crate::constants::{file_formats, timing};
use crate::pipelines::video::MjpegRecorder;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use tracing::{debug, info, warn};

/// Sensor size of the synthetic rear camera
const BACK_SENSOR: (u32, u32) = (1280, 960);

/// Sensor size of the synthetic front camera
const FRONT_SENSOR: (u32, u32) = (960, 720);

/// Preview channel depth; overflow frames are dropped
const PREVIEW_CHANNEL_CAPACITY: usize = 8;

/// Brightness added to every channel when the flash fires
const FLASH_BOOST: u8 = 48;

/// Preview streaming worker
struct PreviewWorker {
    stop: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

/// Recording writer worker
struct RecordingWorker {
    stop: Arc<AtomicBool>,
    handle: JoinHandle<std::io::Result<PathBuf>>,
    path: PathBuf,
}

/// Synthetic backend implementation
pub struct SyntheticBackend {
    /// Camera devices this backend exposes
    devices: Vec<CameraDevice>,
    /// Microphone this backend exposes (if any)
    microphone: Option<AudioDevice>,
    /// Still image served instead of the generated pattern
    source_image: Option<CameraFrame>,
    /// Devices held by another session (refuse the configuration lock)
    busy_devices: HashSet<String>,
    /// Inputs wired into the session
    inputs: Vec<SessionInput>,
    /// Device behind the wired video input
    current_device: Option<CameraDevice>,
    /// Focus policy applied to the wired video input
    focus_mode: FocusMode,
    /// Inside a begin/commit configuration window
    configuring: bool,
    /// Configuration has been committed since the last begin
    committed: bool,
    /// Capture feed running
    running: bool,
    /// Sender handed to the preview worker on start
    preview_sender: Option<FrameSender>,
    preview: Option<PreviewWorker>,
    recording: Option<RecordingWorker>,
}

impl SyntheticBackend {
    /// Create a backend with the default device set (rear + front camera, microphone)
    pub fn new() -> Self {
        let devices = vec![
            CameraDevice {
                id: "synthetic-back".to_string(),
                name: "Synthetic Rear Wide Camera".to_string(),
                facing: Facing::Back,
                sensor_width: BACK_SENSOR.0,
                sensor_height: BACK_SENSOR.1,
                has_flash: true,
            },
            CameraDevice {
                id: "synthetic-front".to_string(),
                name: "Synthetic Front Wide Camera".to_string(),
                facing: Facing::Front,
                sensor_width: FRONT_SENSOR.0,
                sensor_height: FRONT_SENSOR.1,
                has_flash: false,
            },
        ];
        let microphone = Some(AudioDevice {
            id: "synthetic-mic".to_string(),
            name: "Synthetic Microphone".to_string(),
        });
        Self::with_devices(devices, microphone)
    }

    /// Create a backend with a custom device set
    pub fn with_devices(devices: Vec<CameraDevice>, microphone: Option<AudioDevice>) -> Self {
        Self {
            devices,
            microphone,
            source_image: None,
            busy_devices: HashSet::new(),
            inputs: Vec::new(),
            current_device: None,
            focus_mode: FocusMode::default(),
            configuring: false,
            committed: false,
            running: false,
            preview_sender: None,
            preview: None,
            recording: None,
        }
    }

    /// Create a backend that serves a still image from disk
    ///
    /// Supports common image formats: PNG, JPEG, GIF, BMP, WebP
    pub fn with_source_image(path: &Path) -> BackendResult<Self> {
        let mut backend = Self::new();
        backend.source_image = Some(load_image_as_frame(path)?);
        Ok(backend)
    }

    /// Focus policy currently applied to the wired video input
    pub fn focus_mode(&self) -> FocusMode {
        self.focus_mode
    }

    /// Mark a device as held by another session
    ///
    /// Subsequent `add_video_input` calls for it fail with `ConfigurationLock`.
    pub fn set_device_busy(&mut self, id: &str, busy: bool) {
        if busy {
            self.busy_devices.insert(id.to_string());
        } else {
            self.busy_devices.remove(id);
        }
    }

    fn stop_preview(&mut self) {
        if let Some(worker) = self.preview.take() {
            worker.stop.store(true, Ordering::Relaxed);
            let _ = worker.handle.join();
            debug!("Preview worker stopped");
        }
    }

    /// Finalize an active recording without reporting the path
    fn abort_recording(&mut self) {
        if let Some(worker) = self.recording.take() {
            worker.stop.store(true, Ordering::Relaxed);
            match worker.handle.join() {
                Ok(Ok(path)) => info!(path = %path.display(), "Recording finalized on stop"),
                Ok(Err(e)) => {
                    warn!(path = %worker.path.display(), error = %e, "Recording writer failed during stop")
                }
                Err(_) => warn!(path = %worker.path.display(), "Recording writer panicked"),
            }
        }
    }

    /// The frame every capture path serves
    fn current_frame(&self, settings: &PhotoSettings) -> BackendResult<CameraFrame> {
        let device = self
            .current_device
            .as_ref()
            .ok_or_else(|| BackendError::Other("No video input wired".to_string()))?;

        if let Some(source) = &self.source_image {
            return Ok(source.clone());
        }
        Ok(generate_pattern(device, settings))
    }
}

impl Default for SyntheticBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraBackend for SyntheticBackend {
    fn video_devices(&self) -> Vec<CameraDevice> {
        self.devices.clone()
    }

    fn default_video_device(&self, facing: Facing) -> Option<CameraDevice> {
        self.devices.iter().find(|d| d.facing == facing).cloned()
    }

    fn default_audio_device(&self) -> Option<AudioDevice> {
        self.microphone.clone()
    }

    fn begin_configuration(&mut self) {
        debug!("Opening configuration window");
        self.configuring = true;
        self.committed = false;
    }

    fn add_video_input(&mut self, device: &CameraDevice) -> BackendResult<()> {
        if !self.devices.iter().any(|d| d.id == device.id) {
            return Err(BackendError::DeviceNotFound(device.id.clone()));
        }
        if self.busy_devices.contains(&device.id) {
            return Err(BackendError::ConfigurationLock(format!(
                "device '{}' is held by another session",
                device.name
            )));
        }
        if self.inputs.iter().any(|i| i.kind == MediaKind::Video) {
            return Err(BackendError::Other(
                "a video input is already wired".to_string(),
            ));
        }

        info!(device = %device.name, "Adding video input");
        self.inputs.push(SessionInput {
            kind: MediaKind::Video,
            device_id: device.id.clone(),
            device_name: device.name.clone(),
        });
        self.current_device = Some(device.clone());
        Ok(())
    }

    fn add_audio_input(&mut self, device: &AudioDevice) -> BackendResult<()> {
        let available = self
            .microphone
            .as_ref()
            .is_some_and(|mic| mic.id == device.id);
        if !available {
            return Err(BackendError::DeviceNotFound(device.id.clone()));
        }
        if self.inputs.iter().any(|i| i.kind == MediaKind::Audio) {
            return Err(BackendError::Other(
                "an audio input is already wired".to_string(),
            ));
        }

        info!(device = %device.name, "Adding audio input");
        self.inputs.push(SessionInput {
            kind: MediaKind::Audio,
            device_id: device.id.clone(),
            device_name: device.name.clone(),
        });
        Ok(())
    }

    fn set_focus_mode(&mut self, mode: FocusMode) -> BackendResult<()> {
        if !self.configuring {
            return Err(BackendError::ConfigurationLock(
                "no configuration window open".to_string(),
            ));
        }
        if self.current_device.is_none() {
            return Err(BackendError::DeviceNotFound(
                "no video input wired".to_string(),
            ));
        }
        debug!(mode = %mode, "Applying focus policy");
        self.focus_mode = mode;
        Ok(())
    }

    fn remove_inputs(&mut self) {
        if !self.inputs.is_empty() {
            debug!(count = self.inputs.len(), "Removing session inputs");
        }
        self.inputs.clear();
        self.current_device = None;
        self.focus_mode = FocusMode::default();
        self.committed = false;
    }

    fn commit_configuration(&mut self) -> BackendResult<()> {
        if !self.inputs.iter().any(|i| i.kind == MediaKind::Video) {
            return Err(BackendError::InitializationFailed(
                "no video input wired".to_string(),
            ));
        }
        self.configuring = false;
        self.committed = true;
        debug!("Configuration committed");
        Ok(())
    }

    fn inputs(&self) -> Vec<SessionInput> {
        self.inputs.clone()
    }

    fn start(&mut self) -> BackendResult<()> {
        if self.running {
            return Ok(());
        }
        if !self.committed {
            return Err(BackendError::InitializationFailed(
                "configuration not committed".to_string(),
            ));
        }

        self.running = true;

        // Stream preview frames while a receiver is attached
        if let Some(sender) = self.preview_sender.clone() {
            let stop = Arc::new(AtomicBool::new(false));
            let device = self.current_device.clone();
            let source = self.source_image.clone();
            let worker_stop = Arc::clone(&stop);
            let mut worker_sender = sender;
            let handle = std::thread::spawn(move || {
                let settings = PhotoSettings::default();
                while !worker_stop.load(Ordering::Relaxed) {
                    let frame = match (&source, &device) {
                        (Some(image), _) => image.clone(),
                        (None, Some(device)) => generate_pattern(device, &settings),
                        (None, None) => break,
                    };
                    // Drop the frame when the receiver lags
                    let _ = worker_sender.try_send(frame);
                    std::thread::sleep(timing::PREVIEW_FRAME_INTERVAL);
                }
            });
            self.preview = Some(PreviewWorker { stop, handle });
        }

        info!("Synthetic capture feed started");
        Ok(())
    }

    fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.abort_recording();
        self.stop_preview();
        self.running = false;
        info!("Synthetic capture feed stopped");
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn capture_photo(&self, settings: &PhotoSettings) -> BackendResult<CameraFrame> {
        if !self.running {
            return Err(BackendError::NotRunning);
        }
        debug!(flash = %settings.flash, "Capturing synthetic still frame");
        self.current_frame(settings)
    }

    fn start_recording(&mut self, output_path: PathBuf) -> BackendResult<()> {
        if !self.running {
            return Err(BackendError::NotRunning);
        }
        if self.recording.is_some() {
            return Err(BackendError::RecordingInProgress);
        }

        info!(path = %output_path.display(), "Starting synthetic recording");

        let mut recorder = MjpegRecorder::create(&output_path)?;
        // First frame lands synchronously so the file is never empty
        let first = self.current_frame(&PhotoSettings::default())?;
        recorder.write_frame(&first)?;

        let stop = Arc::new(AtomicBool::new(false));
        let worker_stop = Arc::clone(&stop);
        let device = self.current_device.clone();
        let source = self.source_image.clone();
        let handle = std::thread::spawn(move || -> std::io::Result<PathBuf> {
            let settings = PhotoSettings::default();
            while !worker_stop.load(Ordering::Relaxed) {
                std::thread::sleep(timing::RECORD_FRAME_INTERVAL);
                if worker_stop.load(Ordering::Relaxed) {
                    break;
                }
                let frame = match (&source, &device) {
                    (Some(image), _) => image.clone(),
                    (None, Some(device)) => generate_pattern(device, &settings),
                    (None, None) => break,
                };
                recorder.write_frame(&frame)?;
            }
            recorder.finish()
        });

        self.recording = Some(RecordingWorker {
            stop,
            handle,
            path: output_path,
        });
        Ok(())
    }

    fn stop_recording(&mut self) -> BackendResult<PathBuf> {
        let worker = self
            .recording
            .take()
            .ok_or(BackendError::NoRecordingInProgress)?;

        worker.stop.store(true, Ordering::Relaxed);
        let path = worker
            .handle
            .join()
            .map_err(|_| BackendError::Other("recording writer panicked".to_string()))??;

        info!(path = %path.display(), "Synthetic recording stopped");
        Ok(path)
    }

    fn is_recording(&self) -> bool {
        self.recording.is_some()
    }

    fn preview_receiver(&mut self) -> Option<FrameReceiver> {
        if !self.inputs.iter().any(|i| i.kind == MediaKind::Video) {
            return None;
        }
        let (sender, receiver) = futures::channel::mpsc::channel(PREVIEW_CHANNEL_CAPACITY);
        self.preview_sender = Some(sender);
        Some(receiver)
    }

    fn current_device(&self) -> Option<&CameraDevice> {
        self.current_device.as_ref()
    }
}

impl Drop for SyntheticBackend {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Generate the deterministic gradient test pattern for a device
///
/// Red runs with x, green with y, blue is constant. A firing flash lifts
/// every channel by a fixed boost. Non-high-resolution captures use half
/// the sensor size.
fn generate_pattern(device: &CameraDevice, settings: &PhotoSettings) -> CameraFrame {
    let (width, height) = if settings.high_resolution {
        (device.sensor_width, device.sensor_height)
    } else {
        (device.sensor_width / 2, device.sensor_height / 2)
    };
    let boost = if settings.flash == FlashMode::On {
        FLASH_BOOST
    } else {
        0
    };

    let mut data = Vec::with_capacity((width as usize) * (height as usize) * 4);
    for y in 0..height {
        for x in 0..width {
            let r = ((x * 255) / width.max(1)) as u8;
            let g = ((y * 255) / height.max(1)) as u8;
            data.push(r.saturating_add(boost));
            data.push(g.saturating_add(boost));
            data.push(96u8.saturating_add(boost));
            data.push(255);
        }
    }
    CameraFrame::from_rgba(width, height, data)
}

/// Load an image file and convert it to a CameraFrame
pub fn load_image_as_frame(path: &Path) -> BackendResult<CameraFrame> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();
    if !file_formats::is_image_extension(&extension) {
        return Err(BackendError::Other(format!(
            "Unsupported file format: {}",
            extension
        )));
    }

    info!(path = %path.display(), "Loading image file");

    let img = image::open(path).map_err(|e| {
        BackendError::Other(format!("Failed to load image '{}': {}", path.display(), e))
    })?;

    let rgba = img.to_rgba8();
    let width = rgba.width();
    let height = rgba.height();

    info!(width, height, "Image loaded successfully");

    Ok(CameraFrame::from_rgba(width, height, rgba.into_raw()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wired_backend() -> SyntheticBackend {
        let mut backend = SyntheticBackend::new();
        let device = backend
            .default_video_device(Facing::Back)
            .expect("default back camera");
        backend.begin_configuration();
        backend.add_video_input(&device).expect("add video input");
        backend.commit_configuration().expect("commit");
        backend
    }

    #[test]
    fn test_default_devices_cover_both_facings() {
        let backend = SyntheticBackend::new();
        assert!(backend.default_video_device(Facing::Back).is_some());
        assert!(backend.default_video_device(Facing::Front).is_some());
        assert!(backend.default_audio_device().is_some());
    }

    #[test]
    fn test_capture_requires_running_feed() {
        let backend = wired_backend();
        let err = backend
            .capture_photo(&PhotoSettings::default())
            .expect_err("feed not started");
        assert!(matches!(err, BackendError::NotRunning));
    }

    #[test]
    fn test_start_requires_committed_configuration() {
        let mut backend = SyntheticBackend::new();
        assert!(backend.start().is_err());
    }

    #[test]
    fn test_busy_device_refuses_configuration_lock() {
        let mut backend = SyntheticBackend::new();
        let device = backend.default_video_device(Facing::Front).unwrap();
        backend.set_device_busy(&device.id, true);
        backend.begin_configuration();
        let err = backend.add_video_input(&device).expect_err("device busy");
        assert!(matches!(err, BackendError::ConfigurationLock(_)));
    }

    #[test]
    fn test_focus_mode_needs_open_configuration_window() {
        let mut backend = wired_backend();
        let err = backend
            .set_focus_mode(FocusMode::Locked)
            .expect_err("window already committed");
        assert!(matches!(err, BackendError::ConfigurationLock(_)));

        backend.begin_configuration();
        backend
            .set_focus_mode(FocusMode::Locked)
            .expect("apply focus");
        assert_eq!(backend.focus_mode(), FocusMode::Locked);
    }

    #[test]
    fn test_flash_boost_brightens_pattern() {
        let mut backend = wired_backend();
        backend.start().expect("start");

        let dark = backend
            .capture_photo(&PhotoSettings::default())
            .expect("capture without flash");
        let lit = backend
            .capture_photo(&PhotoSettings {
                flash: FlashMode::On,
                ..PhotoSettings::default()
            })
            .expect("capture with flash");

        // Compare the blue channel of the first pixel
        assert_eq!(dark.data[2] as u32 + FLASH_BOOST as u32, lit.data[2] as u32);
        backend.stop();
    }

    #[test]
    fn test_half_resolution_without_high_res_setting() {
        let mut backend = wired_backend();
        backend.start().expect("start");
        let frame = backend
            .capture_photo(&PhotoSettings {
                high_resolution: false,
                ..PhotoSettings::default()
            })
            .expect("capture");
        assert_eq!(frame.width, BACK_SENSOR.0 / 2);
        assert_eq!(frame.height, BACK_SENSOR.1 / 2);
        backend.stop();
    }
}
