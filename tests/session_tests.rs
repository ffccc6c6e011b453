// SPDX-License-Identifier: MPL-2.0

//! Integration tests for the capture session
//!
//! These drive a full session against the synthetic backend: device
//! switching, mode changes, photo capture through the pipeline and MJPEG
//! recording.

use viewfinder::backends::camera::types::{
    AudioDevice, CameraDevice, DeviceOrientation, Facing, MediaKind,
};
use viewfinder::backends::camera::SyntheticBackend;
use viewfinder::errors::{AppError, CameraError, RecordingError};
use viewfinder::pipelines::photo::{CaptureOrientation, PhotoPipeline};
use viewfinder::session::{CaptureMode, CaptureSession, SessionState};

fn session() -> CaptureSession {
    CaptureSession::new(Box::new(SyntheticBackend::new()))
}

fn back_camera() -> CameraDevice {
    CameraDevice {
        id: "test-back".to_string(),
        name: "Test Rear".to_string(),
        facing: Facing::Back,
        sensor_width: 640,
        sensor_height: 480,
        has_flash: true,
    }
}

#[test]
fn test_switching_facing_twice_restores_original() {
    let mut session = session();
    session.start().unwrap();

    let original_facing = session.facing();
    let original_title = session.facing_title();
    assert_eq!(original_facing, Facing::Back);
    assert_eq!(original_title, "Rear");

    session.switch_facing().unwrap();
    assert_eq!(session.facing(), Facing::Front);
    assert_eq!(session.facing_title(), "Front");
    assert_eq!(session.state(), SessionState::Running);

    session.switch_facing().unwrap();
    assert_eq!(session.facing(), original_facing);
    assert_eq!(session.facing_title(), original_title);
    assert_eq!(session.state(), SessionState::Running);
}

#[test]
fn test_preview_mirrors_front_camera_only() {
    let mut session = session();
    session.start().unwrap();
    assert!(!session.preview_mirrored(), "back preview is never mirrored");

    session.switch_facing().unwrap();
    assert!(session.preview_mirrored());

    session.set_mirror_front_preview(false);
    assert!(!session.preview_mirrored());
}

#[test]
fn test_video_mode_wires_microphone() {
    let mut session = session();
    session.start().unwrap();

    let inputs = session.inputs();
    assert_eq!(inputs.len(), 1, "photo mode wires only the camera");
    assert_eq!(inputs[0].kind, MediaKind::Video);

    session.set_mode(CaptureMode::Video).unwrap();
    let inputs = session.inputs();
    assert_eq!(inputs.len(), 2, "video mode adds the microphone");
    assert!(inputs.iter().any(|i| i.kind == MediaKind::Audio));

    // Back to photo mode drops the microphone again
    session.set_mode(CaptureMode::Photo).unwrap();
    let inputs = session.inputs();
    assert_eq!(inputs.len(), 1);
    assert_eq!(inputs[0].kind, MediaKind::Video);
}

#[test]
fn test_busy_device_abandons_switch_and_stops() {
    let mut backend = SyntheticBackend::new();
    backend.set_device_busy("synthetic-front", true);

    let mut session = CaptureSession::new(Box::new(backend));
    session.start().unwrap();
    assert_eq!(session.facing(), Facing::Back);

    let err = session.switch_facing().unwrap_err();
    assert!(
        matches!(err, AppError::Camera(CameraError::Busy)),
        "expected Busy, got {:?}",
        err
    );

    // The failed switch leaves the session stopped with the old facing
    assert_eq!(session.state(), SessionState::Stopped);
    assert_eq!(session.facing(), Facing::Back);

    // Recovery: starting again rewires the old facing
    session.start().unwrap();
    assert_eq!(session.state(), SessionState::Running);
    assert_eq!(session.facing(), Facing::Back);
}

#[test]
fn test_missing_microphone_fails_video_switch() {
    let backend = SyntheticBackend::with_devices(vec![back_camera()], None);
    let mut session = CaptureSession::new(Box::new(backend));
    session.start().unwrap();

    let err = session.set_mode(CaptureMode::Video).unwrap_err();
    assert!(
        matches!(err, AppError::Recording(RecordingError::NoAudioDevice)),
        "expected NoAudioDevice, got {:?}",
        err
    );
    assert_eq!(session.state(), SessionState::Stopped);
    assert_eq!(session.mode(), CaptureMode::Photo, "mode is kept on failure");
}

#[test]
fn test_missing_camera_fails_start() {
    let backend = SyntheticBackend::with_devices(Vec::new(), None);
    let mut session = CaptureSession::new(Box::new(backend));

    let err = session.start().unwrap_err();
    assert!(matches!(
        err,
        AppError::Camera(CameraError::NoCameraFound)
    ));
    assert_eq!(session.state(), SessionState::Stopped);
}

#[test]
fn test_capture_requires_running_session() {
    let mut session = session();
    assert!(session.capture_photo().is_err());
}

#[test]
fn test_capture_orientation_follows_device_pose() {
    let mut session = session();
    session.start().unwrap();

    session.set_device_orientation(DeviceOrientation::LandscapeLeft);
    let pending = session.capture_photo().unwrap();
    assert_eq!(pending.orientation, CaptureOrientation::Left);

    // The front camera mirrors the same pose
    session.switch_facing().unwrap();
    let pending = session.capture_photo().unwrap();
    assert_eq!(pending.orientation, CaptureOrientation::Right);
}

#[tokio::test]
async fn test_photo_capture_end_to_end() {
    let dir = tempfile::tempdir().unwrap();

    let pending = {
        let mut session = session();
        session.start().unwrap();
        let pending = session.capture_photo().unwrap();
        session.stop();
        pending
    };

    // Default portrait layout crops to 390x450
    assert_eq!((pending.target_width, pending.target_height), (390, 450));

    let path = PhotoPipeline::new()
        .process_and_save(pending, dir.path().to_path_buf())
        .await
        .unwrap();

    assert!(path.exists());
    let name = path.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("IMG_"), "unexpected name {}", name);

    let saved = image::open(&path).unwrap();
    assert_eq!((saved.width(), saved.height()), (390, 450));
}

#[test]
fn test_recording_lifecycle() {
    let dir = tempfile::tempdir().unwrap();

    let mut session = session();
    session.set_mode(CaptureMode::Video).unwrap();

    // Not recording yet
    assert!(matches!(
        session.stop_recording(),
        Err(RecordingError::NotRecording)
    ));

    let path = session.start_recording(dir.path()).unwrap();
    assert!(session.is_recording());
    assert!(path.file_name().unwrap().to_string_lossy().starts_with("VID_"));
    assert_eq!(path.extension().unwrap(), "mjpeg");

    // A second start is rejected while the first is in flight
    assert!(matches!(
        session.start_recording(dir.path()),
        Err(RecordingError::AlreadyRecording)
    ));

    let finished = session.stop_recording().unwrap();
    assert_eq!(finished, path);
    assert!(!session.is_recording());

    // The first frame lands synchronously, so the file is never empty
    let data = std::fs::read(&finished).unwrap();
    assert!(!data.is_empty());
    assert_eq!(&data[..2], &[0xFF, 0xD8], "stream starts with a JPEG frame");
}

#[test]
fn test_recording_requires_video_mode() {
    let dir = tempfile::tempdir().unwrap();

    let mut session = session();
    session.start().unwrap();
    assert_eq!(session.mode(), CaptureMode::Photo);

    let err = session.start_recording(dir.path()).unwrap_err();
    assert!(matches!(err, RecordingError::StartFailed(_)));
}

#[test]
fn test_timer_ticks_only_while_recording() {
    let dir = tempfile::tempdir().unwrap();

    let mut session = session();
    session.set_mode(CaptureMode::Video).unwrap();
    assert_eq!(session.tick(), None);

    session.start_recording(dir.path()).unwrap();
    assert_eq!(session.timer_label().as_deref(), Some("00:00:00"));
    assert_eq!(session.tick().as_deref(), Some("00:00:01"));
    assert_eq!(session.tick().as_deref(), Some("00:00:02"));

    session.stop_recording().unwrap();
    assert_eq!(session.tick(), None);
    assert_eq!(session.timer_label(), None);
}

#[test]
fn test_mode_switch_finalizes_active_recording() {
    let dir = tempfile::tempdir().unwrap();

    let mut session = session();
    session.set_mode(CaptureMode::Video).unwrap();
    let path = session.start_recording(dir.path()).unwrap();

    // Flipping to photo mode tears the wiring down; the recording must be
    // finalized rather than left open
    session.set_mode(CaptureMode::Photo).unwrap();
    assert!(!session.is_recording());
    assert!(path.exists());
    let data = std::fs::read(&path).unwrap();
    assert!(!data.is_empty());
}

#[test]
fn test_flash_label_depends_on_device() {
    let mut session = session();
    session.start().unwrap();

    // The synthetic rear camera has a flash
    assert_eq!(session.flash_label(), Some("Flash: Off"));
    session.toggle_flash();
    assert_eq!(session.flash_label(), Some("Flash: On"));
    session.toggle_flash();
    assert_eq!(session.flash_label(), Some("Flash: Off"));

    // The front camera has none, so the control is hidden
    session.switch_facing().unwrap();
    assert_eq!(session.flash_label(), None);
}

#[test]
fn test_devices_are_enumerable_through_session() {
    let session = session();
    let devices = session.video_devices();
    assert_eq!(devices.len(), 2);
    assert!(devices.iter().any(|d| d.facing == Facing::Back));
    assert!(devices.iter().any(|d| d.facing == Facing::Front));
}

#[test]
fn test_with_devices_backend_uses_custom_audio() {
    let microphone = AudioDevice {
        id: "test-mic".to_string(),
        name: "Test Microphone".to_string(),
    };
    let backend = SyntheticBackend::with_devices(vec![back_camera()], Some(microphone));
    let mut session = CaptureSession::new(Box::new(backend));

    session.set_mode(CaptureMode::Video).unwrap();
    let inputs = session.inputs();
    assert!(inputs.iter().any(|i| i.device_id == "test-mic"));
}
