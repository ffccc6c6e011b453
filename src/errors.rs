// SPDX-License-Identifier: MPL-2.0
// Some variants are only constructed by hardware backend implementations
#![allow(dead_code)]

//! Error types for the capture engine

use std::fmt;

/// Result alias for fallible engine operations
pub type AppResult<T> = Result<T, AppError>;

/// Top-level error for engine operations
#[derive(Debug, Clone)]
pub enum AppError {
    /// Device layer failures
    Camera(CameraError),
    /// Video recording failures
    Recording(RecordingError),
    /// Still capture failures
    Photo(PhotoError),
    /// Configuration load/save failures
    Config(String),
    /// Filesystem failures outside the capture pipelines
    Storage(String),
    /// Free-form error message
    Other(String),
}

/// Errors from camera selection and session wiring
#[derive(Debug, Clone)]
pub enum CameraError {
    /// No camera device with the requested facing
    NoCameraFound,
    /// Session initialization failed
    InitializationFailed(String),
    /// Device went away mid-session
    Disconnected,
    /// Backend error (device layer)
    BackendError(String),
    /// Camera is busy or locked by another session
    Busy,
}

/// Errors from the video recording lifecycle
#[derive(Debug, Clone)]
pub enum RecordingError {
    /// Recording could not be started
    StartFailed(String),
    /// Recording could not be finalized
    StopFailed(String),
    /// No audio device available for video mode
    NoAudioDevice,
    /// A recording is already in flight
    AlreadyRecording,
    /// No recording in progress
    NotRecording,
}

/// Errors from the still capture pipeline
#[derive(Debug, Clone)]
pub enum PhotoError {
    /// The feed produced no frame to capture
    NoFrameAvailable,
    /// Capture failed
    CaptureFailed(String),
    /// Encoding failed
    EncodingFailed(String),
    /// Save failed
    SaveFailed(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Camera(e) => write!(f, "Camera error: {}", e),
            AppError::Recording(e) => write!(f, "Recording error: {}", e),
            AppError::Photo(e) => write!(f, "Photo error: {}", e),
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
            AppError::Storage(msg) => write!(f, "Storage error: {}", msg),
            AppError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl fmt::Display for CameraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraError::NoCameraFound => write!(f, "No camera device found"),
            CameraError::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            CameraError::Disconnected => write!(f, "Camera disconnected"),
            CameraError::BackendError(msg) => write!(f, "Backend error: {}", msg),
            CameraError::Busy => write!(f, "Camera is busy"),
        }
    }
}

impl fmt::Display for RecordingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordingError::StartFailed(msg) => write!(f, "Failed to start recording: {}", msg),
            RecordingError::StopFailed(msg) => write!(f, "Failed to stop recording: {}", msg),
            RecordingError::NoAudioDevice => write!(f, "No audio device available"),
            RecordingError::AlreadyRecording => write!(f, "Recording already in progress"),
            RecordingError::NotRecording => write!(f, "No recording in progress"),
        }
    }
}

impl fmt::Display for PhotoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhotoError::NoFrameAvailable => write!(f, "No frame available for capture"),
            PhotoError::CaptureFailed(msg) => write!(f, "Capture failed: {}", msg),
            PhotoError::EncodingFailed(msg) => write!(f, "Encoding failed: {}", msg),
            PhotoError::SaveFailed(msg) => write!(f, "Save failed: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}
impl std::error::Error for CameraError {}
impl std::error::Error for RecordingError {}
impl std::error::Error for PhotoError {}

// Lift sub-errors into AppError
impl From<CameraError> for AppError {
    fn from(err: CameraError) -> Self {
        AppError::Camera(err)
    }
}

impl From<RecordingError> for AppError {
    fn from(err: RecordingError) -> Self {
        AppError::Recording(err)
    }
}

impl From<PhotoError> for AppError {
    fn from(err: PhotoError) -> Self {
        AppError::Photo(err)
    }
}

// Conversion from String for free-form call sites
impl From<String> for AppError {
    fn from(msg: String) -> Self {
        AppError::Other(msg)
    }
}

impl From<&str> for AppError {
    fn from(msg: &str) -> Self {
        AppError::Other(msg.to_string())
    }
}

// I/O errors surface as storage or save failures
impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<std::io::Error> for PhotoError {
    fn from(err: std::io::Error) -> Self {
        PhotoError::SaveFailed(err.to_string())
    }
}

impl From<std::io::Error> for RecordingError {
    fn from(err: std::io::Error) -> Self {
        RecordingError::StartFailed(err.to_string())
    }
}
