// SPDX-License-Identifier: MPL-2.0

//! Viewfinder - a mobile-style camera capture engine
//!
//! This library provides the core functionality for the Viewfinder camera:
//! live preview, still capture with crop and orientation handling, and
//! MJPEG video recording.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`session`]: Capture session lifecycle, device switching, record timer
//! - [`backends`]: Camera backend abstraction and the synthetic backend
//! - [`pipelines`]: Photo and video capture pipelines
//! - [`config`]: User configuration handling
//! - [`storage`]: Save directories, file naming and latest-capture lookup
//!
//! # Example
//!
//! ```no_run
//! use viewfinder::backends::camera::get_backend;
//! use viewfinder::session::CaptureSession;
//!
//! let mut session = CaptureSession::new(get_backend());
//! session.start()?;
//! let pending = session.capture_photo()?;
//! # Ok::<(), viewfinder::errors::AppError>(())
//! ```

pub mod backends;
pub mod config;
pub mod constants;
pub mod errors;
pub mod pipelines;
pub mod session;
pub mod storage;

// Re-export commonly used types
pub use backends::camera::types::{Facing, FlashMode};
pub use config::Config;
pub use errors::{AppError, AppResult};
pub use session::{CaptureMode, CaptureSession, SessionState};
