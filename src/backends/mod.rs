// SPDX-License-Identifier: MPL-2.0

//! Backend abstraction layer for camera and microphone hardware
//!
//! The backend layer stands in for the device hardware: it enumerates
//! cameras and microphones, wires inputs into the capture session, and
//! delivers frames. Everything above it talks to the [`camera::CameraBackend`]
//! trait, so a real hardware implementation can slot in without touching
//! the session or pipelines.
//!
//! # Modules
//!
//! - [`camera`]: Camera backend trait, shared types, and the synthetic
//!   in-tree implementation

pub mod camera;
