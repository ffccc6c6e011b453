// SPDX-License-Identifier: MPL-2.0

//! Processing pipelines for photo and video capture
//!
//! This module provides the async processing pipelines that turn raw camera
//! frames into files on disk. All heavy operations run in background tasks
//! so the live preview never stalls.
//!
//! # Pipeline Architecture
//!
//! ```text
//! ┌──────────────┐     ┌───────────────────┐     ┌──────────────┐
//! │ Camera Frame │ ──▶ │  Photo Pipeline   │ ──▶ │  IMG_*.jpg   │
//! │   (RGBA)     │     │  - Crop to fill   │     │  IMG_*.png   │
//! │              │     │  - Orient upright │     │              │
//! │              │     │  - Encoding       │     │              │
//! └──────────────┘     └───────────────────┘     └──────────────┘
//!
//! ┌──────────────┐     ┌───────────────────┐     ┌──────────────┐
//! │ Frame Stream │ ──▶ │  Video Pipeline   │ ──▶ │ VID_*.mjpeg  │
//! │  (backend)   │     │  - JPEG frames    │     │              │
//! │              │     │  - MJPEG stream   │     │              │
//! └──────────────┘     └───────────────────┘     └──────────────┘
//! ```
//!
//! # Modules
//!
//! - [`photo`]: Async photo capture with crop, orientation and encoding
//! - [`video`]: MJPEG recording written by the backend's writer thread

pub mod photo;
pub mod video;
