// SPDX-License-Identifier: MPL-2.0

//! Video recording pipeline
//!
//! Recording runs inside the camera backend: the backend pulls frames on its
//! own writer thread and appends them to an [`MjpegRecorder`] until the
//! session asks it to stop. This module owns the on-disk stream format.

pub mod recorder;

pub use recorder::{MjpegRecorder, RECORD_JPEG_QUALITY};
