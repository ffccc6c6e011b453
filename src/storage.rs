// SPDX-License-Identifier: MPL-2.0

//! Storage utilities for managing photo and video files
//!
//! Resolves the default save directories, hands out collision-free
//! timestamped file names and finds the most recent capture for the
//! gallery handoff.

use std::io;
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::{debug, info};

use crate::constants::{file_formats, file_naming};
use crate::pipelines::photo::encoding::EncodedImage;

/// Default directory for photos: `$XDG_PICTURES_DIR/Camera`
pub fn default_photo_dir() -> PathBuf {
    dirs::picture_dir()
        .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
        .join(file_naming::DEFAULT_SAVE_FOLDER)
}

/// Default directory for videos: `$XDG_VIDEOS_DIR/Camera`
pub fn default_video_dir() -> PathBuf {
    dirs::video_dir()
        .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
        .join(file_naming::DEFAULT_SAVE_FOLDER)
}

/// Build a timestamped file name like `IMG_20260824_143005.jpg`
pub fn timestamped_name(prefix: &str, extension: &str) -> String {
    let timestamp = Local::now().format(file_naming::TIMESTAMP_FORMAT);
    format!("{}{}.{}", prefix, timestamp, extension)
}

/// Pick a path under `dir` that does not collide with an existing file
///
/// Captures taken within the same second share a timestamp, so the name
/// gets a `_1`, `_2`, ... suffix until it is free.
pub fn unique_path(dir: &Path, file_name: &str) -> PathBuf {
    let candidate = dir.join(file_name);
    if !candidate.exists() {
        return candidate;
    }

    let stem = Path::new(file_name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_name.to_string());
    let extension = Path::new(file_name)
        .extension()
        .map(|s| s.to_string_lossy().into_owned());

    let mut suffix = 1u32;
    loop {
        let name = match &extension {
            Some(ext) => format!("{}_{}.{}", stem, suffix, ext),
            None => format!("{}_{}", stem, suffix),
        };
        let candidate = dir.join(name);
        if !candidate.exists() {
            return candidate;
        }
        suffix += 1;
    }
}

/// Write an encoded photo into `dir` under a fresh timestamped name
///
/// Creates the directory if needed. The write runs on the blocking pool.
///
/// # Returns
/// * `Ok(PathBuf)` - Path the photo was written to
/// * `Err(io::Error)` - Directory creation or write failed
pub async fn save_photo(encoded: EncodedImage, dir: PathBuf) -> io::Result<PathBuf> {
    tokio::task::spawn_blocking(move || {
        std::fs::create_dir_all(&dir)?;
        let name = timestamped_name(file_naming::PHOTO_PREFIX, encoded.format.extension());
        let path = unique_path(&dir, &name);
        std::fs::write(&path, &encoded.data)?;
        info!(path = %path.display(), bytes = encoded.data.len(), "Saved photo");
        Ok(path)
    })
    .await
    .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("save task panicked: {}", e)))?
}

/// Allocate a fresh recording path under `dir`, creating the directory
pub fn allocate_video_path(dir: &Path) -> io::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let name = timestamped_name(file_naming::VIDEO_PREFIX, file_naming::VIDEO_EXTENSION);
    Ok(unique_path(dir, &name))
}

/// Find the most recent capture in a directory
///
/// Scans for image files and returns the newest by modification time.
/// Used to hand the gallery its thumbnail after a capture completes.
pub async fn latest_capture(dir: PathBuf) -> Option<PathBuf> {
    let mut entries = tokio::task::spawn_blocking(move || {
        let mut files = Vec::new();
        if let Ok(entries) = std::fs::read_dir(&dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if let Some(ext) = path.extension() {
                    if file_formats::is_image_extension(&ext.to_string_lossy()) {
                        files.push(entry);
                    }
                }
            }
        }
        files
    })
    .await
    .ok()?;

    if entries.is_empty() {
        return None;
    }

    // Sort by modification time (newest first)
    entries.sort_by_key(|e| {
        e.metadata()
            .ok()
            .and_then(|m| m.modified().ok())
            .map(std::cmp::Reverse)
    });

    let latest = entries.first()?.path();
    debug!(path = ?latest, "Found latest capture");
    Some(latest)
}
