// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

use std::time::Duration;

/// Preview layout constants
pub mod preview {
    /// Fixed extent of the preview pane in points
    ///
    /// In portrait the pane spans the full screen width at this height;
    /// in landscape it spans the full screen height at this width.
    pub const PANE_EXTENT: f32 = 450.0;

    /// Default screen width in points when the embedding UI reports none
    pub const DEFAULT_SCREEN_WIDTH: f32 = 390.0;

    /// Default screen height in points when the embedding UI reports none
    pub const DEFAULT_SCREEN_HEIGHT: f32 = 844.0;
}

/// Timing constants
pub mod timing {
    use super::Duration;

    /// Record timer tick interval (second granularity)
    pub const TIMER_TICK: Duration = Duration::from_secs(1);

    /// Frame interval for synthetic preview streaming (~30fps)
    pub const PREVIEW_FRAME_INTERVAL: Duration = Duration::from_millis(33);

    /// Frame interval for the synthetic recording writer (~15fps)
    pub const RECORD_FRAME_INTERVAL: Duration = Duration::from_millis(66);
}

/// Capture file naming conventions
pub mod file_naming {
    /// Prefix for saved photos
    pub const PHOTO_PREFIX: &str = "IMG_";

    /// Prefix for saved videos
    pub const VIDEO_PREFIX: &str = "VID_";

    /// Timestamp format appended after the prefix
    pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

    /// Folder created under the system Pictures/Videos directories
    pub const DEFAULT_SAVE_FOLDER: &str = "Camera";

    /// Container extension for recordings (concatenated JPEG frames)
    pub const VIDEO_EXTENSION: &str = "mjpeg";
}

/// Supported file formats for the still-image camera source
pub mod file_formats {
    /// Supported image file extensions
    pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "webp"];

    /// Check if a file extension is a supported image format
    pub fn is_image_extension(ext: &str) -> bool {
        IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str())
    }
}

/// Resolution labels for device listings
pub fn get_resolution_label(width: u32) -> Option<&'static str> {
    match width {
        w if w >= 7680 => Some("8K"), // 7680x4320
        w if w >= 3840 => Some("4K"), // 3840x2160
        w if w >= 2560 => Some("2K"), // 2560x1440
        w if w >= 1920 => Some("HD"), // 1920x1080
        w if w >= 640 => Some("SD"),  // 640x480
        _ => None,
    }
}

/// Application information utilities
pub mod app_info {
    /// Get the application version from build-time environment
    pub fn version() -> &'static str {
        env!("GIT_VERSION")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_labels() {
        assert_eq!(get_resolution_label(3840), Some("4K"));
        assert_eq!(get_resolution_label(1920), Some("HD"));
        assert_eq!(get_resolution_label(640), Some("SD"));
        assert_eq!(get_resolution_label(320), None);
    }

    #[test]
    fn test_image_extension_detection() {
        assert!(file_formats::is_image_extension("png"));
        assert!(file_formats::is_image_extension("JPG"));
        assert!(!file_formats::is_image_extension("mp4"));
    }
}
