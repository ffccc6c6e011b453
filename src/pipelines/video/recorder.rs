// SPDX-License-Identifier: MPL-2.0

//! MJPEG stream recorder
//!
//! Writes recordings as a plain MJPEG stream: each frame is JPEG-compressed
//! and appended to the output file. Concatenated JPEG images are a valid
//! MJPEG stream that common players and demuxers accept, which keeps the
//! on-disk format free of any container bookkeeping. Entropy-coded JPEG data
//! escapes `0xFF` bytes, so the SOI marker only ever appears at frame
//! boundaries.

use crate::backends::camera::types::CameraFrame;
use crate::pipelines::photo::processing::convert_rgba_to_rgb;
use image::ExtendedColorType;
use image::codecs::jpeg::JpegEncoder;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// JPEG quality for recorded frames
///
/// Recording favors throughput over fidelity, so this sits below the
/// quality used for still captures.
pub const RECORD_JPEG_QUALITY: u8 = 80;

/// Appends JPEG-compressed frames to an MJPEG stream on disk
#[derive(Debug)]
pub struct MjpegRecorder {
    writer: BufWriter<File>,
    path: PathBuf,
    frames_written: u64,
}

impl MjpegRecorder {
    /// Create the output file and prepare an empty stream
    ///
    /// # Returns
    /// * `Ok(MjpegRecorder)` - Recorder ready to accept frames
    /// * `Err(io::Error)` - The file could not be created
    pub fn create(path: &Path) -> io::Result<Self> {
        let file = File::create(path)?;
        info!(path = %path.display(), "Created MJPEG recording");
        Ok(Self {
            writer: BufWriter::new(file),
            path: path.to_path_buf(),
            frames_written: 0,
        })
    }

    /// Compress one frame and append it to the stream
    ///
    /// # Returns
    /// * `Ok(())` - Frame appended
    /// * `Err(io::Error)` - Frame was not drawable or the write failed
    pub fn write_frame(&mut self, frame: &CameraFrame) -> io::Result<()> {
        let image = frame.to_rgba_image().ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidData, "recording frame is not drawable")
        })?;
        let rgb = convert_rgba_to_rgb(image);

        let mut encoder = JpegEncoder::new_with_quality(&mut self.writer, RECORD_JPEG_QUALITY);
        encoder
            .encode(rgb.as_raw(), rgb.width(), rgb.height(), ExtendedColorType::Rgb8)
            .map_err(|e| {
                io::Error::new(
                    io::ErrorKind::Other,
                    format!("JPEG frame encoding failed: {}", e),
                )
            })?;

        self.frames_written += 1;
        Ok(())
    }

    /// Number of frames appended so far
    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    /// Flush buffered data and close the stream
    ///
    /// # Returns
    /// * `Ok(PathBuf)` - Path of the finished recording
    /// * `Err(io::Error)` - Flushing buffered frames failed
    pub fn finish(mut self) -> io::Result<PathBuf> {
        self.writer.flush()?;
        debug!(
            path = %self.path.display(),
            frames = self.frames_written,
            "Finished MJPEG recording"
        );
        Ok(self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray_frame(width: u32, height: u32) -> CameraFrame {
        CameraFrame::from_rgba(width, height, vec![128u8; (width * height * 4) as usize])
    }

    fn count_soi_markers(data: &[u8]) -> usize {
        data.windows(2).filter(|w| w == &[0xFF, 0xD8]).count()
    }

    #[test]
    fn test_recording_appends_one_jpeg_per_frame() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("VID_test.mjpeg");

        let mut recorder = MjpegRecorder::create(&path).unwrap();
        for _ in 0..3 {
            recorder.write_frame(&gray_frame(16, 16)).unwrap();
        }
        assert_eq!(recorder.frames_written(), 3);

        let finished = recorder.finish().unwrap();
        assert_eq!(finished, path);

        let data = std::fs::read(&path).unwrap();
        assert_eq!(&data[..2], &[0xFF, 0xD8], "stream starts with SOI");
        assert_eq!(count_soi_markers(&data), 3, "one SOI per frame");
    }

    #[test]
    fn test_undrawable_frame_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("VID_test.mjpeg");

        let mut recorder = MjpegRecorder::create(&path).unwrap();
        let empty = CameraFrame::from_rgba(0, 0, Vec::new());
        let err = recorder.write_frame(&empty).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        assert_eq!(recorder.frames_written(), 0);
    }

    #[test]
    fn test_finish_without_frames_leaves_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("VID_empty.mjpeg");

        let recorder = MjpegRecorder::create(&path).unwrap();
        let finished = recorder.finish().unwrap();
        assert!(finished.exists());
        assert_eq!(std::fs::metadata(&finished).unwrap().len(), 0);
    }
}
