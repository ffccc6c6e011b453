// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands for camera operations
//!
//! This module provides command-line functionality for:
//! - Listing available capture devices
//! - Taking photos
//! - Recording videos

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use viewfinder::backends::camera::types::{DeviceOrientation, Facing, FlashMode};
use viewfinder::backends::camera::{CameraBackend, SyntheticBackend, get_backend};
use viewfinder::config::Config;
use viewfinder::constants::{get_resolution_label, timing};
use viewfinder::pipelines::photo::PhotoPipeline;
use viewfinder::session::{CaptureMode, CaptureSession, InterfaceOrientation, PreviewLayout};

/// Options for the `photo` subcommand
pub struct PhotoOptions {
    /// Camera facing; None falls back to the configured default
    pub facing: Option<Facing>,
    pub flash: bool,
    pub screen_width: f32,
    pub screen_height: f32,
    pub pose: DeviceOrientation,
    pub source: Option<PathBuf>,
    pub output: Option<PathBuf>,
}

/// Options for the `record` subcommand
pub struct RecordOptions {
    /// Camera facing; None falls back to the configured default
    pub facing: Option<Facing>,
    pub duration: u64,
    pub source: Option<PathBuf>,
    pub output: Option<PathBuf>,
}

/// List all available capture devices
pub fn list_devices(source: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let backend = build_backend(source)?;
    let cameras = backend.video_devices();

    if cameras.is_empty() {
        println!("No cameras found.");
        return Ok(());
    }

    println!("Available cameras:");
    println!();
    for camera in &cameras {
        let label = get_resolution_label(camera.sensor_width)
            .map(|l| format!(" {}", l))
            .unwrap_or_default();
        println!(
            "  [{}] {} - {}x{}{}{}",
            camera.facing,
            camera.name,
            camera.sensor_width,
            camera.sensor_height,
            label,
            if camera.has_flash { ", flash" } else { "" }
        );
    }
    println!();

    match backend.default_audio_device() {
        Some(microphone) => println!("Audio: {}", microphone.name),
        None => println!("Audio: none"),
    }

    Ok(())
}

/// Take a photo with the selected camera
pub fn take_photo(options: PhotoOptions) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load();
    let backend = build_backend(options.source.clone())?;

    let facing = options.facing.unwrap_or(config.default_facing);
    let flash = if options.flash { FlashMode::On } else { config.flash };
    let mut session = CaptureSession::with_settings(backend, facing, flash);
    session.set_mirror_front_preview(config.mirror_preview);
    session.set_device_orientation(options.pose);
    session.set_layout(PreviewLayout::for_screen(
        options.screen_width,
        options.screen_height,
        interface_orientation(options.screen_width, options.screen_height),
    ));

    session.start()?;
    if let Some(device) = session.current_device() {
        println!("Using camera: {}", device.name);
    }

    println!("Capturing...");
    let pending = session.capture_photo()?;
    session.stop();

    // Determine output directory
    let output_dir = match options.output.as_ref() {
        Some(path) if path.is_dir() => path.clone(),
        Some(path) => path
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| config.resolved_photo_dir()),
        None => config.resolved_photo_dir(),
    };

    let pipeline =
        PhotoPipeline::with_encoding(config.photo_format.into(), config.photo_quality.into());

    // Create async runtime for the pipeline
    let rt = tokio::runtime::Runtime::new()?;
    let output_path = rt.block_on(pipeline.process_and_save(pending, output_dir))?;

    // If the user asked for a specific filename, move the capture there
    if let Some(user_path) = options.output
        && !user_path.is_dir()
    {
        std::fs::rename(&output_path, &user_path)?;
        println!("Photo saved: {}", user_path.display());
        return Ok(());
    }

    println!("Photo saved: {}", output_path.display());
    Ok(())
}

/// Record a video with the selected camera
pub fn record_video(options: RecordOptions) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load();
    let backend = build_backend(options.source.clone())?;

    let facing = options.facing.unwrap_or(config.default_facing);
    let mut session = CaptureSession::with_settings(backend, facing, FlashMode::Off);
    session.set_mirror_front_preview(config.mirror_preview);
    // Video mode wires the microphone alongside the camera
    session.set_mode(CaptureMode::Video)?;
    if let Some(device) = session.current_device() {
        println!("Using camera: {}", device.name);
    }

    let video_dir = match options.output.as_ref() {
        Some(path) if path.is_dir() => path.clone(),
        Some(path) => path
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| config.resolved_video_dir()),
        None => config.resolved_video_dir(),
    };

    let recording_path = session.start_recording(&video_dir)?;
    println!("Output: {}", recording_path.display());
    println!("Duration: {} seconds", options.duration);
    println!();
    println!("Recording... (press Ctrl+C to stop early)");

    // Set up Ctrl+C handler
    let stop_flag = Arc::new(AtomicBool::new(false));
    let handler_flag = Arc::clone(&stop_flag);
    ctrlc::set_handler(move || {
        handler_flag.store(true, Ordering::SeqCst);
    })?;

    // Wait for duration or Ctrl+C, ticking the timer once a second
    let start = Instant::now();
    let target_duration = Duration::from_secs(options.duration);

    while start.elapsed() < target_duration {
        if stop_flag.load(Ordering::SeqCst) {
            println!();
            println!("Stopping early...");
            break;
        }

        std::thread::sleep(timing::TIMER_TICK);
        if let Some(label) = session.tick() {
            print!("\rRecording: {}", label);
            std::io::Write::flush(&mut std::io::stdout())?;
        }
    }
    println!();

    let final_path = session.stop_recording()?;
    session.stop();

    if let Some(user_path) = options.output
        && !user_path.is_dir()
    {
        std::fs::rename(&final_path, &user_path)?;
        println!("Video saved: {}", user_path.display());
        return Ok(());
    }

    println!("Video saved: {}", final_path.display());
    Ok(())
}

// A backing image makes captures reproducible; without one the synthetic
// gradient backend is used.
fn build_backend(
    source: Option<PathBuf>,
) -> Result<Box<dyn CameraBackend>, Box<dyn std::error::Error>> {
    match source {
        Some(path) => Ok(Box::new(SyntheticBackend::with_source_image(&path)?)),
        None => Ok(get_backend()),
    }
}

fn interface_orientation(width: f32, height: f32) -> InterfaceOrientation {
    if width > height {
        InterfaceOrientation::Landscape
    } else {
        InterfaceOrientation::Portrait
    }
}
