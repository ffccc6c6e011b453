// SPDX-License-Identifier: GPL-3.0-only

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use viewfinder::backends::camera::types::{DeviceOrientation, Facing};

mod cli;

#[derive(Parser)]
#[command(name = "viewfinder")]
#[command(about = "Mobile-style camera capture engine")]
#[command(version = viewfinder::constants::app_info::version())]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Which camera to select
#[derive(Debug, Clone, Copy, ValueEnum)]
enum FacingArg {
    /// Main camera on the back of the device
    Back,
    /// Selfie camera
    Front,
}

impl From<FacingArg> for Facing {
    fn from(arg: FacingArg) -> Self {
        match arg {
            FacingArg::Back => Facing::Back,
            FacingArg::Front => Facing::Front,
        }
    }
}

/// Physical device pose at capture time
#[derive(Debug, Clone, Copy, ValueEnum)]
enum PoseArg {
    Portrait,
    UpsideDown,
    LandscapeLeft,
    LandscapeRight,
}

impl From<PoseArg> for DeviceOrientation {
    fn from(arg: PoseArg) -> Self {
        match arg {
            PoseArg::Portrait => DeviceOrientation::Portrait,
            PoseArg::UpsideDown => DeviceOrientation::PortraitUpsideDown,
            PoseArg::LandscapeLeft => DeviceOrientation::LandscapeLeft,
            PoseArg::LandscapeRight => DeviceOrientation::LandscapeRight,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List available capture devices
    List {
        /// Image file backing the synthetic camera
        #[arg(long)]
        source: Option<PathBuf>,
    },

    /// Take a photo
    Photo {
        /// Camera to use (defaults to the configured facing)
        #[arg(short, long)]
        facing: Option<FacingArg>,

        /// Fire the flash (if the camera has one)
        #[arg(long)]
        flash: bool,

        /// Screen width in points (sets the crop box)
        #[arg(long, default_value = "390")]
        width: f32,

        /// Screen height in points (sets the crop box)
        #[arg(long, default_value = "844")]
        height: f32,

        /// Device pose at capture time
        #[arg(long, default_value = "portrait")]
        pose: PoseArg,

        /// Image file backing the synthetic camera
        #[arg(long)]
        source: Option<PathBuf>,

        /// Output file or directory (default: ~/Pictures/Camera)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Record a video
    Record {
        /// Camera to use (defaults to the configured facing)
        #[arg(short, long)]
        facing: Option<FacingArg>,

        /// Recording duration in seconds
        #[arg(short, long, default_value = "10")]
        duration: u64,

        /// Image file backing the synthetic camera
        #[arg(long)]
        source: Option<PathBuf>,

        /// Output file or directory (default: ~/Videos/Camera)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    // Set RUST_LOG environment variable to control log level
    // Examples: RUST_LOG=debug, RUST_LOG=viewfinder=debug, RUST_LOG=info
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(true)
        .with_level(true)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::List { source } => cli::list_devices(source),
        Commands::Photo {
            facing,
            flash,
            width,
            height,
            pose,
            source,
            output,
        } => cli::take_photo(cli::PhotoOptions {
            facing: facing.map(Into::into),
            flash,
            screen_width: width,
            screen_height: height,
            pose: pose.into(),
            source,
            output,
        }),
        Commands::Record {
            facing,
            duration,
            source,
            output,
        } => cli::record_video(cli::RecordOptions {
            facing: facing.map(Into::into),
            duration,
            source,
            output,
        }),
    }
}
