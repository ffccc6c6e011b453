// SPDX-License-Identifier: MPL-2.0

//! Integration tests for configuration module

use viewfinder::backends::camera::types::{Facing, FlashMode};
use viewfinder::config::{Config, PhotoOutputFormat, PhotoQuality};

#[test]
fn test_config_default() {
    // Test that default config can be created
    let config = Config::default();

    // Check sensible defaults
    assert_eq!(
        config.mirror_preview, true,
        "Mirror preview should be enabled by default"
    );
    assert_eq!(config.default_facing, Facing::Back);
    assert_eq!(config.flash, FlashMode::Off);
    assert_eq!(config.photo_format, PhotoOutputFormat::Jpeg);
    assert_eq!(config.photo_quality, PhotoQuality::High);
}

#[test]
fn test_config_survives_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");

    let mut config = Config::default();
    config.default_facing = Facing::Front;
    config.photo_quality = PhotoQuality::Maximum;
    config.photo_dir = Some(dir.path().join("shots"));
    config.save_to(&path).unwrap();

    let loaded = Config::load_from(&path);
    assert_eq!(loaded, config);
}

#[test]
fn test_config_resolved_dirs_honor_overrides() {
    let mut config = Config::default();
    assert!(config.resolved_photo_dir().ends_with("Camera"));
    assert!(config.resolved_video_dir().ends_with("Camera"));

    config.photo_dir = Some("/tmp/shots".into());
    assert_eq!(config.resolved_photo_dir(), std::path::PathBuf::from("/tmp/shots"));
}

#[test]
fn test_config_tolerates_unknown_and_missing_fields() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(
        &path,
        r#"{"default_facing": "front", "someday_maybe": 42}"#,
    )
    .unwrap();

    let config = Config::load_from(&path);
    assert_eq!(config.default_facing, Facing::Front);
    // Everything else falls back to defaults
    assert_eq!(config.flash, FlashMode::Off);
    assert_eq!(config.mirror_preview, true);
}
