//! Integration tests for loading detector settings from JSON.

mod common;

use std::io::Write;

use tcg_grader::SensitivityPass;

use common::*;

fn write_config(text: &str) -> anyhow::Result<tempfile::NamedTempFile> {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile()?;
    file.write_all(text.as_bytes())?;
    Ok(file)
}

#[test]
fn test_load_overrides() -> anyhow::Result<()> {
    let file = write_config(
        r#"{
            "sample_interval": 3,
            "smoothing_window": 8,
            "passes": [
                { "name": "only", "blur_sigma": 1.2, "canny_low": 30.0, "canny_high": 90.0 }
            ]
        }"#,
    )?;

    let config = DetectorConfig::from_json_file(file.path())?;
    assert_eq!(config.sample_interval, 3);
    assert_eq!(config.smoothing_window, 8);
    assert_eq!(config.passes, vec![SensitivityPass::new("only", 1.2, 30.0, 90.0)]);
    // Untouched fields keep their defaults
    assert_eq!(config.min_area_ratio, DetectorConfig::default().min_area_ratio);
    assert!(config.debug_dir.is_none());
    Ok(())
}

#[test]
fn test_config_round_trips_through_json() -> anyhow::Result<()> {
    let config = DetectorConfig::default().with_sample_interval(7);
    let file = write_config(&serde_json::to_string_pretty(&config)?)?;
    assert_eq!(DetectorConfig::from_json_file(file.path())?, config);
    Ok(())
}

#[test]
fn test_invalid_files_are_rejected() -> anyhow::Result<()> {
    let malformed = write_config("{ not json")?;
    let err = DetectorConfig::from_json_file(malformed.path()).unwrap_err();
    assert!(err.to_string().contains("Failed to parse config file"));

    let no_passes = write_config(r#"{ "passes": [] }"#)?;
    assert!(DetectorConfig::from_json_file(no_passes.path()).is_err());

    let huge_offset = write_config(r#"{ "adaptive_offset": -32768 }"#)?;
    let err = DetectorConfig::from_json_file(huge_offset.path()).unwrap_err();
    assert!(err.to_string().contains("Adaptive offset"));

    let dir = tempfile::TempDir::new()?;
    assert!(DetectorConfig::from_json_file(dir.path().join("missing.json")).is_err());
    Ok(())
}

#[test]
fn test_loaded_config_drives_detector() -> anyhow::Result<()> {
    // An area band that excludes the synthetic card
    let file = write_config(r#"{ "min_area_ratio": 0.5 }"#)?;
    let detector = CardDetector::new(DetectorConfig::from_json_file(file.path())?)?;
    assert!(detector.detect(&standard_card_frame())?.is_none());
    Ok(())
}

#[test]
fn test_detection_from_saved_image() -> anyhow::Result<()> {
    let file = save_temp_png(&standard_card_frame());
    let img = image::ImageReader::open(file.path())?.decode()?;
    let detector = CardDetector::new(DetectorConfig::default())?;
    assert!(detector.detect(&img)?.is_some());
    Ok(())
}
