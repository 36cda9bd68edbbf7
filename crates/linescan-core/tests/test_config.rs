use linescan_core::config::{AnalysisConfig, FloorMode};
use linescan_core::frame::DisplayChannel;

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

#[test]
fn test_default_config_values() {
    let config = AnalysisConfig::default();
    assert!(config.floor.enabled);
    assert_eq!(config.floor.mode, FloorMode::Percentile(20.0));
    assert_eq!(config.auto_baseline.start_fraction, 0.02);
    assert_eq!(config.auto_baseline.end_fraction, 0.08);
    assert_eq!(config.structure_detection.threshold_fraction, 0.10);
    assert_eq!(config.filter_width_px, 0);
    assert_eq!(config.tick_period_ms, 20);
    assert!(config.validate().is_ok());
}

// ---------------------------------------------------------------------------
// Serialization
// ---------------------------------------------------------------------------

#[test]
fn test_toml_roundtrip() {
    let mut config = AnalysisConfig::default();
    config.filter_width_px = 7;
    config.floor.mode = FloorMode::Value(12.5);
    config.acquisition.msec_per_pixel = 0.004;

    let text = toml::to_string_pretty(&config).unwrap();
    let parsed: AnalysisConfig = toml::from_str(&text).unwrap();
    assert_eq!(parsed, config);
}

#[test]
fn test_partial_toml_uses_defaults() {
    let parsed: AnalysisConfig = toml::from_str("filter_width_px = 3\n").unwrap();
    assert_eq!(parsed.filter_width_px, 3);
    assert_eq!(parsed.tick_period_ms, 20);
    assert!(parsed.floor.enabled);
}

#[test]
fn test_partial_nested_table() {
    let text = "[auto_baseline]\nend_fraction = 0.2\n\n[floor]\nenabled = false\n";
    let parsed: AnalysisConfig = toml::from_str(text).unwrap();
    assert_eq!(parsed.auto_baseline.start_fraction, 0.02);
    assert_eq!(parsed.auto_baseline.end_fraction, 0.2);
    assert!(!parsed.floor.enabled);
    assert_eq!(parsed.floor.mode, FloorMode::Percentile(20.0));
}

#[test]
fn test_json_roundtrip() {
    let config = AnalysisConfig::default();
    let json = serde_json::to_string(&config).unwrap();
    let parsed: AnalysisConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, config);
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[test]
fn test_validate_rejects_bad_fractions() {
    let mut config = AnalysisConfig::default();
    config.auto_baseline.end_fraction = 1.5;
    assert!(config.validate().is_err());

    let mut config = AnalysisConfig::default();
    config.structure_detection.threshold_fraction = -0.1;
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_rejects_bad_floor() {
    let mut config = AnalysisConfig::default();
    config.floor.mode = FloorMode::Percentile(150.0);
    assert!(config.validate().is_err());

    config.floor.mode = FloorMode::Value(-1.0);
    assert!(config.validate().is_err());
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

#[test]
fn test_floor_mode_display() {
    assert_eq!(format!("{}", FloorMode::Value(20.0)), "Value (20)");
    assert_eq!(format!("{}", FloorMode::Percentile(5.5)), "Percentile (5.5%)");
}

#[test]
fn test_display_channel_display() {
    assert_eq!(format!("{}", DisplayChannel::Merge), "Merge");
    assert_eq!(format!("{}", DisplayChannel::default()), "Merge");
    assert_eq!(format!("{}", DisplayChannel::Red), "Red");
}
