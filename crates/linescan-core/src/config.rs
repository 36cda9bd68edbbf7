use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_BASELINE_END_FRACTION, DEFAULT_BASELINE_START_FRACTION, DEFAULT_FLOOR_PERCENTILE,
    DEFAULT_STRUCTURE_THRESHOLD_FRACTION, DEFAULT_TICK_PERIOD_MS,
};
use crate::error::{LinescanError, Result};
use crate::frame::AcquisitionMeta;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Boxcar width in pixels; 0 disables filtering.
    #[serde(default)]
    pub filter_width_px: usize,
    #[serde(default = "default_tick_period_ms")]
    pub tick_period_ms: u64,
    #[serde(default)]
    pub floor: FloorConfig,
    #[serde(default)]
    pub auto_baseline: AutoBaselineConfig,
    #[serde(default)]
    pub structure_detection: StructureDetectionConfig,
    #[serde(default)]
    pub acquisition: AcquisitionMeta,
}

fn default_tick_period_ms() -> u64 {
    DEFAULT_TICK_PERIOD_MS
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            filter_width_px: 0,
            tick_period_ms: DEFAULT_TICK_PERIOD_MS,
            floor: FloorConfig::default(),
            auto_baseline: AutoBaselineConfig::default(),
            structure_detection: StructureDetectionConfig::default(),
            acquisition: AcquisitionMeta::default(),
        }
    }
}

impl AnalysisConfig {
    /// Reject values the analysis cannot interpret.
    pub fn validate(&self) -> Result<()> {
        let AutoBaselineConfig {
            start_fraction,
            end_fraction,
        } = self.auto_baseline;
        for fraction in [start_fraction, end_fraction] {
            if !(0.0..1.0).contains(&fraction) {
                return Err(LinescanError::Config(format!(
                    "auto-baseline fraction {fraction} must be in [0, 1)"
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.structure_detection.threshold_fraction) {
            return Err(LinescanError::Config(format!(
                "structure threshold fraction {} must be in [0, 1]",
                self.structure_detection.threshold_fraction
            )));
        }
        match self.floor.mode {
            FloorMode::Percentile(p) if !(0.0..=100.0).contains(&p) => Err(LinescanError::Config(
                format!("floor percentile {p} must be in [0, 100]"),
            )),
            FloorMode::Value(v) if v < 0.0 => Err(LinescanError::Config(format!(
                "floor value {v} must not be negative"
            ))),
            _ => Ok(()),
        }
    }
}

/// Dark-offset removal applied once when a stack is loaded.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FloorConfig {
    #[serde(default = "default_floor_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub mode: FloorMode,
}

fn default_floor_enabled() -> bool {
    true
}

impl Default for FloorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            mode: FloorMode::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum FloorMode {
    /// Subtract the same constant from every sample.
    Value(f32),
    /// Subtract, per channel, this percentile (0-100) of the channel's samples.
    Percentile(f32),
}

impl Default for FloorMode {
    fn default() -> Self {
        Self::Percentile(DEFAULT_FLOOR_PERCENTILE)
    }
}

impl std::fmt::Display for FloorMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Value(v) => write!(f, "Value ({v})"),
            Self::Percentile(p) => write!(f, "Percentile ({p}%)"),
        }
    }
}

/// Fractions of the frame height used to place the baseline automatically.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AutoBaselineConfig {
    #[serde(default = "default_baseline_start")]
    pub start_fraction: f64,
    #[serde(default = "default_baseline_end")]
    pub end_fraction: f64,
}

fn default_baseline_start() -> f64 {
    DEFAULT_BASELINE_START_FRACTION
}
fn default_baseline_end() -> f64 {
    DEFAULT_BASELINE_END_FRACTION
}

impl Default for AutoBaselineConfig {
    fn default() -> Self {
        Self {
            start_fraction: DEFAULT_BASELINE_START_FRACTION,
            end_fraction: DEFAULT_BASELINE_END_FRACTION,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StructureDetectionConfig {
    /// Fraction of the profile's dynamic range a sample must reach to stay in
    /// the structure window.
    #[serde(default = "default_structure_threshold")]
    pub threshold_fraction: f64,
}

fn default_structure_threshold() -> f64 {
    DEFAULT_STRUCTURE_THRESHOLD_FRACTION
}

impl Default for StructureDetectionConfig {
    fn default() -> Self {
        Self {
            threshold_fraction: DEFAULT_STRUCTURE_THRESHOLD_FRACTION,
        }
    }
}
