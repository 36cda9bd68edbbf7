/// Minimum frame count to use frame-level Rayon parallelism.
pub const PARALLEL_FRAME_THRESHOLD: usize = 4;

/// Columns whose mean red intensity is at or below this fraction of the
/// brightest red column get a ratio of zero.
pub const RATIO_RED_THRESHOLD_FRACTION: f64 = 0.01;

/// Default start of the auto-detected baseline window (fraction of height).
/// Heuristic; pending review by someone who acquires these scans.
pub const DEFAULT_BASELINE_START_FRACTION: f64 = 0.02;

/// Default end of the auto-detected baseline window (fraction of height).
/// Heuristic; pending review by someone who acquires these scans.
pub const DEFAULT_BASELINE_END_FRACTION: f64 = 0.08;

/// Auto-structure keeps growing its window while samples stay at or above
/// `min + fraction * (max - min)` of the profile.
pub const DEFAULT_STRUCTURE_THRESHOLD_FRACTION: f64 = 0.10;

/// Percentile used for floor subtraction when no explicit value is given.
pub const DEFAULT_FLOOR_PERCENTILE: f32 = 20.0;

/// Period of the recompute tick, in milliseconds.
pub const DEFAULT_TICK_PERIOD_MS: u64 = 20;

/// Half-pixel padding applied by renderers around inclusive ranges.
pub const RANGE_DISPLAY_PADDING: f64 = 0.5;

/// Substring identifying red channel files in an acquisition folder.
pub const RED_CHANNEL_TAG: &str = "Ch1";

/// Substring identifying green channel files in an acquisition folder.
pub const GREEN_CHANNEL_TAG: &str = "Ch2";

/// Image extensions recognized when enumerating an acquisition folder.
pub const IMAGE_EXTENSIONS: &[&str] = &["tif", "tiff", "png"];
