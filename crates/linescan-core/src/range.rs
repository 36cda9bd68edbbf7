use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::config::AutoBaselineConfig;
use crate::consts::RANGE_DISPLAY_PADDING;

/// Inclusive pixel interval `[min, max]` inside `[0, bound]`.
///
/// Deserialized values go through [`PixelRange::new`], so they are clamped
/// and ordered like any other input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawPixelRange")]
pub struct PixelRange {
    min: usize,
    max: usize,
    bound: usize,
}

impl PixelRange {
    /// Clamp both endpoints into `[0, bound]`, swapping them if out of order.
    pub fn new(a: i64, b: i64, bound: usize) -> Self {
        let a = clamp_index(a, bound);
        let b = clamp_index(b, bound);
        Self {
            min: a.min(b),
            max: a.max(b),
            bound,
        }
    }

    /// Range spanning `[0, bound]`.
    pub fn full(bound: usize) -> Self {
        Self { min: 0, max: bound, bound }
    }

    pub fn min(&self) -> usize {
        self.min
    }

    pub fn max(&self) -> usize {
        self.max
    }

    /// Largest valid index this range was clamped against.
    pub fn bound(&self) -> usize {
        self.bound
    }

    /// Number of pixels covered, always at least one.
    pub fn pixel_count(&self) -> usize {
        self.max - self.min + 1
    }

    pub fn contains(&self, index: usize) -> bool {
        (self.min..=self.max).contains(&index)
    }

    pub fn indices(&self) -> RangeInclusive<usize> {
        self.min..=self.max
    }

    /// Re-clamp against a new bound. `max` is pulled in first, then `min`.
    pub fn reclamp(&self, bound: usize) -> Self {
        let max = self.max.min(bound);
        let min = self.min.min(max);
        Self { min, max, bound }
    }

    /// Visual extent `[min - 0.5, max + 0.5]` for overlays drawn on pixel centers.
    pub fn display_extent(&self) -> (f64, f64) {
        (
            self.min as f64 - RANGE_DISPLAY_PADDING,
            self.max as f64 + RANGE_DISPLAY_PADDING,
        )
    }
}

#[derive(Deserialize)]
struct RawPixelRange {
    min: i64,
    max: i64,
    bound: usize,
}

impl From<RawPixelRange> for PixelRange {
    fn from(raw: RawPixelRange) -> Self {
        Self::new(raw.min, raw.max, raw.bound)
    }
}

fn clamp_index(value: i64, bound: usize) -> usize {
    value.clamp(0, bound as i64) as usize
}

/// Baseline rows and structure columns selected on the active frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeModel {
    baseline: PixelRange,
    structure: PixelRange,
}

impl RangeModel {
    /// Both ranges span the whole frame of the given size.
    pub fn new(height: usize, width: usize) -> Self {
        Self {
            baseline: PixelRange::full(height.saturating_sub(1)),
            structure: PixelRange::full(width.saturating_sub(1)),
        }
    }

    pub fn baseline(&self) -> PixelRange {
        self.baseline
    }

    pub fn structure(&self) -> PixelRange {
        self.structure
    }

    pub fn set_baseline(&mut self, min: i64, max: i64) {
        self.baseline = PixelRange::new(min, max, self.baseline.bound);
    }

    pub fn set_structure(&mut self, min: i64, max: i64) {
        self.structure = PixelRange::new(min, max, self.structure.bound);
    }

    /// Re-clamp both ranges after the active frame changed size.
    pub fn clamp_to_bounds(&mut self, height: usize, width: usize) {
        self.baseline = self.baseline.reclamp(height.saturating_sub(1));
        self.structure = self.structure.reclamp(width.saturating_sub(1));
    }

    /// Place the baseline at the configured fractions of the frame height.
    pub fn auto_baseline(&mut self, height: usize, config: &AutoBaselineConfig) {
        let (min, max) = auto_baseline(height, config);
        self.set_baseline(min as i64, max as i64);
    }
}

/// Baseline rows `(floor(h * start), floor(h * end))` before clamping.
pub fn auto_baseline(height: usize, config: &AutoBaselineConfig) -> (usize, usize) {
    let start = (height as f64 * config.start_fraction.clamp(0.0, 1.0)) as usize;
    let end = (height as f64 * config.end_fraction.clamp(0.0, 1.0)) as usize;
    (start, end)
}
