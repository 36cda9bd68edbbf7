use tracing::debug;

use crate::consts::RATIO_RED_THRESHOLD_FRACTION;
use crate::frame::RatiometricFrame;
use crate::range::PixelRange;

use super::filter::boxcar;
use super::profile::{column_means, column_means_in_rows, fit_range, row_means_in_columns};

/// Output of one pass over a ratiometric frame.
#[derive(Clone, Debug, PartialEq)]
pub struct AnalysisResult {
    /// Mean red intensity per column.
    pub red_profile: Vec<f64>,
    /// Mean green intensity per column.
    pub green_profile: Vec<f64>,
    /// G/R per column, smoothed when `filter_width_px > 0`.
    pub ratio: Vec<f64>,
    /// (G/R - baseline) / baseline per column.
    pub delta_ratio: Vec<f64>,
    /// G/R measured over the baseline rows and structure columns.
    pub baseline_ratio: f64,
    /// Largest ΔG/R inside the structure window, `None` when the window lies
    /// outside the frame.
    pub peak_value: Option<f64>,
    pub filter_width_px: usize,
    pub time_course: TimeCourse,
}

/// Per-row signal averaged over the structure columns.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TimeCourse {
    pub red: Vec<f64>,
    pub green: Vec<f64>,
    pub ratio: Vec<f64>,
    pub delta_ratio: Vec<f64>,
    pub baseline_ratio: f64,
    pub peak_value: Option<f64>,
}

/// `green[i] / red[i]` where `red[i]` exceeds 1% of the brightest red sample,
/// zero elsewhere.
pub fn guarded_ratio(green: &[f64], red: &[f64]) -> Vec<f64> {
    guarded_ratio_mask(green, red)
        .into_iter()
        .map(|r| r.unwrap_or(0.0))
        .collect()
}

/// Like [`guarded_ratio`], with `None` marking the samples the red guard rejected.
fn guarded_ratio_mask(green: &[f64], red: &[f64]) -> Vec<Option<f64>> {
    let red_max = red.iter().copied().fold(0.0f64, f64::max);
    let min_red = red_max * RATIO_RED_THRESHOLD_FRACTION;
    green
        .iter()
        .zip(red)
        .map(|(&g, &r)| (r > min_red).then(|| g / r))
        .collect()
}

/// Reduce a frame to profiles, the G/R curve, and its peak ΔG/R.
pub fn analyze(
    frame: &RatiometricFrame,
    baseline: PixelRange,
    structure: PixelRange,
    filter_width_px: usize,
) -> AnalysisResult {
    let red_profile = column_means(frame.red());
    let green_profile = column_means(frame.green());
    let ratio = boxcar(&guarded_ratio(&green_profile, &red_profile), filter_width_px);

    let baseline_ratio = baseline_ratio(frame, baseline, structure);
    let delta_ratio = normalize(&ratio, baseline_ratio);
    let peak_value = peak_in(&delta_ratio, structure);

    let time_course = time_course(frame, baseline, structure, filter_width_px);

    debug!(
        baseline_ratio,
        ?peak_value,
        filter_width_px,
        "analyzed {}x{} frame",
        frame.width(),
        frame.height()
    );

    AnalysisResult {
        red_profile,
        green_profile,
        ratio,
        delta_ratio,
        baseline_ratio,
        peak_value,
        filter_width_px,
        time_course,
    }
}

/// Mean guarded G/R of the structure columns, using only the baseline rows.
/// Columns rejected by the red guard do not contribute; a genuine zero G/R does.
fn baseline_ratio(frame: &RatiometricFrame, baseline: PixelRange, structure: PixelRange) -> f64 {
    let red = column_means_in_rows(frame.red(), baseline);
    let green = column_means_in_rows(frame.green(), baseline);
    let ratio = guarded_ratio_mask(&green, &red);

    let Some((lo, hi)) = fit_range(structure, ratio.len()) else {
        return 0.0;
    };
    mean_of_unguarded(&ratio[lo..=hi])
}

fn time_course(
    frame: &RatiometricFrame,
    baseline: PixelRange,
    structure: PixelRange,
    filter_width_px: usize,
) -> TimeCourse {
    let red = row_means_in_columns(frame.red(), structure);
    let green = row_means_in_columns(frame.green(), structure);
    let masked = guarded_ratio_mask(&green, &red);

    let baseline_ratio = match fit_range(baseline, masked.len()) {
        Some((lo, hi)) => mean_of_unguarded(&masked[lo..=hi]),
        None => 0.0,
    };

    let raw_ratio: Vec<f64> = masked.iter().map(|r| r.unwrap_or(0.0)).collect();

    let ratio = boxcar(&raw_ratio, filter_width_px);
    let delta_ratio = normalize(&ratio, baseline_ratio);
    let peak_value = peak_in(&delta_ratio, PixelRange::full(delta_ratio.len().saturating_sub(1)));

    TimeCourse {
        red,
        green,
        ratio,
        delta_ratio,
        baseline_ratio,
        peak_value,
    }
}

fn mean_of_unguarded(values: &[Option<f64>]) -> f64 {
    let (sum, count) = values
        .iter()
        .flatten()
        .fold((0.0, 0usize), |(s, c), &v| (s + v, c + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// ΔG/R relative to `baseline`; all zeros when the baseline is zero.
fn normalize(ratio: &[f64], baseline: f64) -> Vec<f64> {
    if baseline == 0.0 || !baseline.is_finite() {
        return vec![0.0; ratio.len()];
    }
    ratio.iter().map(|&r| (r - baseline) / baseline).collect()
}

fn peak_in(values: &[f64], window: PixelRange) -> Option<f64> {
    let (lo, hi) = fit_range(window, values.len())?;
    values[lo..=hi]
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .reduce(f64::max)
}
