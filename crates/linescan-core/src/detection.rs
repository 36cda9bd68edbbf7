use tracing::debug;

use crate::analysis::profile::column_means;
use crate::config::StructureDetectionConfig;
use crate::frame::ChannelFrame;

/// Smallest dynamic range treated as a real peak rather than a flat profile.
const FLAT_PROFILE_EPSILON: f64 = 1e-12;

/// Find the inclusive window around the globally brightest sample of `profile`.
///
/// The window starts at the arg-max (first occurrence on ties) and grows in
/// both directions while samples stay at or above
/// `min + threshold_fraction * (max - min)`, stopping at the first sample that
/// falls below it. A flat profile returns the whole range; an empty profile
/// returns `(0, 0)`.
pub fn detect_brightest_structure(
    profile: &[f64],
    config: &StructureDetectionConfig,
) -> (usize, usize) {
    if profile.is_empty() {
        return (0, 0);
    }

    let (peak_idx, peak) = profile
        .iter()
        .copied()
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |best, (i, v)| {
            if v > best.1 {
                (i, v)
            } else {
                best
            }
        });
    let floor = profile.iter().copied().fold(f64::INFINITY, f64::min);

    if !(peak - floor).is_finite() || peak - floor <= FLAT_PROFILE_EPSILON {
        return (0, profile.len() - 1);
    }

    let threshold = floor + config.threshold_fraction.clamp(0.0, 1.0) * (peak - floor);

    let mut min = peak_idx;
    while min > 0 && profile[min - 1] >= threshold {
        min -= 1;
    }
    let mut max = peak_idx;
    while max + 1 < profile.len() && profile[max + 1] >= threshold {
        max += 1;
    }

    debug!(peak_idx, peak, threshold, min, max, "detected structure");
    (min, max)
}

/// Run structure detection on the column-mean profile of one channel.
pub fn detect_structure_in_frame(
    frame: &ChannelFrame,
    config: &StructureDetectionConfig,
) -> (usize, usize) {
    detect_brightest_structure(&column_means(frame), config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_is_relative_to_profile_floor() {
        // Background of 100 with a bump; a threshold on the raw peak alone
        // would swallow the whole profile.
        let profile = [100.0, 100.0, 104.0, 150.0, 200.0, 150.0, 100.0, 100.0];
        let config = StructureDetectionConfig {
            threshold_fraction: 0.5,
        };
        assert_eq!(detect_brightest_structure(&profile, &config), (3, 5));
    }
}
