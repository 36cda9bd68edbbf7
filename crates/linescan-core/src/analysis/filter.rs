/// Centered moving average of `width` samples.
///
/// Windows are truncated at the ends, so every output is the mean of the
/// samples actually available. `width` of 0 or 1 returns the input unchanged.
pub fn boxcar(values: &[f64], width: usize) -> Vec<f64> {
    if width <= 1 || values.is_empty() {
        return values.to_vec();
    }

    let n = values.len();
    let mut prefix = Vec::with_capacity(n + 1);
    prefix.push(0.0f64);
    for &v in values {
        prefix.push(prefix[prefix.len() - 1] + v);
    }

    let before = (width - 1) / 2;
    let after = width / 2;

    (0..n)
        .map(|i| {
            let lo = i.saturating_sub(before);
            let hi = (i + after).min(n - 1);
            (prefix[hi + 1] - prefix[lo]) / (hi - lo + 1) as f64
        })
        .collect()
}

/// Elapsed time covered by a filter of `width_px` pixels.
pub fn filter_time_ms(width_px: usize, msec_per_pixel: f64) -> f64 {
    width_px as f64 * msec_per_pixel
}
