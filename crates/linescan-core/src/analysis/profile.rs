use ndarray::{s, Axis};

use crate::frame::ChannelFrame;
use crate::range::PixelRange;

/// Mean of every column over all rows. Length = frame width.
pub fn column_means(frame: &ChannelFrame) -> Vec<f64> {
    let h = frame.height();
    if h == 0 {
        return vec![0.0; frame.width()];
    }
    frame
        .data
        .axis_iter(Axis(1))
        .map(|col| col.iter().map(|&v| v as f64).sum::<f64>() / h as f64)
        .collect()
}

/// Mean of every column over the rows in `rows`. Length = frame width.
pub fn column_means_in_rows(frame: &ChannelFrame, rows: PixelRange) -> Vec<f64> {
    let Some(rows) = fit_range(rows, frame.height()) else {
        return vec![0.0; frame.width()];
    };
    let view = frame.data.slice(s![rows.0..=rows.1, ..]);
    let n = (rows.1 - rows.0 + 1) as f64;
    view.axis_iter(Axis(1))
        .map(|col| col.iter().map(|&v| v as f64).sum::<f64>() / n)
        .collect()
}

/// Mean of every row over the columns in `cols`. Length = frame height.
pub fn row_means_in_columns(frame: &ChannelFrame, cols: PixelRange) -> Vec<f64> {
    let Some(cols) = fit_range(cols, frame.width()) else {
        return vec![0.0; frame.height()];
    };
    let view = frame.data.slice(s![.., cols.0..=cols.1]);
    let n = (cols.1 - cols.0 + 1) as f64;
    view.axis_iter(Axis(0))
        .map(|row| row.iter().map(|&v| v as f64).sum::<f64>() / n)
        .collect()
}

/// Intersect an inclusive range with `[0, len - 1]`.
pub(crate) fn fit_range(range: PixelRange, len: usize) -> Option<(usize, usize)> {
    if len == 0 || range.min() >= len {
        return None;
    }
    Some((range.min(), range.max().min(len - 1)))
}
