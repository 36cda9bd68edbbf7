use std::path::Path;

use ndarray::Array2;

use crate::error::Result;
use crate::frame::ChannelFrame;

/// Load one channel image, keeping raw 16-bit detector counts as `f32`.
///
/// 8-bit files are widened by the `image` crate, so their counts are scaled
/// by 257 relative to the file contents.
pub fn load_channel_image(path: &Path) -> Result<ChannelFrame> {
    let img = image::open(path)?;
    let gray = img.to_luma16();
    let (w, h) = gray.dimensions();
    let mut data = Array2::<f32>::zeros((h as usize, w as usize));

    for (col, row, pixel) in gray.enumerate_pixels() {
        data[[row as usize, col as usize]] = pixel.0[0] as f32;
    }

    Ok(ChannelFrame::new(data))
}
