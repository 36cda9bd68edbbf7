#![allow(dead_code)]

use std::path::Path;

use image::{ImageBuffer, Luma};
use ndarray::Array2;

use linescan_core::frame::{ChannelFrame, RatiometricFrame};

/// Frame whose channels are constant.
pub fn constant_frame(height: usize, width: usize, red: f32, green: f32) -> RatiometricFrame {
    RatiometricFrame::new(
        ChannelFrame::new(Array2::from_elem((height, width), red)),
        ChannelFrame::new(Array2::from_elem((height, width), green)),
    )
    .expect("matching dimensions")
}

/// Frame with uniform red and a bright green band over `cols`.
pub fn frame_with_green_band(
    height: usize,
    width: usize,
    cols: std::ops::RangeInclusive<usize>,
    background: f32,
    band: f32,
) -> RatiometricFrame {
    let green = Array2::from_shape_fn((height, width), |(_, col)| {
        if cols.contains(&col) {
            band
        } else {
            background
        }
    });
    RatiometricFrame::new(
        ChannelFrame::new(Array2::from_elem((height, width), 100.0)),
        ChannelFrame::new(green),
    )
    .expect("matching dimensions")
}

/// Frame built from per-pixel closures for each channel.
pub fn frame_from_fn(
    height: usize,
    width: usize,
    red: impl Fn(usize, usize) -> f32,
    green: impl Fn(usize, usize) -> f32,
) -> RatiometricFrame {
    RatiometricFrame::new(
        ChannelFrame::new(Array2::from_shape_fn((height, width), |(r, c)| red(r, c))),
        ChannelFrame::new(Array2::from_shape_fn((height, width), |(r, c)| green(r, c))),
    )
    .expect("matching dimensions")
}

/// Write a constant 16-bit grayscale PNG.
pub fn write_channel_png(path: &Path, width: u32, height: u32, value: u16) {
    let img = ImageBuffer::<Luma<u16>, Vec<u16>>::from_pixel(width, height, Luma([value]));
    img.save(path).expect("write PNG");
}

/// Small deterministic generator for property-style loops.
pub struct Lcg(u64);

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self(seed)
    }

    pub fn next_i64(&mut self, lo: i64, hi: i64) -> i64 {
        self.0 = self
            .0
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        let span = (hi - lo + 1) as u64;
        lo + ((self.0 >> 33) % span) as i64
    }
}
