use std::sync::OnceLock;

use ndarray::Array2;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::consts::PARALLEL_FRAME_THRESHOLD;
use crate::error::{LinescanError, Result};
use crate::frame::{Channel, ChannelFrame, RatiometricFrame};

/// Ordered frames of one acquisition, all the same shape.
///
/// A stack is never modified after construction. Floor subtraction returns a
/// fresh stack, so the cached average always belongs to the samples it was
/// computed from.
#[derive(Debug)]
pub struct RatiometricStack {
    frames: Vec<RatiometricFrame>,
    average: OnceLock<RatiometricFrame>,
}

impl RatiometricStack {
    pub fn new(frames: Vec<RatiometricFrame>) -> Result<Self> {
        let first = frames.first().ok_or(LinescanError::EmptyStack)?;
        let expected = first.dim();

        for (index, frame) in frames.iter().enumerate().skip(1) {
            if frame.dim() != expected {
                return Err(LinescanError::DimensionMismatch {
                    expected,
                    found: frame.dim(),
                    index,
                });
            }
        }

        Ok(Self {
            frames,
            average: OnceLock::new(),
        })
    }

    /// Build a stack and optionally subtract a constant floor from every sample.
    pub fn with_floor(frames: Vec<RatiometricFrame>, floor: Option<f32>) -> Result<Self> {
        let stack = Self::new(frames)?;
        Ok(match floor {
            Some(value) => stack.floor_subtract(value),
            None => stack,
        })
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// (height, width) shared by every frame.
    pub fn dim(&self) -> (usize, usize) {
        self.frames[0].dim()
    }

    pub fn frames(&self) -> &[RatiometricFrame] {
        &self.frames
    }

    pub fn frame(&self, index: usize) -> Result<&RatiometricFrame> {
        self.frames
            .get(index)
            .ok_or(LinescanError::FrameIndexOutOfRange {
                index,
                total: self.frames.len(),
            })
    }

    /// Pixel-wise mean over all frames, computed on first use.
    pub fn average(&self) -> &RatiometricFrame {
        self.average.get_or_init(|| {
            debug!(frames = self.frames.len(), "computing average frame");
            self.frames[0].map_channels(|channel, _| self.mean_channel(channel))
        })
    }

    fn mean_channel(&self, channel: Channel) -> ChannelFrame {
        let (h, w) = self.dim();
        let n = self.frames.len() as f32;
        let mut sum = Array2::<f32>::zeros((h, w));

        for frame in &self.frames {
            sum += &frame.channel(channel).data;
        }

        sum /= n;
        ChannelFrame::new(sum)
    }

    /// New stack with `value` removed from every sample of both channels.
    pub fn floor_subtract(&self, value: f32) -> Self {
        self.floor_subtract_channels(value, value)
    }

    /// New stack with separate floors for the red and green channels.
    pub fn floor_subtract_channels(&self, red_floor: f32, green_floor: f32) -> Self {
        info!(red_floor, green_floor, "subtracting floor");

        let subtract = |frame: &RatiometricFrame| {
            frame.map_channels(|channel, data| match channel {
                Channel::Red => data.floor_subtracted(red_floor),
                Channel::Green => data.floor_subtracted(green_floor),
            })
        };

        let frames: Vec<RatiometricFrame> = if self.frames.len() >= PARALLEL_FRAME_THRESHOLD {
            self.frames.par_iter().map(subtract).collect()
        } else {
            self.frames.iter().map(subtract).collect()
        };

        Self {
            frames,
            average: OnceLock::new(),
        }
    }

    /// Subtract a per-channel floor equal to the `percentile`-th (0-100)
    /// sample of that channel across the whole stack.
    ///
    /// Returns the new stack and the `(red, green)` floors that were used.
    pub fn floor_subtract_percentile(&self, percentile: f32) -> (Self, (f32, f32)) {
        let red_floor = self.channel_percentile(Channel::Red, percentile);
        let green_floor = self.channel_percentile(Channel::Green, percentile);
        (
            self.floor_subtract_channels(red_floor, green_floor),
            (red_floor, green_floor),
        )
    }

    /// Value at `percentile` (0-100) among every sample of `channel`.
    pub fn channel_percentile(&self, channel: Channel, percentile: f32) -> f32 {
        let gather = |frame: &RatiometricFrame| -> Vec<f32> {
            frame.channel(channel).data.iter().copied().collect()
        };

        let mut samples: Vec<f32> = if self.frames.len() >= PARALLEL_FRAME_THRESHOLD {
            self.frames.par_iter().flat_map_iter(gather).collect()
        } else {
            self.frames.iter().flat_map(gather).collect()
        };

        let n = samples.len();
        if n == 0 {
            return 0.0;
        }
        let fraction = percentile.clamp(0.0, 100.0) / 100.0;
        let idx = ((n as f32 * fraction) as usize).min(n - 1);
        let (_, value, _) = samples.select_nth_unstable_by(idx, f32::total_cmp);
        *value
    }
}
