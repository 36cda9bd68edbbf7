use ndarray::{s, Array2, Array3};
use serde::{Deserialize, Serialize};

use crate::error::{LinescanError, Result};

/// Intensity grid for one channel of one frame.
/// Shape = (height, width): rows run along the scan axis, columns are line index.
#[derive(Clone, Debug, PartialEq)]
pub struct ChannelFrame {
    pub data: Array2<f32>,
}

impl ChannelFrame {
    pub fn new(data: Array2<f32>) -> Self {
        Self { data }
    }

    pub fn width(&self) -> usize {
        self.data.ncols()
    }

    pub fn height(&self) -> usize {
        self.data.nrows()
    }

    pub fn dim(&self) -> (usize, usize) {
        self.data.dim()
    }

    /// New frame with `value` removed from every sample, clamped at zero.
    pub fn floor_subtracted(&self, value: f32) -> Self {
        Self::new(self.data.mapv(|v| (v - value).max(0.0)))
    }

    pub fn max_value(&self) -> f32 {
        self.data.iter().copied().fold(0.0f32, f32::max)
    }
}

/// Red and green channels of one frame, always the same shape.
#[derive(Clone, Debug, PartialEq)]
pub struct RatiometricFrame {
    red: ChannelFrame,
    green: ChannelFrame,
}

impl RatiometricFrame {
    pub fn new(red: ChannelFrame, green: ChannelFrame) -> Result<Self> {
        if red.dim() != green.dim() {
            return Err(LinescanError::DimensionMismatch {
                expected: red.dim(),
                found: green.dim(),
                index: 0,
            });
        }
        Ok(Self { red, green })
    }

    pub fn red(&self) -> &ChannelFrame {
        &self.red
    }

    pub fn green(&self) -> &ChannelFrame {
        &self.green
    }

    pub fn width(&self) -> usize {
        self.red.width()
    }

    pub fn height(&self) -> usize {
        self.red.height()
    }

    pub fn dim(&self) -> (usize, usize) {
        self.red.dim()
    }

    pub fn channel(&self, channel: Channel) -> &ChannelFrame {
        match channel {
            Channel::Red => &self.red,
            Channel::Green => &self.green,
        }
    }

    pub(crate) fn map_channels(&self, f: impl Fn(Channel, &ChannelFrame) -> ChannelFrame) -> Self {
        Self {
            red: f(Channel::Red, &self.red),
            green: f(Channel::Green, &self.green),
        }
    }

    /// RGB merge for display, shape = (height, width, 3), values in [0.0, 1.0].
    /// Each channel is scaled by its own maximum; blue stays empty.
    pub fn merge(&self) -> Array3<f32> {
        let (h, w) = self.dim();
        let red_max = self.red.max_value();
        let green_max = self.green.max_value();
        let mut rgb = Array3::<f32>::zeros((h, w, 3));

        for (plane, (channel, max)) in [(&self.red, red_max), (&self.green, green_max)]
            .into_iter()
            .enumerate()
        {
            if max > 0.0 {
                rgb.slice_mut(s![.., .., plane]).assign(&(&channel.data / max));
            }
        }
        rgb
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Channel {
    Red,
    Green,
}

/// Which view of the active frame the presentation layer shows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisplayChannel {
    #[default]
    Merge,
    Green,
    Red,
}

impl std::fmt::Display for DisplayChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Merge => write!(f, "Merge"),
            Self::Green => write!(f, "Green"),
            Self::Red => write!(f, "Red"),
        }
    }
}

/// Acquisition metadata supplied by whoever parsed the microscope files.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AcquisitionMeta {
    /// Acquisition timestamp as recorded by the microscope software.
    #[serde(default)]
    pub timestamp: Option<String>,
    /// Stage position (x, y, z) in microns.
    #[serde(default)]
    pub stage_position: (f64, f64, f64),
    /// Time spent per pixel along the line axis.
    #[serde(default)]
    pub msec_per_pixel: f64,
}
