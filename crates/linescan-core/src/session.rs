use std::sync::Arc;

use tracing::{info, warn};

use crate::analysis::filter::filter_time_ms;
use crate::analysis::{analyze, AnalysisResult};
use crate::config::{AnalysisConfig, FloorMode};
use crate::detection::detect_structure_in_frame;
use crate::error::{LinescanError, Result};
use crate::frame::{AcquisitionMeta, DisplayChannel, RatiometricFrame};
use crate::range::{PixelRange, RangeModel};
use crate::stack::RatiometricStack;

/// Snapshot handed to renderers after a successful recompute. Never mutated
/// once published.
#[derive(Clone, Debug)]
pub struct AnalysisSettings {
    /// Frame that was analyzed (the average frame when `frame_index` is `None`).
    pub frame: RatiometricFrame,
    pub frame_index: Option<usize>,
    pub all_frames: Arc<RatiometricStack>,
    pub baseline: PixelRange,
    pub structure: PixelRange,
    pub filter_width_px: usize,
    pub filter_time_ms: f64,
    /// Percentile used for floor subtraction, if that mode was active.
    pub floor_percentile: Option<f32>,
    /// `(red, green)` floors actually subtracted.
    pub floor_values: Option<(f32, f32)>,
    pub display_channel: DisplayChannel,
    pub acquisition: AcquisitionMeta,
    pub result: AnalysisResult,
}

/// A parameter change coming from the interactive layer.
#[derive(Clone, Debug)]
pub enum SessionCommand {
    LoadFrames(Vec<RatiometricFrame>),
    SetFrameIndex(usize),
    SetUseAverage(bool),
    SetDisplayChannel(DisplayChannel),
    SetBaseline(i64, i64),
    SetStructure(i64, i64),
    SetFilterWidth(usize),
    SetFloorEnabled(bool),
    SetFloorMode(FloorMode),
    AutoBaseline,
    AutoStructure,
}

/// State of one interactive analysis: the loaded acquisition plus every knob.
#[derive(Debug)]
pub struct AnalysisSession {
    config: AnalysisConfig,
    /// Frames as loaded, kept so floor subtraction is always applied to
    /// untouched samples.
    raw: Option<Arc<RatiometricStack>>,
    stack: Option<Arc<RatiometricStack>>,
    floor_values: Option<(f32, f32)>,
    ranges: RangeModel,
    frame_index: usize,
    use_average: bool,
    display_channel: DisplayChannel,
    /// Bumped by every mutator; the scheduler compares it against the last
    /// revision it published.
    revision: u64,
}

impl AnalysisSession {
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            config,
            raw: None,
            stack: None,
            floor_values: None,
            ranges: RangeModel::new(0, 0),
            frame_index: 0,
            use_average: false,
            display_channel: DisplayChannel::default(),
            revision: 0,
        }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn stack(&self) -> Option<&Arc<RatiometricStack>> {
        self.stack.as_ref()
    }

    pub fn ranges(&self) -> &RangeModel {
        &self.ranges
    }

    pub fn frame_index(&self) -> usize {
        self.frame_index
    }

    pub fn use_average(&self) -> bool {
        self.use_average
    }

    pub fn display_channel(&self) -> DisplayChannel {
        self.display_channel
    }

    pub fn filter_width_px(&self) -> usize {
        self.config.filter_width_px
    }

    pub fn floor_values(&self) -> Option<(f32, f32)> {
        self.floor_values
    }

    /// Counter advanced by every state change.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    /// Time spanned by the current filter width.
    pub fn filter_time_ms(&self) -> f64 {
        filter_time_ms(
            self.config.filter_width_px,
            self.config.acquisition.msec_per_pixel,
        )
    }

    /// Replace the acquisition, then place baseline and structure automatically.
    pub fn load_frames(&mut self, frames: Vec<RatiometricFrame>) -> Result<()> {
        let raw = Arc::new(RatiometricStack::new(frames)?);
        self.touch();
        info!(
            frames = raw.frame_count(),
            height = raw.dim().0,
            width = raw.dim().1,
            "loading stack"
        );
        self.raw = Some(raw);
        self.rebuild_stack();
        self.place_ranges()
    }

    /// Back to the first frame with baseline and structure re-detected.
    fn place_ranges(&mut self) -> Result<()> {
        self.frame_index = 0;
        let (h, w) = self.active_frame()?.dim();
        self.ranges = RangeModel::new(h, w);
        self.auto_baseline();
        self.auto_structure();
        Ok(())
    }

    fn rebuild_stack(&mut self) {
        let Some(raw) = self.raw.clone() else {
            return;
        };
        if !self.config.floor.enabled {
            self.stack = Some(raw);
            self.floor_values = None;
            return;
        }

        let (stack, floors) = match self.config.floor.mode {
            FloorMode::Value(v) => (raw.floor_subtract(v), (v, v)),
            FloorMode::Percentile(p) => raw.floor_subtract_percentile(p),
        };
        self.stack = Some(Arc::new(stack));
        self.floor_values = Some(floors);
    }

    /// Frame currently selected: the stack average or a single frame.
    pub fn active_frame(&self) -> Result<&RatiometricFrame> {
        let stack = self.stack.as_ref().ok_or(LinescanError::EmptyStack)?;
        if self.use_average {
            Ok(stack.average())
        } else {
            stack.frame(self.frame_index)
        }
    }

    pub fn apply(&mut self, command: SessionCommand) -> Result<()> {
        match command {
            SessionCommand::LoadFrames(frames) => return self.load_frames(frames),
            SessionCommand::SetFrameIndex(i) => self.set_frame_index(i),
            SessionCommand::SetUseAverage(b) => self.set_use_average(b),
            SessionCommand::SetDisplayChannel(c) => self.set_display_channel(c),
            SessionCommand::SetBaseline(min, max) => self.set_baseline(min, max),
            SessionCommand::SetStructure(min, max) => self.set_structure(min, max),
            SessionCommand::SetFilterWidth(px) => self.set_filter_width(px),
            SessionCommand::SetFloorEnabled(b) => self.set_floor_enabled(b),
            SessionCommand::SetFloorMode(mode) => self.set_floor_mode(mode),
            SessionCommand::AutoBaseline => self.auto_baseline(),
            SessionCommand::AutoStructure => self.auto_structure(),
        }
        Ok(())
    }

    /// Select a single frame. Out-of-range indices are kept and make
    /// `recompute` return `None` until corrected.
    pub fn set_frame_index(&mut self, index: usize) {
        self.touch();
        self.frame_index = index;
        self.sync_range_bounds();
    }

    pub fn set_use_average(&mut self, use_average: bool) {
        self.touch();
        self.use_average = use_average;
        self.sync_range_bounds();
    }

    pub fn set_display_channel(&mut self, channel: DisplayChannel) {
        self.touch();
        self.display_channel = channel;
    }

    pub fn set_baseline(&mut self, min: i64, max: i64) {
        self.touch();
        self.ranges.set_baseline(min, max);
    }

    pub fn set_structure(&mut self, min: i64, max: i64) {
        self.touch();
        self.ranges.set_structure(min, max);
    }

    pub fn set_filter_width(&mut self, px: usize) {
        self.touch();
        self.config.filter_width_px = px;
    }

    /// Toggle floor subtraction. The stack is rebuilt from the raw frames,
    /// the first frame is selected and both ranges are re-detected.
    pub fn set_floor_enabled(&mut self, enabled: bool) {
        self.touch();
        self.config.floor.enabled = enabled;
        self.refloor();
    }

    pub fn set_floor_mode(&mut self, mode: FloorMode) {
        self.touch();
        self.config.floor.mode = mode;
        self.refloor();
    }

    fn refloor(&mut self) {
        self.rebuild_stack();
        if self.stack.is_some() {
            if let Err(e) = self.place_ranges() {
                warn!("could not re-detect ranges: {e}");
            }
        }
    }

    pub fn auto_baseline(&mut self) {
        self.touch();
        let Ok(height) = self.active_frame().map(|f| f.height()) else {
            return;
        };
        self.ranges.auto_baseline(height, &self.config.auto_baseline);
    }

    /// Detect the structure on the green channel of the active frame.
    pub fn auto_structure(&mut self) {
        self.touch();
        let detection = &self.config.structure_detection;
        let Ok((min, max)) = self
            .active_frame()
            .map(|f| detect_structure_in_frame(f.green(), detection))
        else {
            return;
        };
        self.ranges.set_structure(min as i64, max as i64);
    }

    fn sync_range_bounds(&mut self) {
        let dims = self.active_frame().map(|f| f.dim());
        if let Ok((h, w)) = dims {
            self.ranges.clamp_to_bounds(h, w);
        }
    }

    /// Analyze the active frame with the current knobs.
    ///
    /// Returns `None` when nothing can be analyzed yet (no stack loaded, or the
    /// selected frame does not exist).
    pub fn recompute(&self) -> Option<AnalysisSettings> {
        let stack = self.stack.as_ref()?;
        let frame = match self.active_frame() {
            Ok(frame) => frame,
            Err(e) => {
                warn!("skipping recompute: {e}");
                return None;
            }
        };

        let mut ranges = self.ranges;
        ranges.clamp_to_bounds(frame.height(), frame.width());
        let filter_width_px = self.config.filter_width_px;
        let result = analyze(frame, ranges.baseline(), ranges.structure(), filter_width_px);

        let floor_percentile = match self.config.floor.mode {
            FloorMode::Percentile(p) if self.config.floor.enabled => Some(p),
            _ => None,
        };

        Some(AnalysisSettings {
            frame: frame.clone(),
            frame_index: (!self.use_average).then_some(self.frame_index),
            all_frames: Arc::clone(stack),
            baseline: ranges.baseline(),
            structure: ranges.structure(),
            filter_width_px,
            filter_time_ms: self.filter_time_ms(),
            floor_percentile,
            floor_values: self.floor_values,
            display_channel: self.display_channel,
            acquisition: self.config.acquisition.clone(),
            result,
        })
    }
}
