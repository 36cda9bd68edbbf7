use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use linescan_core::config::{AnalysisConfig, FloorMode};
use linescan_core::frame::RatiometricFrame;
use linescan_core::io::FolderContents;
use linescan_core::scheduler::RecomputeScheduler;
use linescan_core::session::{AnalysisSession, SessionCommand};
use tracing::debug;

use crate::summary::print_analysis_summary;

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Acquisition folder containing Ch1 (red) and Ch2 (green) images
    pub folder: PathBuf,

    /// TOML analysis config (see `linescan config`)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Analyze a single frame (0-based)
    #[arg(long, conflicts_with = "average")]
    pub frame: Option<usize>,

    /// Analyze the average of all frames
    #[arg(long)]
    pub average: bool,

    /// Boxcar filter width in pixels (0 = off)
    #[arg(long)]
    pub filter_px: Option<usize>,

    /// Disable floor subtraction
    #[arg(long)]
    pub no_floor: bool,

    /// Subtract this constant instead of a percentile floor
    #[arg(long, conflicts_with = "no_floor")]
    pub floor_value: Option<f32>,

    /// Baseline rows (inclusive), overriding auto-baseline
    #[arg(long, num_args = 2, value_names = ["MIN", "MAX"], allow_negative_numbers = true)]
    pub baseline: Option<Vec<i64>>,

    /// Structure columns (inclusive), overriding auto-structure
    #[arg(long, num_args = 2, value_names = ["MIN", "MAX"], allow_negative_numbers = true)]
    pub structure: Option<Vec<i64>>,
}

pub fn run(args: &AnalyzeArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    config.validate()?;
    debug!(?config, "analysis config");

    let contents = FolderContents::scan(&args.folder)?;
    let total = contents.frame_count()?;

    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("Loading [{bar:40}] {pos}/{len}")?
            .progress_chars("=> "),
    );
    let frames = contents.load_frames(|done| pb.set_position(done as u64))?;
    pb.finish_and_clear();

    let mut session = AnalysisSession::new(config.clone());
    let mut scheduler = RecomputeScheduler::new(Duration::from_millis(config.tick_period_ms));

    for command in commands_for(args, frames) {
        scheduler.apply(&mut session, command)?;
    }

    let Some(settings) = scheduler.tick(&session) else {
        bail!("Nothing to analyze in {}", args.folder.display());
    };

    print_analysis_summary(&args.folder, &settings);
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<AnalysisConfig> {
    let Some(path) = path else {
        return Ok(AnalysisConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("Failed to parse config {}", path.display()))
}

/// Session commands that reproduce the command-line overrides, in order.
fn commands_for(
    args: &AnalyzeArgs,
    frames: Vec<RatiometricFrame>,
) -> Vec<SessionCommand> {
    let mut commands = Vec::new();

    if args.no_floor {
        commands.push(SessionCommand::SetFloorEnabled(false));
    } else if let Some(value) = args.floor_value {
        commands.push(SessionCommand::SetFloorMode(FloorMode::Value(value)));
        commands.push(SessionCommand::SetFloorEnabled(true));
    }

    commands.push(SessionCommand::LoadFrames(frames));

    if args.average {
        commands.push(SessionCommand::SetUseAverage(true));
    } else if let Some(index) = args.frame {
        commands.push(SessionCommand::SetFrameIndex(index));
    }
    if let Some(px) = args.filter_px {
        commands.push(SessionCommand::SetFilterWidth(px));
    }
    if let Some([min, max]) = args.baseline.as_deref() {
        commands.push(SessionCommand::SetBaseline(*min, *max));
    }
    match args.structure.as_deref() {
        Some([min, max]) => commands.push(SessionCommand::SetStructure(*min, *max)),
        // Re-detect on whichever frame ended up selected.
        _ => commands.push(SessionCommand::AutoStructure),
    }

    commands
}
