use std::path::{Path, PathBuf};

use tracing::info;

use crate::consts::{GREEN_CHANNEL_TAG, IMAGE_EXTENSIONS, RED_CHANNEL_TAG};
use crate::error::{LinescanError, Result};
use crate::frame::RatiometricFrame;

use super::image_io::load_channel_image;

/// Channel image files found in one acquisition folder, sorted by name.
#[derive(Clone, Debug)]
pub struct FolderContents {
    pub path: PathBuf,
    pub red_files: Vec<PathBuf>,
    pub green_files: Vec<PathBuf>,
}

impl FolderContents {
    /// Enumerate red (`Ch1`) and green (`Ch2`) images in `path`.
    pub fn scan(path: &Path) -> Result<Self> {
        if !path.is_dir() {
            return Err(LinescanError::InvalidFolder(format!(
                "{} is not a directory",
                path.display()
            )));
        }

        let mut red_files = Vec::new();
        let mut green_files = Vec::new();

        for entry in std::fs::read_dir(path)? {
            let file = entry?.path();
            if !is_image(&file) {
                continue;
            }
            let Some(name) = file.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if name.contains(RED_CHANNEL_TAG) {
                red_files.push(file);
            } else if name.contains(GREEN_CHANNEL_TAG) {
                green_files.push(file);
            }
        }

        red_files.sort();
        green_files.sort();

        Ok(Self {
            path: path.to_path_buf(),
            red_files,
            green_files,
        })
    }

    /// Number of red/green pairs, or an error when the channels don't pair up.
    pub fn frame_count(&self) -> Result<usize> {
        if self.red_files.is_empty() || self.green_files.is_empty() {
            return Err(LinescanError::InvalidFolder(format!(
                "{}: no {RED_CHANNEL_TAG}/{GREEN_CHANNEL_TAG} image pairs",
                self.path.display()
            )));
        }
        if self.red_files.len() != self.green_files.len() {
            return Err(LinescanError::InvalidFolder(format!(
                "{}: {} red images but {} green images",
                self.path.display(),
                self.red_files.len(),
                self.green_files.len()
            )));
        }
        Ok(self.red_files.len())
    }

    /// Decode every pair. `progress` receives the number of frames loaded so far.
    pub fn load_frames(&self, progress: impl Fn(usize)) -> Result<Vec<RatiometricFrame>> {
        let total = self.frame_count()?;
        let mut frames = Vec::with_capacity(total);

        for (i, (red, green)) in self.red_files.iter().zip(&self.green_files).enumerate() {
            let frame = RatiometricFrame::new(load_channel_image(red)?, load_channel_image(green)?)
                .map_err(|e| match e {
                    LinescanError::DimensionMismatch {
                        expected, found, ..
                    } => LinescanError::DimensionMismatch {
                        expected,
                        found,
                        index: i,
                    },
                    other => other,
                })?;
            frames.push(frame);
            progress(i + 1);
        }

        info!(frames = frames.len(), folder = %self.path.display(), "loaded linescan folder");
        Ok(frames)
    }
}

/// Scan `path` and decode all of its frames.
pub fn load_linescan_folder(path: &Path, progress: impl Fn(usize)) -> Result<Vec<RatiometricFrame>> {
    FolderContents::scan(path)?.load_frames(progress)
}

fn is_image(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
            .unwrap_or(false)
}
