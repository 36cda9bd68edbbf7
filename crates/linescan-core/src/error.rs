use thiserror::Error;

#[derive(Error, Debug)]
pub enum LinescanError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image format error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Frame {index} has shape {found:?}, expected {expected:?}")]
    DimensionMismatch {
        /// (height, width) of the first frame.
        expected: (usize, usize),
        /// (height, width) of the offending frame.
        found: (usize, usize),
        index: usize,
    },

    #[error("Empty frame stack")]
    EmptyStack,

    #[error("Frame index {index} out of range (total: {total})")]
    FrameIndexOutOfRange { index: usize, total: usize },

    #[error("Invalid linescan folder: {0}")]
    InvalidFolder(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, LinescanError>;
