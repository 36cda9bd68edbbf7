pub mod filter;
pub mod profile;
mod ratio;

pub use ratio::{analyze, guarded_ratio, AnalysisResult, TimeCourse};
