//! Core types for compression settings, per-file outcomes and run results.

use std::path::{Path, PathBuf};
use crate::utils::InputFormat;

/// Quality the back-off loop starts from.
pub const DEFAULT_START_QUALITY: u8 = 60;
/// Largest acceptable output file, in bytes (700 KB).
pub const DEFAULT_MAX_SIZE_BYTES: u64 = 700 * 1024;
/// How far quality drops after an over-budget attempt.
pub const DEFAULT_QUALITY_STEP: u8 = 10;
/// Lowest quality that will ever be attempted.
pub const DEFAULT_MIN_QUALITY: u8 = 1;

pub const DEFAULT_INPUT_DIR: &str = "input";
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Settings for the quality back-off loop.
///
/// Quality is on the encoder's 1-100 scale, higher meaning larger files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionConfig {
    /// Quality of the first attempt
    pub start_quality: u8,
    /// Size budget for the output file in bytes
    pub max_size_bytes: u64,
    /// Quality decrement between attempts
    pub quality_step: u8,
    /// Quality floor, attempted once before giving up
    pub min_quality: u8,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            start_quality: DEFAULT_START_QUALITY,
            max_size_bytes: DEFAULT_MAX_SIZE_BYTES,
            quality_step: DEFAULT_QUALITY_STEP,
            min_quality: DEFAULT_MIN_QUALITY,
        }
    }
}

impl CompressionConfig {
    /// Quality to try after an over-budget attempt at `quality`, floored at `min_quality`.
    pub fn next_quality(&self, quality: u8) -> u8 {
        quality.saturating_sub(self.quality_step).max(self.min_quality)
    }
}

/// Everything one run needs to know.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Flat directory scanned for images
    pub input_dir: PathBuf,
    /// Root under which each run gets its own timestamped directory
    pub output_dir: PathBuf,
    pub compression: CompressionConfig,
    /// Upper bound on encodes running at the same time
    pub max_concurrent_encodes: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from(DEFAULT_INPUT_DIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            compression: CompressionConfig::default(),
            max_concurrent_encodes: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
        }
    }
}

/// The output location resolved for the current run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunContext {
    run_dir: PathBuf,
}

impl RunContext {
    pub fn new(run_dir: PathBuf) -> Self {
        Self { run_dir }
    }

    pub fn run_dir(&self) -> &Path {
        &self.run_dir
    }
}

/// An input file recognised as an image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageCandidate {
    pub path: PathBuf,
    pub format: InputFormat,
}

impl ImageCandidate {
    /// File name used in log lines.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// One encode at one quality level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionAttempt {
    pub quality: u8,
    pub size_bytes: u64,
}

/// Result of compressing a single image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressionOutcome {
    /// Input file name
    pub file_name: String,
    /// Format the input was recognised as
    pub source_format: InputFormat,
    /// Path of the written AVIF file
    pub output_path: PathBuf,
    /// Size of the file left on disk
    pub size_bytes: u64,
    /// Quality of the attempt left on disk
    pub quality: u8,
    /// Every attempt in order; never empty
    pub attempts: Vec<CompressionAttempt>,
    /// Whether the final file fits the size budget
    pub within_budget: bool,
}

impl CompressionOutcome {
    /// Size in whole kilobytes, rounded to nearest.
    pub fn size_kb(&self) -> u64 {
        bytes_to_kb(self.size_bytes)
    }
}

/// Aggregate result of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Directory the run wrote into; `None` when setup never got that far
    pub run_dir: Option<PathBuf>,
    pub discovered: usize,
    /// Files skipped because another input already claimed their output name
    pub skipped: Vec<PathBuf>,
    /// Files whose processing failed, with the error message
    pub failed: Vec<(PathBuf, String)>,
    pub outcomes: Vec<CompressionOutcome>,
}

impl RunSummary {
    pub fn compressed(&self) -> usize {
        self.outcomes.len()
    }

    pub fn over_budget(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.within_budget).count()
    }
}

pub(crate) fn bytes_to_kb(bytes: u64) -> u64 {
    (bytes + 512) / 1024
}
