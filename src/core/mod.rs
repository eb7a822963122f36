//! Core application types and state management.
//!
//! This module contains the fundamental types used throughout the application:
//! - [`AppState`]: Holds the transcoder for the lifetime of the process
//! - [`RunConfig`] / [`CompressionConfig`]: Directories and back-off settings
//! - [`ImageCandidate`]: An input file recognised as an image
//! - [`CompressionOutcome`]: Result of compressing one image
//! - [`RunSummary`]: Aggregate result of a run

mod state;
pub(crate) mod types;

pub use state::AppState;
pub use types::{
    CompressionAttempt, CompressionConfig, CompressionOutcome, ImageCandidate, RunConfig,
    RunContext, RunSummary,
};
