// Module declarations in dependency order
pub mod commands;
pub mod core;
pub mod processing;
pub mod utils;

// Public exports for external consumers
pub use crate::core::{
    AppState, CompressionAttempt, CompressionConfig, CompressionOutcome, ImageCandidate,
    RunConfig, RunSummary,
};
pub use crate::processing::{AvifTranscoder, RavifTranscoder};
pub use crate::utils::{OptimizerError, OptimizerResult};
pub use crate::commands::*;

// This library file is used as a public API for consuming this crate as a library.
// The actual application entry point is in main.rs.
