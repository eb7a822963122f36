//! The seam between the back-off loop and whichever AVIF encoder is in use.

use std::path::Path;
use crate::utils::OptimizerResult;

/// Encodes one image file to AVIF at a given quality.
///
/// Implementations block: callers run them inside `spawn_blocking`.
/// Writing to `output` must replace whatever is already there.
pub trait AvifTranscoder: Send + Sync {
    /// Short backend name for log lines.
    fn name(&self) -> &'static str;

    /// Decodes `input` and writes it to `output` as AVIF at `quality` (1-100).
    fn transcode(&self, input: &Path, output: &Path, quality: u8) -> OptimizerResult<()>;
}
