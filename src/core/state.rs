//! Process-wide state: the transcoder every run shares.

use std::sync::Arc;
use tracing::debug;
use crate::processing::AvifTranscoder;
use crate::utils::OptimizerResult;

/// Application state built once in `main`.
///
/// With the `libvips` feature it also keeps the libvips runtime alive for
/// as long as any clone exists.
#[derive(Clone)]
pub struct AppState {
    transcoder: Arc<dyn AvifTranscoder>,
}

impl AppState {
    /// Creates the state with the transcoder selected at compile time.
    #[cfg(feature = "libvips")]
    pub fn new() -> OptimizerResult<Self> {
        use crate::processing::libvips::{VipsRuntime, VipsTranscoder};

        let runtime = VipsRuntime::init()?;
        Ok(Self::with_transcoder(Arc::new(VipsTranscoder::new(runtime))))
    }

    /// Creates the state with the transcoder selected at compile time.
    #[cfg(not(feature = "libvips"))]
    pub fn new() -> OptimizerResult<Self> {
        use crate::processing::RavifTranscoder;

        Ok(Self::with_transcoder(Arc::new(RavifTranscoder::default())))
    }

    pub fn with_transcoder(transcoder: Arc<dyn AvifTranscoder>) -> Self {
        debug!("Using {} transcoder", transcoder.name());
        Self { transcoder }
    }

    /// Shared handle to the transcoder for one run.
    pub fn transcoder(&self) -> Arc<dyn AvifTranscoder> {
        Arc::clone(&self.transcoder)
    }
}
