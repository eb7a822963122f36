//! libvips lifecycle management.

use std::sync::Arc;
use tracing::debug;
use crate::utils::{OptimizerError, OptimizerResult};

/// Thread-safe guard for the libvips `VipsApp` lifecycle.
///
/// `VipsApp` initializes the libvips thread pool and global state on creation
/// and shuts it down on drop. Wrapping in Arc ensures exactly one shutdown
/// call when the last reference is released.
struct VipsAppGuard(libvips::VipsApp);

// libvips is designed for concurrent use; individual VipsImage instances must
// not be shared between threads, but concurrent creation on separate threads is safe.
unsafe impl Send for VipsAppGuard {}
unsafe impl Sync for VipsAppGuard {}

/// Keeps libvips initialized until the last clone is dropped.
#[derive(Clone)]
pub struct VipsRuntime {
    _vips: Arc<VipsAppGuard>,
}

impl VipsRuntime {
    pub fn init() -> OptimizerResult<Self> {
        let vips = libvips::VipsApp::default("avif-optimizer")
            .map_err(|e| OptimizerError::processing(format!("Failed to initialize libvips: {e}")))?;
        // 0 = let libvips decide based on available CPU cores
        vips.concurrency_set(0);
        debug!("libvips initialized (concurrency: {})", vips.concurency_get());

        Ok(Self {
            _vips: Arc::new(VipsAppGuard(vips)),
        })
    }
}
