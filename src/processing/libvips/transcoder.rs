// src/processing/libvips/transcoder.rs

//! AVIF save through libvips `heifsave`.

use std::path::Path;
use libvips::ops::{self, ForeignHeifCompression, ForeignKeep, ForeignSubsample};
use libvips::VipsImage;
use tracing::debug;

use crate::processing::AvifTranscoder;
use crate::utils::{OptimizerError, OptimizerResult};
use super::VipsRuntime;

/// CPU effort for the AV1 encoder, 0 (fastest) to 9 (slowest).
const AVIF_EFFORT: i32 = 2;

/// Transcoder backed by the native libvips library.
///
/// Holds a [`VipsRuntime`] so libvips stays initialized while any transcoder exists.
#[derive(Clone)]
pub struct VipsTranscoder {
    _runtime: VipsRuntime,
}

impl VipsTranscoder {
    pub fn new(runtime: VipsRuntime) -> Self {
        Self { _runtime: runtime }
    }
}

impl AvifTranscoder for VipsTranscoder {
    fn name(&self) -> &'static str {
        "libvips"
    }

    fn transcode(&self, input: &Path, output: &Path, quality: u8) -> OptimizerResult<()> {
        let input = path_str(input)?;
        let output = path_str(output)?;

        let image = VipsImage::new_from_file(input)
            .map_err(|e| OptimizerError::processing(format!("Failed to load '{input}': {e}")))?;

        debug!("Loaded '{}': {}×{}", input, image.get_width(), image.get_height());

        let opts = ops::HeifsaveOptions {
            q: i32::from(quality.clamp(1, 100)),
            lossless: false,
            compression: ForeignHeifCompression::Av1,
            effort: AVIF_EFFORT,
            subsample_mode: ForeignSubsample::On, // 4:2:0
            keep: ForeignKeep::None,              // strip metadata
            ..ops::HeifsaveOptions::default()
        };

        ops::heifsave_with_opts(&image, output, &opts)
            .map_err(|e| OptimizerError::processing(format!("AVIF save failed: {e}")))
    }
}

fn path_str(path: &Path) -> OptimizerResult<&str> {
    path.to_str().ok_or_else(|| {
        OptimizerError::format(format!("Path is not valid UTF-8: {}", path.display()))
    })
}
