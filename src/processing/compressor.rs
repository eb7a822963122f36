//! The quality back-off loop for a single image.
//!
//! Each attempt encodes the whole image to the final output path, then reads
//! the size back from the filesystem. Quality drops by a fixed step until the
//! file fits the budget or the floor quality has been tried.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::core::{CompressionAttempt, CompressionConfig, CompressionOutcome, ImageCandidate};
use crate::core::types::bytes_to_kb;
use crate::processing::AvifTranscoder;
use crate::utils::{OptimizerError, OptimizerResult, OUTPUT_EXTENSION, get_file_size, validate_input_path};

/// Returns `<run_dir>/<input stem>.avif`.
pub fn output_path_for(input: &Path, run_dir: &Path) -> OptimizerResult<PathBuf> {
    let stem = input
        .file_stem()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| OptimizerError::format(format!(
            "Cannot derive output name from {}", input.display()
        )))?;

    let mut file_name = stem.to_os_string();
    file_name.push(".");
    file_name.push(OUTPUT_EXTENSION);
    Ok(run_dir.join(file_name))
}

/// Compresses one image into `run_dir`, lowering quality until it fits.
///
/// A file still over budget at the floor quality is kept and reported with
/// `within_budget == false`; only decode, encode or IO failures are errors.
pub async fn compress_image(
    candidate: &ImageCandidate,
    run_dir: &Path,
    config: &CompressionConfig,
    transcoder: Arc<dyn AvifTranscoder>,
) -> OptimizerResult<CompressionOutcome> {
    let file_name = candidate.file_name();
    validate_input_path(&candidate.path)?;
    let output_path = output_path_for(&candidate.path, run_dir)?;

    let mut quality = config.start_quality;
    let mut attempts = Vec::new();
    debug!("{file_name}: {} input, starting at quality {quality}", candidate.format);

    loop {
        let size_bytes = encode_attempt(&transcoder, &candidate.path, &output_path, quality).await?;
        attempts.push(CompressionAttempt { quality, size_bytes });
        debug!("{file_name}: quality {quality} -> {size_bytes} bytes");

        if size_bytes <= config.max_size_bytes || quality <= config.min_quality {
            break;
        }

        let next = config.next_quality(quality);
        info!(
            "File still too large ({}KB), reducing quality to {}",
            bytes_to_kb(size_bytes),
            next
        );
        quality = next;
    }

    let size_bytes = attempts.last().map(|a| a.size_bytes).unwrap_or_default();
    let outcome = CompressionOutcome {
        file_name,
        source_format: candidate.format,
        output_path,
        size_bytes,
        quality,
        within_budget: size_bytes <= config.max_size_bytes,
        attempts,
    };

    if outcome.within_budget {
        info!(
            "Successfully optimized: {} -> {} ({}KB, quality: {})",
            outcome.file_name,
            outcome.output_path.display(),
            outcome.size_kb(),
            outcome.quality
        );
    } else {
        warn!(
            "Optimized over budget: {} -> {} ({}KB > {}KB, quality: {})",
            outcome.file_name,
            outcome.output_path.display(),
            outcome.size_kb(),
            bytes_to_kb(config.max_size_bytes),
            outcome.quality
        );
    }

    Ok(outcome)
}

/// Runs one encode on the blocking pool and returns the size on disk.
async fn encode_attempt(
    transcoder: &Arc<dyn AvifTranscoder>,
    input: &Path,
    output: &Path,
    quality: u8,
) -> OptimizerResult<u64> {
    let transcoder = Arc::clone(transcoder);
    let (input_owned, output_owned) = (input.to_path_buf(), output.to_path_buf());

    tokio::task::spawn_blocking(move || transcoder.transcode(&input_owned, &output_owned, quality))
        .await
        .map_err(|e| OptimizerError::processing(format!("Task panicked: {e}")))??;

    get_file_size(output).await
}
