//! The run orchestrator: prepare, discover, compress everything, report.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use chrono::{DateTime, Utc};
use tokio::sync::Semaphore;
use tracing::{debug, error, info, warn};

use crate::core::{CompressionConfig, CompressionOutcome, ImageCandidate, RunConfig, RunSummary};
use crate::processing::{AvifTranscoder, compress_image, discover_images, output_path_for};
use crate::utils::{OptimizerError, OptimizerResult, prepare_directories, validate_config};

/// Compresses every image in `config.input_dir` into a fresh run directory.
///
/// # Arguments
/// * `config` - Directories, back-off settings and the encode concurrency limit
/// * `transcoder` - The AVIF encoder shared by all files
///
/// # Returns
/// A [`RunSummary`] once every file has either been written or failed.
/// Per-file failures are logged and counted, never returned; an `Err` means
/// the run itself could not start (bad config, directories, listing).
pub async fn compress_directory(
    config: &RunConfig,
    transcoder: Arc<dyn AvifTranscoder>,
) -> OptimizerResult<RunSummary> {
    compress_directory_at(config, transcoder, Utc::now()).await
}

/// [`compress_directory`] with the run timestamp supplied by the caller.
pub async fn compress_directory_at(
    config: &RunConfig,
    transcoder: Arc<dyn AvifTranscoder>,
    now: DateTime<Utc>,
) -> OptimizerResult<RunSummary> {
    validate_config(config)?;

    let context = prepare_directories(&config.input_dir, &config.output_dir, now).await?;
    let candidates = discover_images(&config.input_dir).await?;

    let mut summary = RunSummary {
        run_dir: Some(context.run_dir().to_path_buf()),
        discovered: candidates.len(),
        ..RunSummary::default()
    };

    if candidates.is_empty() {
        info!("No image files found in input directory");
        return Ok(summary);
    }

    let (candidates, skipped) = claim_output_names(candidates, context.run_dir());
    summary.skipped = skipped;

    info!(
        "Compressing {} image(s) with {} into {}",
        candidates.len(),
        transcoder.name(),
        context.run_dir().display()
    );

    // Every task starts now; the semaphore only bounds how many encode at once.
    let permits = Arc::new(Semaphore::new(config.max_concurrent_encodes));
    let mut handles = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        let permits = Arc::clone(&permits);
        let transcoder = Arc::clone(&transcoder);
        let run_dir = context.run_dir().to_path_buf();
        let compression = config.compression;
        let path = candidate.path.clone();

        let handle = tokio::spawn(compress_with_permit(permits, candidate, run_dir, compression, transcoder));
        handles.push((path, handle));
    }

    for (path, handle) in handles {
        let result = handle
            .await
            .unwrap_or_else(|e| Err(OptimizerError::processing(format!("Task panicked: {e}"))));

        match result {
            Ok(outcome) => summary.outcomes.push(outcome),
            Err(e) => {
                error!("Error processing {}: {}", display_name(&path), e);
                summary.failed.push((path, e.to_string()));
            }
        }
    }

    info!("All images have been processed!");
    info!(
        "{} compressed ({} over budget), {} failed, {} skipped",
        summary.compressed(),
        summary.over_budget(),
        summary.failed.len(),
        summary.skipped.len()
    );

    Ok(summary)
}

async fn compress_with_permit(
    permits: Arc<Semaphore>,
    candidate: ImageCandidate,
    run_dir: PathBuf,
    compression: CompressionConfig,
    transcoder: Arc<dyn AvifTranscoder>,
) -> OptimizerResult<CompressionOutcome> {
    let _permit = permits
        .acquire_owned()
        .await
        .map_err(|e| OptimizerError::processing(format!("Failed to acquire encode slot: {e}")))?;
    compress_image(&candidate, &run_dir, &compression, transcoder).await
}

/// Drops candidates whose `<stem>.avif` was already claimed by an earlier one.
///
/// Candidates arrive sorted by file name, so `photo.jpg` wins over `photo.png`.
fn claim_output_names(
    candidates: Vec<ImageCandidate>,
    run_dir: &Path,
) -> (Vec<ImageCandidate>, Vec<PathBuf>) {
    let mut claimed: HashSet<PathBuf> = HashSet::with_capacity(candidates.len());
    let mut kept = Vec::with_capacity(candidates.len());
    let mut skipped = Vec::new();

    for candidate in candidates {
        // Unnameable inputs go through and fail inside the compressor with a proper error
        let Ok(output) = output_path_for(&candidate.path, run_dir) else {
            kept.push(candidate);
            continue;
        };

        if claimed.insert(output.clone()) {
            kept.push(candidate);
        } else {
            warn!(
                "Skipping {}: another input already writes {}",
                candidate.file_name(),
                output.display()
            );
            skipped.push(candidate.path);
        }
    }

    debug!("{} candidate(s) kept, {} skipped on name collision", kept.len(), skipped.len());
    (kept, skipped)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
