//! Finds the images in the input directory.

use std::path::Path;
use tokio::fs;
use tracing::debug;

use crate::core::ImageCandidate;
use crate::utils::{OptimizerError, OptimizerResult, format_from_path};

/// Lists `input_dir` (not recursively) and keeps the recognised image files.
///
/// Results are sorted by file name. Subdirectories are skipped whatever
/// their name; unrecognised extensions are skipped silently.
pub async fn discover_images(input_dir: impl AsRef<Path>) -> OptimizerResult<Vec<ImageCandidate>> {
    let input_dir = input_dir.as_ref();
    let mut entries = fs::read_dir(input_dir).await.map_err(|e| {
        OptimizerError::io(format!("Failed to read directory {}: {}", input_dir.display(), e))
    })?;

    let mut candidates = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let Ok(format) = format_from_path(&path) else {
            continue;
        };

        // metadata() follows symlinks, so a link to an image file still counts
        if !fs::metadata(&path).await.map(|m| m.is_file()).unwrap_or(false) {
            debug!("Skipping non-file entry {}", path.display());
            continue;
        }

        candidates.push(ImageCandidate { path, format });
    }

    candidates.sort_by(|a, b| a.path.file_name().cmp(&b.path.file_name()));
    debug!("Discovered {} image(s) in {}", candidates.len(), input_dir.display());
    Ok(candidates)
}
