use std::path::Path;
use chrono::{DateTime, Utc};
use tokio::fs;
use tracing::debug;
use crate::core::RunContext;
use crate::utils::{OptimizerError, OptimizerResult};

/// Get file size in bytes
pub async fn get_file_size(path: impl AsRef<Path>) -> OptimizerResult<u64> {
    fs::metadata(path.as_ref())
        .await
        .map(|m| m.len())
        .map_err(|e| OptimizerError::io(format!(
            "Failed to get file size of {}: {}", path.as_ref().display(), e
        )))
}

/// Name of the per-run output directory: the UTC time to the second,
/// with `:` and `.` swapped for `-` so it is safe on every filesystem.
pub fn run_directory_name(now: DateTime<Utc>) -> String {
    now.format("%Y-%m-%dT%H:%M:%S")
        .to_string()
        .replace([':', '.'], "-")
}

/// Creates the input and output roots and this run's timestamped directory.
///
/// Existing directories are fine; anything else that stops creation
/// (permissions, a file in the way) is returned.
pub async fn prepare_directories(
    input_dir: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
    now: DateTime<Utc>,
) -> OptimizerResult<RunContext> {
    create_dir_all(input_dir.as_ref()).await?;
    create_dir_all(output_dir.as_ref()).await?;

    let run_dir = output_dir.as_ref().join(run_directory_name(now));
    create_dir_all(&run_dir).await?;
    debug!("Prepared run directory {}", run_dir.display());

    Ok(RunContext::new(run_dir))
}

async fn create_dir_all(path: &Path) -> OptimizerResult<()> {
    fs::create_dir_all(path)
        .await
        .map_err(|e| OptimizerError::io(format!(
            "Failed to create directory {}: {}", path.display(), e
        )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn at(secs: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 14, 5, secs).unwrap()
    }

    #[test]
    fn run_directory_name_is_filesystem_safe() {
        let now = at(9) + chrono::Duration::milliseconds(250);
        let name = run_directory_name(now);
        assert_eq!(name, "2026-10-19T14-05-09");
        assert!(!name.contains(':'));
        assert!(!name.contains('.'));
    }

    #[test]
    fn runs_a_second_apart_get_distinct_names() {
        assert_ne!(run_directory_name(at(9)), run_directory_name(at(10)));
    }

    #[tokio::test]
    async fn prepare_creates_missing_roots_and_run_dir() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("input");
        let output = tmp.path().join("output");

        let ctx = prepare_directories(&input, &output, at(9)).await.unwrap();

        assert!(input.is_dir());
        assert_eq!(ctx.run_dir(), output.join("2026-10-19T14-05-09"));
        assert!(ctx.run_dir().is_dir());
    }

    #[tokio::test]
    async fn prepare_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("input");
        let output = tmp.path().join("output");

        prepare_directories(&input, &output, at(9)).await.unwrap();
        let again = prepare_directories(&input, &output, at(9)).await;
        assert!(again.is_ok());
    }

    #[tokio::test]
    async fn prepare_fails_when_a_file_blocks_the_output_root() {
        let tmp = TempDir::new().unwrap();
        let output = tmp.path().join("output");
        std::fs::write(&output, b"not a directory").unwrap();

        let err = prepare_directories(tmp.path().join("input"), &output, at(9))
            .await
            .unwrap_err();
        assert!(matches!(err, OptimizerError::IO(_)));
    }

    #[tokio::test]
    async fn file_size_reads_metadata() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("a.avif");
        std::fs::write(&path, vec![0u8; 1234]).unwrap();

        assert_eq!(get_file_size(&path).await.unwrap(), 1234);
        assert!(get_file_size(tmp.path().join("missing")).await.is_err());
    }
}
