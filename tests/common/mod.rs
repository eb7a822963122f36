use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use avif_optimizer_lib::{AvifTranscoder, OptimizerError, OptimizerResult};
use tempfile::TempDir;

pub const KB: u64 = 1024;

/// Writes a deterministic number of bytes per quality level.
///
/// Inputs whose file name starts with `corrupt` fail to decode.
pub struct FakeTranscoder {
    size_for: fn(u8) -> u64,
    calls: Mutex<Vec<(PathBuf, u8)>>,
}

impl FakeTranscoder {
    pub fn new(size_for: fn(u8) -> u64) -> Arc<Self> {
        Arc::new(Self { size_for, calls: Mutex::new(Vec::new()) })
    }

    /// Qualities tried for the input named `file_name`, in order.
    pub fn qualities_for(&self, file_name: &str) -> Vec<u8> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(path, _)| path.file_name().is_some_and(|n| n == file_name))
            .map(|(_, q)| *q)
            .collect()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl AvifTranscoder for FakeTranscoder {
    fn name(&self) -> &'static str {
        "fake"
    }

    fn transcode(&self, input: &Path, output: &Path, quality: u8) -> OptimizerResult<()> {
        self.calls.lock().unwrap().push((input.to_path_buf(), quality));

        let corrupt = input
            .file_name()
            .is_some_and(|n| n.to_string_lossy().starts_with("corrupt"));
        if corrupt {
            return Err(OptimizerError::processing(format!(
                "Failed to load '{}': unexpected end of file",
                input.display()
            )));
        }

        std::fs::write(output, vec![0u8; (self.size_for)(quality) as usize])?;
        Ok(())
    }
}

/// Holds each encode for a while and records how many overlapped.
pub struct SlowTranscoder {
    delay: Duration,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

impl SlowTranscoder {
    pub fn new(delay: Duration) -> Arc<Self> {
        Arc::new(Self { delay, in_flight: AtomicUsize::new(0), peak: AtomicUsize::new(0) })
    }

    /// Largest number of encodes seen running at the same time.
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

impl AvifTranscoder for SlowTranscoder {
    fn name(&self) -> &'static str {
        "slow"
    }

    fn transcode(&self, _input: &Path, output: &Path, _quality: u8) -> OptimizerResult<()> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        std::thread::sleep(self.delay);
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        std::fs::write(output, vec![0u8; KB as usize])?;
        Ok(())
    }
}

/// A scratch working directory holding `input/` and `output/`.
pub struct Workspace {
    pub tmp: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir(tmp.path().join("input")).unwrap();
        Self { tmp }
    }

    pub fn input_dir(&self) -> PathBuf {
        self.tmp.path().join("input")
    }

    pub fn output_dir(&self) -> PathBuf {
        self.tmp.path().join("output")
    }

    pub fn add_input(&self, name: &str) {
        std::fs::write(self.input_dir().join(name), b"image bytes").unwrap();
    }
}
