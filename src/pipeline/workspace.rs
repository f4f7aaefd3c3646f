//! Per-run workspace directories.

use crate::defaults;
use crate::error::Result;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Process-wide sequence number guaranteeing distinct names within one
/// millisecond.
static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// An exclusively-owned directory for one pipeline invocation.
///
/// Created once at run start, never reused across runs and never shared
/// between concurrent runs. All derived artifacts (audio, transcript,
/// report) and any downloaded input live inside it. The workspace is left
/// on disk after the run, success or failure, so artifacts remain available
/// for the caller and for debugging.
#[derive(Debug, Clone, PartialEq)]
pub struct RunWorkspace {
    root: PathBuf,
}

impl RunWorkspace {
    /// Create a fresh, uniquely-named workspace under `base`.
    ///
    /// Uses `fs::create_dir` (not `create_dir_all`) for the run directory so
    /// a name collision is detected and retried instead of silently shared.
    pub fn create(base: &Path) -> Result<Self> {
        fs::create_dir_all(base)?;

        loop {
            let millis = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or(0);
            let seq = SEQUENCE.fetch_add(1, Ordering::Relaxed);
            let root = base.join(format!("run-{millis}-{seq:04}"));

            match fs::create_dir(&root) {
                Ok(()) => return Ok(Self { root }),
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Path of the extracted audio artifact.
    pub fn audio_path(&self) -> PathBuf {
        self.root.join(defaults::AUDIO_FILENAME)
    }

    /// Path of the transcript artifact.
    pub fn transcript_path(&self) -> PathBuf {
        self.root.join(defaults::TRANSCRIPT_FILENAME)
    }

    /// Path of the report artifact.
    pub fn report_path(&self) -> PathBuf {
        self.root.join(defaults::REPORT_FILENAME)
    }

    /// Path a downloaded input video is written to.
    pub fn download_path(&self) -> PathBuf {
        self.root.join(defaults::DOWNLOAD_FILENAME)
    }
}
