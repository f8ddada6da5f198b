//! Job data model: file descriptors, per-file outcomes, and the final tally.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// One file in a dataset repository: repo-relative path plus the fully
/// resolved URL to fetch it from. Immutable once produced by the manifest
/// stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDescriptor {
    pub relative_path: String,
    pub source_url: String,
}

/// Result of downloading one descriptor. The coordinator produces exactly
/// one of these per descriptor submitted, success or failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadOutcome {
    pub relative_path: String,
    pub success: bool,
    /// Failure cause naming the file and layer, or a verbose success note.
    pub message: Option<String>,
}

/// A batch of descriptors plus the knobs the coordinator needs to run them.
#[derive(Debug, Clone)]
pub struct DownloadJob {
    pub files: Vec<FileDescriptor>,
    /// Local directory the relative paths are joined under.
    pub dest_root: PathBuf,
    /// Worker pool size; must be at least 1 (validated before construction).
    pub max_concurrency: usize,
    /// Bearer credential attached to every transfer when present.
    pub auth_token: Option<String>,
    pub verbose: bool,
    /// Hard per-transfer timeout so a hung transfer cannot pin a worker.
    pub timeout: Duration,
}

/// Final tally of a download run. Owned exclusively by the coordinator while
/// the job is live; workers report outcomes over a channel and never touch it.
#[derive(Debug, Clone, Default)]
pub struct DownloadSummary {
    pub succeeded: usize,
    pub failed: usize,
    /// Failed outcomes in completion order.
    pub failures: Vec<DownloadOutcome>,
}

impl DownloadSummary {
    /// Folds one outcome into the tally. For a job of N descriptors this is
    /// called exactly N times, so `succeeded + failed == N` on completion.
    pub fn record(&mut self, outcome: DownloadOutcome) {
        if outcome.success {
            self.succeeded += 1;
        } else {
            self.failed += 1;
            self.failures.push(outcome);
        }
    }

    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }
}
