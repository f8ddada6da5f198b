//! Concurrent retrieval engine.
//!
//! Runs a job's descriptors through a bounded pool of worker threads pulling
//! from a shared queue. Outcomes flow back over a channel to a single
//! aggregation point that owns the summary, ticks the progress sink once per
//! outcome, and surfaces failures as they happen instead of buffering them.

mod worker;

use crate::job::{DownloadJob, DownloadSummary, FileDescriptor};
use crate::progress::ProgressSink;
use std::collections::VecDeque;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};

/// Coordinator lifecycle. `run` walks Idle → Dispatching → Draining →
/// Complete; a finished run never re-enters Dispatching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Dispatching,
    Draining,
    Complete,
}

impl Phase {
    /// Next phase in the run lifecycle; Complete is terminal.
    pub fn advance(self) -> Phase {
        match self {
            Phase::Idle => Phase::Dispatching,
            Phase::Dispatching => Phase::Draining,
            Phase::Draining | Phase::Complete => Phase::Complete,
        }
    }
}

/// Runs every descriptor in `job` exactly once through at most
/// `job.max_concurrency` worker threads and returns the final tally.
///
/// Individual file failures never abort the job: the summary always holds
/// exactly one outcome per descriptor, collected in completion order (which
/// is non-deterministic across runs by design). `max_concurrency = 1`
/// degrades to a fully sequential run that still completes all work.
pub fn run(job: &DownloadJob, progress: &dyn ProgressSink) -> DownloadSummary {
    let mut phase = Phase::Idle;
    let mut summary = DownloadSummary::default();

    let count = job.files.len();
    if count == 0 {
        progress.finish();
        return summary;
    }

    phase = phase.advance();
    let num_workers = job.max_concurrency.max(1).min(count);
    tracing::debug!(?phase, files = count, workers = num_workers, "dispatching job");

    let work: Arc<Mutex<VecDeque<FileDescriptor>>> =
        Arc::new(Mutex::new(job.files.iter().cloned().collect()));
    let (tx, rx) = mpsc::channel();
    let mut handles = Vec::with_capacity(num_workers);
    for _ in 0..num_workers {
        let work = Arc::clone(&work);
        let tx = tx.clone();
        let dest_root = job.dest_root.clone();
        let token = job.auth_token.clone();
        let timeout = job.timeout;
        let verbose = job.verbose;
        handles.push(std::thread::spawn(move || loop {
            let descriptor = match work.lock().unwrap().pop_front() {
                Some(d) => d,
                None => break,
            };
            let outcome = worker::fetch(&descriptor, &dest_root, token.as_deref(), timeout, verbose);
            if tx.send(outcome).is_err() {
                break;
            }
        }));
    }
    drop(tx);

    // All descriptors are queued; from here the coordinator only collects.
    phase = phase.advance();
    tracing::debug!(?phase, "collecting outcomes");
    for _ in 0..count {
        let outcome = rx.recv().expect("worker outcome");
        if let Some(msg) = outcome.message.as_deref() {
            if outcome.success {
                tracing::info!("{}", msg);
            } else {
                tracing::warn!("{}", msg);
            }
        }
        summary.record(outcome);
        // Exactly one tick per outcome, independent of the logging above.
        progress.tick();
    }

    for handle in handles {
        handle
            .join()
            .unwrap_or_else(|e| panic!("download worker panicked: {:?}", e));
    }
    progress.finish();

    phase = phase.advance();
    tracing::debug!(
        ?phase,
        succeeded = summary.succeeded,
        failed = summary.failed,
        "job complete"
    );
    debug_assert_eq!(phase, Phase::Complete);
    debug_assert_eq!(summary.total(), count);
    summary
}
