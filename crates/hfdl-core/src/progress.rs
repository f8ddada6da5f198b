//! Progress reporting as an injected capability.
//!
//! The coordinator ticks the sink exactly once per completed outcome,
//! success or failure, with no conditionals in the aggregation loop. Callers
//! that do not want reporting pass [`NoopProgress`].

/// Sink for per-file completion ticks.
pub trait ProgressSink: Send + Sync {
    /// Called once per completed download outcome.
    fn tick(&self);

    /// Called once after the last outcome has been collected.
    fn finish(&self) {}
}

/// Default sink: does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopProgress;

impl ProgressSink for NoopProgress {
    fn tick(&self) {}
}

#[cfg(test)]
pub(crate) mod testing {
    use super::ProgressSink;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts ticks; used to assert the once-per-outcome contract.
    #[derive(Debug, Default)]
    pub struct CountingSink {
        ticks: AtomicUsize,
        finishes: AtomicUsize,
    }

    impl CountingSink {
        pub fn ticks(&self) -> usize {
            self.ticks.load(Ordering::SeqCst)
        }

        pub fn finishes(&self) -> usize {
            self.finishes.load(Ordering::SeqCst)
        }
    }

    impl ProgressSink for CountingSink {
        fn tick(&self) {
            self.ticks.fetch_add(1, Ordering::SeqCst);
        }

        fn finish(&self) {
            self.finishes.fetch_add(1, Ordering::SeqCst);
        }
    }
}
