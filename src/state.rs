use std::time::{Duration, Instant};

use tokio::sync::Mutex;

use crate::types::{PortResult, ScanSummary};

/// Shared accumulator for one scan run. Every completing probe folds its
/// result in here; the progress estimator and the final report only ever
/// read it.
#[derive(Debug)]
pub struct ScanState {
    total: u64,
    started: Instant,
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    open: Vec<PortResult>,
    finished: u64,
    since_report: u64,
}

impl ScanState {
    pub fn new(total: u64) -> Self {
        Self {
            total,
            started: Instant::now(),
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Fold one completed probe into the shared state. The open-list append
    /// and both counter increments happen under a single lock, so concurrent
    /// completions cannot tear the update.
    pub async fn record(&self, result: &PortResult) {
        let mut inner = self.inner.lock().await;
        if result.is_open() {
            inner.open.push(result.clone());
        }
        inner.finished += 1;
        inner.since_report += 1;
    }

    /// Consume one report batch if enough completions have accumulated.
    ///
    /// When the since-report counter has reached `threshold`, exactly
    /// `threshold` is subtracted from it (surplus counts toward the next
    /// batch) and `true` is returned. Callers that record first and then
    /// call this see `true` exactly once per `threshold` completions, no
    /// matter how the completions interleave.
    pub async fn take_batch(&self, threshold: u64) -> bool {
        let mut inner = self.inner.lock().await;
        if inner.since_report >= threshold {
            inner.since_report -= threshold;
            true
        } else {
            false
        }
    }

    /// Finished count and expected total, for progress estimation.
    pub async fn counts(&self) -> (u64, u64) {
        let inner = self.inner.lock().await;
        (inner.finished, self.total)
    }

    /// Wall time since the scan started.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Final snapshot: counters as of now, open ports sorted ascending.
    pub async fn snapshot(&self) -> ScanSummary {
        let inner = self.inner.lock().await;
        let mut open = inner.open.clone();
        open.sort_unstable_by_key(|r| r.port);
        ScanSummary {
            total: self.total,
            finished: inner.finished,
            open,
        }
    }
}
