//! Concurrent download worker pool gated by a shared completion counter.
//!
//! N workers race to fill the save quota exactly once per slot. There is no
//! separate "done" broadcast: each worker discovers completion when it next
//! consults the counter, drains nothing further, and exits; the pool
//! coordinator awaits every worker before reporting the final stats. A
//! worker already inside a fetch when the quota is met finishes that fetch
//! (wasted work) and discovers completion at its next claim attempt.

mod counter;

pub use counter::{CompletionCounter, SaveOutcome};

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::{debug, info, instrument, warn};

use crate::discovery::ReferenceRecord;
use crate::fetch::HttpClient;
use crate::queue::ReferenceQueue;

/// Minimum allowed worker count.
const MIN_WORKERS: usize = 1;

/// Maximum allowed worker count.
const MAX_WORKERS: usize = 32;

/// Default worker count if not specified.
pub const DEFAULT_WORKERS: usize = 6;

/// Error type for worker pool construction.
#[derive(Debug, thiserror::Error)]
pub enum PoolError {
    /// Invalid worker count provided.
    #[error("invalid worker count {value}: must be between {MIN_WORKERS} and {MAX_WORKERS}")]
    InvalidWorkerCount {
        /// The invalid value that was provided.
        value: usize,
    },
}

/// Statistics from one pipeline run.
///
/// Uses atomic counters for thread-safe updates from concurrent workers.
/// Fetch and write failures are locally recovered (the record is dropped)
/// but still counted so the final summary can surface them.
#[derive(Debug, Default)]
pub struct HarvestStats {
    saved: AtomicUsize,
    fetch_failed: AtomicUsize,
    write_failed: AtomicUsize,
}

impl HarvestStats {
    /// Creates a new stats tracker with zero counts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of files saved.
    #[must_use]
    pub fn saved(&self) -> usize {
        self.saved.load(Ordering::SeqCst)
    }

    /// Returns the number of references dropped on fetch failure.
    #[must_use]
    pub fn fetch_failed(&self) -> usize {
        self.fetch_failed.load(Ordering::SeqCst)
    }

    /// Returns the number of abandoned save attempts (disk errors).
    #[must_use]
    pub fn write_failed(&self) -> usize {
        self.write_failed.load(Ordering::SeqCst)
    }

    fn increment_saved(&self) {
        self.saved.fetch_add(1, Ordering::SeqCst);
    }

    fn increment_fetch_failed(&self) {
        self.fetch_failed.fetch_add(1, Ordering::SeqCst);
    }

    fn increment_write_failed(&self) {
        self.write_failed.fetch_add(1, Ordering::SeqCst);
    }
}

/// Pool of concurrent download workers.
///
/// # Concurrency Model
///
/// - Each worker runs in its own Tokio task and pulls from the shared queue
/// - The quota re-check, index assignment, file write, and counter increment
///   happen as one atomic unit inside [`CompletionCounter::save`]
/// - Workers exit on queue exhaustion or quota completion; the pool awaits
///   all of them (cooperative shutdown, no process abort)
/// - In-flight fetches are never cancelled
#[derive(Debug)]
pub struct WorkerPool {
    workers: usize,
}

impl WorkerPool {
    /// Creates a worker pool with the specified worker count.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidWorkerCount`] if the value is outside the
    /// valid range (1-32).
    pub fn new(workers: usize) -> Result<Self, PoolError> {
        if !(MIN_WORKERS..=MAX_WORKERS).contains(&workers) {
            return Err(PoolError::InvalidWorkerCount { value: workers });
        }
        Ok(Self { workers })
    }

    /// Returns the configured worker count.
    #[must_use]
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Runs the pool until the queue is exhausted or the quota is met.
    ///
    /// Individual fetch and write failures never fail the run; they are
    /// counted in the returned stats.
    #[instrument(skip(self, queue, client, counter), fields(workers = self.workers, output_dir = %output_dir.display()))]
    pub async fn run(
        &self,
        queue: ReferenceQueue,
        client: HttpClient,
        counter: Arc<CompletionCounter>,
        output_dir: &Path,
    ) -> HarvestStats {
        let stats = Arc::new(HarvestStats::new());
        let mut handles = Vec::new();

        info!(quota = counter.quota(), "starting download workers");

        for worker_id in 0..self.workers {
            let queue = queue.clone();
            let client = client.clone();
            let counter = Arc::clone(&counter);
            let stats = Arc::clone(&stats);
            let output_dir = output_dir.to_path_buf();

            handles.push(tokio::spawn(async move {
                worker_loop(worker_id, &queue, &client, &counter, &stats, &output_dir).await;
            }));
        }

        for handle in handles {
            // Ignore JoinError - task panics are logged but don't fail the run
            if let Err(e) = handle.await {
                warn!(error = %e, "download worker panicked");
            }
        }

        info!(
            saved = stats.saved(),
            fetch_failed = stats.fetch_failed(),
            write_failed = stats.write_failed(),
            "worker pool finished"
        );

        // All tasks are done, so we should have sole ownership of the Arc.
        match Arc::try_unwrap(stats) {
            Ok(stats) => stats,
            Err(arc_stats) => {
                // Fallback: rebuild from the atomic values
                let new_stats = HarvestStats::new();
                new_stats.saved.store(arc_stats.saved(), Ordering::SeqCst);
                new_stats
                    .fetch_failed
                    .store(arc_stats.fetch_failed(), Ordering::SeqCst);
                new_stats
                    .write_failed
                    .store(arc_stats.write_failed(), Ordering::SeqCst);
                new_stats
            }
        }
    }
}

/// One worker: pop, fetch, save, until exhaustion or completion.
async fn worker_loop(
    worker_id: usize,
    queue: &ReferenceQueue,
    client: &HttpClient,
    counter: &CompletionCounter,
    stats: &HarvestStats,
    output_dir: &Path,
) {
    loop {
        // Cooperative shutdown check before taking on new work
        if counter.is_complete().await {
            debug!(worker_id, "quota met; worker exiting");
            break;
        }

        let Some(record) = queue.pop().await else {
            debug!(worker_id, "queue exhausted; worker exiting");
            break;
        };

        match process_record(client, counter, stats, output_dir, &record).await {
            WorkerStep::Continue => {}
            WorkerStep::Stop => break,
        }
    }
}

enum WorkerStep {
    Continue,
    Stop,
}

async fn process_record(
    client: &HttpClient,
    counter: &CompletionCounter,
    stats: &HarvestStats,
    output_dir: &Path,
    record: &ReferenceRecord,
) -> WorkerStep {
    let bytes = match client.fetch_bytes(&record.url).await {
        Ok(bytes) => bytes,
        Err(e) => {
            // Best-effort policy: drop the record, no retry
            debug!(url = %record.url, error = %e, "fetch failed; dropping reference");
            stats.increment_fetch_failed();
            return WorkerStep::Continue;
        }
    };

    match counter.save(output_dir, &record.extension, &bytes).await {
        SaveOutcome::Saved { .. } => {
            stats.increment_saved();
            WorkerStep::Continue
        }
        SaveOutcome::QuotaReached => WorkerStep::Stop,
        SaveOutcome::WriteFailed => {
            stats.increment_write_failed();
            WorkerStep::Continue
        }
    }
}
