//! Worker pool management.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError};

use crate::candidate::{DerivationInput, Partition, SearchJob};
use crate::crypto::Address;
use crate::matcher::Pattern;
use crate::search::SearchConfig;

use super::cpu::{CpuWorker, WorkerStats};

/// The single winning candidate of a search.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Derivation input that produced the matching address
    pub input: DerivationInput,
    /// Secret key behind the deployer, when the search minted deployer keys
    pub secret_key: Option<[u8; 32]>,
    /// The matching deployment address
    pub address: Address,
    /// Aggregate attempts across all workers when the match was claimed
    pub attempts: u64,
    /// Time from search start to the claim
    pub elapsed: Duration,
    /// The ID of the worker that found this result
    pub worker_id: usize,
}

/// Manages a pool of workers searching disjoint candidate partitions.
pub struct WorkerPool {
    /// Number of workers
    num_workers: usize,
    /// Worker thread handles (Option to allow taking during join)
    handles: Option<Vec<JoinHandle<()>>>,
    /// Channel receiver for the claimed result
    result_rx: Receiver<SearchResult>,
    /// Shared stop flag
    stop_flag: Arc<AtomicBool>,
    /// Shared statistics
    stats: Arc<WorkerStats>,
    /// Start time
    start_time: Instant,
}

impl WorkerPool {
    /// Spawns `config.workers` workers over disjoint partitions of `job`.
    ///
    /// `stop_flag` is shared with the caller so external cancellation (signal
    /// handlers, timeouts) uses the same write-once flag the workers poll.
    pub fn spawn(
        job: &SearchJob,
        pattern: &Pattern,
        config: &SearchConfig,
        stop_flag: Arc<AtomicBool>,
    ) -> Self {
        let num_workers = config.workers;
        let (result_tx, result_rx) = bounded(1);
        let claim = Arc::new(AtomicBool::new(false));
        let stats = Arc::new(WorkerStats::new());
        let start_time = Instant::now();
        let quotas = split_budget(config.max_attempts, num_workers);

        let handles = quotas
            .into_iter()
            .enumerate()
            .map(|(id, quota)| {
                let job = *job;
                let pattern = pattern.clone();
                let result_tx = result_tx.clone();
                let claim = claim.clone();
                let stop_flag = stop_flag.clone();
                let stats = stats.clone();

                thread::Builder::new()
                    .name(format!("vanity-worker-{}", id))
                    .spawn(move || {
                        let partition = Partition::new(&job, id, num_workers);
                        let worker = CpuWorker::new(
                            id, pattern, partition, quota, result_tx, claim, stop_flag,
                            stats, start_time,
                        );
                        worker.run();
                    })
                    .expect("Failed to spawn worker thread")
            })
            .collect();

        // Drop the spare sender so the channel disconnects when every worker
        // exits; a fully-drained candidate space surfaces as disconnect.
        drop(result_tx);

        Self {
            num_workers,
            handles: Some(handles),
            result_rx,
            stop_flag,
            stats,
            start_time,
        }
    }

    /// Waits for the claimed result, a timeout tick, or full worker exit.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<SearchResult, RecvTimeoutError> {
        self.result_rx.recv_timeout(timeout)
    }

    /// Signals all workers to stop.
    pub fn stop(&self) {
        self.stop_flag.store(true, Ordering::Relaxed);
    }

    /// Returns true if the pool has been signaled to stop.
    pub fn is_stopped(&self) -> bool {
        self.stop_flag.load(Ordering::Relaxed)
    }

    /// Stops and joins all workers, then drains a last-moment result claimed
    /// between the final tick and the flag being observed.
    pub fn shutdown(&mut self) -> Option<SearchResult> {
        self.stop();
        if let Some(handles) = self.handles.take() {
            for handle in handles {
                let _ = handle.join();
            }
        }
        self.result_rx.try_recv().ok()
    }

    /// Returns the number of workers.
    pub fn num_workers(&self) -> usize {
        self.num_workers
    }

    /// Returns the total attempts across all workers.
    pub fn total_attempts(&self) -> u64 {
        self.stats.total_attempts()
    }

    /// Returns the total matches claimed.
    pub fn total_matches(&self) -> u64 {
        self.stats.total_matches()
    }

    /// Returns the elapsed time since the pool was created.
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Returns the current search rate (attempts per second).
    pub fn attempts_per_second(&self) -> f64 {
        let elapsed = self.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.total_attempts() as f64 / elapsed
        } else {
            0.0
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.stop();
        if let Some(handles) = self.handles.take() {
            for handle in handles {
                let _ = handle.join();
            }
        }
    }
}

/// Splits an optional global attempt budget into per-worker shares whose sum
/// is exactly the budget.
fn split_budget(total: Option<u64>, workers: usize) -> Vec<Option<u64>> {
    match total {
        None => vec![None; workers],
        Some(total) => {
            let workers_u64 = workers as u64;
            let base = total / workers_u64;
            let remainder = total % workers_u64;
            (0..workers_u64)
                .map(|i| Some(base + u64::from(i < remainder)))
                .collect()
        }
    }
}
