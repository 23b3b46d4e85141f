//! CPU worker: the derive/match hot loop.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crossbeam_channel::Sender;

use crate::candidate::{Candidate, Partition};
use crate::crypto::Address;
use crate::matcher::Pattern;

use super::SearchResult;

/// Shared counters, updated with relaxed atomics outside the hot path.
#[derive(Debug, Default)]
pub struct WorkerStats {
    /// Candidates derived and tested across all workers
    pub attempts: AtomicU64,
    /// Matches claimed (0 or 1 per search)
    pub matches_found: AtomicU64,
}

impl WorkerStats {
    /// Creates new worker stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total attempts across all workers.
    pub fn total_attempts(&self) -> u64 {
        self.attempts.load(Ordering::Relaxed)
    }

    /// Returns the total matches claimed.
    pub fn total_matches(&self) -> u64 {
        self.matches_found.load(Ordering::Relaxed)
    }
}

/// A CPU worker that derives and tests candidates from its own partition.
pub struct CpuWorker {
    /// Worker ID
    id: usize,
    /// The pattern to match against
    pattern: Pattern,
    /// This worker's slice of the candidate space
    partition: Partition,
    /// This worker's share of the global attempt budget
    quota: Option<u64>,
    /// Channel to deliver the claimed result
    result_tx: Sender<SearchResult>,
    /// Shared first-writer-wins claim
    claim: Arc<AtomicBool>,
    /// Shared stop flag
    stop_flag: Arc<AtomicBool>,
    /// Shared counters
    stats: Arc<WorkerStats>,
    /// Search start time, for the result's elapsed field
    started: Instant,
}

impl CpuWorker {
    pub fn new(
        id: usize,
        pattern: Pattern,
        partition: Partition,
        quota: Option<u64>,
        result_tx: Sender<SearchResult>,
        claim: Arc<AtomicBool>,
        stop_flag: Arc<AtomicBool>,
        stats: Arc<WorkerStats>,
        started: Instant,
    ) -> Self {
        Self {
            id,
            pattern,
            partition,
            quota,
            result_tx,
            claim,
            stop_flag,
            stats,
            started,
        }
    }

    /// Runs the worker loop until a match is claimed, the partition or quota
    /// runs out, or the stop flag is observed at a batch boundary.
    ///
    /// Attempt counts are kept in a local and flushed per batch and on every
    /// exit path, so exhaustion totals are exact.
    pub fn run(mut self) {
        const BATCH_SIZE: u64 = 1000;

        let mut tried = 0u64;
        let mut unflushed = 0u64;

        'outer: while !self.stop_flag.load(Ordering::Relaxed) {
            for _ in 0..BATCH_SIZE {
                if self.quota.is_some_and(|q| tried == q) {
                    break 'outer;
                }
                let Some(candidate) = self.partition.next() else {
                    break 'outer;
                };
                tried += 1;
                unflushed += 1;

                let address = candidate.input.derive();
                if self.pattern.matches(&address).is_match() {
                    self.stats.attempts.fetch_add(unflushed, Ordering::Relaxed);
                    self.publish(candidate, address);
                    return;
                }
            }
            self.stats.attempts.fetch_add(unflushed, Ordering::Relaxed);
            unflushed = 0;
        }

        self.stats.attempts.fetch_add(unflushed, Ordering::Relaxed);
    }

    /// First claim wins; a worker that loses the race drops its find and
    /// exits, the winner publishes and raises the stop flag.
    fn publish(&self, candidate: Candidate, address: Address) {
        if self
            .claim
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            self.stats.matches_found.fetch_add(1, Ordering::Relaxed);
            let result = SearchResult {
                input: candidate.input,
                secret_key: candidate.secret_key,
                address,
                attempts: self.stats.total_attempts(),
                elapsed: self.started.elapsed(),
                worker_id: self.id,
            };
            let _ = self.result_tx.send(result);
            self.stop_flag.store(true, Ordering::Release);
        }
    }

    /// Returns the worker ID.
    pub fn id(&self) -> usize {
        self.id
    }
}
