//! Blocking search coordinator.
//!
//! Validates the configuration, spawns the worker pool, and waits until one
//! worker claims a match, the candidate space or attempt budget runs out, or
//! a timeout / caller cancellation fires. Progress goes to an observer
//! callback at a fixed interval; correctness never depends on it.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossbeam_channel::RecvTimeoutError;

use crate::candidate::SearchJob;
use crate::config::ConfigError;
use crate::matcher::Pattern;
use crate::worker::{SearchResult, WorkerPool};

/// Limits and cadence for one search call.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Number of worker threads
    pub workers: usize,
    /// Stop after this many attempts without a match
    pub max_attempts: Option<u64>,
    /// Stop after this much wall-clock time without a match
    pub timeout: Option<Duration>,
    /// Interval between progress reports to the observer
    pub report_interval: Duration,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            workers: num_cpus::get(),
            max_attempts: None,
            timeout: None,
            report_interval: Duration::from_secs(5),
        }
    }
}

/// A periodic progress snapshot, advisory only.
#[derive(Debug, Clone, Copy)]
pub struct Progress {
    /// Aggregate attempts across all workers
    pub attempts: u64,
    /// Time since the search started
    pub elapsed: Duration,
    /// Attempts per second
    pub rate: f64,
}

/// How a search ended. Exhaustion and cancellation are ordinary outcomes,
/// not errors.
#[derive(Debug, Clone)]
pub enum SearchOutcome {
    /// A worker claimed a match.
    Found(SearchResult),
    /// The bounded candidate space or attempt budget was fully examined
    /// without a match. Attempt counts are exact.
    Exhausted { attempts: u64, elapsed: Duration },
    /// The timeout elapsed or the caller raised the cancellation flag before
    /// a match.
    Cancelled { attempts: u64, elapsed: Duration },
}

/// Runs a blocking search for an address matching `pattern` over the
/// candidate axis named by `job`.
///
/// `cancel` is the shared cancellation flag; setting it (from a signal
/// handler or another thread) stops the search at the workers' next batch
/// boundary. Exactly one result is ever produced, and it is guaranteed to
/// satisfy `pattern`.
pub fn search(
    job: &SearchJob,
    pattern: &Pattern,
    config: &SearchConfig,
    cancel: Arc<AtomicBool>,
    mut observer: impl FnMut(&Progress),
) -> Result<SearchOutcome, ConfigError> {
    validate(job, pattern, config)?;

    let mut pool = WorkerPool::spawn(job, pattern, config, cancel);
    let deadline = config.timeout.map(|t| Instant::now() + t);

    loop {
        let wait = match deadline {
            Some(deadline) => deadline
                .saturating_duration_since(Instant::now())
                .min(config.report_interval),
            None => config.report_interval,
        };

        match pool.recv_timeout(wait) {
            Ok(result) => {
                pool.shutdown();
                return Ok(SearchOutcome::Found(result));
            }
            Err(RecvTimeoutError::Disconnected) => {
                // Every worker exited without claiming: either the space was
                // drained or they all observed an external cancellation.
                let cancelled = pool.is_stopped();
                pool.shutdown();
                let attempts = pool.total_attempts();
                let elapsed = pool.elapsed();
                return Ok(if cancelled {
                    SearchOutcome::Cancelled { attempts, elapsed }
                } else {
                    SearchOutcome::Exhausted { attempts, elapsed }
                });
            }
            Err(RecvTimeoutError::Timeout) => {
                if deadline.is_some_and(|d| Instant::now() >= d) {
                    // A worker may claim between this tick and observing the
                    // flag; shutdown drains that last-moment winner.
                    return Ok(match pool.shutdown() {
                        Some(result) => SearchOutcome::Found(result),
                        None => SearchOutcome::Cancelled {
                            attempts: pool.total_attempts(),
                            elapsed: pool.elapsed(),
                        },
                    });
                }
                observer(&Progress {
                    attempts: pool.total_attempts(),
                    elapsed: pool.elapsed(),
                    rate: pool.attempts_per_second(),
                });
            }
        }
    }
}

/// Fails fast, before any worker spawns.
fn validate(job: &SearchJob, pattern: &Pattern, config: &SearchConfig) -> Result<(), ConfigError> {
    if config.workers == 0 {
        return Err(ConfigError::InvalidConfig(
            "at least one worker is required".into(),
        ));
    }
    if pattern.is_unconstrained() && config.max_attempts == Some(0) {
        return Err(ConfigError::InvalidConfig(
            "an unconstrained pattern with a zero attempt budget can never produce a result".into(),
        ));
    }
    if let SearchJob::NonceRange { start, end, .. } = job {
        if start >= end {
            return Err(ConfigError::InvalidConfig(format!(
                "empty nonce range [{}, {})",
                start, end
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::{DerivationInput, SaltSampling};
    use crate::crypto::{Address, Keypair};

    const DEPLOYER: &str = "0x6ac7ea33f8831ea9dcc53393aaa88b25a785dbf0";
    // Contract address for DEPLOYER at nonce 2 (ethereum.stackexchange.com/questions/760)
    const NONCE_TWO_ADDRESS: &str = "f778b86fa74e846c4f0a1fbd1335fe81c00a0c91";

    fn deployer() -> Address {
        DEPLOYER.parse().unwrap()
    }

    fn config(workers: usize) -> SearchConfig {
        SearchConfig {
            workers,
            max_attempts: None,
            timeout: None,
            report_interval: Duration::from_secs(60),
        }
    }

    fn run(job: &SearchJob, pattern: &Pattern, config: &SearchConfig) -> SearchOutcome {
        search(job, pattern, config, Arc::new(AtomicBool::new(false)), |_| {}).unwrap()
    }

    #[test]
    fn test_finds_known_nonce_in_range() {
        let job = SearchJob::NonceRange {
            deployer: deployer(),
            start: 0,
            end: 10,
        };
        // Full 40-char prefix: only nonce 2 can satisfy it.
        let pattern = Pattern::new(Some(NONCE_TWO_ADDRESS.into()), None, false);

        for workers in [1, 2, 8] {
            match run(&job, &pattern, &config(workers)) {
                SearchOutcome::Found(result) => {
                    assert_eq!(
                        result.input,
                        DerivationInput::Create {
                            deployer: deployer(),
                            nonce: 2
                        }
                    );
                    assert_eq!(result.address.to_hex(), NONCE_TWO_ADDRESS);
                    assert!(pattern.matches(&result.address).is_match());
                    assert_eq!(result.input.derive(), result.address);
                    assert!(result.attempts >= 1);
                }
                other => panic!("expected a match with {} workers, got {:?}", workers, other),
            }
        }
    }

    #[test]
    fn test_bounded_nonce_range_exhausts_exactly() {
        let job = SearchJob::NonceRange {
            deployer: deployer(),
            start: 0,
            end: 10,
        };
        // The zero address has no known keccak preimage; unsatisfiable.
        let pattern = Pattern::new(Some("0".repeat(40)), None, false);

        for workers in [1, 2, 8] {
            match run(&job, &pattern, &config(workers)) {
                SearchOutcome::Exhausted { attempts, .. } => assert_eq!(attempts, 10),
                other => panic!("expected exhaustion with {} workers, got {:?}", workers, other),
            }
        }
    }

    #[test]
    fn test_strided_salt_search_revalidates() {
        let job = SearchJob::Salt {
            factory: deployer(),
            init_code_hash: crate::crypto::keccak256(&[]),
            sampling: SaltSampling::Strided { base: [0u8; 32] },
        };
        let pattern = Pattern::new(Some("ab".into()), None, false);

        for workers in [1, 2, 8] {
            match run(&job, &pattern, &config(workers)) {
                SearchOutcome::Found(result) => {
                    assert!(pattern.matches(&result.address).is_match());
                    assert_eq!(result.input.derive(), result.address);
                }
                other => panic!("expected a match with {} workers, got {:?}", workers, other),
            }
        }
    }

    #[test]
    fn test_attempt_budget_exhausts_exactly() {
        let job = SearchJob::Salt {
            factory: deployer(),
            init_code_hash: [0u8; 32],
            sampling: SaltSampling::Random,
        };
        let pattern = Pattern::new(Some("f".repeat(40)), None, false);
        let config = SearchConfig {
            max_attempts: Some(5000),
            ..config(4)
        };

        match run(&job, &pattern, &config) {
            SearchOutcome::Exhausted { attempts, .. } => assert_eq!(attempts, 5000),
            other => panic!("expected budget exhaustion, got {:?}", other),
        }
    }

    #[test]
    fn test_timeout_cancels_unbounded_search() {
        let job = SearchJob::Salt {
            factory: deployer(),
            init_code_hash: [0u8; 32],
            sampling: SaltSampling::Random,
        };
        let pattern = Pattern::new(Some("f".repeat(40)), None, false);
        let config = SearchConfig {
            timeout: Some(Duration::from_millis(200)),
            ..config(2)
        };

        let started = Instant::now();
        match run(&job, &pattern, &config) {
            SearchOutcome::Cancelled { attempts, .. } => assert!(attempts > 0),
            other => panic!("expected cancellation, got {:?}", other),
        }
        // Deadline plus one batch of overrun, with generous CI slack.
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_pre_raised_cancellation_stops_before_work() {
        let job = SearchJob::Salt {
            factory: deployer(),
            init_code_hash: [0u8; 32],
            sampling: SaltSampling::Random,
        };
        let pattern = Pattern::new(Some("f".repeat(40)), None, false);
        let cancel = Arc::new(AtomicBool::new(true));

        match search(&job, &pattern, &config(2), cancel, |_| {}).unwrap() {
            SearchOutcome::Cancelled { attempts, .. } => {
                // At most one batch per worker slips through.
                assert!(attempts <= 2000);
            }
            other => panic!("expected cancellation, got {:?}", other),
        }
    }

    #[test]
    fn test_minted_deployer_key_reproduces_result() {
        let job = SearchJob::DeployerKey { nonce: 0 };
        // Unconstrained: the first candidate wins.
        let pattern = Pattern::new(None, None, false);

        match run(&job, &pattern, &config(2)) {
            SearchOutcome::Found(result) => {
                let secret = result.secret_key.expect("deployer-key search reports the secret");
                let keypair = Keypair::from_secret_key(secret);
                match result.input {
                    DerivationInput::Create { deployer, nonce } => {
                        assert_eq!(deployer, *keypair.address());
                        assert_eq!(nonce, 0);
                    }
                    other => panic!("expected a CREATE input, got {:?}", other),
                }
                assert_eq!(result.input.derive(), result.address);
            }
            other => panic!("expected a match, got {:?}", other),
        }
    }

    #[test]
    fn test_checksum_sensitive_search() {
        let job = SearchJob::Salt {
            factory: deployer(),
            init_code_hash: [0u8; 32],
            sampling: SaltSampling::Random,
        };
        let pattern = Pattern::new(Some("A".into()), None, true);

        match run(&job, &pattern, &config(2)) {
            SearchOutcome::Found(result) => {
                let checksum = result.address.to_checksum();
                assert!(checksum[2..].starts_with('A'));
            }
            other => panic!("expected a match, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_zero_workers() {
        let job = SearchJob::DeployerKey { nonce: 0 };
        let pattern = Pattern::new(Some("a".into()), None, false);
        let result = search(
            &job,
            &pattern,
            &config(0),
            Arc::new(AtomicBool::new(false)),
            |_| {},
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_unconstrained_pattern_with_zero_budget() {
        let job = SearchJob::DeployerKey { nonce: 0 };
        let pattern = Pattern::new(None, None, false);
        let config = SearchConfig {
            max_attempts: Some(0),
            ..config(1)
        };
        let result = search(&job, &pattern, &config, Arc::new(AtomicBool::new(false)), |_| {});
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_empty_nonce_range() {
        let job = SearchJob::NonceRange {
            deployer: deployer(),
            start: 5,
            end: 5,
        };
        let pattern = Pattern::new(Some("a".into()), None, false);
        let result = search(&job, &pattern, &config(1), Arc::new(AtomicBool::new(false)), |_| {});
        assert!(result.is_err());
    }
}
