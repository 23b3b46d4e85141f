//! # deploy_vanity
//!
//! Vanity deployment-address miner for EVM chains.
//!
//! Searches for CREATE or CREATE2 deployment addresses whose hex form matches
//! a chosen prefix/suffix, by brute-force variation of the free derivation
//! input (nonce, deployer key, or salt) across a pool of worker threads.
//!
//! ## Architecture
//!
//! - `crypto`: Keccak-256, address derivation, checksum encoding, keypairs
//! - `matcher`: prefix/suffix pattern matching
//! - `candidate`: derivation inputs and per-worker candidate streams
//! - `worker`: worker threads and pool management
//! - `search`: blocking search coordinator
//! - `config`: runtime configuration

pub mod candidate;
pub mod config;
pub mod crypto;
pub mod matcher;
pub mod search;
pub mod worker;

pub use candidate::{Candidate, DerivationInput, SaltSampling, SearchJob};
pub use config::{Cli, ConfigError};
pub use crypto::{Address, Keypair};
pub use matcher::{MatchResult, Pattern};
pub use search::{search, Progress, SearchConfig, SearchOutcome};
pub use worker::{SearchResult, WorkerPool};
