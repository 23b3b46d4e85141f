//! Runtime configuration for the vanity address miner.

use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::candidate::{SaltSampling, SearchJob};
use crate::crypto::{self, Address};
use crate::matcher::Pattern;
use crate::search::SearchConfig;

/// Canonical deterministic-deployment proxy, the usual CREATE2 factory.
pub const DEFAULT_FACTORY: &str = "0x4e59b44847b379578588920ca78fbf26c0b4956c";

/// Vanity Deployment-Address Miner
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Search CREATE deployment addresses (deployer transaction at a nonce)
    Create(CreateArgs),
    /// Search CREATE2 deployment addresses (factory + salt + init code hash)
    Create2(Create2Args),
    /// Compute the init code hash for CREATE2 (one-shot, no search)
    Hash(HashArgs),
}

/// The desired address pattern.
#[derive(Args, Debug, Clone)]
pub struct PatternArgs {
    /// Leading hex characters of the address (0x prefix optional)
    #[arg(short, long)]
    pub prefix: Option<String>,

    /// Trailing hex characters of the address
    #[arg(short, long)]
    pub suffix: Option<String>,

    /// Match against the checksummed form exactly
    #[arg(short, long, default_value = "false")]
    pub case_sensitive: bool,
}

/// Worker count and search limits.
#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    /// Number of worker threads (default: number of CPU cores)
    #[arg(short = 'w', long)]
    pub workers: Option<usize>,

    /// Give up after this many attempts without a match
    #[arg(long)]
    pub max_attempts: Option<u64>,

    /// Give up after this many seconds without a match
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Progress report interval in seconds
    #[arg(short = 'r', long, default_value = "5")]
    pub report_interval: u64,
}

#[derive(Args, Debug, Clone)]
pub struct CreateArgs {
    #[command(flatten)]
    pub pattern: PatternArgs,

    #[command(flatten)]
    pub search: SearchArgs,

    /// Deployer address to sweep nonces for. The found address is only real
    /// if the nonce matches the deployer's transaction count at deployment
    /// time; nothing here checks chain history. Without this flag, fresh
    /// deployer keys are minted instead and the nonce stays fixed.
    #[arg(short, long)]
    pub deployer: Option<Address>,

    /// First nonce to try (with --deployer)
    #[arg(long, default_value = "0")]
    pub start_nonce: u64,

    /// Exclusive upper bound on the nonce sweep (with --deployer)
    #[arg(long, default_value = "10000")]
    pub max_nonce: u64,

    /// Fixed nonce for minted deployer keys (without --deployer)
    #[arg(short, long, default_value = "0", conflicts_with = "deployer")]
    pub nonce: u64,
}

#[derive(Args, Debug, Clone)]
pub struct Create2Args {
    #[command(flatten)]
    pub pattern: PatternArgs,

    #[command(flatten)]
    pub search: SearchArgs,

    /// CREATE2 factory address (20 bytes, hex with or without 0x)
    #[arg(short, long, default_value = DEFAULT_FACTORY)]
    pub factory: Address,

    /// keccak256(initCode || constructorArgs) — 32 bytes hex
    #[arg(long, conflicts_with_all = ["init_code", "constructor_args"])]
    pub init_code_hash: Option<String>,

    /// Raw init code to hash (hex)
    #[arg(long)]
    pub init_code: Option<String>,

    /// ABI-encoded constructor arguments appended to the init code (hex)
    #[arg(long, requires = "init_code")]
    pub constructor_args: Option<String>,

    /// Enumerate salts deterministically (worker-strided) instead of sampling
    /// them at random
    #[arg(long, default_value = "false")]
    pub strided: bool,
}

#[derive(Args, Debug, Clone)]
pub struct HashArgs {
    /// Raw init code (hex)
    #[arg(long)]
    pub init_code: String,

    /// ABI-encoded constructor arguments appended to the init code (hex)
    #[arg(long)]
    pub constructor_args: Option<String>,
}

impl PatternArgs {
    /// Validates and compiles the pattern.
    pub fn to_pattern(&self) -> Result<Pattern, ConfigError> {
        let prefix = self
            .prefix
            .as_deref()
            .map(|p| p.strip_prefix("0x").unwrap_or(p).to_string());

        let mut total_len = 0;
        for (label, component) in [("Prefix", prefix.as_deref()), ("Suffix", self.suffix.as_deref())]
        {
            let Some(component) = component else { continue };
            if component.is_empty() {
                return Err(ConfigError::InvalidPattern(format!(
                    "{} cannot be empty",
                    label
                )));
            }
            if !component.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(ConfigError::InvalidPattern(format!(
                    "{} must contain only hex characters (0-9, a-f)",
                    label
                )));
            }
            total_len += component.len();
        }
        if total_len > 40 {
            return Err(ConfigError::InvalidPattern(
                "Combined prefix + suffix cannot be longer than 40 characters (full address)".into(),
            ));
        }

        Ok(Pattern::new(prefix, self.suffix.clone(), self.case_sensitive))
    }
}

impl SearchArgs {
    /// Returns the number of workers, defaulting to CPU count.
    pub fn worker_count(&self) -> usize {
        self.workers.unwrap_or_else(num_cpus::get)
    }

    /// Validates and converts into search limits.
    pub fn to_search_config(&self) -> Result<SearchConfig, ConfigError> {
        if self.workers == Some(0) {
            return Err(ConfigError::InvalidConfig(
                "at least one worker is required".into(),
            ));
        }
        Ok(SearchConfig {
            workers: self.worker_count(),
            max_attempts: self.max_attempts,
            timeout: self.timeout.map(Duration::from_secs),
            report_interval: Duration::from_secs(self.report_interval.max(1)),
        })
    }
}

impl CreateArgs {
    /// Validates and converts into a search job.
    pub fn to_job(&self) -> Result<SearchJob, ConfigError> {
        match self.deployer {
            Some(deployer) => {
                if self.start_nonce >= self.max_nonce {
                    return Err(ConfigError::InvalidConfig(format!(
                        "empty nonce range [{}, {})",
                        self.start_nonce, self.max_nonce
                    )));
                }
                Ok(SearchJob::NonceRange {
                    deployer,
                    start: self.start_nonce,
                    end: self.max_nonce,
                })
            }
            None => Ok(SearchJob::DeployerKey { nonce: self.nonce }),
        }
    }
}

impl Create2Args {
    /// Validates and converts into a search job.
    pub fn to_job(&self) -> Result<SearchJob, ConfigError> {
        let init_code_hash = match (&self.init_code_hash, &self.init_code) {
            (Some(hash), None) => parse_hash32("init_code_hash", hash)?,
            (None, Some(code)) => {
                let code = parse_hex_bytes("init code", code)?;
                let args = match &self.constructor_args {
                    Some(args) => parse_hex_bytes("constructor args", args)?,
                    None => Vec::new(),
                };
                crypto::init_code_hash(&code, &args)
            }
            (None, None) => {
                return Err(ConfigError::InvalidConfig(
                    "either --init-code-hash or --init-code is required".into(),
                ))
            }
            (Some(_), Some(_)) => {
                return Err(ConfigError::InvalidConfig(
                    "use either --init-code-hash or --init-code, not both".into(),
                ))
            }
        };

        let sampling = if self.strided {
            SaltSampling::Strided { base: [0u8; 32] }
        } else {
            SaltSampling::Random
        };

        Ok(SearchJob::Salt {
            factory: self.factory,
            init_code_hash,
            sampling,
        })
    }
}

impl HashArgs {
    /// Computes the init code hash.
    pub fn compute(&self) -> Result<[u8; 32], ConfigError> {
        let code = parse_hex_bytes("init code", &self.init_code)?;
        let args = match &self.constructor_args {
            Some(args) => parse_hex_bytes("constructor args", args)?,
            None => Vec::new(),
        };
        Ok(crypto::init_code_hash(&code, &args))
    }
}

fn parse_hash32(label: &str, value: &str) -> Result<[u8; 32], ConfigError> {
    let stripped = value.strip_prefix("0x").unwrap_or(value);
    if stripped.len() != 64 || !stripped.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ConfigError::InvalidConfig(format!(
            "{} must be 32 bytes (64 hex chars)",
            label
        )));
    }
    let bytes =
        hex::decode(stripped).map_err(|e| ConfigError::InvalidConfig(format!("{}: {}", label, e)))?;
    let mut out = [0u8; 32];
    out.copy_from_slice(&bytes);
    Ok(out)
}

fn parse_hex_bytes(label: &str, value: &str) -> Result<Vec<u8>, ConfigError> {
    let stripped = value.strip_prefix("0x").unwrap_or(value);
    hex::decode(stripped).map_err(|e| ConfigError::InvalidConfig(format!("{}: {}", label, e)))
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}
