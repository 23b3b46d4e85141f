//! Vanity Deployment-Address Miner CLI
//!
//! Usage:
//!   deploy_vanity create2 -p dead                      # CREATE2 salt search
//!   deploy_vanity create --deployer 0x... -p beef      # nonce sweep
//!   deploy_vanity create -p cafe                       # mint deployer keys
//!   deploy_vanity hash --init-code 0x6001...           # init code hash

use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::Parser;

use deploy_vanity::config::Command;
use deploy_vanity::{
    search, Cli, ConfigError, DerivationInput, Pattern, Progress, SaltSampling, SearchConfig,
    SearchJob, SearchOutcome, SearchResult,
};

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Configuration error: {}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), ConfigError> {
    match cli.command {
        Command::Create(args) => {
            let pattern = args.pattern.to_pattern()?;
            let config = args.search.to_search_config()?;
            let job = args.to_job()?;
            run_search(job, pattern, config)
        }
        Command::Create2(args) => {
            let pattern = args.pattern.to_pattern()?;
            let config = args.search.to_search_config()?;
            let job = args.to_job()?;
            run_search(job, pattern, config)
        }
        Command::Hash(args) => {
            println!("0x{}", hex::encode(args.compute()?));
            Ok(())
        }
    }
}

fn run_search(job: SearchJob, pattern: Pattern, config: SearchConfig) -> Result<(), ConfigError> {
    println!("Vanity Deployment-Address Miner");
    println!("================================");
    println!("Pattern:    {}", describe_pattern(&pattern));
    println!("Difficulty: {}", pattern.difficulty_description());
    println!("Mode:       {}", describe_job(&job));
    println!("Workers:    {}", config.workers);
    println!();

    let cancel = Arc::new(AtomicBool::new(false));
    ctrlc_handler(cancel.clone());

    println!("Searching... (Press Ctrl+C to stop)\n");

    let outcome = search(&job, &pattern, &config, cancel, print_progress)?;

    match outcome {
        SearchOutcome::Found(result) => print_result(&result),
        SearchOutcome::Exhausted { attempts, elapsed } => {
            println!(
                "Search space exhausted after {} candidates in {:.2}s, no match.",
                format_number(attempts),
                elapsed.as_secs_f64()
            );
        }
        SearchOutcome::Cancelled { attempts, elapsed } => {
            println!(
                "Stopped after {} candidates in {:.2}s, no match.",
                format_number(attempts),
                elapsed.as_secs_f64()
            );
        }
    }

    Ok(())
}

fn describe_pattern(pattern: &Pattern) -> String {
    let text = match (pattern.prefix(), pattern.suffix()) {
        (Some(p), Some(s)) => format!("{} ... {}", p, s),
        (Some(p), None) => format!("{} ...", p),
        (None, Some(s)) => format!("... {}", s),
        (None, None) => "(any address)".into(),
    };
    let case = if pattern.case_sensitive() {
        "checksum-exact"
    } else {
        "case-insensitive"
    };
    format!("{} ({})", text, case)
}

fn describe_job(job: &SearchJob) -> String {
    match job {
        SearchJob::NonceRange {
            deployer,
            start,
            end,
        } => format!("CREATE, deployer {}, nonces [{}, {})", deployer, start, end),
        SearchJob::DeployerKey { nonce } => {
            format!("CREATE, fresh deployer keys, nonce {}", nonce)
        }
        SearchJob::Salt {
            factory, sampling, ..
        } => match sampling {
            SaltSampling::Random => format!("CREATE2, factory {}, random salts", factory),
            SaltSampling::Strided { .. } => format!("CREATE2, factory {}, strided salts", factory),
        },
    }
}

fn print_result(result: &SearchResult) {
    println!("=== Match ===");
    println!("Address:     {}", result.address);
    match &result.input {
        DerivationInput::Create { deployer, nonce } => {
            println!("Deployer:    {}", deployer);
            println!("Nonce:       {}", nonce);
        }
        DerivationInput::Create2 { factory, salt, .. } => {
            println!("Factory:     {}", factory);
            println!("Salt:        0x{}", hex::encode(salt));
        }
    }
    if let Some(secret) = &result.secret_key {
        println!("Private Key: 0x{}", hex::encode(secret));
    }
    println!("Worker:      {}", result.worker_id);
    println!("Attempts:    {}", format_number(result.attempts));
    println!("Time:        {:.2}s", result.elapsed.as_secs_f64());
}

fn print_progress(progress: &Progress) {
    println!(
        "[{:>4}s] Tried {} candidates ({}/s)",
        progress.elapsed.as_secs(),
        format_number(progress.attempts),
        format_number(progress.rate as u64)
    );
}

fn format_number(n: u64) -> String {
    if n >= 1_000_000_000 {
        format!("{:.2}B", n as f64 / 1e9)
    } else if n >= 1_000_000 {
        format!("{:.2}M", n as f64 / 1e6)
    } else if n >= 1_000 {
        format!("{:.2}K", n as f64 / 1e3)
    } else {
        n.to_string()
    }
}

fn ctrlc_handler(cancel: Arc<AtomicBool>) {
    ctrlc::set_handler(move || {
        cancel.store(true, Ordering::Relaxed);
    })
    .expect("Error setting Ctrl-C handler");
}
