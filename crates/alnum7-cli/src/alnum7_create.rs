//! Rainbow table creation CLI
//!
//! Usage: alnum7_create [options]
//!
//! Builds a table of `--count` chains starting at `--start` (advanced by
//! `--offset` seeds). Ctrl+C stops after the current batch; rerun with
//! `--resume` to continue from the checkpoint.
//!
//! Example: alnum7_create --count 1000000 --chain-length 500 --reduction positional

use alnum7_rainbow::app::generator::{BuildOptions, build_table_file};
use alnum7_rainbow::constants::{
    DEFAULT_BATCH_SIZE, DEFAULT_CHAIN_LENGTH, DEFAULT_NUM_CHAINS, DEFAULT_START_PASSWORD,
};
use alnum7_rainbow::domain::coverage::estimate_success_probability;
use alnum7_rainbow::infra::table_io::get_table_path;
use alnum7_rainbow::{Password, Reducer, StoragePolicy, TableConfig};
use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

/// Build a rainbow table for 7-character alphanumeric passwords (SHA3-256)
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// First seed password
    #[arg(long, default_value = DEFAULT_START_PASSWORD)]
    start: Password,

    /// Seeds to skip after --start (for building partitions)
    #[arg(long, default_value_t = 0)]
    offset: u64,

    /// Number of chains
    #[arg(short = 'n', long, default_value_t = DEFAULT_NUM_CHAINS)]
    count: u64,

    /// Hash/reduce steps per chain
    #[arg(short = 't', long, default_value_t = DEFAULT_CHAIN_LENGTH)]
    chain_length: u32,

    /// Reduction strategy (fixed or positional)
    #[arg(long, default_value_t = Reducer::Fixed)]
    reduction: Reducer,

    /// Passwords written per chain (full or endpoints)
    #[arg(long, default_value_t = StoragePolicy::Full)]
    storage: StoragePolicy,

    /// Chains computed in parallel between flushes
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
    batch_size: usize,

    /// Continue an interrupted build from its checkpoint
    #[arg(long)]
    resume: bool,

    /// Output table file (default: alnum7_t<length>_<reduction>.txt)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };

    tracing_subscriber::fmt()
        .with_env_filter(level)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let start = args
        .start
        .index()
        .checked_add(args.offset)
        .and_then(|index| Password::from_index(index).ok())
        .with_context(|| {
            format!(
                "offset {} from {} leaves the password space",
                args.offset, args.start
            )
        })?;

    let config = TableConfig {
        start,
        num_chains: args.count,
        chain_length: args.chain_length,
        reducer: args.reduction,
        storage: args.storage,
    };
    config.validate().context("invalid table parameters")?;

    let options = BuildOptions {
        batch_size: args.batch_size,
        resume: args.resume,
    };
    let path = args
        .output
        .unwrap_or_else(|| PathBuf::from(get_table_path(config.chain_length, config.reducer)));

    let stop = Arc::new(AtomicBool::new(false));
    let handler_stop = Arc::clone(&stop);
    ctrlc::set_handler(move || {
        handler_stop.store(true, Ordering::SeqCst);
        eprintln!("\nInterrupt received, stopping after the current batch...");
    })
    .context("failed to install Ctrl+C handler")?;

    println!(
        "Generating {} chains of length {} from {} ({} reduction)...",
        config.num_chains, config.chain_length, config.start, config.reducer
    );
    println!("Table file: {}", path.display());
    println!("Press Ctrl+C to stop; rerun with --resume to continue.");

    let started = Instant::now();
    let progress_callback = |current: u64, total: u64| {
        let progress = if total > 0 {
            (current as f64 / total as f64) * 100.0
        } else {
            100.0
        };
        print!(
            "\r[Generation] Progress: {:.2}% ({}/{})",
            progress, current, total
        );
        let _ = io::stdout().flush();
    };

    let summary = build_table_file(&path, &config, &options, &stop, progress_callback)
        .with_context(|| format!("failed to build table {}", path.display()))?;
    println!();

    let elapsed = started.elapsed();
    println!(
        "Wrote {} chains ({} resumed) in {:.2} seconds",
        summary.chains_written,
        summary.resumed_chains,
        elapsed.as_secs_f64()
    );
    println!(
        "File size: {:.2} MB",
        summary.bytes_written as f64 / (1024.0 * 1024.0)
    );

    if summary.completed {
        let estimate =
            estimate_success_probability(config.reducer, summary.chains_written, config.chain_length);
        println!("Estimated success rate: {:.4e}", estimate);
        println!("The table is ready for searching with alnum7_search.");
    } else {
        println!("Build interrupted. Run again with --resume to continue.");
    }

    Ok(())
}
