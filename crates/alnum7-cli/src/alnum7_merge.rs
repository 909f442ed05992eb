//! Table merge CLI
//!
//! Usage: alnum7_merge <INPUTS>... --output <PATH> [--chain-length <N>]
//!
//! Concatenates partition tables built from disjoint seed ranges with the same
//! parameters. Every input is validated before the output is written.
//!
//! Example:
//!   alnum7_create --count 500000 --output part0.txt
//!   alnum7_create --count 500000 --offset 500000 --output part1.txt
//!   alnum7_merge part0.txt part1.txt --output table.txt

use alnum7_rainbow::constants::DEFAULT_CHAIN_LENGTH;
use alnum7_rainbow::infra::table_merge::merge_tables;
use anyhow::{Context, Result};
use clap::Parser;
use std::io;
use std::path::PathBuf;
use std::time::Instant;

/// Merge partition tables into one table file
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Partition tables, in seed order
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Merged table file
    #[arg(short, long)]
    output: PathBuf,

    /// Chain length of every input
    #[arg(short = 't', long, default_value_t = DEFAULT_CHAIN_LENGTH)]
    chain_length: u32,

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

    println!("Merging {} tables into {}...", args.inputs.len(), args.output.display());
    let started = Instant::now();

    let summary = merge_tables(&args.inputs, &args.output, args.chain_length)
        .with_context(|| format!("failed to merge into {}", args.output.display()))?;

    println!(
        "Merged {} chains from {} tables in {:.2} seconds",
        summary.chains,
        summary.inputs,
        started.elapsed().as_secs_f64()
    );
    if summary.dropped_lines > 0 {
        println!(
            "Dropped {} lines of unterminated chains",
            summary.dropped_lines
        );
    }

    Ok(())
}
