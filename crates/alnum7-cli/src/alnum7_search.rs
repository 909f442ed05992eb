//! Password recovery CLI
//!
//! Usage: alnum7_search [--table <PATH>] [--hash <HEX> | --hashes-file <PATH>]
//!
//! Without --hash or --hashes-file, SHA3-256 digests are read interactively,
//! one per line. The table path is prompted for when not given.
//!
//! Example:
//!   alnum7_search --table alnum7_t10_fixed.txt
//!   Enter SHA3-256 hash (hex, or 'q' to quit): 3f1c...

use alnum7_rainbow::app::coverage::table_stats;
use alnum7_rainbow::app::searcher::{CrackOutcome, crack_detailed, crack_many, crack_parallel};
use alnum7_rainbow::constants::DEFAULT_CHAIN_LENGTH;
use alnum7_rainbow::{Digest, Reducer, Table};
use anyhow::{Context, Result, bail};
use clap::Parser;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[cfg(feature = "mmap")]
use alnum7_rainbow::infra::table_io::load_table_mmap as open_table;

#[cfg(not(feature = "mmap"))]
use alnum7_rainbow::infra::table_io::load_table as open_table;

/// Recover 7-character alphanumeric passwords from SHA3-256 digests
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Table file (prompted for when omitted)
    #[arg(long)]
    table: Option<PathBuf>,

    /// Chain length the table was built with
    #[arg(short = 't', long, default_value_t = DEFAULT_CHAIN_LENGTH)]
    chain_length: u32,

    /// Reduction strategy the table was built with
    #[arg(long, default_value_t = Reducer::Fixed)]
    reduction: Reducer,

    /// Digest to crack (hex)
    #[arg(long, conflicts_with = "hashes_file")]
    hash: Option<String>,

    /// File of digests to crack, one hex digest per line
    #[arg(long)]
    hashes_file: Option<PathBuf>,

    /// Print table statistics after loading
    #[arg(long)]
    stats: bool,

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

/// Print `prompt` and read one line without its line ending
///
/// Returns `None` at end of input.
fn prompt_line(prompt: &str) -> Result<Option<String>> {
    print!("{}", prompt);
    io::stdout().flush().context("failed to write prompt")?;

    let mut input = String::new();
    let read = io::stdin()
        .read_line(&mut input)
        .context("failed to read input")?;
    if read == 0 {
        return Ok(None);
    }

    Ok(Some(input.trim_end_matches(['\r', '\n']).to_string()))
}

fn load(path: &Path, chain_length: u32, reducer: Reducer) -> Result<Table> {
    println!("Loading table {}...", path.display());
    let started = Instant::now();

    let table = open_table(path, chain_length, reducer)
        .with_context(|| format!("failed to open table {}", path.display()))?;

    println!(
        "Loaded {} chains in {:.3} seconds",
        table.len(),
        started.elapsed().as_secs_f64()
    );
    Ok(table)
}

fn report(hex: &str, outcome: CrackOutcome) {
    match outcome {
        CrackOutcome::Cracked(password) => println!("{} {}", hex, password),
        CrackOutcome::NotFound => println!("{} not cracked", hex),
    }
}

fn crack_one(hex: &str, table: &Table) -> Result<()> {
    let target = Digest::from_hex(hex).with_context(|| format!("invalid digest '{}'", hex))?;
    let started = Instant::now();
    let result = crack_detailed(&target, table);
    tracing::debug!(
        false_alarms = result.false_alarms,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "lookup finished"
    );
    report(&target.to_hex(), result.outcome);
    Ok(())
}

fn crack_file(path: &Path, table: &Table) -> Result<()> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read hashes file {}", path.display()))?;

    let mut targets = Vec::new();
    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match Digest::from_hex(line) {
            Ok(digest) => targets.push(digest),
            Err(e) => eprintln!("line {}: invalid digest '{}': {}", i + 1, line, e),
        }
    }

    let started = Instant::now();
    let outcomes = crack_many(&targets, table);
    for (target, outcome) in targets.iter().zip(&outcomes) {
        report(&target.to_hex(), *outcome);
    }

    let cracked = outcomes.iter().filter(|o| o.is_cracked()).count();
    println!(
        "Cracked {}/{} hashes in {:.3} seconds",
        cracked,
        targets.len(),
        started.elapsed().as_secs_f64()
    );
    Ok(())
}

fn interactive(table: &Table) -> Result<()> {
    loop {
        let Some(input) = prompt_line("\nEnter SHA3-256 hash (hex, or 'q' to quit): ")? else {
            break;
        };
        let input = input.trim();

        if input.eq_ignore_ascii_case("q") || input.eq_ignore_ascii_case("quit") {
            println!("Goodbye!");
            break;
        }
        if input.is_empty() {
            continue;
        }

        let target = match Digest::from_hex(input) {
            Ok(digest) => digest,
            Err(e) => {
                eprintln!("Error: {}. Please try again.", e);
                continue;
            }
        };

        println!("Searching...");
        let started = Instant::now();
        let result = crack_parallel(&target, table);
        let elapsed = started.elapsed();

        match (result.outcome, result.column) {
            (CrackOutcome::Cracked(password), Some(column)) => println!(
                "Cracked: {} (column {}, {} false alarms, {:.3} seconds)",
                password,
                column,
                result.false_alarms,
                elapsed.as_secs_f64()
            ),
            _ => println!(
                "Not cracked ({} false alarms, {:.3} seconds)",
                result.false_alarms,
                elapsed.as_secs_f64()
            ),
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let table_path = match args.table {
        Some(path) => path,
        None => match prompt_line("Table file: ")? {
            Some(line) if !line.trim().is_empty() => PathBuf::from(line.trim()),
            _ => bail!("no table file given"),
        },
    };

    let table = load(&table_path, args.chain_length, args.reduction)?;
    if args.stats {
        println!("{}", table_stats(&table));
    }

    if let Some(hex) = args.hash.as_deref() {
        crack_one(hex, &table)
    } else if let Some(path) = args.hashes_file.as_deref() {
        crack_file(path, &table)
    } else {
        interactive(&table)
    }
}
