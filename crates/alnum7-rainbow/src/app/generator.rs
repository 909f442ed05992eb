//! Table generation workflow
//!
//! This module provides functions for generating rainbow tables, in memory or
//! streamed to a table file with checkpoints.

use crate::config::TableConfig;
use crate::constants::DEFAULT_BATCH_SIZE;
use crate::domain::chain::{Chain, generate_chain_with, validate_chain_length};
use crate::domain::password::Password;
use crate::domain::reduction::ReductionStrategy;
use crate::domain::seed::SeedRange;
use crate::domain::table::Table;
use crate::error::{Error, Result};
use crate::infra::checkpoint::{Checkpoint, CheckpointManager};
use crate::infra::table_io::TableWriter;
use rayon::prelude::*;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

/// Generate the chains of a seed range, in seed order
pub fn generate_table_range<R>(range: SeedRange, chain_length: u32, reducer: &R) -> Result<Vec<Chain>>
where
    R: ReductionStrategy + ?Sized,
{
    validate_chain_length(chain_length)?;

    range
        .seeds()
        .map(|seed| generate_chain_with(seed, chain_length, reducer))
        .collect()
}

/// Generate the chains of a seed range in parallel
///
/// The result is in seed order and identical to [`generate_table_range`].
pub fn generate_table_range_parallel<R>(
    range: SeedRange,
    chain_length: u32,
    reducer: &R,
) -> Result<Vec<Chain>>
where
    R: ReductionStrategy + ?Sized,
{
    validate_chain_length(chain_length)?;

    let base = range.start_index();
    (0..range.len())
        .into_par_iter()
        .map(|offset| {
            let seed = Password::from_index(base + offset)?;
            generate_chain_with(seed, chain_length, reducer)
        })
        .collect()
}

/// Build an in-memory table for a configuration
pub fn build_table(config: &TableConfig) -> Result<Table> {
    config.validate()?;

    let chains = generate_table_range_parallel(config.seed_range(), config.chain_length, &config.reducer)?;
    let table = Table::from_chains(&chains, config.chain_length, config.reducer)?;

    if table.colliding_chains() > 0 {
        tracing::debug!(collisions = table.colliding_chains(), "chains share endpoints");
    }
    Ok(table)
}

// =============================================================================
// File build
// =============================================================================

/// Options of a file build that do not affect the table content
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BuildOptions {
    /// Chains computed in parallel and flushed together
    pub batch_size: usize,
    /// Continue from the table's checkpoint when one exists
    pub resume: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            resume: false,
        }
    }
}

/// Result of a file build
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BuildSummary {
    /// Chains in the table file
    pub chains_written: u64,
    /// Table file length
    pub bytes_written: u64,
    /// Chains taken from a previous run
    pub resumed_chains: u64,
    /// Whether every seed of the range was chained
    pub completed: bool,
}

/// Build a table file for a configuration
///
/// Chains are computed one batch at a time and written in seed order, so the
/// file does not depend on `batch_size` or the thread count. After every
/// flushed batch a checkpoint is saved; `stop` is polled between batches.
/// An interrupted build keeps its checkpoint and can be resumed with
/// `options.resume`. A finished build removes it.
pub fn build_table_file<F>(
    path: impl AsRef<Path>,
    config: &TableConfig,
    options: &BuildOptions,
    stop: &AtomicBool,
    mut on_progress: F,
) -> Result<BuildSummary>
where
    F: FnMut(u64, u64), // (current, total)
{
    let path = path.as_ref();
    config.validate()?;
    if options.batch_size == 0 {
        return Err(Error::InvalidConfig("batch size must be positive".to_string()));
    }

    let range = config.seed_range();
    if range.len() < config.num_chains {
        tracing::warn!(
            requested = config.num_chains,
            available = range.len(),
            "password space exhausted, table will be shorter"
        );
    }
    let total = range.len();

    let checkpoints = CheckpointManager::for_table(path);
    let previous = if options.resume {
        checkpoints.load()?
    } else {
        None
    };

    let (mut writer, resumed_chains) = match previous {
        Some(checkpoint) => {
            if checkpoint.config != *config {
                return Err(Error::InvalidConfig(format!(
                    "checkpoint {} was written for a different table configuration",
                    checkpoints.path().display()
                )));
            }
            tracing::info!(
                chains = checkpoint.chains_written,
                next_index = checkpoint.next_index,
                "resuming table build"
            );
            let writer = TableWriter::resume_at(path, config.storage, checkpoint.bytes_written)?;
            (writer, checkpoint.chains_written)
        }
        None => {
            if options.resume {
                tracing::info!("no checkpoint found, starting a new build");
            }
            checkpoints.clear()?;
            (TableWriter::create(path, config.storage)?, 0)
        }
    };

    tracing::info!(
        path = %path.display(),
        chains = total,
        chain_length = config.chain_length,
        reducer = %config.reducer,
        storage = %config.storage,
        "building table"
    );

    let mut done = resumed_chains;
    let mut remaining = range.skip(done);
    on_progress(done, total);

    while !remaining.is_empty() {
        if stop.load(Ordering::Relaxed) {
            break;
        }

        let batch = SeedRange::from_index(
            remaining.start_index(),
            remaining.len().min(options.batch_size as u64),
        )?;
        let chains = generate_table_range_parallel(batch, config.chain_length, &config.reducer)?;

        for chain in &chains {
            writer.write_chain(chain)?;
        }
        writer.flush()?;

        done += batch.len();
        remaining = remaining.skip(batch.len());
        checkpoints.save(&Checkpoint::new(
            *config,
            batch.end_index(),
            done,
            writer.bytes_written(),
        ))?;
        on_progress(done, total);
    }

    let completed = remaining.is_empty();
    let bytes_written = writer.finish()?;

    if completed {
        checkpoints.clear()?;
        tracing::info!(chains = done, bytes = bytes_written, "table build complete");
    } else {
        tracing::info!(
            chains = done,
            checkpoint = %checkpoints.path().display(),
            "table build interrupted"
        );
    }

    Ok(BuildSummary {
        chains_written: done,
        bytes_written,
        resumed_chains,
        completed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::reduction::Reducer;
    use crate::domain::table_format::StoragePolicy;
    use std::fs;
    use tempfile::TempDir;

    fn pw(s: &str) -> Password {
        s.parse().unwrap()
    }

    fn config(num_chains: u64, chain_length: u32) -> TableConfig {
        TableConfig {
            num_chains,
            chain_length,
            ..TableConfig::default()
        }
    }

    #[test]
    fn test_generate_table_range_empty() {
        let range = SeedRange::new(pw("0000000"), 0);
        let chains = generate_table_range(range, 10, &Reducer::Fixed).unwrap();
        assert!(chains.is_empty());
    }

    #[test]
    fn test_generate_table_range_small() {
        let range = SeedRange::new(pw("0000000"), 10);
        let chains = generate_table_range(range, 10, &Reducer::Fixed).unwrap();
        assert_eq!(chains.len(), 10);

        // Verify each chain starts at the matching seed
        for (i, chain) in chains.iter().enumerate() {
            assert_eq!(chain.start(), Password::from_index(i as u64).unwrap());
            assert_eq!(chain.length(), 10);
        }
    }

    #[test]
    fn test_generate_table_range_offset() {
        let range = SeedRange::new(pw("000000z"), 3);
        let chains = generate_table_range(range, 4, &Reducer::Fixed).unwrap();
        let starts: Vec<_> = chains.iter().map(|c| c.start()).collect();
        assert_eq!(starts, vec![pw("000000z"), pw("000000A"), pw("000000B")]);
    }

    #[test]
    fn test_generate_table_range_rejects_bad_length() {
        let range = SeedRange::new(pw("0000000"), 3);
        assert!(matches!(
            generate_table_range(range, 0, &Reducer::Fixed),
            Err(Error::InvalidChainLength(0))
        ));
        assert!(generate_table_range_parallel(range, 2049, &Reducer::Fixed).is_err());
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let range = SeedRange::new(pw("00000a0"), 200);
        for reducer in [Reducer::Fixed, Reducer::Positional] {
            let sequential = generate_table_range(range, 8, &reducer).unwrap();
            let parallel = generate_table_range_parallel(range, 8, &reducer).unwrap();
            assert_eq!(sequential, parallel);
        }
    }

    #[test]
    fn test_build_table_in_memory() {
        let table = build_table(&config(50, 10)).unwrap();
        assert_eq!(table.len(), 50);
        assert_eq!(table.chain_length(), 10);
        assert_eq!(table.entries()[0].start, pw("0000000"));
    }

    #[test]
    fn test_build_table_file_complete() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("table.txt");
        let stop = AtomicBool::new(false);
        let options = BuildOptions {
            batch_size: 7,
            resume: false,
        };

        let mut calls = Vec::new();
        let summary = build_table_file(&path, &config(20, 5), &options, &stop, |cur, total| {
            calls.push((cur, total))
        })
        .unwrap();

        assert!(summary.completed);
        assert_eq!(summary.chains_written, 20);
        assert_eq!(summary.bytes_written, fs::metadata(&path).unwrap().len());
        assert_eq!(calls.first(), Some(&(0, 20)));
        assert_eq!(calls.last(), Some(&(20, 20)));
        assert_eq!(calls.len(), 1 + 3);
        assert!(!CheckpointManager::for_table(&path).path().exists());
    }

    #[test]
    fn test_build_table_file_stopped_before_start() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("table.txt");
        let stop = AtomicBool::new(true);

        let summary =
            build_table_file(&path, &config(20, 5), &BuildOptions::default(), &stop, |_, _| {})
                .unwrap();

        assert!(!summary.completed);
        assert_eq!(summary.chains_written, 0);
        assert_eq!(fs::metadata(&path).unwrap().len(), 0);
    }

    #[test]
    fn test_build_table_file_rejects_zero_batch() {
        let dir = TempDir::new().unwrap();
        let stop = AtomicBool::new(false);
        let options = BuildOptions {
            batch_size: 0,
            resume: false,
        };
        let result = build_table_file(
            dir.path().join("table.txt"),
            &config(5, 5),
            &options,
            &stop,
            |_, _| {},
        );
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_build_table_file_resume_rejects_other_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("table.txt");
        let stop = AtomicBool::new(false);

        // Interrupt after the first batch
        let options = BuildOptions {
            batch_size: 4,
            resume: false,
        };
        let mut seen = 0;
        build_table_file(&path, &config(12, 5), &options, &stop, |cur, _| {
            seen += 1;
            if cur >= 4 {
                stop.store(true, Ordering::Relaxed);
            }
        })
        .unwrap();
        assert!(seen >= 2);

        let other = TableConfig {
            storage: StoragePolicy::Endpoints,
            ..config(12, 5)
        };
        let resume = BuildOptions {
            batch_size: 4,
            resume: true,
        };
        let stop = AtomicBool::new(false);
        let result = build_table_file(&path, &other, &resume, &stop, |_, _| {});
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }
}
