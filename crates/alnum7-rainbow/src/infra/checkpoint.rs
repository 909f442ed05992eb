//! Build checkpoints
//!
//! A checkpoint records how far a table build got: the next seed to chain and
//! the table file length at the last flush. Saved as JSON next to the table,
//! written to a temporary file first and renamed into place.

use crate::config::TableConfig;
use crate::constants::{CHECKPOINT_FILE_EXTENSION, CHECKPOINT_VERSION};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Progress of an interrupted build
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub version: u16,
    /// Configuration of the build being resumed
    pub config: TableConfig,
    /// Password index of the next seed to chain
    pub next_index: u64,
    /// Chains already in the table file
    pub chains_written: u64,
    /// Table file length holding exactly those chains
    pub bytes_written: u64,
}

impl Checkpoint {
    pub fn new(config: TableConfig, next_index: u64, chains_written: u64, bytes_written: u64) -> Self {
        Self {
            version: CHECKPOINT_VERSION,
            config,
            next_index,
            chains_written,
            bytes_written,
        }
    }
}

/// Checkpoint file path for a table file (`<table>.ckpt.json`)
pub fn checkpoint_path_for(table_path: impl AsRef<Path>) -> PathBuf {
    let table_path = table_path.as_ref();
    let mut name = table_path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".");
    name.push(CHECKPOINT_FILE_EXTENSION);
    table_path.with_file_name(name)
}

/// Reads and writes the checkpoint of one table build
pub struct CheckpointManager {
    path: PathBuf,
}

impl CheckpointManager {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Manager for the checkpoint belonging to `table_path`
    pub fn for_table(table_path: impl AsRef<Path>) -> Self {
        Self::new(checkpoint_path_for(table_path))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Save a checkpoint (atomic write)
    pub fn save(&self, checkpoint: &Checkpoint) -> Result<()> {
        let temp_path = self.temp_path();
        let file = File::create(&temp_path)?;
        let mut writer = BufWriter::new(file);

        serde_json::to_writer_pretty(&mut writer, checkpoint)?;
        writer.flush()?;
        drop(writer);

        if let Err(e) = fs::rename(&temp_path, &self.path) {
            let _ = fs::remove_file(&temp_path);
            return Err(e.into());
        }

        tracing::debug!(
            path = %self.path.display(),
            next_index = checkpoint.next_index,
            chains = checkpoint.chains_written,
            "checkpoint saved"
        );
        Ok(())
    }

    /// Load the checkpoint, `None` if there is none
    pub fn load(&self) -> Result<Option<Checkpoint>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let checkpoint: Checkpoint = serde_json::from_reader(BufReader::new(file))?;
        if checkpoint.version != CHECKPOINT_VERSION {
            return Err(Error::InvalidConfig(format!(
                "unsupported checkpoint version {} (expected {})",
                checkpoint.version, CHECKPOINT_VERSION
            )));
        }

        Ok(Some(checkpoint))
    }

    /// Delete the checkpoint file
    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(format!(".tmp.{}", std::process::id()));
        PathBuf::from(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample() -> Checkpoint {
        let config = TableConfig {
            num_chains: 1000,
            ..TableConfig::default()
        };
        Checkpoint::new(config, 512, 512, 512 * 89)
    }

    #[test]
    fn test_checkpoint_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let manager = CheckpointManager::new(temp_dir.path().join("build.ckpt.json"));

        manager.save(&sample()).unwrap();
        let loaded = manager.load().unwrap().unwrap();
        assert_eq!(loaded, sample());
        assert_eq!(loaded.version, CHECKPOINT_VERSION);
    }

    #[test]
    fn test_checkpoint_overwrite() {
        let temp_dir = TempDir::new().unwrap();
        let manager = CheckpointManager::new(temp_dir.path().join("build.ckpt.json"));

        manager.save(&sample()).unwrap();
        let mut next = sample();
        next.next_index = 1000;
        manager.save(&next).unwrap();

        assert_eq!(manager.load().unwrap().unwrap().next_index, 1000);
        // No temporary file left behind
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_checkpoint_missing_is_none() {
        let temp_dir = TempDir::new().unwrap();
        let manager = CheckpointManager::new(temp_dir.path().join("none.ckpt.json"));
        assert_eq!(manager.load().unwrap(), None);
        assert!(manager.clear().is_ok());
    }

    #[test]
    fn test_checkpoint_clear() {
        let temp_dir = TempDir::new().unwrap();
        let manager = CheckpointManager::new(temp_dir.path().join("build.ckpt.json"));

        manager.save(&sample()).unwrap();
        manager.clear().unwrap();
        assert!(!manager.path().exists());
        assert_eq!(manager.load().unwrap(), None);
    }

    #[test]
    fn test_checkpoint_corrupt_file() {
        let temp_dir = TempDir::new().unwrap();
        let manager = CheckpointManager::new(temp_dir.path().join("build.ckpt.json"));
        fs::write(manager.path(), b"{ not json").unwrap();

        assert!(matches!(manager.load(), Err(Error::Checkpoint(_))));
    }

    #[test]
    fn test_checkpoint_version_mismatch() {
        let temp_dir = TempDir::new().unwrap();
        let manager = CheckpointManager::new(temp_dir.path().join("build.ckpt.json"));
        let mut checkpoint = sample();
        checkpoint.version = CHECKPOINT_VERSION + 1;
        manager.save(&checkpoint).unwrap();

        assert!(matches!(manager.load(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_checkpoint_path_for() {
        assert_eq!(
            checkpoint_path_for("out/alnum7_t10_fixed.txt"),
            PathBuf::from("out/alnum7_t10_fixed.txt.ckpt.json")
        );
    }
}
