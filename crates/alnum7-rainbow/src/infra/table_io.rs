//! Table file I/O operations
//!
//! This module provides functions for reading and writing rainbow table files.

use crate::constants::TABLE_FILE_EXTENSION;
use crate::domain::chain::Chain;
use crate::domain::reduction::Reducer;
use crate::domain::table::Table;
use crate::domain::table_format::{ParsedTable, StoragePolicy, encode_chain, parse_table};
use crate::error::Result;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Seek, SeekFrom, Write};
use std::path::Path;

#[cfg(feature = "mmap")]
use memmap2::Mmap;

// =============================================================================
// Writing
// =============================================================================

/// Buffered writer for table files
///
/// Tracks how many bytes and chains have been handed to the file so a build
/// can checkpoint a position that is known to hold only complete chains.
pub struct TableWriter {
    writer: BufWriter<File>,
    policy: StoragePolicy,
    buf: Vec<u8>,
    bytes_written: u64,
    chains_written: u64,
}

impl TableWriter {
    /// Create (or truncate) a table file
    pub fn create(path: impl AsRef<Path>, policy: StoragePolicy) -> io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self::with_file(file, policy, 0))
    }

    /// Reopen a table file and continue writing at byte `offset`
    ///
    /// Anything past `offset` (a partially written batch) is discarded. Fails
    /// if the file is shorter than `offset`.
    pub fn resume_at(
        path: impl AsRef<Path>,
        policy: StoragePolicy,
        offset: u64,
    ) -> io::Result<Self> {
        let mut file = OpenOptions::new().write(true).open(path)?;
        let len = file.metadata()?.len();
        if len < offset {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("table file has {len} bytes, expected at least {offset}"),
            ));
        }

        file.set_len(offset)?;
        file.seek(SeekFrom::Start(offset))?;
        Ok(Self::with_file(file, policy, offset))
    }

    fn with_file(file: File, policy: StoragePolicy, offset: u64) -> Self {
        Self {
            writer: BufWriter::new(file),
            policy,
            buf: Vec::with_capacity(256),
            bytes_written: offset,
            chains_written: 0,
        }
    }

    /// Append one chain followed by its blank separator line
    pub fn write_chain(&mut self, chain: &Chain) -> io::Result<()> {
        self.buf.clear();
        encode_chain(chain, self.policy, &mut self.buf);
        self.writer.write_all(&self.buf)?;
        self.bytes_written += self.buf.len() as u64;
        self.chains_written += 1;
        Ok(())
    }

    /// Flush buffered chains to the file
    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    /// Bytes in the file once buffered data is flushed
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Chains written through this writer
    pub fn chains_written(&self) -> u64 {
        self.chains_written
    }

    /// Flush and sync the file, returning its final length
    pub fn finish(mut self) -> io::Result<u64> {
        self.writer.flush()?;
        self.writer.get_ref().sync_all()?;
        Ok(self.bytes_written)
    }
}

/// Save chains to a new table file
pub fn save_table(path: impl AsRef<Path>, chains: &[Chain], policy: StoragePolicy) -> io::Result<()> {
    let mut writer = TableWriter::create(path, policy)?;

    for chain in chains {
        writer.write_chain(chain)?;
    }

    writer.finish().map(|_| ())
}

/// Default file name for a table built with the given parameters
pub fn get_table_path(chain_length: u32, reducer: Reducer) -> String {
    format!("alnum7_t{}_{}.{}", chain_length, reducer, TABLE_FILE_EXTENSION)
}

// =============================================================================
// Reading
// =============================================================================

/// Read and validate the chain entries of a table file
///
/// A trailing unterminated chain (interrupted write) is dropped with a warning.
pub fn read_table_entries(path: impl AsRef<Path>, chain_length: u32) -> Result<ParsedTable> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    parse_checked(path, &bytes, chain_length)
}

/// Load a table file into a searchable table
pub fn load_table(path: impl AsRef<Path>, chain_length: u32, reducer: Reducer) -> Result<Table> {
    let parsed = read_table_entries(path, chain_length)?;
    Table::new(parsed.entries, chain_length, reducer)
}

fn parse_checked(path: &Path, bytes: &[u8], chain_length: u32) -> Result<ParsedTable> {
    let parsed = parse_table(bytes, chain_length)?;

    if parsed.truncated_lines > 0 {
        tracing::warn!(
            path = %path.display(),
            lines = parsed.truncated_lines,
            "ignoring unterminated chain at end of table"
        );
    }
    tracing::debug!(
        path = %path.display(),
        chains = parsed.entries.len(),
        "table parsed"
    );

    Ok(parsed)
}

// =============================================================================
// Memory-mapped table I/O (mmap feature)
// =============================================================================

/// Load a table file through a read-only memory map
///
/// Avoids copying the file into a heap buffer before parsing, which matters
/// for tables stored with every chain password.
#[cfg(feature = "mmap")]
pub fn load_table_mmap(
    path: impl AsRef<Path>,
    chain_length: u32,
    reducer: Reducer,
) -> Result<Table> {
    let path = path.as_ref();
    let file = File::open(path)?;

    let parsed = if file.metadata()?.len() == 0 {
        parse_checked(path, &[], chain_length)?
    } else {
        // SAFETY: the map is read-only and dropped before this function
        // returns; the file is not expected to change while it is parsed.
        let mmap = unsafe { Mmap::map(&file)? };
        parse_checked(path, &mmap, chain_length)?
    };

    Table::new(parsed.entries, chain_length, reducer)
}
