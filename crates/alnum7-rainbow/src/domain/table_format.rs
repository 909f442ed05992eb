//! Rainbow table text format
//!
//! One password per line in chain order; a blank line terminates each chain.
//! The first line of a block is the chain start and the last is its endpoint.
//! Under the `full` storage policy a block holds every password of the chain
//! (`chain_length + 1` lines); under `endpoints` it holds only the two ends.

use crate::domain::chain::{Chain, ChainEntry};
use crate::domain::password::{Password, PasswordError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Which passwords of a chain are written
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoragePolicy {
    /// Every password of the chain
    #[default]
    Full,
    /// Start and endpoint only
    Endpoints,
}

impl fmt::Display for StoragePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full => f.write_str("full"),
            Self::Endpoints => f.write_str("endpoints"),
        }
    }
}

impl FromStr for StoragePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "full" => Ok(Self::Full),
            "endpoints" => Ok(Self::Endpoints),
            other => Err(format!(
                "unknown storage policy '{}', expected 'full' or 'endpoints'",
                other
            )),
        }
    }
}

/// Table format errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableFormatError {
    /// A line is not a valid password
    #[error("line {line}: {source}")]
    InvalidPassword { line: usize, source: PasswordError },
    /// A chain block has only one line
    #[error("line {line}: chain has a start but no endpoint")]
    MissingEndpoint { line: usize },
    /// A full chain block does not match the expected chain length
    #[error("line {line}: chain has {found} passwords, expected 2 or {expected}")]
    ChainLengthMismatch {
        line: usize,
        expected: usize,
        found: usize,
    },
}

/// Entries read from a table file
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParsedTable {
    /// Complete chains in file order
    pub entries: Vec<ChainEntry>,
    /// Lines of a trailing chain block that was never terminated
    pub truncated_lines: usize,
    /// Length of the input prefix that ends with the last complete chain
    pub complete_bytes: usize,
}

/// Append the text of one chain to `buf`
pub fn encode_chain(chain: &Chain, policy: StoragePolicy, buf: &mut Vec<u8>) {
    match policy {
        StoragePolicy::Full => {
            for password in chain.passwords() {
                push_line(buf, password);
            }
        }
        StoragePolicy::Endpoints => encode_entry(&chain.entry(), buf),
    }
    buf.push(b'\n');
}

/// Append the text of a chain stored as its two ends
pub fn encode_entry(entry: &ChainEntry, buf: &mut Vec<u8>) {
    push_line(buf, &entry.start);
    push_line(buf, &entry.end);
}

fn push_line(buf: &mut Vec<u8>, password: &Password) {
    buf.extend_from_slice(password.as_bytes());
    buf.push(b'\n');
}

/// Parse table text into chain entries
///
/// Blocks must hold 2 or `chain_length + 1` passwords. Extra blank lines are
/// ignored. A final block without its terminating blank line is an interrupted
/// write: it is dropped and reported through `truncated_lines`.
pub fn parse_table(bytes: &[u8], chain_length: u32) -> Result<ParsedTable, TableFormatError> {
    let full_len = chain_length as usize + 1;
    let mut parsed = ParsedTable::default();

    let mut block_start_line = 0usize;
    let mut block_len = 0usize;
    let mut start: Option<Password> = None;
    let mut last: Option<Password> = None;
    let mut offset = 0usize;

    let mut lines = bytes.split(|&b| b == b'\n').enumerate().peekable();
    while let Some((i, raw)) = lines.next() {
        let line_no = i + 1;
        let is_final_segment = lines.peek().is_none();
        let line = raw.strip_suffix(b"\r").unwrap_or(raw);
        let line_end = offset + raw.len() + 1;
        offset = line_end;

        if is_final_segment {
            // Text after the last newline is a partially written line.
            if !line.is_empty() {
                block_len += 1;
            }
            break;
        }

        if line.is_empty() {
            if block_len == 0 {
                continue;
            }
            let (Some(s), Some(e)) = (start, last) else {
                continue;
            };
            if block_len == 1 {
                return Err(TableFormatError::MissingEndpoint {
                    line: block_start_line,
                });
            }
            if block_len != 2 && block_len != full_len {
                return Err(TableFormatError::ChainLengthMismatch {
                    line: block_start_line,
                    expected: full_len,
                    found: block_len,
                });
            }
            parsed.entries.push(ChainEntry::new(s, e));
            parsed.complete_bytes = line_end;
            block_len = 0;
            start = None;
            last = None;
            continue;
        }

        let password = Password::from_bytes(line).map_err(|source| {
            TableFormatError::InvalidPassword {
                line: line_no,
                source,
            }
        })?;

        if block_len == 0 {
            block_start_line = line_no;
            start = Some(password);
        }
        last = Some(password);
        block_len += 1;
    }

    parsed.truncated_lines = block_len;
    Ok(parsed)
}
