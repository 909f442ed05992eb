//! Table merging
//!
//! Tables built from disjoint seed ranges with the same parameters can be
//! concatenated into one. Each input is validated before anything is written;
//! an unterminated trailing chain in an input is left out.

use crate::domain::table_format::parse_table;
use crate::error::Result;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Result of a merge
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MergeSummary {
    /// Input files merged
    pub inputs: usize,
    /// Chains in the output
    pub chains: u64,
    /// Lines dropped from unterminated trailing chains
    pub dropped_lines: usize,
}

/// Concatenate table files into `output`
///
/// All inputs must use `chain_length`. The output is written to a temporary
/// file and renamed into place, so a failed merge leaves no partial output.
pub fn merge_tables<P: AsRef<Path>>(
    inputs: &[P],
    output: impl AsRef<Path>,
    chain_length: u32,
) -> Result<MergeSummary> {
    let output = output.as_ref();
    let mut summary = MergeSummary::default();
    let mut contents = Vec::with_capacity(inputs.len());

    for input in inputs {
        let input = input.as_ref();
        let bytes = fs::read(input)?;
        let parsed = parse_table(&bytes, chain_length)?;

        if parsed.truncated_lines > 0 {
            tracing::warn!(
                path = %input.display(),
                lines = parsed.truncated_lines,
                "dropping unterminated chain"
            );
        }
        tracing::info!(path = %input.display(), chains = parsed.entries.len(), "input validated");

        summary.inputs += 1;
        summary.chains += parsed.entries.len() as u64;
        summary.dropped_lines += parsed.truncated_lines;
        contents.push((bytes, parsed.complete_bytes));
    }

    let mut temp_name = output.as_os_str().to_os_string();
    temp_name.push(".tmp");
    let temp_path = Path::new(&temp_name);

    let write = || -> Result<()> {
        let mut writer = BufWriter::new(File::create(temp_path)?);
        for (bytes, complete) in &contents {
            writer.write_all(&bytes[..*complete])?;
        }
        writer.flush()?;
        writer.get_ref().sync_all()?;
        drop(writer);
        fs::rename(temp_path, output)?;
        Ok(())
    };

    if let Err(e) = write() {
        let _ = fs::remove_file(temp_path);
        return Err(e);
    }

    Ok(summary)
}
