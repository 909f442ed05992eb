//! Table statistics workflow
//!
//! Summarizes a loaded table: chain count, endpoint merges and the estimated
//! share of the password space it can crack.

use crate::domain::coverage::estimate_success_probability;
use crate::domain::reduction::Reducer;
use crate::domain::table::Table;
use std::fmt;

/// Summary of a loaded table
#[derive(Debug, Clone, PartialEq)]
pub struct TableStats {
    /// Number of chains
    pub chains: usize,
    /// Number of distinct endpoints
    pub distinct_endpoints: usize,
    /// Chains sharing an endpoint with an earlier chain
    pub colliding_chains: usize,
    pub chain_length: u32,
    pub reducer: Reducer,
    /// Estimated success probability (0.0 to 1.0)
    pub success_probability: f64,
}

/// Compute statistics for a table
///
/// The estimate uses distinct endpoints, since merged chains cover the same
/// passwords from the merge point on.
pub fn table_stats(table: &Table) -> TableStats {
    let distinct = table.distinct_endpoints();

    TableStats {
        chains: table.len(),
        distinct_endpoints: distinct,
        colliding_chains: table.colliding_chains(),
        chain_length: table.chain_length(),
        reducer: table.reducer(),
        success_probability: estimate_success_probability(
            table.reducer(),
            distinct as u64,
            table.chain_length(),
        ),
    }
}

impl fmt::Display for TableStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "chains:             {}", self.chains)?;
        writeln!(f, "distinct endpoints: {}", self.distinct_endpoints)?;
        writeln!(f, "colliding chains:   {}", self.colliding_chains)?;
        writeln!(f, "chain length:       {}", self.chain_length)?;
        writeln!(f, "reduction:          {}", self.reducer)?;
        write!(
            f,
            "success rate:       {:.6e} ({:.4}%)",
            self.success_probability,
            self.success_probability * 100.0
        )
    }
}
