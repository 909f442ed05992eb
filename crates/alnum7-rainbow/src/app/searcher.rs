//! Search workflow implementation
//!
//! Recovers a password from its digest with a loaded table. For each column
//! `p` from `chain_length - 1` down to `0` the target is projected to the
//! endpoint it would reach if it were the hash at column `p`; every chain with
//! that endpoint is replayed from its start to confirm. Endpoints themselves
//! are matched through the table's endpoint digest index.

use crate::domain::chain::{project_to_endpoint, verify_chain};
use crate::domain::digest::Digest;
use crate::domain::password::Password;
use crate::domain::table::Table;
use crate::error::Result;
use rayon::prelude::*;
use std::sync::atomic::{AtomicU32, Ordering};

/// Outcome of a lookup
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CrackOutcome {
    /// Preimage found
    Cracked(Password),
    /// No chain of the table contains a preimage
    NotFound,
}

impl CrackOutcome {
    pub fn password(&self) -> Option<Password> {
        match self {
            Self::Cracked(password) => Some(*password),
            Self::NotFound => None,
        }
    }

    pub fn is_cracked(&self) -> bool {
        matches!(self, Self::Cracked(_))
    }
}

/// Outcome of a lookup with search statistics
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CrackReport {
    pub outcome: CrackOutcome,
    /// Column of the preimage in its chain
    pub column: Option<u32>,
    /// Candidate chains replayed without finding the target
    pub false_alarms: u32,
}

impl CrackReport {
    fn cracked(column: u32, password: Password, false_alarms: u32) -> Self {
        Self {
            outcome: CrackOutcome::Cracked(password),
            column: Some(column),
            false_alarms,
        }
    }

    fn not_found(false_alarms: u32) -> Self {
        Self {
            outcome: CrackOutcome::NotFound,
            column: None,
            false_alarms,
        }
    }
}

/// Look up a digest in the table
pub fn crack(target: &Digest, table: &Table) -> CrackOutcome {
    crack_detailed(target, table).outcome
}

/// Look up a hex-encoded digest in the table
pub fn crack_hex(target: &str, table: &Table) -> Result<CrackOutcome> {
    let target = Digest::from_hex(target)?;
    Ok(crack(&target, table))
}

/// Look up a digest, scanning columns from the last to the first
pub fn crack_detailed(target: &Digest, table: &Table) -> CrackReport {
    if let Some(report) = search_endpoints(target, table) {
        return report;
    }

    let mut false_alarms = 0;
    for column in (0..table.chain_length()).rev() {
        let (found, alarms) = search_column(target, column, table);
        false_alarms += alarms;
        if let Some((at, password)) = found {
            tracing::debug!(column = at, false_alarms, "digest cracked");
            return CrackReport::cracked(at, password, false_alarms);
        }
    }

    CrackReport::not_found(false_alarms)
}

/// Look up a digest with columns searched in parallel
///
/// Returns the same outcome and column as [`crack_detailed`]; the false alarm
/// count may include columns that a sequential search would have skipped.
pub fn crack_parallel(target: &Digest, table: &Table) -> CrackReport {
    if let Some(report) = search_endpoints(target, table) {
        return report;
    }

    let false_alarms = AtomicU32::new(0);
    let found = (0..table.chain_length())
        .into_par_iter()
        .rev()
        .find_map_first(|column| {
            let (found, alarms) = search_column(target, column, table);
            false_alarms.fetch_add(alarms, Ordering::Relaxed);
            found
        });

    let false_alarms = false_alarms.into_inner();
    match found {
        Some((column, password)) => CrackReport::cracked(column, password, false_alarms),
        None => CrackReport::not_found(false_alarms),
    }
}

/// Look up many digests in parallel, one outcome per digest in input order
pub fn crack_many(targets: &[Digest], table: &Table) -> Vec<CrackOutcome> {
    targets
        .par_iter()
        .map(|target| crack(target, table))
        .collect()
}

/// Match the target against the digest of every endpoint
fn search_endpoints(target: &Digest, table: &Table) -> Option<CrackReport> {
    table
        .lookup_endpoint_digest(target)
        .next()
        .map(|entry| CrackReport::cracked(table.chain_length(), entry.end, 0))
}

/// Search at a single column position
///
/// Returns the preimage found (with its column) and the number of false alarms.
fn search_column(target: &Digest, column: u32, table: &Table) -> (Option<(u32, Password)>, u32) {
    let reducer = table.reducer();

    // Step 1: Project the target to the endpoint of a chain holding it at `column`
    let endpoint = project_to_endpoint(target, column, table.chain_length(), &reducer);

    // Step 2: Replay every chain with that endpoint
    let mut false_alarms = 0;
    for entry in table.lookup(&endpoint) {
        if let Some(found) = verify_chain(entry.start, column, target, &reducer) {
            return (Some(found), false_alarms);
        }
        false_alarms += 1;
        tracing::trace!(start = %entry.start, column, "false alarm");
    }

    (None, false_alarms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chain::{ChainEntry, generate_chain, generate_chain_with};
    use crate::domain::hash::{hash_bytes, hash_password};
    use crate::domain::reduction::Reducer;
    use crate::error::Error;

    fn pw(s: &str) -> Password {
        s.parse().unwrap()
    }

    #[test]
    fn test_crack_step_four_password() {
        let chain = generate_chain(pw("0000000"), 10).unwrap();
        let table = Table::from_chains(&[chain.clone()], 10, Reducer::Fixed).unwrap();

        let target = chain.get(4).unwrap();
        let report = crack_detailed(&hash_password(&target), &table);
        assert_eq!(report.outcome, CrackOutcome::Cracked(target));
        assert_eq!(report.column, Some(4));
    }

    #[test]
    fn test_crack_every_column() {
        let chain = generate_chain_with(pw("abc0123"), 12, &Reducer::Positional).unwrap();
        let table = Table::from_chains(&[chain.clone()], 12, Reducer::Positional).unwrap();

        for password in chain.passwords() {
            let report = crack_detailed(&hash_password(password), &table);
            assert_eq!(report.outcome, CrackOutcome::Cracked(*password));
            assert_eq!(chain.get(report.column.unwrap()), Some(*password));
        }
    }

    #[test]
    fn test_crack_endpoint() {
        let chain = generate_chain(pw("0000042"), 6).unwrap();
        let table = Table::from_chains(&[chain.clone()], 6, Reducer::Fixed).unwrap();

        let report = crack_detailed(&hash_password(&chain.endpoint()), &table);
        assert_eq!(report.outcome, CrackOutcome::Cracked(chain.endpoint()));
        assert_eq!(report.column, Some(6));
    }

    #[test]
    fn test_crack_not_found() {
        let chain = generate_chain(pw("0000000"), 10).unwrap();
        let table = Table::from_chains(&[chain], 10, Reducer::Fixed).unwrap();

        // Not a 7-symbol password, so no preimage can be in the table
        let target = hash_bytes(b"not in the table");
        assert_eq!(crack(&target, &table), CrackOutcome::NotFound);
        assert_eq!(crack_parallel(&target, &table).outcome, CrackOutcome::NotFound);
    }

    #[test]
    fn test_crack_empty_table() {
        let table = Table::new(Vec::new(), 10, Reducer::Fixed).unwrap();
        let report = crack_detailed(&hash_password(&pw("0000000")), &table);
        assert_eq!(report, CrackReport::not_found(0));
    }

    #[test]
    fn test_false_alarm_counted() {
        let target = hash_bytes(b"unrelated");
        let length = 8;
        // A chain whose endpoint matches the projection of the target but
        // whose replay never produces it
        let endpoint = project_to_endpoint(&target, length - 1, length, &Reducer::Fixed);
        let table = Table::new(
            vec![ChainEntry::new(pw("0000000"), endpoint)],
            length,
            Reducer::Fixed,
        )
        .unwrap();

        let report = crack_detailed(&target, &table);
        assert_eq!(report.outcome, CrackOutcome::NotFound);
        assert!(report.false_alarms >= 1);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let chains: Vec<_> = (0..20)
            .map(|i| generate_chain(Password::from_index(i * 1000).unwrap(), 16).unwrap())
            .collect();
        let table = Table::from_chains(&chains, 16, Reducer::Fixed).unwrap();

        for chain in &chains {
            for password in chain.passwords().iter().step_by(3) {
                let target = hash_password(password);
                let sequential = crack_detailed(&target, &table);
                let parallel = crack_parallel(&target, &table);
                assert_eq!(sequential.outcome, parallel.outcome);
                assert_eq!(sequential.column, parallel.column);
            }
        }
    }

    #[test]
    fn test_crack_many_keeps_order() {
        let chain = generate_chain(pw("0000000"), 10).unwrap();
        let table = Table::from_chains(&[chain.clone()], 10, Reducer::Fixed).unwrap();

        let targets = vec![
            hash_password(&chain.get(2).unwrap()),
            hash_bytes(b"missing"),
            hash_password(&chain.get(9).unwrap()),
        ];
        let outcomes = crack_many(&targets, &table);
        assert_eq!(
            outcomes,
            vec![
                CrackOutcome::Cracked(chain.get(2).unwrap()),
                CrackOutcome::NotFound,
                CrackOutcome::Cracked(chain.get(9).unwrap()),
            ]
        );
    }

    #[test]
    fn test_crack_hex() {
        let chain = generate_chain(pw("0000000"), 10).unwrap();
        let table = Table::from_chains(&[chain.clone()], 10, Reducer::Fixed).unwrap();
        let target = chain.get(4).unwrap();

        let outcome = crack_hex(&hash_password(&target).to_hex(), &table).unwrap();
        assert_eq!(outcome.password(), Some(target));
        assert!(matches!(
            crack_hex("zz", &table),
            Err(Error::InvalidDigest(_))
        ));
    }
}
