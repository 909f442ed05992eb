//! Chain operations implementation
//!
//! A chain of length `t` starts at a seed password and applies `t`
//! hash → reduce steps, so it holds `t + 1` passwords. Column `i` of a chain is
//! the password `i` steps after the start; the reduction applied to the hash
//! of column `i` is keyed by `i`.

use crate::constants::{CHAIN_LENGTH_MAX, CHAIN_LENGTH_MIN};
use crate::domain::digest::Digest;
use crate::domain::hash::hash_password;
use crate::domain::password::Password;
use crate::domain::reduction::{Reducer, ReductionStrategy};
use crate::error::{Error, Result};

/// Chain entry structure
///
/// Only the two ends of a chain are needed to index and replay it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChainEntry {
    /// Starting password of the chain
    pub start: Password,
    /// Ending password of the chain
    pub end: Password,
}

impl ChainEntry {
    /// Create a new chain entry
    pub fn new(start: Password, end: Password) -> Self {
        Self { start, end }
    }
}

/// A fully materialized chain
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Chain {
    passwords: Vec<Password>,
}

impl Chain {
    /// First password
    pub fn start(&self) -> Password {
        self.passwords[0]
    }

    /// Last password
    pub fn endpoint(&self) -> Password {
        self.passwords[self.passwords.len() - 1]
    }

    /// Number of hash → reduce steps
    pub fn length(&self) -> u32 {
        (self.passwords.len() - 1) as u32
    }

    /// All passwords, start first
    pub fn passwords(&self) -> &[Password] {
        &self.passwords
    }

    /// Password at `column`, if within the chain
    pub fn get(&self, column: u32) -> Option<Password> {
        self.passwords.get(column as usize).copied()
    }

    pub fn entry(&self) -> ChainEntry {
        ChainEntry::new(self.start(), self.endpoint())
    }
}

/// Reject chain lengths outside `CHAIN_LENGTH_MIN..=CHAIN_LENGTH_MAX`
pub fn validate_chain_length(length: u32) -> Result<()> {
    if (CHAIN_LENGTH_MIN..=CHAIN_LENGTH_MAX).contains(&length) {
        Ok(())
    } else {
        Err(Error::InvalidChainLength(length))
    }
}

/// Generate a full chain with the default reduction
pub fn generate_chain(start: Password, length: u32) -> Result<Chain> {
    generate_chain_with(start, length, &Reducer::Fixed)
}

/// Generate a full chain from a textual start password
///
/// Both the password and the length are validated before any hashing.
pub fn generate_chain_from_str<R>(start: &str, length: u32, reducer: &R) -> Result<Chain>
where
    R: ReductionStrategy + ?Sized,
{
    let start: Password = start.parse()?;
    generate_chain_with(start, length, reducer)
}

/// Generate a full chain with the given reduction strategy
pub fn generate_chain_with<R>(start: Password, length: u32, reducer: &R) -> Result<Chain>
where
    R: ReductionStrategy + ?Sized,
{
    validate_chain_length(length)?;

    let mut passwords = Vec::with_capacity(length as usize + 1);
    let mut current = start;
    passwords.push(current);

    for step in 0..length {
        let digest = hash_password(&current);
        current = reducer.reduce(&digest, step);
        passwords.push(current);
    }

    Ok(Chain { passwords })
}

/// Compute a single chain
///
/// Starting from `start`, repeat hash → reduce `length` times and return the
/// ending password. The length is assumed to be validated by the caller.
pub fn compute_chain<R>(start: Password, length: u32, reducer: &R) -> ChainEntry
where
    R: ReductionStrategy + ?Sized,
{
    let mut current = start;

    for step in 0..length {
        let digest = hash_password(&current);
        current = reducer.reduce(&digest, step);
    }

    ChainEntry::new(start, current)
}

/// Project a target digest to the endpoint it would produce
///
/// Assumes `target` is the hash of the password at `column` and applies the
/// remaining reductions (`column..length`).
pub fn project_to_endpoint<R>(target: &Digest, column: u32, length: u32, reducer: &R) -> Password
where
    R: ReductionStrategy + ?Sized,
{
    debug_assert!(column < length);
    let mut candidate = reducer.reduce(target, column);

    for step in column + 1..length {
        let digest = hash_password(&candidate);
        candidate = reducer.reduce(&digest, step);
    }

    candidate
}

/// Replay a chain and look for the target digest
///
/// Hashes every password from the start up to and including `column`. Returns
/// the first password whose hash equals `target`, with its column.
pub fn verify_chain<R>(
    start: Password,
    column: u32,
    target: &Digest,
    reducer: &R,
) -> Option<(u32, Password)>
where
    R: ReductionStrategy + ?Sized,
{
    let mut current = start;

    for step in 0..=column {
        let digest = hash_password(&current);
        if digest == *target {
            return Some((step, current));
        }
        if step == column {
            break;
        }
        current = reducer.reduce(&digest, step);
    }

    None
}
