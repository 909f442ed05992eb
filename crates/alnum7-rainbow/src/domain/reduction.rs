//! Reduction functions
//!
//! A reduction maps a digest back into the password space. The digest is read
//! as a big-endian bit string and cut into 42 six-bit groups (the last 4 bits
//! are unused). Password symbol `s` is taken from groups `6s..6s+6`: the first
//! group whose value is below 62 becomes the symbol. When all six groups of a
//! slot are 62 or 63, the last group minus 62 is used instead (`0` or `1`) and
//! the slot is counted as a fallback.

use crate::constants::{
    ALPHABET_SIZE, DIGEST_LENGTH, GROUP_BITS, GROUP_COUNT, GROUPS_PER_SYMBOL, PASSWORD_LENGTH,
};
use crate::domain::digest::Digest;
use crate::domain::password::Password;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const GROUP_MASK: u16 = (1 << GROUP_BITS) - 1;

/// Result of a single reduction
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Reduction {
    pub password: Password,
    /// Number of symbols produced by the out-of-range fallback (0-7)
    pub fallback_slots: u8,
}

/// A reduction family keyed by chain position
pub trait ReductionStrategy: Send + Sync {
    /// Reduce `digest` at chain column `position`, reporting fallbacks
    fn reduce_detailed(&self, digest: &Digest, position: u32) -> Reduction;

    /// Reduce `digest` at chain column `position`
    #[inline]
    fn reduce(&self, digest: &Digest, position: u32) -> Password {
        self.reduce_detailed(digest, position).password
    }
}

/// Built-in reduction strategies
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reducer {
    /// Same scheme at every column
    #[default]
    Fixed,
    /// Symbol values shifted by the column, `(v + position) mod 62`
    Positional,
}

impl ReductionStrategy for Reducer {
    #[inline]
    fn reduce_detailed(&self, digest: &Digest, position: u32) -> Reduction {
        match self {
            Self::Fixed => reduce_with_shift(digest, 0),
            Self::Positional => {
                reduce_with_shift(digest, (position % ALPHABET_SIZE as u32) as u8)
            }
        }
    }
}

impl fmt::Display for Reducer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed => f.write_str("fixed"),
            Self::Positional => f.write_str("positional"),
        }
    }
}

impl FromStr for Reducer {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fixed" => Ok(Self::Fixed),
            "positional" => Ok(Self::Positional),
            other => Err(format!(
                "unknown reduction '{}', expected 'fixed' or 'positional'",
                other
            )),
        }
    }
}

/// Reduce a digest with the default (fixed) strategy
#[inline]
pub fn reduce(digest: &Digest, position: u32) -> Password {
    Reducer::Fixed.reduce(digest, position)
}

/// Reduce a digest with the default (fixed) strategy, reporting fallbacks
#[inline]
pub fn reduce_detailed(digest: &Digest, position: u32) -> Reduction {
    Reducer::Fixed.reduce_detailed(digest, position)
}

/// Extract the 6-bit group at `index` (0..42), most significant bits first
#[inline]
pub fn digest_group(bytes: &[u8; DIGEST_LENGTH], index: usize) -> u8 {
    debug_assert!(index < GROUP_COUNT);
    let bit = index * GROUP_BITS;
    let byte = bit / 8;
    // Groups never reach the final byte, so byte + 1 is always in range.
    let window = u16::from_be_bytes([bytes[byte], bytes[byte + 1]]);
    let shift = 16 - GROUP_BITS - (bit % 8);
    ((window >> shift) & GROUP_MASK) as u8
}

fn reduce_with_shift(digest: &Digest, shift: u8) -> Reduction {
    let bytes = digest.as_bytes();
    let mut values = [0u8; PASSWORD_LENGTH];
    let mut fallback_slots = 0u8;

    for (slot, value) in values.iter_mut().enumerate() {
        let base = slot * GROUPS_PER_SYMBOL;
        let mut chosen = None;
        let mut last = 0u8;

        for g in base..base + GROUPS_PER_SYMBOL {
            last = digest_group(bytes, g);
            if (last as usize) < ALPHABET_SIZE {
                chosen = Some(last);
                break;
            }
        }

        let v = match chosen {
            Some(v) => v,
            None => {
                fallback_slots += 1;
                last - ALPHABET_SIZE as u8
            }
        };

        *value = ((v as u16 + shift as u16) % ALPHABET_SIZE as u16) as u8;
    }

    Reduction {
        password: Password::from_values(values),
        fallback_slots,
    }
}
