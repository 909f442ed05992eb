//! Table configuration
//!
//! The parameters that fully determine a table's content. Defaults come from
//! `constants`; binaries override them from the command line.

use crate::constants::{DEFAULT_CHAIN_LENGTH, DEFAULT_NUM_CHAINS};
use crate::domain::chain::validate_chain_length;
use crate::domain::password::Password;
use crate::domain::reduction::Reducer;
use crate::domain::seed::SeedRange;
use crate::domain::table_format::StoragePolicy;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Parameters of a table build
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableConfig {
    /// First seed password
    pub start: Password,
    /// Number of chains (seeds) to generate
    pub num_chains: u64,
    /// Hash → reduce steps per chain
    pub chain_length: u32,
    /// Reduction strategy
    #[serde(default)]
    pub reducer: Reducer,
    /// Passwords written per chain
    #[serde(default)]
    pub storage: StoragePolicy,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            start: Password::MIN,
            num_chains: DEFAULT_NUM_CHAINS,
            chain_length: DEFAULT_CHAIN_LENGTH,
            reducer: Reducer::default(),
            storage: StoragePolicy::default(),
        }
    }
}

impl TableConfig {
    /// Check every parameter before any chain is computed
    pub fn validate(&self) -> Result<()> {
        validate_chain_length(self.chain_length)?;
        if self.num_chains == 0 {
            return Err(Error::InvalidConfig(
                "number of chains must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Seeds covered by this configuration
    ///
    /// Clamped at the end of the password space.
    pub fn seed_range(&self) -> SeedRange {
        SeedRange::new(self.start, self.num_chains)
    }
}
