//! Crate error type

use crate::constants::{CHAIN_LENGTH_MAX, CHAIN_LENGTH_MIN};
use crate::domain::digest::DigestError;
use crate::domain::password::PasswordError;
use crate::domain::table_format::TableFormatError;
use thiserror::Error;

/// Errors raised by table generation, loading and search
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed password
    #[error("invalid password: {0}")]
    InvalidPassword(#[from] PasswordError),

    /// Malformed digest
    #[error("invalid digest: {0}")]
    InvalidDigest(#[from] DigestError),

    /// Chain length outside the supported range
    #[error(
        "invalid chain length {0}: must be between {min} and {max}",
        min = CHAIN_LENGTH_MIN,
        max = CHAIN_LENGTH_MAX
    )]
    InvalidChainLength(u32),

    /// Other invalid parameter
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Table file content error
    #[error(transparent)]
    TableFormat(#[from] TableFormatError),

    /// Checkpoint (de)serialization error
    #[error("checkpoint error: {0}")]
    Checkpoint(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether the error was caused by caller-supplied input
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::InvalidPassword(_)
                | Self::InvalidDigest(_)
                | Self::InvalidChainLength(_)
                | Self::InvalidConfig(_)
        )
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
