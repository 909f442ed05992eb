//! Digest value type

use crate::constants::DIGEST_LENGTH;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Digest parsing errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DigestError {
    /// Not a hexadecimal string
    #[error("invalid hex digest: {0}")]
    InvalidHex(#[from] hex::FromHexError),
    /// Hex decoded to the wrong number of bytes
    #[error("expected a {expected}-byte digest, found {found} bytes")]
    WrongLength { expected: usize, found: usize },
}

/// 256-bit hash digest
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Digest([u8; DIGEST_LENGTH]);

impl Digest {
    pub const fn new(bytes: [u8; DIGEST_LENGTH]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; DIGEST_LENGTH] {
        &self.0
    }

    /// Parse a digest from hex, ignoring surrounding whitespace
    pub fn from_hex(s: &str) -> Result<Self, DigestError> {
        let bytes = hex::decode(s.trim())?;
        let found = bytes.len();
        let bytes: [u8; DIGEST_LENGTH] =
            bytes.try_into().map_err(|_| DigestError::WrongLength {
                expected: DIGEST_LENGTH,
                found,
            })?;
        Ok(Self(bytes))
    }

    /// Lowercase hex representation
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl FromStr for Digest {
    type Err = DigestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.to_hex())
    }
}
