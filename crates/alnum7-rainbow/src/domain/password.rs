//! Password value type
//!
//! A password is exactly `PASSWORD_LENGTH` symbols of the 62-symbol alphabet.
//! Each symbol has a value (its position in `ALPHABET`), which makes a password a
//! 7-digit base-62 number used for seed enumeration.

use crate::constants::{ALPHABET, ALPHABET_SIZE, PASSWORD_LENGTH, PASSWORD_SPACE};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Password validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordError {
    /// Wrong number of symbols
    #[error("expected {expected} symbols, found {found}")]
    WrongLength { expected: usize, found: usize },
    /// Symbol outside 0-9, a-z, A-Z
    #[error("invalid symbol {symbol:?} at position {position}")]
    InvalidSymbol { symbol: char, position: usize },
    /// Index outside the password space
    #[error("index {0} is outside the password space")]
    IndexOutOfRange(u64),
}

/// Symbol value of an ASCII byte, `None` if it is not in the alphabet
#[inline]
pub fn symbol_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'z' => Some(byte - b'a' + 10),
        b'A'..=b'Z' => Some(byte - b'A' + 36),
        _ => None,
    }
}

/// ASCII byte of a symbol value
///
/// # Panics
///
/// Panics if `value >= ALPHABET_SIZE`.
#[inline]
pub fn symbol_char(value: u8) -> u8 {
    ALPHABET[value as usize]
}

/// Fixed-length alphanumeric password
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Password([u8; PASSWORD_LENGTH]);

impl Password {
    /// First password of the enumeration order (`0000000`)
    pub const MIN: Password = Password([b'0'; PASSWORD_LENGTH]);

    /// Last password of the enumeration order (`ZZZZZZZ`)
    pub const MAX: Password = Password([b'Z'; PASSWORD_LENGTH]);

    /// Build a password from raw bytes, validating length and alphabet
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PasswordError> {
        if bytes.len() != PASSWORD_LENGTH {
            return Err(PasswordError::WrongLength {
                expected: PASSWORD_LENGTH,
                found: bytes.len(),
            });
        }

        let mut buf = [0u8; PASSWORD_LENGTH];
        for (position, (&byte, slot)) in bytes.iter().zip(buf.iter_mut()).enumerate() {
            if symbol_value(byte).is_none() {
                return Err(PasswordError::InvalidSymbol {
                    symbol: byte as char,
                    position,
                });
            }
            *slot = byte;
        }

        Ok(Self(buf))
    }

    /// Build a password from symbol values (each must be < 62)
    ///
    /// Used by the reduction function, which only produces in-range values.
    pub(crate) fn from_values(values: [u8; PASSWORD_LENGTH]) -> Self {
        Self(values.map(symbol_char))
    }

    /// Password with the given index in the base-62 enumeration order
    pub fn from_index(mut index: u64) -> Result<Self, PasswordError> {
        if index >= PASSWORD_SPACE {
            return Err(PasswordError::IndexOutOfRange(index));
        }

        let mut values = [0u8; PASSWORD_LENGTH];
        for value in values.iter_mut().rev() {
            *value = (index % ALPHABET_SIZE as u64) as u8;
            index /= ALPHABET_SIZE as u64;
        }

        Ok(Self::from_values(values))
    }

    /// Index of this password in the base-62 enumeration order
    pub fn index(&self) -> u64 {
        self.values()
            .iter()
            .fold(0u64, |acc, &v| acc * ALPHABET_SIZE as u64 + v as u64)
    }

    /// Symbol values, most significant first
    pub fn values(&self) -> [u8; PASSWORD_LENGTH] {
        // Invariant: every byte was validated on construction.
        self.0.map(|b| symbol_value(b).unwrap_or(0))
    }

    /// Next password in enumeration order
    ///
    /// The rightmost symbol advances digit → lowercase → uppercase; past `Z` it
    /// resets to `0` and carries left. Returns `None` after `ZZZZZZZ`.
    pub fn successor(&self) -> Option<Self> {
        let mut values = self.values();

        for value in values.iter_mut().rev() {
            if (*value as usize) + 1 < ALPHABET_SIZE {
                *value += 1;
                return Some(Self::from_values(values));
            }
            *value = 0;
        }

        None
    }

    /// ASCII bytes of the password
    pub fn as_bytes(&self) -> &[u8; PASSWORD_LENGTH] {
        &self.0
    }

    /// Password as a string slice
    pub fn as_str(&self) -> &str {
        // Alphabet symbols are ASCII.
        std::str::from_utf8(&self.0).unwrap_or_default()
    }
}

impl FromStr for Password {
    type Err = PasswordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_bytes(s.as_bytes())
    }
}

impl TryFrom<&str> for Password {
    type Error = PasswordError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl fmt::Display for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Password({:?})", self.as_str())
    }
}

impl Serialize for Password {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Password {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
