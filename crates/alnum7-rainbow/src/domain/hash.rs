//! Hash primitive
//!
//! SHA3-256 consumed as a stateless pure function: every call builds and
//! finalizes its own hasher, so no context outlives a digest.

use crate::domain::digest::Digest;
use crate::domain::password::Password;
use sha3::{Digest as _, Sha3_256};

/// Hash an arbitrary byte sequence
#[inline]
pub fn hash_bytes(bytes: &[u8]) -> Digest {
    Digest::new(Sha3_256::digest(bytes).into())
}

/// Hash the ASCII bytes of a password
#[inline]
pub fn hash_password(password: &Password) -> Digest {
    hash_bytes(password.as_bytes())
}
