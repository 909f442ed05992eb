//! Rainbow table related constants

// =============================================================================
// Password space
// =============================================================================

/// Number of symbols in a password
pub const PASSWORD_LENGTH: usize = 7;

/// Password alphabet, ordered by symbol value (0-9, a-z, A-Z)
pub const ALPHABET: &[u8; ALPHABET_SIZE] =
    b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Number of symbols in the alphabet
pub const ALPHABET_SIZE: usize = 62;

/// Password space size (N = 62^7 = 3,521,614,606,208)
pub const PASSWORD_SPACE: u64 = 62u64.pow(PASSWORD_LENGTH as u32);

// =============================================================================
// Hash / reduction parameters
// =============================================================================

/// Digest size in bytes (SHA3-256)
pub const DIGEST_LENGTH: usize = 32;

/// Width of one reduction sample in bits
pub const GROUP_BITS: usize = 6;

/// Number of 6-bit groups taken from a digest (252 of 256 bits)
pub const GROUP_COUNT: usize = 42;

/// Candidate groups scanned per password symbol
pub const GROUPS_PER_SYMBOL: usize = GROUP_COUNT / PASSWORD_LENGTH;

// =============================================================================
// Rainbow table parameters
// =============================================================================

/// Minimum chain length (hash → reduce steps)
pub const CHAIN_LENGTH_MIN: u32 = 1;

/// Maximum chain length (hash → reduce steps)
pub const CHAIN_LENGTH_MAX: u32 = 2048;

/// Default chain length (t = 10)
pub const DEFAULT_CHAIN_LENGTH: u32 = 10;

/// Default number of chains per table (m = 2^20)
#[cfg(not(test))]
pub const DEFAULT_NUM_CHAINS: u64 = 1 << 20;

/// Default number of chains per table (m = 256) - reduced for faster unit tests
#[cfg(test)]
pub const DEFAULT_NUM_CHAINS: u64 = 256;

/// Default first seed of the enumeration
pub const DEFAULT_START_PASSWORD: &str = "0000000";

/// Chains computed in parallel and flushed together
pub const DEFAULT_BATCH_SIZE: usize = 4096;

// =============================================================================
// File format
// =============================================================================

/// Extension of table files
pub const TABLE_FILE_EXTENSION: &str = "txt";

/// Extension of checkpoint files
pub const CHECKPOINT_FILE_EXTENSION: &str = "ckpt.json";

/// Checkpoint format version
pub const CHECKPOINT_VERSION: u16 = 1;
