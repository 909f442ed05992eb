//! alnum7-rainbow - Rainbow tables for 7-character alphanumeric passwords
//!
//! This crate provides functionality to:
//! - Build rainbow tables over the 62^7 password space (SHA3-256, 0-9 a-z A-Z)
//! - Store tables as plain text, one password per line, chains separated by blank lines
//! - Recover a password from its SHA3-256 digest using a loaded table

pub mod constants;
pub mod config;
pub mod error;
pub mod domain;
pub mod infra;
pub mod app;

// Re-export commonly used types
pub use constants::*;
pub use config::TableConfig;
pub use domain::chain::{Chain, ChainEntry, generate_chain, generate_chain_with};
pub use domain::digest::Digest;
pub use domain::hash::{hash_bytes, hash_password};
pub use domain::password::Password;
pub use domain::reduction::{Reducer, ReductionStrategy, reduce};
pub use domain::table::Table;
pub use domain::table_format::StoragePolicy;
pub use error::{Error, Result};
