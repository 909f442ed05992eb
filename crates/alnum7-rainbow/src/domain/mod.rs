//! Domain layer - Pure computational logic
//!
//! This module contains pure functions and algorithms without I/O dependencies.

pub mod chain;
pub mod coverage;
pub mod digest;
pub mod hash;
pub mod password;
pub mod reduction;
pub mod seed;
pub mod table;
pub mod table_format;
