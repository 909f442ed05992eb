//! Infrastructure layer - I/O and external dependencies
//!
//! This module handles file operations and other external dependencies.

pub mod checkpoint;
pub mod table_io;
pub mod table_merge;
