//! Core ABIF reader module.
//!
//! - [`cursor`]: Bounds-checked big-endian reads
//! - [`format`]: Header location, directory decoding, full container parse
//! - [`reader`]: The [`RecordStore`] and its typed accessors
//! - [`types`]: Records, tags, options and the error type

pub mod cursor;
pub mod format;
pub mod reader;
pub mod types;

pub use reader::RecordStore;
pub use types::error::{AbifError, Result};
pub use types::models::{tags, DirectoryHeader, ParseOptions, Record, Tag};

/// Parses a complete ABIF container held in memory with default options.
pub fn parse(data: &[u8]) -> Result<RecordStore> {
    RecordStore::from_bytes(data)
}
