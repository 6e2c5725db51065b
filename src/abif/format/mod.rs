//! Container parsing layer for ABIF files.
//!
//! This module turns a complete in-memory container into its directory of
//! records. It sits between the high-level
//! [`RecordStore`](crate::abif::reader::RecordStore) and the low-level
//! [`ByteCursor`](crate::abif::cursor::ByteCursor).
//!
//! # Module Organization
//!
//! - [`header`]: Locates the `ABIF` magic and reads the directory descriptor
//! - [`directory`]: Decodes 28-byte directory entries and their payloads
//! - [`cmbf`]: Backward scan for the legacy `CMBF` marker
//!
//! # Architecture
//!
//! ```text
//! File Structure:
//! ┌─────────────────────┐
//! │  Mac pad (optional) │ 128 bytes
//! ├─────────────────────┤
//! │  ABIF header        │ ← header::read_directory_header()
//! ├─────────────────────┤
//! │  Record data        │ ← directory::resolve_payload()
//! │  (out-of-line)      │
//! ├─────────────────────┤
//! │  Directory table    │ ← directory::decode_entry()
//! │  (N × 28 bytes)     │
//! └─────────────────────┘
//! ```
//!
//! All offsets inside the container are relative to the `ABIF` magic, not
//! to the start of the buffer.

pub mod cmbf;
pub mod directory;
pub mod header;

use log::{debug, info, trace};

use crate::abif::cursor::ByteCursor;
use crate::abif::types::{
    error::{AbifError, Result},
    models::{DirectoryHeader, ParseOptions, Record},
};

/// The outcome of a successful parse.
#[derive(Debug, Clone)]
pub struct ParsedContainer {
    pub header: DirectoryHeader,
    /// Records with a positive byte count, in directory order.
    pub records: Vec<Record>,
}

/// Parses a complete ABIF container.
///
/// Reads exactly `entry_count` directory entries. Entries whose byte count is
/// zero or negative are dropped; all others are kept with their out-of-line
/// data copied, so the result does not borrow from `data`.
///
/// # Errors
/// - [`AbifError::Truncated`] if the buffer is shorter than a bare header, or
///   the directory or any payload runs past the end
/// - [`AbifError::InvalidFormat`] if no `ABIF` magic is found at offset 0 or 128
pub fn parse(data: &[u8], options: &ParseOptions) -> Result<ParsedContainer> {
    let header_offset = locate(data)?;
    debug!("ABIF header located at offset {}", header_offset);

    let header = header::read_directory_header(data, header_offset, options)?;

    let relative = usize::try_from(header.entries_offset).map_err(|_| {
        AbifError::InvalidFormat(format!(
            "Negative directory offset: {}",
            header.entries_offset
        ))
    })?;
    let mut cursor = ByteCursor::at(data, header_offset + relative);

    let capacity = (header.entry_count as usize).min(cursor.remaining() / directory::ENTRY_LEN);
    let mut records = Vec::with_capacity(capacity);
    for _ in 0..header.entry_count {
        let mut record = directory::decode_entry(&mut cursor)?;
        if record.byte_count <= 0 {
            trace!("Dropping empty entry {} #{}", record.tag, record.instance);
            continue;
        }
        directory::resolve_payload(&mut record, data, header_offset)?;
        records.push(record);
    }

    info!(
        "ABIF container parsed: {} directory entries, {} records kept",
        header.entry_count,
        records.len()
    );

    Ok(ParsedContainer { header, records })
}

fn locate(data: &[u8]) -> Result<usize> {
    if data.len() < header::DIRECTORY_HEADER_LEN {
        return Err(AbifError::Truncated {
            offset: 0,
            needed: header::DIRECTORY_HEADER_LEN,
            available: data.len(),
        });
    }

    if let Some(offset) = header::locate_header(data) {
        return Ok(offset);
    }

    let detail = match cmbf::find_cmbf(data) {
        Some(pos) => {
            debug!("No ABIF magic, but a CMBF marker sits at offset {}", pos);
            format!("no ABIF magic at offset 0 or {} (CMBF marker at {})", header::MAC_HEADER_LEN, pos)
        }
        None => format!("no ABIF magic at offset 0 or {}", header::MAC_HEADER_LEN),
    };
    Err(AbifError::InvalidFormat(detail))
}
