//! Directory entry decoding and payload resolution.
//!
//! # Entry Layout
//! ```text
//! [4 bytes] tag
//! [4 bytes] instance
//! [2 bytes] data type
//! [2 bytes] data size (element width)
//! [4 bytes] element count
//! [4 bytes] byte count
//! [4 bytes] value, or offset of the data relative to the header
//! [4 bytes] spare
//! ```
//!
//! Data of at most 4 bytes is stored in the value field itself. Anything
//! larger lives elsewhere in the container and the value field points at it.

use log::trace;

use crate::abif::cursor::ByteCursor;
use crate::abif::types::{
    error::{AbifError, Result},
    models::Record,
};

/// Size of one directory entry in bytes.
pub const ENTRY_LEN: usize = 28;

/// Largest byte count stored inline in the value field.
pub const INLINE_LIMIT: i32 = 4;

/// Reads one directory entry at the cursor and advances past it.
///
/// The payload is left unresolved; see [`resolve_payload`].
pub fn decode_entry(cursor: &mut ByteCursor<'_>) -> Result<Record> {
    let directory_offset = cursor.position();
    if cursor.remaining() < ENTRY_LEN {
        return Err(AbifError::Truncated {
            offset: directory_offset,
            needed: ENTRY_LEN,
            available: cursor.remaining(),
        });
    }

    let tag = cursor.read_tag()?;
    let instance = cursor.read_i32_be()?;
    let data_type = cursor.read_u16_be()?;
    let data_size = cursor.read_u16_be()?;
    let record_count = cursor.read_i32_be()?;
    let byte_count = cursor.read_i32_be()?;
    let raw_value = cursor.read_i32_be()?;
    let spare = cursor.read_i32_be()?;

    let record = Record {
        tag,
        instance,
        data_type,
        data_size,
        record_count,
        byte_count,
        raw_value,
        spare,
        payload: None,
        directory_offset,
        entry_end_offset: cursor.position(),
    };

    trace!(
        "Entry at {}: {} #{} type={} size={} count={} bytes={} value={:#010x}",
        directory_offset,
        record.tag,
        record.instance,
        record.data_type,
        record.data_size,
        record.record_count,
        record.byte_count,
        record.raw_value
    );

    Ok(record)
}

/// Copies out-of-line data into `record.payload`.
///
/// Records with `byte_count > 4` get exactly `byte_count` bytes copied from
/// `header_offset + raw_value`. Smaller records are left untouched.
///
/// # Errors
/// - [`AbifError::InvalidFormat`] if the data offset is negative
/// - [`AbifError::Truncated`] if the data runs past the end of the buffer
pub fn resolve_payload(record: &mut Record, data: &[u8], header_offset: usize) -> Result<()> {
    if record.byte_count <= INLINE_LIMIT {
        return Ok(());
    }

    let relative = usize::try_from(record.raw_value).map_err(|_| {
        AbifError::InvalidFormat(format!(
            "Negative data offset {} for {} #{}",
            record.raw_value, record.tag, record.instance
        ))
    })?;

    let mut cursor = ByteCursor::at(data, header_offset + relative);
    let payload = cursor.read_bytes(record.byte_count as usize)?;
    record.payload = Some(payload.to_vec());
    Ok(())
}
