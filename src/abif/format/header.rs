//! ABIF header location and directory-table descriptor parsing.
//!
//! Containers written on classic Mac OS carry a 128-byte resource header
//! before the `ABIF` magic, so the magic is looked for at offset 0 first and
//! at offset 128 second.

use log::{debug, warn};

use crate::abif::cursor::ByteCursor;
use crate::abif::types::{
    error::{AbifError, Result},
    models::{tags, DirectoryHeader, ParseOptions},
};

/// The container magic.
pub const MAGIC: &[u8; 4] = b"ABIF";

/// Size of the leading pad some platforms prepend to the container.
pub const MAC_HEADER_LEN: usize = 128;

/// Bytes from the magic to the directory entry count.
pub const DIRECTORY_COUNT_OFFSET: usize = 18;

/// Bytes from the magic to the end of the directory descriptor.
pub const DIRECTORY_HEADER_LEN: usize = 26;

/// Returns the absolute offset of the `ABIF` magic, if present at 0 or 128.
pub fn locate_header(data: &[u8]) -> Option<usize> {
    [0, MAC_HEADER_LEN]
        .into_iter()
        .find(|&offset| data.get(offset..offset + MAGIC.len()) == Some(MAGIC.as_slice()))
}

/// Reads the directory-table descriptor that follows the magic at `header_offset`.
///
/// # Errors
/// - [`AbifError::Truncated`] if the buffer ends inside the descriptor
/// - [`AbifError::InvalidFormat`] if the directory instance is not 1 (strict
///   mode) or the entry count is negative
pub fn read_directory_header(
    data: &[u8],
    header_offset: usize,
    options: &ParseOptions,
) -> Result<DirectoryHeader> {
    let mut cursor = ByteCursor::at(data, header_offset);

    let magic = cursor.read_bytes(MAGIC.len())?;
    if magic != MAGIC {
        return Err(AbifError::InvalidFormat(format!(
            "Missing ABIF magic at offset {}",
            header_offset
        )));
    }

    let version = cursor.read_u16_be()?;
    let tag = cursor.read_tag()?;
    let instance = cursor.read_i32_be()?;
    let data_type = cursor.read_u16_be()?;
    let data_size = cursor.read_u16_be()?;
    debug_assert_eq!(cursor.position() - header_offset, DIRECTORY_COUNT_OFFSET);
    let entry_count = cursor.read_i32_be()?;
    let entries_offset = cursor.read_i32_be()?;

    debug!(
        "Directory header at {}: version={}, tag={}, instance={}, entries={}, first entry at +{}",
        header_offset, version, tag, instance, entry_count, entries_offset
    );

    if tag != tags::TDIR {
        warn!("Unexpected directory tag '{}', expected '{}'", tag, tags::TDIR);
    }

    if instance != 1 && options.strict_directory_instance {
        return Err(AbifError::InvalidFormat(format!(
            "Directory instance must be 1, found {}",
            instance
        )));
    }

    if entry_count < 0 {
        return Err(AbifError::InvalidFormat(format!(
            "Negative directory entry count: {}",
            entry_count
        )));
    }

    Ok(DirectoryHeader {
        header_offset,
        version,
        tag,
        instance,
        data_type,
        data_size,
        entry_count,
        entries_offset,
    })
}
