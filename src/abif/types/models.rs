//! Core data structures for ABIF container components.
//!
//! This module defines the fundamental types used throughout the library:
//! - Record tags and decoded directory entries
//! - The directory-table header
//! - Parse-time configuration

use std::borrow::Cow;
use std::fmt;

use encoding_rs::{Encoding, WINDOWS_1252};

use super::error::{AbifError, Result};

/// Well-known record tags.
///
/// Only [`PBAS`](tags::PBAS) has a dedicated accessor; the rest are listed so
/// callers do not have to spell them out.
pub mod tags {
    use super::Tag;

    /// Base calls. Instance 1 holds the edited bases, instance 2 the called ones.
    pub const PBAS: Tag = Tag::new(*b"PBAS");
    /// Peak locations, one 16-bit index per base.
    pub const PLOC: Tag = Tag::new(*b"PLOC");
    /// Per-base quality values.
    pub const PCON: Tag = Tag::new(*b"PCON");
    /// Sample name (Pascal string).
    pub const SMPL: Tag = Tag::new(*b"SMPL");
    /// Instrument name (Pascal string).
    pub const MCHN: Tag = Tag::new(*b"MCHN");
    /// Raw and analyzed trace channels.
    pub const DATA: Tag = Tag::new(*b"DATA");
    /// Base order of the four analyzed channels.
    pub const FWO: Tag = Tag::new(*b"FWO_");
    /// Tag of the directory table itself.
    pub const TDIR: Tag = Tag::new(*b"tdir");
}

/// A 4-byte record identifier such as `PBAS` or `DATA`.
///
/// Tags are compared byte for byte. They are usually ASCII but nothing in the
/// format enforces that, so the raw bytes are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tag([u8; 4]);

impl Tag {
    pub const fn new(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }

    /// Decodes the tag with the given single-byte encoding.
    pub fn decode(&self, encoding: &'static Encoding) -> String {
        let (text, _) = encoding.decode_without_bom_handling(&self.0);
        text.into_owned()
    }
}

impl AsRef<[u8]> for Tag {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 4]> for Tag {
    fn from(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }
}

impl TryFrom<&str> for Tag {
    type Error = AbifError;
    fn try_from(value: &str) -> Result<Self> {
        let bytes: [u8; 4] = value.as_bytes().try_into().map_err(|_| {
            AbifError::InvalidFormat(format!("Tag must be exactly 4 bytes, got {:?}", value))
        })?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.decode(WINDOWS_1252))
    }
}

/// One decoded directory entry.
///
/// The entry's 4-byte `raw_value` either holds the data itself (when
/// `byte_count <= 4`) or the offset of the data relative to the header start.
/// In the latter case the data is copied into `payload` during parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub tag: Tag,
    pub instance: i32,
    pub data_type: u16,
    pub data_size: u16,
    /// Number of logical elements in the data.
    pub record_count: i32,
    /// Total size of the data in bytes.
    pub byte_count: i32,
    pub raw_value: i32,
    /// Reserved; preserved but not interpreted.
    pub spare: i32,
    /// Out-of-line data, exactly `byte_count` bytes. `None` when inline.
    pub payload: Option<Vec<u8>>,
    /// Absolute offset of the directory entry.
    pub directory_offset: usize,
    /// Absolute offset just past the directory entry.
    pub entry_end_offset: usize,
}

impl Record {
    /// Returns `true` when the value is carried in `raw_value`.
    pub fn is_inline(&self) -> bool {
        self.payload.is_none()
    }

    /// The `raw_value` field as it appeared on disk.
    pub fn inline_bytes(&self) -> [u8; 4] {
        self.raw_value.to_be_bytes()
    }

    /// The record's data: the payload, or the first `byte_count` inline bytes.
    pub fn data(&self) -> Cow<'_, [u8]> {
        match &self.payload {
            Some(payload) => Cow::Borrowed(payload.as_slice()),
            None => {
                let len = self.byte_count.clamp(0, 4) as usize;
                Cow::Owned(self.inline_bytes()[..len].to_vec())
            }
        }
    }

    /// Decodes the data as a length-prefixed string.
    ///
    /// With a payload, `payload[0]` is the length and the characters follow.
    /// A length running past the payload yields whatever bytes are there.
    ///
    /// Inline values are read from bytes 1..=3 of the big-endian `raw_value`;
    /// byte 0 is never used, and the text ends at the first NUL.
    pub fn pascal_string(&self, encoding: &'static Encoding) -> String {
        let text: &[u8] = match &self.payload {
            Some(payload) => match payload.split_first() {
                Some((&len, rest)) => &rest[..rest.len().min(len as usize)],
                None => &[],
            },
            None => {
                let bytes = self.inline_bytes();
                let tail = &bytes[1..];
                let end = tail.iter().position(|&b| b == 0).unwrap_or(tail.len());
                return decode_bytes(&tail[..end], encoding);
            }
        };
        decode_bytes(text, encoding)
    }

    /// Decodes the whole payload byte for byte. Inline records yield an empty string.
    pub fn payload_string(&self, encoding: &'static Encoding) -> String {
        self.payload
            .as_deref()
            .map(|payload| decode_bytes(payload, encoding))
            .unwrap_or_default()
    }
}

pub(crate) fn decode_bytes(bytes: &[u8], encoding: &'static Encoding) -> String {
    let (text, _) = encoding.decode_without_bom_handling(bytes);
    text.into_owned()
}

/// The directory-table descriptor that follows the `ABIF` magic.
///
/// ```text
/// offset  field                      width
///   0     "ABIF"                       4
///   4     version                      2
///   6     directory tag ("tdir")       4
///  10     directory instance (1)       4
///  14     data type                    2
///  16     data size                    2
///  18     entry count                  4
///  22     first-entry offset           4
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectoryHeader {
    /// Absolute position of the `ABIF` magic (0, or 128 with a leading pad).
    pub header_offset: usize,
    pub version: u16,
    pub tag: Tag,
    pub instance: i32,
    pub data_type: u16,
    pub data_size: u16,
    /// Number of directory entries to read.
    pub entry_count: i32,
    /// Offset of the first entry, relative to `header_offset`.
    pub entries_offset: i32,
}

/// Options controlling how a container is parsed.
#[derive(Debug, Clone, Copy)]
pub struct ParseOptions {
    /// Reject containers whose directory instance is not 1.
    pub strict_directory_instance: bool,
    /// Encoding used for tags and string accessors.
    pub encoding: &'static Encoding,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            strict_directory_instance: true,
            encoding: WINDOWS_1252,
        }
    }
}

impl ParseOptions {
    pub fn with_strict_directory_instance(mut self, strict: bool) -> Self {
        self.strict_directory_instance = strict;
        self
    }

    pub fn with_encoding(mut self, encoding: &'static Encoding) -> Self {
        self.encoding = encoding;
        self
    }
}
