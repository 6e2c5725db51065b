use std::borrow::Cow;
use std::fs;
use std::path::Path;

use encoding_rs::Encoding;
use log::info;

use super::format::{self, ParsedContainer};
use super::types::error::{AbifError, Result};
use super::types::models::*;

/// The decoded directory of an ABIF container.
///
/// Holds every record with a positive byte count, in directory order, with
/// out-of-line data copied in. The store never borrows from the source buffer.
///
/// Lookups are keyed by a 4-byte tag and an instance number. Misses are
/// ordinary: the plain accessors return `0` or an empty string.
#[derive(Debug, Clone)]
pub struct RecordStore {
    directory: DirectoryHeader,
    records: Vec<Record>,
    options: ParseOptions,
}

impl RecordStore {
    /// Read and parse an ABIF file from the given path.
    ///
    /// # Errors
    /// Returns an error if:
    /// - File cannot be read
    /// - No `ABIF` magic is found at offset 0 or 128
    /// - The directory or a payload runs past the end of the file
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_options(path, ParseOptions::default())
    }

    pub fn open_with_options(path: impl AsRef<Path>, options: ParseOptions) -> Result<Self> {
        let path = path.as_ref();
        info!("Opening ABIF file: {}", path.display());
        let data = fs::read(path)?;
        Self::from_bytes_with_options(&data, options)
    }

    /// Parse a container already held in memory.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_bytes_with_options(data, ParseOptions::default())
    }

    pub fn from_bytes_with_options(data: &[u8], options: ParseOptions) -> Result<Self> {
        let ParsedContainer { header, records } = format::parse(data, &options)?;
        Ok(Self {
            directory: header,
            records,
            options,
        })
    }

    /// Re-parses `data` with this store's options.
    ///
    /// On success every previous record is replaced. On failure the store is
    /// left exactly as it was.
    pub fn reload(&mut self, data: &[u8]) -> Result<()> {
        let ParsedContainer { header, records } = format::parse(data, &self.options)?;
        self.directory = header;
        self.records = records;
        Ok(())
    }

    /// Absolute offset of the `ABIF` magic: 0, or 128 with a Mac pad.
    pub fn header_offset(&self) -> usize {
        self.directory.header_offset
    }

    pub fn directory(&self) -> &DirectoryHeader {
        &self.directory
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    pub fn encoding(&self) -> &'static Encoding {
        self.options.encoding
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Index of the first record matching `tag` and `instance`.
    pub fn find(&self, tag: impl AsRef<[u8]>, instance: i32) -> Option<usize> {
        let tag = tag.as_ref();
        self.records
            .iter()
            .position(|r| r.tag.as_bytes() == tag && r.instance == instance)
    }

    pub fn record(&self, tag: impl AsRef<[u8]>, instance: i32) -> Option<&Record> {
        self.find(tag, instance).map(|i| &self.records[i])
    }

    /// Like [`record`](Self::record), but a miss is an error.
    pub fn require(&self, tag: impl AsRef<[u8]>, instance: i32) -> Result<&Record> {
        let tag = tag.as_ref();
        self.record(tag, instance).ok_or_else(|| AbifError::RecordNotFound {
            tag: decode_bytes(tag, self.encoding()),
            instance,
        })
    }

    /// The record's raw 4-byte value field, or `0` if there is no such record.
    ///
    /// For inline records this is the data itself; otherwise it is the data's
    /// offset relative to the header.
    pub fn get_value(&self, tag: impl AsRef<[u8]>, instance: i32) -> i32 {
        self.record(tag, instance).map_or(0, |r| r.raw_value)
    }

    /// The record's data bytes, inline or out-of-line.
    pub fn get_raw_bytes(&self, tag: impl AsRef<[u8]>, instance: i32) -> Option<Cow<'_, [u8]>> {
        self.record(tag, instance).map(Record::data)
    }

    /// The whole payload decoded byte for byte, or an empty string.
    pub fn get_bytes_as_string(&self, tag: impl AsRef<[u8]>, instance: i32) -> String {
        self.record(tag, instance)
            .map(|r| r.payload_string(self.encoding()))
            .unwrap_or_default()
    }

    /// The record decoded as a length-prefixed string, or an empty string.
    ///
    /// See [`Record::pascal_string`] for how inline values are handled.
    pub fn get_pascal_string(&self, tag: impl AsRef<[u8]>, instance: i32) -> String {
        self.record(tag, instance)
            .map(|r| r.pascal_string(self.encoding()))
            .unwrap_or_default()
    }

    /// The `PBAS` base calls for `instance`, as stored (no length prefix).
    ///
    /// # Errors
    /// Returns [`AbifError::PreconditionViolation`] if the container has no
    /// `PBAS` record with that instance.
    pub fn try_sequence_bases(&self, instance: i32) -> Result<String> {
        let record = self.record(tags::PBAS, instance).ok_or_else(|| {
            AbifError::PreconditionViolation(format!(
                "container has no {} record with instance {}",
                tags::PBAS,
                instance
            ))
        })?;
        Ok(decode_bytes(&record.data(), self.encoding()))
    }

    /// The `PBAS` base calls for `instance`, as stored (no length prefix).
    ///
    /// # Panics
    /// Panics if the container has no `PBAS` record with that instance. Use
    /// [`try_sequence_bases`](Self::try_sequence_bases) when that is not
    /// guaranteed.
    pub fn get_sequence_bases(&self, instance: i32) -> String {
        match self.try_sequence_bases(instance) {
            Ok(bases) => bases,
            Err(e) => panic!("RecordStore::get_sequence_bases: {}", e),
        }
    }
}

impl<'a> IntoIterator for &'a RecordStore {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
