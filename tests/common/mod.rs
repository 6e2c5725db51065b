//! Builds synthetic ABIF containers for the integration tests.

#![allow(dead_code)]

/// Size of the fixed ABIF header block; the data area starts after it.
pub const HEADER_BLOCK_LEN: usize = 128;

/// One directory entry to be written.
#[derive(Clone)]
pub struct Entry {
    pub tag: [u8; 4],
    pub instance: i32,
    pub data_type: u16,
    pub data_size: u16,
    pub record_count: i32,
    pub byte_count: i32,
    pub value: Value,
    pub spare: i32,
}

#[derive(Clone)]
pub enum Value {
    /// Written verbatim into the value field.
    Inline([u8; 4]),
    /// Appended to the data area; the value field points at it.
    OutOfLine(Vec<u8>),
    /// Written verbatim into the value field, nothing appended.
    Raw(i32),
}

impl Entry {
    pub fn inline(tag: &[u8; 4], instance: i32, bytes: [u8; 4], byte_count: i32) -> Self {
        Self {
            tag: *tag,
            instance,
            data_type: 2,
            data_size: 1,
            record_count: byte_count,
            byte_count,
            value: Value::Inline(bytes),
            spare: 0,
        }
    }

    pub fn payload(tag: &[u8; 4], instance: i32, bytes: &[u8]) -> Self {
        Self {
            tag: *tag,
            instance,
            data_type: 2,
            data_size: 1,
            record_count: bytes.len() as i32,
            byte_count: bytes.len() as i32,
            value: Value::OutOfLine(bytes.to_vec()),
            spare: 0,
        }
    }

    pub fn raw(tag: &[u8; 4], instance: i32, byte_count: i32, raw_value: i32) -> Self {
        Self {
            tag: *tag,
            instance,
            data_type: 4,
            data_size: 2,
            record_count: 0,
            byte_count,
            value: Value::Raw(raw_value),
            spare: 0,
        }
    }

    pub fn with_types(mut self, data_type: u16, data_size: u16) -> Self {
        self.data_type = data_type;
        self.data_size = data_size;
        self
    }

    pub fn with_spare(mut self, spare: i32) -> Self {
        self.spare = spare;
        self
    }
}

/// Lays out a container as: [pad] header block, data area, directory table.
#[derive(Clone, Default)]
pub struct ContainerBuilder {
    entries: Vec<Entry>,
    mac_pad: bool,
    directory_instance: Option<i32>,
    directory_tag: Option<[u8; 4]>,
    entry_count: Option<i32>,
}

impl ContainerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entry(mut self, entry: Entry) -> Self {
        self.entries.push(entry);
        self
    }

    /// Prepends a 128-byte pad before the magic.
    pub fn mac_pad(mut self) -> Self {
        self.mac_pad = true;
        self
    }

    pub fn directory_instance(mut self, instance: i32) -> Self {
        self.directory_instance = Some(instance);
        self
    }

    pub fn directory_tag(mut self, tag: &[u8; 4]) -> Self {
        self.directory_tag = Some(*tag);
        self
    }

    /// Overrides the entry count written into the header.
    pub fn entry_count(mut self, count: i32) -> Self {
        self.entry_count = Some(count);
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut body = vec![0u8; HEADER_BLOCK_LEN];

        let mut values = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            let raw = match &entry.value {
                Value::Inline(bytes) => *bytes,
                Value::Raw(v) => v.to_be_bytes(),
                Value::OutOfLine(bytes) => {
                    let offset = body.len() as i32;
                    body.extend_from_slice(bytes);
                    offset.to_be_bytes()
                }
            };
            values.push(raw);
        }

        let directory_offset = body.len() as i32;
        for (entry, raw) in self.entries.iter().zip(&values) {
            body.extend_from_slice(&entry.tag);
            body.extend_from_slice(&entry.instance.to_be_bytes());
            body.extend_from_slice(&entry.data_type.to_be_bytes());
            body.extend_from_slice(&entry.data_size.to_be_bytes());
            body.extend_from_slice(&entry.record_count.to_be_bytes());
            body.extend_from_slice(&entry.byte_count.to_be_bytes());
            body.extend_from_slice(raw);
            body.extend_from_slice(&entry.spare.to_be_bytes());
        }

        let count = self.entry_count.unwrap_or(self.entries.len() as i32);
        body[0..4].copy_from_slice(b"ABIF");
        body[4..6].copy_from_slice(&101u16.to_be_bytes());
        body[6..10].copy_from_slice(&self.directory_tag.unwrap_or(*b"tdir"));
        body[10..14].copy_from_slice(&self.directory_instance.unwrap_or(1).to_be_bytes());
        body[14..16].copy_from_slice(&1023u16.to_be_bytes());
        body[16..18].copy_from_slice(&28u16.to_be_bytes());
        body[18..22].copy_from_slice(&count.to_be_bytes());
        body[22..26].copy_from_slice(&directory_offset.to_be_bytes());

        if self.mac_pad {
            let mut padded = vec![0u8; 128];
            padded.extend_from_slice(&body);
            padded
        } else {
            body
        }
    }
}

/// Offset of the directory table relative to the header start.
pub fn directory_offset(container: &[u8], header_offset: usize) -> usize {
    let at = header_offset + 22;
    u32::from_be_bytes([container[at], container[at + 1], container[at + 2], container[at + 3]]) as usize
}
