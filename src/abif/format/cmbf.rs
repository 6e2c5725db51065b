//! Backward scan for the legacy `CMBF` marker.

/// The marker searched for.
pub const CMBF_MARKER: &[u8; 4] = b"CMBF";

/// Bytes at the end of the buffer the scan never starts in.
const TAIL_LEN: usize = 8;

/// Finds the last `CMBF` marker, scanning backward from 8 bytes before the end.
///
/// Offset 0 itself is never reported, and buffers shorter than 9 bytes never
/// match. Returns the marker's offset from the start of `data`.
pub fn find_cmbf(data: &[u8]) -> Option<usize> {
    let start = data.len().checked_sub(TAIL_LEN)?;
    (1..=start)
        .rev()
        .find(|&pos| data[pos..].starts_with(CMBF_MARKER))
}
