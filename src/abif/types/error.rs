//! Custom error types for the abif-reader crate.

use thiserror::Error;

/// The primary error type for all operations in this crate.
#[derive(Debug, Error)]
pub enum AbifError {
    /// An error originating from I/O operations.
    #[error("I/O error: {0:?}")]
    Io(#[from] std::io::Error),

    /// The buffer is not an ABIF container, or a structural field holds a value
    /// the format does not allow.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// A read would run past the end of the buffer.
    #[error("Truncated data: need {needed} bytes at offset {offset}, but only {available} available")]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// No record carries the requested tag/instance pair.
    #[error("Record not found: {tag} #{instance}")]
    RecordNotFound { tag: String, instance: i32 },

    /// A lookup the caller guaranteed to succeed did not.
    #[error("Precondition violated: {0}")]
    PreconditionViolation(String),
}

/// A convenience `Result` type alias using the crate's `AbifError` type.
pub type Result<T> = std::result::Result<T, AbifError>;
