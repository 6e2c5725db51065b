//! # abif-reader
//!
//! A reader for ABIF trace containers (`.ab1`/`.abi`), the tagged binary
//! format written by capillary-electrophoresis sequencers.
//!
//! The whole container is parsed into a directory of records keyed by a
//! 4-character tag and an instance number, with typed accessors for
//! integer, string, Pascal-string and raw-byte values.
//!
//! ```no_run
//! # use abif_reader::RecordStore;
//! let store = RecordStore::open("sample.ab1")?;
//! println!("{}", store.get_pascal_string("SMPL", 1));
//! println!("{}", store.try_sequence_bases(2)?);
//! # Ok::<(), abif_reader::AbifError>(())
//! ```
pub mod abif;

// Re-export the main types for convenience
pub use abif::{
    parse,
    tags,
    AbifError,
    DirectoryHeader,
    ParseOptions,
    Record,
    RecordStore,
    Result,
    Tag,
};
