use thiserror::Error;

/// Errors produced while decoding NTFS metadata.
#[derive(Error, Debug)]
pub enum NtfsError {
    #[error("truncated {structure}: need {needed} bytes, got {actual}")]
    TruncatedInput {
        structure: &'static str,
        needed: usize,
        actual: usize,
    },

    /// `attribute_offset` is where the attribute's header starts in the record;
    /// `offset` and `len` are the range that did not fit.
    #[error("attribute #{attribute} at {attribute_offset}: {len} bytes at offset {offset} exceed buffer of {available} bytes")]
    OutOfBounds {
        attribute: usize,
        attribute_offset: usize,
        offset: usize,
        len: usize,
        available: usize,
    },

    #[error("invalid boot sector signature {found:#06X} (expected 0xAA55)")]
    InvalidBootSector { found: u16 },

    #[error("attribute name at offset {offset} is not valid UTF-16")]
    InvalidEncoding { offset: usize },

    #[error("invalid volume geometry: {0}")]
    InvalidGeometry(String),

    #[error("read failed: {0}")]
    ReadError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, NtfsError>;
