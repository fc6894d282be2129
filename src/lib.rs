//! Decoder for NTFS on-disk metadata: the volume boot sector and MFT file
//! records, read from a raw disk image without mounting it.

pub mod error;
pub mod mft;
pub mod models;
pub mod output;
pub mod source;

pub use error::{NtfsError, Result};
pub use mft::attributes::{Attribute, AttributeType};
pub use mft::boot::BootSector;
pub use mft::parser::NtfsParser;
pub use mft::record::MftRecord;
pub use source::{BlockSource, ImageReader};
