pub mod boot;
pub mod record;

use std::fs::File;
use std::io::{BufReader, BufWriter};

use anyhow::{Context, Result};
use tracing::warn;

use ntfs_meta::output::JsonlWriter;
use ntfs_meta::{ImageReader, NtfsParser};

/// Unit of the `--offset` flag.
const SECTOR_UNIT: u64 = 512;

pub type ImageParser = NtfsParser<ImageReader<BufReader<File>>>;

pub fn open_parser(image: &str, offset_sectors: u64, lenient: bool) -> Result<ImageParser> {
    let partition_offset = offset_sectors
        .checked_mul(SECTOR_UNIT)
        .with_context(|| format!("partition offset of {} sectors overflows", offset_sectors))?;

    let source = ImageReader::open(image).with_context(|| format!("cannot open image {}", image))?;
    let parser = if lenient {
        NtfsParser::new_lenient(source, partition_offset)
    } else {
        NtfsParser::new(source, partition_offset)
    }
    .with_context(|| format!("no usable boot sector at byte {:#X} of {}", partition_offset, image))?;

    if !parser.boot_sector().is_ntfs() {
        warn!(oem = parser.boot_sector().oem_id(), "OEM ID is not NTFS");
    }
    Ok(parser)
}

pub fn create_jsonl(path: &str) -> Result<JsonlWriter<BufWriter<File>>> {
    let file = File::create(path).with_context(|| format!("cannot create {}", path))?;
    Ok(JsonlWriter::new(BufWriter::new(file)))
}
