use tracing::{debug, info};

use super::boot::{BootSector, BOOT_SECTOR_SIZE};
use super::record::MftRecord;
use crate::error::{NtfsError, Result};
use crate::source::BlockSource;

/// A parsing session over one NTFS partition inside an image.
///
/// Holds the block source, the partition's byte offset and the boot sector
/// decoded from it. Decoded records are returned by value; nothing is cached.
pub struct NtfsParser<S> {
    source: S,
    partition_offset: u64,
    boot: BootSector,
}

impl<S: BlockSource> NtfsParser<S> {
    pub fn new(source: S, partition_offset: u64) -> Result<Self> {
        Self::open(source, partition_offset, BootSector::decode)
    }

    /// Like [`new`](Self::new) but accepts a boot sector without `55 AA`.
    pub fn new_lenient(source: S, partition_offset: u64) -> Result<Self> {
        Self::open(source, partition_offset, BootSector::decode_lenient)
    }

    fn open(mut source: S, partition_offset: u64, decode: fn(&[u8]) -> Result<BootSector>) -> Result<Self> {
        let vbr = source.read_at(partition_offset, BOOT_SECTOR_SIZE)?;
        let boot = decode(&vbr)?;
        info!(
            partition_offset,
            oem = boot.oem_id(),
            bytes_per_sector = boot.bytes_per_sector(),
            sectors_per_cluster = boot.sectors_per_cluster(),
            mft_cluster = boot.mft_start_cluster(),
            "boot sector decoded"
        );
        Ok(Self { source, partition_offset, boot })
    }

    pub fn boot_sector(&self) -> &BootSector {
        &self.boot
    }

    pub fn partition_offset(&self) -> u64 {
        self.partition_offset
    }

    pub fn record_size(&self) -> Result<usize> {
        match self.boot.mft_entry_size() {
            Some(0) => Err(NtfsError::InvalidGeometry("MFT entry size is zero".into())),
            Some(size) => Ok(size as usize),
            None => Err(NtfsError::InvalidGeometry(format!(
                "MFT entry size exponent {} out of range",
                self.boot.raw_mft_entry_size()
            ))),
        }
    }

    /// Absolute image offset of MFT entry `entry`.
    pub fn record_offset(&self, entry: u64) -> Result<u64> {
        let cluster = match self.boot.bytes_per_cluster() {
            Some(0) | None => {
                return Err(NtfsError::InvalidGeometry(format!(
                    "cluster size is zero ({} bytes/sector, {} sectors/cluster)",
                    self.boot.bytes_per_sector(),
                    self.boot.sectors_per_cluster()
                )))
            }
            Some(c) => c,
        };
        let record_size = self.record_size()? as u64;

        self.boot
            .mft_start_cluster()
            .checked_mul(cluster)
            .and_then(|mft| entry.checked_mul(record_size).and_then(|e| mft.checked_add(e)))
            .and_then(|rel| rel.checked_add(self.partition_offset))
            .ok_or_else(|| NtfsError::InvalidGeometry(format!("offset of MFT entry {} overflows", entry)))
    }

    /// Raw bytes of MFT entry `entry`, no fixups applied.
    pub fn raw_record(&mut self, entry: u64) -> Result<Vec<u8>> {
        let offset = self.record_offset(entry)?;
        let size = self.record_size()?;
        debug!(entry, offset, size, "reading MFT record");
        self.source.read_at(offset, size)
    }

    pub fn read_record(&mut self, entry: u64) -> Result<MftRecord> {
        let raw = self.raw_record(entry)?;
        MftRecord::decode(&raw)
    }

    pub fn into_source(self) -> S {
        self.source
    }
}
