use byteorder::{ByteOrder, LittleEndian};
use tracing::warn;

use crate::error::{NtfsError, Result};

pub const BOOT_SECTOR_SIZE: usize = 512;
pub const BOOT_SIGNATURE: u16 = 0xAA55;

/// Volume geometry decoded from the NTFS partition boot sector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootSector {
    oem_id: String,
    bytes_per_sector: u16,
    sectors_per_cluster: u8,
    media_descriptor: u8,
    total_sectors: u64,
    mft_start_cluster: u64,
    mft_mirror_start_cluster: u64,
    raw_mft_entry_size: i8,
    raw_index_record_size: i8,
    serial_number: u64,
    boot_signature: u16,
}

impl BootSector {
    /// Decodes the first 512 bytes of `buf`, rejecting a missing `55 AA`
    /// signature.
    pub fn decode(buf: &[u8]) -> Result<Self> {
        let boot = Self::extract(buf)?;
        if !boot.has_valid_signature() {
            return Err(NtfsError::InvalidBootSector { found: boot.boot_signature });
        }
        Ok(boot)
    }

    /// Same as [`decode`](Self::decode) but keeps going on a bad signature.
    /// Check [`has_valid_signature`](Self::has_valid_signature) afterwards.
    pub fn decode_lenient(buf: &[u8]) -> Result<Self> {
        let boot = Self::extract(buf)?;
        if !boot.has_valid_signature() {
            warn!("boot sector signature mismatch: {:#06X}", boot.boot_signature);
        }
        Ok(boot)
    }

    fn extract(buf: &[u8]) -> Result<Self> {
        if buf.len() < BOOT_SECTOR_SIZE {
            return Err(NtfsError::TruncatedInput {
                structure: "boot sector",
                needed: BOOT_SECTOR_SIZE,
                actual: buf.len(),
            });
        }

        Ok(Self {
            oem_id: String::from_utf8_lossy(&buf[3..10]).into_owned(),
            bytes_per_sector: LittleEndian::read_u16(&buf[11..13]),
            sectors_per_cluster: buf[13],
            media_descriptor: buf[21],
            total_sectors: LittleEndian::read_u64(&buf[40..48]),
            mft_start_cluster: LittleEndian::read_u64(&buf[48..56]),
            mft_mirror_start_cluster: LittleEndian::read_u64(&buf[56..64]),
            raw_mft_entry_size: buf[64] as i8,
            raw_index_record_size: buf[68] as i8,
            serial_number: LittleEndian::read_u64(&buf[72..80]),
            boot_signature: LittleEndian::read_u16(&buf[510..512]),
        })
    }

    pub fn oem_id(&self) -> &str {
        &self.oem_id
    }

    pub fn is_ntfs(&self) -> bool {
        self.oem_id.trim_end() == "NTFS"
    }

    pub fn bytes_per_sector(&self) -> u16 {
        self.bytes_per_sector
    }

    pub fn sectors_per_cluster(&self) -> u8 {
        self.sectors_per_cluster
    }

    pub fn media_descriptor(&self) -> u8 {
        self.media_descriptor
    }

    pub fn total_sectors(&self) -> u64 {
        self.total_sectors
    }

    pub fn mft_start_cluster(&self) -> u64 {
        self.mft_start_cluster
    }

    pub fn mft_mirror_start_cluster(&self) -> u64 {
        self.mft_mirror_start_cluster
    }

    pub fn raw_mft_entry_size(&self) -> i8 {
        self.raw_mft_entry_size
    }

    pub fn raw_index_record_size(&self) -> i8 {
        self.raw_index_record_size
    }

    /// Size of one MFT file record in bytes. `None` when the encoded power of
    /// two does not fit in 32 bits.
    pub fn mft_entry_size(&self) -> Option<u32> {
        decode_size(self.raw_mft_entry_size)
    }

    pub fn index_record_size(&self) -> Option<u32> {
        decode_size(self.raw_index_record_size)
    }

    /// Volume serial number as uppercase hex, at least eight digits wide.
    pub fn serial_number(&self) -> String {
        format!("{:08X}", self.serial_number)
    }

    pub fn raw_serial_number(&self) -> u64 {
        self.serial_number
    }

    pub fn boot_signature(&self) -> u16 {
        self.boot_signature
    }

    pub fn has_valid_signature(&self) -> bool {
        self.boot_signature == BOOT_SIGNATURE
    }

    pub fn bytes_per_cluster(&self) -> Option<u64> {
        (self.bytes_per_sector as u64).checked_mul(self.sectors_per_cluster as u64)
    }

    /// Byte offset of the MFT from the start of the partition.
    pub fn mft_byte_offset(&self) -> Option<u64> {
        self.mft_start_cluster.checked_mul(self.bytes_per_cluster()?)
    }
}

// Non-negative: size in bytes. Negative: 2^|v| bytes.
fn decode_size(raw: i8) -> Option<u32> {
    if raw >= 0 {
        Some(raw as u32)
    } else {
        1u32.checked_shl(raw.unsigned_abs() as u32)
    }
}
