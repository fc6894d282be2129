use serde::Serialize;

use crate::mft::attributes::Attribute;
use crate::mft::boot::BootSector;
use crate::mft::record::MftRecord;

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct BootReport {
    pub source: String,
    pub partition_offset: u64,
    pub oem_id: String,
    pub bytes_per_sector: u16,
    pub sectors_per_cluster: u8,
    pub bytes_per_cluster: Option<u64>,
    pub media_descriptor: u8,
    pub total_sectors: u64,
    pub mft_start_cluster: u64,
    pub mft_mirror_start_cluster: u64,
    pub mft_entry_size: Option<u32>,
    pub index_record_size: Option<u32>,
    pub serial_number: String,
    pub boot_signature: String,
    pub valid_signature: bool,
}

impl BootReport {
    pub fn new(boot: &BootSector, partition_offset: u64, source: &str) -> Self {
        Self {
            source: source.to_string(),
            partition_offset,
            oem_id: boot.oem_id().to_string(),
            bytes_per_sector: boot.bytes_per_sector(),
            sectors_per_cluster: boot.sectors_per_cluster(),
            bytes_per_cluster: boot.bytes_per_cluster(),
            media_descriptor: boot.media_descriptor(),
            total_sectors: boot.total_sectors(),
            mft_start_cluster: boot.mft_start_cluster(),
            mft_mirror_start_cluster: boot.mft_mirror_start_cluster(),
            mft_entry_size: boot.mft_entry_size(),
            index_record_size: boot.index_record_size(),
            serial_number: boot.serial_number(),
            boot_signature: format!("{:04X}", boot.boot_signature()),
            valid_signature: boot.has_valid_signature(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RecordReport {
    pub entry_number: u64,
    pub image_offset: u64,
    pub signature: String,
    pub fixup_array_offset: u16,
    pub fixup_entry_count: u16,
    pub logfile_sequence_number: u64,
    pub sequence_number: u16,
    pub hard_link_count: u16,
    pub first_attribute_offset: u16,
    pub flags: u16,
    pub in_use: bool,
    pub is_directory: bool,
    pub used_size: u32,
    pub allocated_size: u32,
    pub base_record_reference: u64,
    pub next_attribute_id: u16,
    pub attributes: Vec<AttributeReport>,
}

impl RecordReport {
    pub fn new(entry_number: u64, image_offset: u64, record: &MftRecord, with_content: bool) -> Self {
        Self {
            entry_number,
            image_offset,
            signature: record.signature().to_string(),
            fixup_array_offset: record.fixup_array_offset(),
            fixup_entry_count: record.fixup_entry_count(),
            logfile_sequence_number: record.logfile_sequence_number(),
            sequence_number: record.sequence_number(),
            hard_link_count: record.hard_link_count(),
            first_attribute_offset: record.first_attribute_offset(),
            flags: record.flags(),
            in_use: record.is_in_use(),
            is_directory: record.is_directory(),
            used_size: record.used_size(),
            allocated_size: record.allocated_size(),
            base_record_reference: record.base_record_reference(),
            next_attribute_id: record.next_attribute_id(),
            attributes: record
                .attributes()
                .iter()
                .map(|a| AttributeReport::new(a, with_content))
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AttributeReport {
    pub record_offset: usize,
    pub type_code: u32,
    pub type_name: &'static str,
    pub total_length: u32,
    pub non_resident: bool,
    pub name_length: u8,
    pub name_offset: u16,
    pub name: Option<String>,
    pub flags: u16,
    pub compressed: bool,
    pub encrypted: bool,
    pub sparse: bool,
    pub attribute_id: u16,
    pub content_size: Option<usize>,
    pub content_offset: Option<u16>,
    /// Hex of the resident value, only when requested.
    pub content: Option<String>,
}

impl AttributeReport {
    pub fn new(attr: &Attribute, with_content: bool) -> Self {
        // Printing still wants something for a malformed name.
        let name = match attr.name() {
            Ok(name) => name,
            Err(_) => Some(String::from_utf16_lossy(&attr.name_units())),
        };
        let content = attr.resident_content();

        Self {
            record_offset: attr.record_offset(),
            type_code: attr.type_code(),
            type_name: attr.attribute_type().name(),
            total_length: attr.total_length(),
            non_resident: attr.is_non_resident(),
            name_length: attr.name_length(),
            name_offset: attr.name_offset(),
            name,
            flags: attr.flags(),
            compressed: attr.is_compressed(),
            encrypted: attr.is_encrypted(),
            sparse: attr.is_sparse(),
            attribute_id: attr.attribute_id(),
            content_size: content.map(<[u8]>::len),
            content_offset: attr.content_offset(),
            content: content.filter(|_| with_content).map(hex::encode_upper),
        }
    }
}
