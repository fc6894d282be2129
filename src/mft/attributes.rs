use byteorder::{ByteOrder, LittleEndian};

use super::utils::{decode_utf16le, field, utf16_units};
use crate::error::{NtfsError, Result};

pub const ATTRIBUTE_HEADER_SIZE: usize = 16;
pub const RESIDENT_DESCRIPTOR_SIZE: usize = 6;

pub const FLAG_COMPRESSED: u16 = 0x0001;
pub const FLAG_ENCRYPTED: u16 = 0x4000;
pub const FLAG_SPARSE: u16 = 0x8000;

/// Well-known attribute type codes. Anything else is carried as `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeType {
    StandardInformation,
    AttributeList,
    FileName,
    ObjectId,
    SecurityDescriptor,
    VolumeName,
    VolumeInformation,
    Data,
    IndexRoot,
    IndexAllocation,
    Bitmap,
    ReparsePoint,
    EaInformation,
    Ea,
    PropertySet,
    LoggedUtilityStream,
    End,
    Unknown(u32),
}

impl AttributeType {
    pub fn code(self) -> u32 {
        match self {
            Self::StandardInformation => 0x10,
            Self::AttributeList => 0x20,
            Self::FileName => 0x30,
            Self::ObjectId => 0x40,
            Self::SecurityDescriptor => 0x50,
            Self::VolumeName => 0x60,
            Self::VolumeInformation => 0x70,
            Self::Data => 0x80,
            Self::IndexRoot => 0x90,
            Self::IndexAllocation => 0xA0,
            Self::Bitmap => 0xB0,
            Self::ReparsePoint => 0xC0,
            Self::EaInformation => 0xD0,
            Self::Ea => 0xE0,
            Self::PropertySet => 0xF0,
            Self::LoggedUtilityStream => 0x100,
            Self::End => 0xFFFF_FFFF,
            Self::Unknown(code) => code,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::StandardInformation => "$STANDARD_INFORMATION",
            Self::AttributeList => "$ATTRIBUTE_LIST",
            Self::FileName => "$FILE_NAME",
            Self::ObjectId => "$OBJECT_ID",
            Self::SecurityDescriptor => "$SECURITY_DESCRIPTOR",
            Self::VolumeName => "$VOLUME_NAME",
            Self::VolumeInformation => "$VOLUME_INFORMATION",
            Self::Data => "$DATA",
            Self::IndexRoot => "$INDEX_ROOT",
            Self::IndexAllocation => "$INDEX_ALLOCATION",
            Self::Bitmap => "$BITMAP",
            Self::ReparsePoint => "$REPARSE_POINT",
            Self::EaInformation => "$EA_INFORMATION",
            Self::Ea => "$EA",
            Self::PropertySet => "$PROPERTY_SET",
            Self::LoggedUtilityStream => "$LOGGED_UTILITY_STREAM",
            Self::End => "END",
            Self::Unknown(_) => "UNKNOWN",
        }
    }
}

impl From<u32> for AttributeType {
    fn from(code: u32) -> Self {
        match code {
            0x10 => Self::StandardInformation,
            0x20 => Self::AttributeList,
            0x30 => Self::FileName,
            0x40 => Self::ObjectId,
            0x50 => Self::SecurityDescriptor,
            0x60 => Self::VolumeName,
            0x70 => Self::VolumeInformation,
            0x80 => Self::Data,
            0x90 => Self::IndexRoot,
            0xA0 => Self::IndexAllocation,
            0xB0 => Self::Bitmap,
            0xC0 => Self::ReparsePoint,
            0xD0 => Self::EaInformation,
            0xE0 => Self::Ea,
            0xF0 => Self::PropertySet,
            0x100 => Self::LoggedUtilityStream,
            0xFFFF_FFFF => Self::End,
            other => Self::Unknown(other),
        }
    }
}

/// The common 16-byte header every attribute starts with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeHeader {
    pub type_code: u32,
    pub total_length: u32,
    pub non_resident: bool,
    pub name_length: u8,
    pub name_offset: u16,
    pub flags: u16,
    pub attribute_id: u16,
}

impl AttributeHeader {
    /// Decodes the header at `offset` in `record`. `index` is the attribute's
    /// position in the record and is only used for error reporting.
    pub fn parse(record: &[u8], offset: usize, index: usize) -> Result<Self> {
        let h = window(record, offset, offset, ATTRIBUTE_HEADER_SIZE, index)?;
        Ok(Self {
            type_code: LittleEndian::read_u32(&h[0..4]),
            total_length: LittleEndian::read_u32(&h[4..8]),
            non_resident: h[8] != 0,
            name_length: h[9],
            name_offset: LittleEndian::read_u16(&h[10..12]),
            flags: LittleEndian::read_u16(&h[12..14]),
            attribute_id: LittleEndian::read_u16(&h[14..16]),
        })
    }
}

/// Size and location of a resident attribute's value. The offset is relative
/// to the attribute header, not the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResidentDescriptor {
    pub content_size: u32,
    pub content_offset: u16,
}

impl ResidentDescriptor {
    pub fn parse(record: &[u8], attr_offset: usize, index: usize) -> Result<Self> {
        let at = attr_offset.saturating_add(ATTRIBUTE_HEADER_SIZE);
        let d = window(record, attr_offset, at, RESIDENT_DESCRIPTOR_SIZE, index)?;
        Ok(Self {
            content_size: LittleEndian::read_u32(&d[0..4]),
            content_offset: LittleEndian::read_u16(&d[4..6]),
        })
    }
}

/// One decoded attribute: its header, raw name and, when resident, its value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    record_offset: usize,
    header: AttributeHeader,
    name: Vec<u8>,
    resident: Option<ResidentValue>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ResidentValue {
    offset: u16,
    content: Vec<u8>,
}

impl Attribute {
    /// Builds the attribute whose `header` was read at `offset`. Every range
    /// the header points at is checked against `record` before it is copied.
    pub fn decode(record: &[u8], offset: usize, index: usize, header: AttributeHeader) -> Result<Self> {
        window(record, offset, offset, header.total_length as usize, index)?;

        let name = if header.name_length > 0 {
            let start = offset.saturating_add(header.name_offset as usize);
            window(record, offset, start, header.name_length as usize * 2, index)?.to_vec()
        } else {
            Vec::new()
        };

        let resident = if header.non_resident {
            None
        } else {
            let desc = ResidentDescriptor::parse(record, offset, index)?;
            let start = offset.saturating_add(desc.content_offset as usize);
            let content = window(record, offset, start, desc.content_size as usize, index)?.to_vec();
            Some(ResidentValue { offset: desc.content_offset, content })
        };

        Ok(Self { record_offset: offset, header, name, resident })
    }

    pub fn record_offset(&self) -> usize {
        self.record_offset
    }

    pub fn type_code(&self) -> u32 {
        self.header.type_code
    }

    pub fn attribute_type(&self) -> AttributeType {
        AttributeType::from(self.header.type_code)
    }

    pub fn total_length(&self) -> u32 {
        self.header.total_length
    }

    pub fn is_non_resident(&self) -> bool {
        self.header.non_resident
    }

    pub fn name_length(&self) -> u8 {
        self.header.name_length
    }

    pub fn name_offset(&self) -> u16 {
        self.header.name_offset
    }

    pub fn flags(&self) -> u16 {
        self.header.flags
    }

    pub fn is_compressed(&self) -> bool {
        self.header.flags & FLAG_COMPRESSED != 0
    }

    pub fn is_encrypted(&self) -> bool {
        self.header.flags & FLAG_ENCRYPTED != 0
    }

    pub fn is_sparse(&self) -> bool {
        self.header.flags & FLAG_SPARSE != 0
    }

    pub fn attribute_id(&self) -> u16 {
        self.header.attribute_id
    }

    pub fn name_units(&self) -> Vec<u16> {
        utf16_units(&self.name)
    }

    /// The attribute name as text, `None` for unnamed attributes.
    pub fn name(&self) -> Result<Option<String>> {
        if self.name.is_empty() {
            return Ok(None);
        }
        decode_utf16le(&self.name).map(Some).ok_or(NtfsError::InvalidEncoding {
            offset: self.record_offset + self.header.name_offset as usize,
        })
    }

    /// Raw resident value; `None` for non-resident attributes.
    pub fn resident_content(&self) -> Option<&[u8]> {
        self.resident.as_ref().map(|r| r.content.as_slice())
    }

    pub fn content_offset(&self) -> Option<u16> {
        self.resident.as_ref().map(|r| r.offset)
    }
}

fn window(record: &[u8], attr_offset: usize, offset: usize, len: usize, index: usize) -> Result<&[u8]> {
    field(record, offset, len).ok_or(NtfsError::OutOfBounds {
        attribute: index,
        attribute_offset: attr_offset,
        offset,
        len,
        available: record.len(),
    })
}
