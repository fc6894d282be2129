use byteorder::{ByteOrder, LittleEndian};
use tracing::{debug, warn};

use super::attributes::{Attribute, AttributeHeader, ATTRIBUTE_HEADER_SIZE};
use crate::error::{NtfsError, Result};

pub const RECORD_HEADER_SIZE: usize = 42;

pub const FLAG_IN_USE: u16 = 0x0001;
pub const FLAG_DIRECTORY: u16 = 0x0002;

/// A decoded MFT file record: the fixed header plus its attributes in
/// on-disk order. Fixups are not applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MftRecord {
    signature: String, // "FILE" or "BAAD"
    fixup_array_offset: u16,
    fixup_entry_count: u16,
    logfile_sequence_number: u64,
    sequence_number: u16,
    hard_link_count: u16,
    first_attribute_offset: u16,
    flags: u16,
    used_size: u32,
    allocated_size: u32,
    base_record_reference: u64,
    next_attribute_id: u16,
    attributes: Vec<Attribute>,
}

impl MftRecord {
    pub fn decode(data: &[u8]) -> Result<Self> {
        if data.len() < RECORD_HEADER_SIZE {
            return Err(NtfsError::TruncatedInput {
                structure: "MFT record header",
                needed: RECORD_HEADER_SIZE,
                actual: data.len(),
            });
        }

        let signature = String::from_utf8_lossy(&data[0..4]).into_owned();
        if signature == "BAAD" {
            warn!("MFT record carries BAAD signature");
        }

        let first_attribute_offset = LittleEndian::read_u16(&data[20..22]);
        let attributes = decode_attributes(data, first_attribute_offset as usize)?;

        Ok(Self {
            signature,
            fixup_array_offset: LittleEndian::read_u16(&data[4..6]),
            fixup_entry_count: LittleEndian::read_u16(&data[6..8]),
            logfile_sequence_number: LittleEndian::read_u64(&data[8..16]),
            sequence_number: LittleEndian::read_u16(&data[16..18]),
            hard_link_count: LittleEndian::read_u16(&data[18..20]),
            first_attribute_offset,
            flags: LittleEndian::read_u16(&data[22..24]),
            used_size: LittleEndian::read_u32(&data[24..28]),
            allocated_size: LittleEndian::read_u32(&data[28..32]),
            base_record_reference: LittleEndian::read_u64(&data[32..40]),
            next_attribute_id: LittleEndian::read_u16(&data[40..42]),
            attributes,
        })
    }

    pub fn signature(&self) -> &str {
        &self.signature
    }

    pub fn has_valid_signature(&self) -> bool {
        self.signature == "FILE"
    }

    pub fn is_baad(&self) -> bool {
        self.signature == "BAAD"
    }

    pub fn fixup_array_offset(&self) -> u16 {
        self.fixup_array_offset
    }

    pub fn fixup_entry_count(&self) -> u16 {
        self.fixup_entry_count
    }

    pub fn logfile_sequence_number(&self) -> u64 {
        self.logfile_sequence_number
    }

    pub fn sequence_number(&self) -> u16 {
        self.sequence_number
    }

    pub fn hard_link_count(&self) -> u16 {
        self.hard_link_count
    }

    pub fn first_attribute_offset(&self) -> u16 {
        self.first_attribute_offset
    }

    pub fn flags(&self) -> u16 {
        self.flags
    }

    pub fn is_in_use(&self) -> bool {
        self.flags & FLAG_IN_USE != 0
    }

    pub fn is_directory(&self) -> bool {
        self.flags & FLAG_DIRECTORY != 0
    }

    pub fn used_size(&self) -> u32 {
        self.used_size
    }

    pub fn allocated_size(&self) -> u32 {
        self.allocated_size
    }

    pub fn base_record_reference(&self) -> u64 {
        self.base_record_reference
    }

    pub fn next_attribute_id(&self) -> u16 {
        self.next_attribute_id
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn attributes_of(&self, type_code: u32) -> impl Iterator<Item = &Attribute> {
        self.attributes.iter().filter(move |a| a.type_code() == type_code)
    }
}

fn decode_attributes(data: &[u8], first_offset: usize) -> Result<Vec<Attribute>> {
    let mut attributes = Vec::new();
    let mut offset = first_offset;

    loop {
        let index = attributes.len();
        let header = AttributeHeader::parse(data, offset, index)?;
        if header.total_length == 0 {
            debug!(offset, "zero-length attribute, end of list");
            break;
        }

        let attr = Attribute::decode(data, offset, index, header)?;
        debug!(
            index,
            offset,
            type_code = header.type_code,
            length = header.total_length,
            resident = !header.non_resident,
            "attribute"
        );
        attributes.push(attr);

        // Attribute::decode has checked offset + total_length against the buffer.
        offset += header.total_length as usize;

        // 0xFF one byte into the next header ends the list, matching the
        // 0xFFFFFFFF end marker and some records that omit it.
        match data.get(offset + 1).copied() {
            Some(0xFF) => {
                debug!(offset, "end marker");
                break;
            }
            Some(_) => {}
            None => {
                return Err(NtfsError::OutOfBounds {
                    attribute: index + 1,
                    attribute_offset: offset,
                    offset,
                    len: ATTRIBUTE_HEADER_SIZE,
                    available: data.len(),
                })
            }
        }
    }

    Ok(attributes)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECORD_SIZE: usize = 1024;

    fn record_header(first_attr: u16) -> Vec<u8> {
        let mut r = vec![0u8; RECORD_SIZE];
        r[0..4].copy_from_slice(b"FILE");
        r[4..6].copy_from_slice(&48u16.to_le_bytes());
        r[6..8].copy_from_slice(&3u16.to_le_bytes());
        r[8..16].copy_from_slice(&0x0010_2040u64.to_le_bytes());
        r[16..18].copy_from_slice(&1u16.to_le_bytes());
        r[18..20].copy_from_slice(&1u16.to_le_bytes());
        r[20..22].copy_from_slice(&first_attr.to_le_bytes());
        r[22..24].copy_from_slice(&(FLAG_IN_USE).to_le_bytes());
        r[24..28].copy_from_slice(&0x1A0u32.to_le_bytes());
        r[28..32].copy_from_slice(&(RECORD_SIZE as u32).to_le_bytes());
        r[40..42].copy_from_slice(&7u16.to_le_bytes());
        r
    }

    fn put_resident(r: &mut [u8], at: usize, type_code: u32, id: u16, value: &[u8]) -> usize {
        let total = (24 + value.len() + 7) & !7;
        r[at..at + 4].copy_from_slice(&type_code.to_le_bytes());
        r[at + 4..at + 8].copy_from_slice(&(total as u32).to_le_bytes());
        r[at + 8] = 0;
        r[at + 14..at + 16].copy_from_slice(&id.to_le_bytes());
        r[at + 16..at + 20].copy_from_slice(&(value.len() as u32).to_le_bytes());
        r[at + 20..at + 22].copy_from_slice(&24u16.to_le_bytes());
        r[at + 24..at + 24 + value.len()].copy_from_slice(value);
        at + total
    }

    fn put_end(r: &mut [u8], at: usize) {
        r[at..at + 4].copy_from_slice(&0xFFFF_FFFFu32.to_le_bytes());
    }

    #[test]
    fn decodes_header_fields() {
        let mut r = record_header(56);
        put_end(&mut r, 56);
        let rec = MftRecord::decode(&r).unwrap();
        assert_eq!(rec.signature(), "FILE");
        assert!(rec.has_valid_signature());
        assert_eq!(rec.fixup_array_offset(), 48);
        assert_eq!(rec.fixup_entry_count(), 3);
        assert_eq!(rec.logfile_sequence_number(), 0x0010_2040);
        assert_eq!(rec.first_attribute_offset(), 56);
        assert!(rec.is_in_use());
        assert!(!rec.is_directory());
        assert_eq!(rec.used_size(), 0x1A0);
        assert_eq!(rec.allocated_size(), 1024);
        assert_eq!(rec.next_attribute_id(), 7);
    }

    #[test]
    fn zero_length_first_attribute_yields_empty_list() {
        let r = record_header(56);
        let rec = MftRecord::decode(&r).unwrap();
        assert!(rec.attributes().is_empty());
    }

    #[test]
    fn two_resident_attributes_in_order() {
        let mut r = record_header(56);
        let next = put_resident(&mut r, 56, 0x10, 0, &[0x11; 48]);
        let next = put_resident(&mut r, next, 0x30, 1, &[0x22; 74]);
        put_end(&mut r, next);

        let rec = MftRecord::decode(&r).unwrap();
        let attrs = rec.attributes();
        assert_eq!(attrs.len(), 2);

        assert_eq!(attrs[0].type_code(), 0x10);
        assert_eq!(attrs[0].record_offset(), 56);
        assert_eq!(attrs[0].resident_content().map(<[u8]>::len), Some(48));

        assert_eq!(attrs[1].type_code(), 0x30);
        assert_eq!(attrs[1].record_offset(), 56 + 72);
        assert_eq!(attrs[1].attribute_id(), 1);
        assert_eq!(attrs[1].resident_content(), Some(&[0x22; 74][..]));

        assert_eq!(rec.attributes_of(0x30).count(), 1);
    }

    #[test]
    fn end_marker_without_zero_length() {
        let mut r = record_header(56);
        let next = put_resident(&mut r, 56, 0x10, 0, &[0u8; 48]);
        // garbage length behind the marker must not be followed
        put_end(&mut r, next);
        r[next + 4..next + 8].copy_from_slice(&0xDEADu32.to_le_bytes());

        let rec = MftRecord::decode(&r).unwrap();
        assert_eq!(rec.attributes().len(), 1);
    }

    #[test]
    fn length_past_buffer_is_out_of_bounds() {
        let mut r = record_header(56);
        let next = put_resident(&mut r, 56, 0x10, 0, &[0u8; 48]);
        r[next..next + 4].copy_from_slice(&0x80u32.to_le_bytes());
        r[next + 4..next + 8].copy_from_slice(&0x4000u32.to_le_bytes());

        match MftRecord::decode(&r) {
            Err(NtfsError::OutOfBounds { attribute: 1, offset, .. }) => assert_eq!(offset, next),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn next_header_past_end_is_out_of_bounds() {
        // attribute ends exactly at the end of the buffer
        let mut r = record_header(56);
        let end = put_resident(&mut r, 56, 0x80, 0, &[0x41; 40]);
        r.truncate(end);

        match MftRecord::decode(&r) {
            Err(NtfsError::OutOfBounds { attribute: 1, offset, len: 16, available, .. }) => {
                assert_eq!(offset, end);
                assert_eq!(available, end);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn name_past_buffer_fails_whole_record() {
        let mut r = record_header(56);
        let next = put_resident(&mut r, 56, 0x10, 0, &[0u8; 48]);
        let end = put_resident(&mut r, next, 0x80, 1, &[0x41; 8]);
        put_end(&mut r, end);
        // four UTF-16 units starting 0x3F0 bytes into the attribute
        r[next + 9] = 4;
        r[next + 10..next + 12].copy_from_slice(&0x3F0u16.to_le_bytes());

        match MftRecord::decode(&r) {
            Err(NtfsError::OutOfBounds { attribute: 1, attribute_offset, offset, len: 8, available }) => {
                assert_eq!(attribute_offset, next);
                assert_eq!(offset, next + 0x3F0);
                assert_eq!(available, RECORD_SIZE);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn resident_value_past_buffer_reports_attribute_start() {
        let mut r = record_header(56);
        let next = put_resident(&mut r, 56, 0x10, 0, &[0u8; 48]);
        let end = put_resident(&mut r, next, 0x80, 1, &[0x41; 8]);
        put_end(&mut r, end);
        r[next + 20..next + 22].copy_from_slice(&0x3FCu16.to_le_bytes());

        match MftRecord::decode(&r) {
            Err(NtfsError::OutOfBounds { attribute: 1, attribute_offset, offset, len: 8, .. }) => {
                assert_eq!(attribute_offset, next);
                assert_eq!(offset, next + 0x3FC);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn first_attribute_offset_past_end() {
        let r = record_header(2000);
        match MftRecord::decode(&r) {
            Err(NtfsError::OutOfBounds { attribute: 0, offset: 2000, .. }) => {}
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn short_buffer_is_truncated_not_panic() {
        let r = record_header(56);
        for len in [0, 1, 41] {
            match MftRecord::decode(&r[..len]) {
                Err(NtfsError::TruncatedInput { needed: 42, actual, .. }) => assert_eq!(actual, len),
                other => panic!("unexpected result: {:?}", other),
            }
        }
    }

    #[test]
    fn baad_records_are_surfaced() {
        let mut r = record_header(56);
        r[0..4].copy_from_slice(b"BAAD");
        let rec = MftRecord::decode(&r).unwrap();
        assert!(rec.is_baad());
        assert!(!rec.has_valid_signature());
    }

    #[test]
    fn decoding_is_pure() {
        let mut r = record_header(56);
        let next = put_resident(&mut r, 56, 0x10, 0, &[9u8; 48]);
        put_end(&mut r, next);
        assert_eq!(MftRecord::decode(&r).unwrap(), MftRecord::decode(&r).unwrap());
    }
}
