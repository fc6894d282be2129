use byteorder::{ByteOrder, LittleEndian};
use encoding_rs::UTF_16LE;

/// `buf[offset..offset + len]`, or `None` if the range overflows or runs past
/// the end of `buf`. Every in-record read goes through here first.
pub fn field(buf: &[u8], offset: usize, len: usize) -> Option<&[u8]> {
    let end = offset.checked_add(len)?;
    buf.get(offset..end)
}

pub fn utf16_units(bytes: &[u8]) -> Vec<u16> {
    bytes.chunks_exact(2).map(LittleEndian::read_u16).collect()
}

/// Strict UTF-16LE decode. Unpaired surrogates yield `None` instead of
/// replacement characters.
pub fn decode_utf16le(bytes: &[u8]) -> Option<String> {
    UTF_16LE
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(|s| s.into_owned())
}
