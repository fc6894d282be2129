use serde::Serialize;
use std::io::{self, Write};

use crate::models::{AttributeReport, BootReport, RecordReport};

/// Report sink writing one JSON object per line.
pub struct JsonlWriter<W: Write> {
    out: W,
    lines: u64,
}

impl<W: Write> JsonlWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out, lines: 0 }
    }

    pub fn write<T: Serialize>(&mut self, report: &T) -> io::Result<()> {
        serde_json::to_writer(&mut self.out, report).map_err(io::Error::from)?;
        self.out.write_all(b"\n")?;
        self.lines += 1;
        Ok(())
    }

    pub fn lines(&self) -> u64 {
        self.lines
    }

    /// Flushes and returns the underlying writer.
    pub fn finish(mut self) -> io::Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }
}

fn opt<T: std::fmt::Display>(v: &Option<T>) -> String {
    v.as_ref().map_or_else(|| "-".to_string(), T::to_string)
}

pub fn write_boot_text<W: Write>(out: &mut W, r: &BootReport) -> io::Result<()> {
    writeln!(out, "Boot sector @ {:#X} ({})", r.partition_offset, r.source)?;
    writeln!(out, "  OEM ID                  {:?}", r.oem_id)?;
    writeln!(out, "  Bytes per sector        {}", r.bytes_per_sector)?;
    writeln!(out, "  Sectors per cluster     {}", r.sectors_per_cluster)?;
    writeln!(out, "  Bytes per cluster       {}", opt(&r.bytes_per_cluster))?;
    writeln!(out, "  Media descriptor        {:#04X}", r.media_descriptor)?;
    writeln!(out, "  Total sectors           {}", r.total_sectors)?;
    writeln!(out, "  MFT start cluster       {}", r.mft_start_cluster)?;
    writeln!(out, "  MFT mirror cluster      {}", r.mft_mirror_start_cluster)?;
    writeln!(out, "  MFT entry size          {}", opt(&r.mft_entry_size))?;
    writeln!(out, "  Index record size       {}", opt(&r.index_record_size))?;
    writeln!(out, "  Serial number           {}", r.serial_number)?;
    writeln!(
        out,
        "  Signature (0xAA55)      {}{}",
        r.boot_signature,
        if r.valid_signature { "" } else { "  <MISMATCH>" }
    )
}

fn flag_list(a: &AttributeReport) -> String {
    let set: Vec<&str> = [(a.compressed, "compressed"), (a.encrypted, "encrypted"), (a.sparse, "sparse")]
        .into_iter()
        .filter_map(|(on, label)| on.then_some(label))
        .collect();
    if set.is_empty() {
        String::new()
    } else {
        format!(" [{}]", set.join(","))
    }
}

pub fn write_record_text<W: Write>(out: &mut W, r: &RecordReport) -> io::Result<()> {
    writeln!(out, "MFT entry {} @ {:#X}", r.entry_number, r.image_offset)?;
    writeln!(out, "  Signature               {}", r.signature)?;
    writeln!(out, "  Fixup array offset      {}", r.fixup_array_offset)?;
    writeln!(out, "  Fixup entries           {}", r.fixup_entry_count)?;
    writeln!(out, "  $LogFile sequence       {}", r.logfile_sequence_number)?;
    writeln!(out, "  Sequence value          {}", r.sequence_number)?;
    writeln!(out, "  Link count              {}", r.hard_link_count)?;
    writeln!(out, "  First attribute offset  {}", r.first_attribute_offset)?;
    writeln!(
        out,
        "  Flags                   {:#06X} (in_use={}, directory={})",
        r.flags, r.in_use, r.is_directory
    )?;
    writeln!(out, "  Used / allocated        {} / {}", r.used_size, r.allocated_size)?;
    writeln!(out, "  Base record reference   {:#X}", r.base_record_reference)?;
    writeln!(out, "  Next attribute ID       {}", r.next_attribute_id)?;

    for a in &r.attributes {
        writeln!(
            out,
            "  [{:#06X}] {} (type {:#X}) len={} id={} {}{}{}",
            a.record_offset,
            a.type_name,
            a.type_code,
            a.total_length,
            a.attribute_id,
            if a.non_resident { "non-resident" } else { "resident" },
            a.name.as_ref().map(|n| format!(" name={:?}", n)).unwrap_or_default(),
            flag_list(a),
        )?;
        if let Some(size) = a.content_size {
            writeln!(out, "      content: {} bytes at +{}", size, opt(&a.content_offset))?;
        }
        if let Some(hex) = &a.content {
            writeln!(out, "      {}", hex)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Row {
        id: u32,
    }

    #[test]
    fn jsonl_one_object_per_line() {
        let mut w = JsonlWriter::new(Vec::new());
        w.write(&Row { id: 1 }).unwrap();
        w.write(&Row { id: 2 }).unwrap();
        assert_eq!(w.lines(), 2);
        let out = w.finish().unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "{\"id\":1}\n{\"id\":2}\n");
    }

    fn attribute(compressed: bool, sparse: bool) -> AttributeReport {
        AttributeReport {
            record_offset: 0x38,
            type_code: 0x80,
            type_name: "$DATA",
            total_length: 0x48,
            non_resident: true,
            name_length: 0,
            name_offset: 0x40,
            name: None,
            flags: 0,
            compressed,
            encrypted: false,
            sparse,
            attribute_id: 2,
            content_size: None,
            content_offset: None,
            content: None,
        }
    }

    #[test]
    fn text_lists_set_flags() {
        assert_eq!(flag_list(&attribute(false, false)), "");
        assert_eq!(flag_list(&attribute(true, true)), " [compressed,sparse]");
    }
}
