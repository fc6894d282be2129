use std::io::{self, Write};

use anyhow::{Context, Result};
use tracing::{error, info};

use ntfs_meta::models::RecordReport;
use ntfs_meta::output::write_record_text;
use ntfs_meta::NtfsError;

pub fn run(
    image: &str,
    offset: u64,
    entry: u64,
    count: u64,
    data: bool,
    lenient: bool,
    out_json: Option<&str>,
) -> Result<()> {
    let mut parser = super::open_parser(image, offset, lenient)?;
    let end = entry.checked_add(count).context("entry range overflows")?;

    let mut jsonl = out_json.map(super::create_jsonl).transpose()?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let mut decoded = 0u64;
    let mut failed = 0u64;

    for n in entry..end {
        let image_offset = parser.record_offset(n)?;
        let record = match parser.read_record(n) {
            Ok(record) => record,
            Err(e @ NtfsError::ReadError(_)) => {
                return Err(e).with_context(|| format!("reading MFT entry {} at {:#X}", n, image_offset));
            }
            Err(e) => {
                error!(entry = n, "decode failed: {}", e);
                failed += 1;
                continue;
            }
        };

        let report = RecordReport::new(n, image_offset, &record, data);
        match jsonl.as_mut() {
            Some(writer) => writer.write(&report)?,
            None => {
                write_record_text(&mut out, &report)?;
                writeln!(out)?;
            }
        }
        decoded += 1;
    }

    if let Some(writer) = jsonl {
        info!(lines = writer.lines(), "JSON Lines written");
        writer.finish()?;
    }
    info!(decoded, failed, "done");
    Ok(())
}
