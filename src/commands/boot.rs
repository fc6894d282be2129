use std::io;

use anyhow::{Context, Result};
use tracing::info;

use ntfs_meta::models::BootReport;
use ntfs_meta::output::write_boot_text;

pub fn run(image: &str, offset: u64, lenient: bool, out_json: Option<&str>) -> Result<()> {
    let parser = super::open_parser(image, offset, lenient)?;
    let report = BootReport::new(parser.boot_sector(), parser.partition_offset(), image);

    match out_json {
        Some(path) => {
            let mut writer = super::create_jsonl(path)?;
            writer.write(&report)?;
            writer.finish()?;
            info!(path, "boot sector written");
        }
        None => {
            write_boot_text(&mut io::stdout().lock(), &report).context("writing to stdout")?;
        }
    }
    Ok(())
}
