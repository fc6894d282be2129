use clap::{ArgAction, Parser, Subcommand};

const EXAMPLES: &str = r#"
EXAMPLES:

  Boot sector of an NTFS partition starting 128 sectors into a disk image:
    ntfs_meta boot -i disk.img -o 128

  First 16 MFT records, with resident values as hex:
    ntfs_meta record -i disk.img -o 128 -e 0 -c 16 -d

  Same, as JSON Lines:
    ntfs_meta record -i disk.img -o 128 -c 16 -j records.jsonl
"#;

#[derive(Parser, Debug)]
#[command(name = "ntfs_meta")]
#[command(version)]
#[command(about = "Decode NTFS boot sector and MFT records from a raw disk image")]
#[command(after_help = EXAMPLES)]
pub struct Cli {
    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the volume boot sector
    Boot {
        /// Raw disk or partition image
        #[arg(short, long)]
        image: String,
        /// Partition start, in 512-byte sectors from the start of the image
        #[arg(short, long, default_value_t = 0)]
        offset: u64,
        /// Accept a boot sector without the 55 AA signature
        #[arg(long)]
        lenient: bool,
        /// Write JSON Lines here instead of text to stdout
        #[arg(short = 'j', long)]
        out_json: Option<String>,
    },
    /// Decode MFT file records
    Record {
        /// Raw disk or partition image
        #[arg(short, long)]
        image: String,
        /// Partition start, in 512-byte sectors from the start of the image
        #[arg(short, long, default_value_t = 0)]
        offset: u64,
        /// First MFT entry to decode
        #[arg(short, long, default_value_t = 0)]
        entry: u64,
        /// Number of entries to decode
        #[arg(short, long, default_value_t = 1)]
        count: u64,
        /// Include resident attribute values (hex)
        #[arg(short, long)]
        data: bool,
        /// Accept a boot sector without the 55 AA signature
        #[arg(long)]
        lenient: bool,
        /// Write JSON Lines here instead of text to stdout
        #[arg(short = 'j', long)]
        out_json: Option<String>,
    },
}
