mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use tracing::Level;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match (cli.quiet, cli.verbose) {
        (true, _) => Level::WARN,
        (false, 0) => Level::INFO,
        (false, 1) => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match &cli.command {
        Commands::Boot { image, offset, lenient, out_json } => {
            commands::boot::run(image, *offset, *lenient, out_json.as_deref())
        }
        Commands::Record { image, offset, entry, count, data, lenient, out_json } => {
            commands::record::run(image, *offset, *entry, *count, *data, *lenient, out_json.as_deref())
        }
    }
}
