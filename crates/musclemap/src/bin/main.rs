//! musclemap CLI

use clap::Parser;
use musclemap::{Cli, effective_log_level, resolve_config};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    // RUST_LOG wins over the flag and settings
    env_logger::Builder::new()
        .filter_level(effective_log_level(&cli, &config))
        .parse_default_env()
        .format_timestamp_millis()
        .target(env_logger::Target::Stderr)
        .init();

    log::debug!("musclemap v{} ({:?})", env!("CARGO_PKG_VERSION"), config);

    let output = musclemap::run(&cli, config)?;
    println!("{}", output);
    Ok(())
}
