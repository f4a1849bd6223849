//! # musclemap
//!
//! Command-line reporting over a fitness anatomy knowledge graph: bridge
//! rankings, region-pair interaction, co-activation edges, region tab lists,
//! snapshot integrity, and override editing.

pub mod cli;
pub mod commands;
pub mod settings;

pub use cli::{Cli, Command, OverrideAction, OutputFormat};
pub use commands::{Session, load_snapshot};
pub use settings::load_analysis_config;

use anyhow::{Context, Result};
use musclemap_core::{AnalysisConfig, ConfigProfile, OverrideConfig};

/// Settings for a run: profile, then `--config` file, then environment
pub fn resolve_config(cli: &Cli) -> Result<AnalysisConfig> {
    let profile: ConfigProfile = cli.profile.parse()?;
    load_analysis_config(profile, cli.config.as_deref())
}

/// Load the snapshot and render the selected command
pub fn run(cli: &Cli, config: AnalysisConfig) -> Result<String> {
    let snapshot_path = cli
        .snapshot
        .as_deref()
        .context("No snapshot given (use --snapshot or MUSCLEMAP_SNAPSHOT)")?;
    let snapshot = load_snapshot(snapshot_path)?;
    let session = Session::new(snapshot, config, cli.format.into());

    match &cli.command {
        Command::Bridges => session.bridges(),
        Command::RegionPairs { by } => session.region_pairs((*by).into()),
        Command::Edges { limit } => session.edges(*limit),
        Command::Partners { node, limit } => session.partners(node, *limit),
        Command::Tabs { region, overrides } => {
            let overrides = match overrides {
                Some(path) => OverrideConfig::load(path)?,
                None => OverrideConfig::new(),
            };
            session.tabs(region, &overrides)
        }
        Command::Integrity => session.integrity(),
        Command::Report => {
            let name = snapshot_path
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_default();
            session.report(&name)
        }
        Command::Overrides(args) => session.overrides(&args.file, &args.action),
    }
}

/// Log level for a run: explicit flag, else the settings' level
pub fn effective_log_level(cli: &Cli, config: &AnalysisConfig) -> log::LevelFilter {
    cli.log_level
        .as_deref()
        .unwrap_or(&config.log_level)
        .parse()
        .unwrap_or(log::LevelFilter::Info)
}
