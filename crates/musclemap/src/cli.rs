//! Command-line arguments.

use clap::{Args, Parser, Subcommand, ValueEnum};
use musclemap_export::ExportFormat;
use musclemap_graph::RegionPairMetric;
use std::path::PathBuf;

/// musclemap - anatomy and exercise knowledge-graph reports
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Snapshot file with nodes, links, exercises and guide sections (YAML or JSON)
    #[arg(short, long, global = true, env = "MUSCLEMAP_SNAPSHOT")]
    pub snapshot: Option<PathBuf>,

    /// Settings file layered over the profile (YAML, JSON or TOML)
    #[arg(short, long, global = true, env = "MUSCLEMAP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Settings profile (default, strict, exploratory)
    #[arg(short, long, global = true, default_value = "default")]
    pub profile: String,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Log level (error, warn, info, debug, trace); defaults to the profile's level
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Rank nodes whose co-activation couples different regions
    Bridges,
    /// Rank region pairs by interaction
    RegionPairs {
        /// Ranking metric
        #[arg(long, value_enum, default_value_t = PairMetric::Score)]
        by: PairMetric,
    },
    /// Ranked co-activation edges
    Edges {
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Nodes most often trained together with a node
    Partners {
        node: String,
        /// Defaults to `max_partners` from settings
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Tab list for a region page
    Tabs {
        region: String,
        #[arg(short, long)]
        overrides: Option<PathBuf>,
    },
    /// Dangling links, broken parent chains and unlinked nodes
    Integrity,
    /// Combined summary of graph, bridges, region pairs and integrity
    Report,
    /// Inspect or edit the region override file
    Overrides(OverridesArgs),
}

#[derive(Args, Debug)]
pub struct OverridesArgs {
    /// Override file (created on first edit)
    #[arg(long, env = "MUSCLEMAP_OVERRIDES")]
    pub file: PathBuf,

    #[command(subcommand)]
    pub action: OverrideAction,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum OverrideAction {
    /// Report entries for regions the snapshot doesn't know
    Validate,
    /// Add a manual cross-reference to a region
    Add { region: String, node: String },
    /// Remove a manual cross-reference from a region
    Remove { region: String, node: String },
    /// Exclude a child from a region's hierarchical tabs
    Exclude { region: String, child: String },
    /// Undo an exclusion
    Include { region: String, child: String },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Csv,
}

impl From<OutputFormat> for ExportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Json => ExportFormat::Json,
            OutputFormat::Csv => ExportFormat::Csv,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairMetric {
    /// Sum of cross-region edge weights
    Score,
    /// Number of cross-region edges
    Edges,
    /// Number of distinct bridge nodes
    Bridges,
}

impl From<PairMetric> for RegionPairMetric {
    fn from(metric: PairMetric) -> Self {
        match metric {
            PairMetric::Score => RegionPairMetric::TotalScore,
            PairMetric::Edges => RegionPairMetric::EdgeCount,
            PairMetric::Bridges => RegionPairMetric::BridgeNodes,
        }
    }
}
