//! Command execution. Every command renders to a string; the binary prints it.

use anyhow::{Context, Result};
use musclemap_core::prelude::*;
use musclemap_export::{
    AnalysisReportExporter, BridgeReportExporter, EdgeReportExporter, ExportFormat,
    IntegrityReportExporter, PartnerListExporter, RegionPairReportExporter, TabListExporter,
    bridge_records, create_analysis_report, region_pair_records,
};
use musclemap_graph::{
    BridgeAnalyzer, CoActivationGraph, IntegrityAnalyzer, RegionPairMetric, RegionResolver,
    TabAssembler,
};
use serde::Serialize;
use std::path::Path;

use crate::cli::OverrideAction;

/// Load a snapshot file through the in-memory store adapter
pub fn load_snapshot(path: &Path) -> Result<AnatomySnapshot> {
    let store = InMemoryStore::load(path)
        .with_context(|| format!("Failed to load snapshot {}", path.display()))?;
    Ok(AnatomySnapshot::from_store(&store)?)
}

/// A loaded snapshot plus the settings every command runs with
pub struct Session {
    snapshot: AnatomySnapshot,
    config: AnalysisConfig,
    format: ExportFormat,
}

impl Session {
    pub fn new(snapshot: AnatomySnapshot, config: AnalysisConfig, format: ExportFormat) -> Self {
        Self {
            snapshot,
            config,
            format,
        }
    }

    pub fn snapshot(&self) -> &AnatomySnapshot {
        &self.snapshot
    }

    fn graph(&self) -> CoActivationGraph {
        let graph = CoActivationGraph::build(&self.snapshot, &self.config);
        log::debug!(
            "Co-activation graph: {} nodes, {} edges",
            graph.node_count(),
            graph.edge_count()
        );
        graph
    }

    /// Bridge report
    pub fn bridges(&self) -> Result<String> {
        let resolver = RegionResolver::new(&self.snapshot);
        let graph = self.graph();
        let analysis = BridgeAnalyzer::new(&graph, &resolver)
            .with_config(&self.config)
            .find_bridges();

        if !analysis.skipped_nodes.is_empty() {
            log::warn!(
                "{} nodes skipped (unresolvable region)",
                analysis.skipped_nodes.len()
            );
        }

        let records = bridge_records(&analysis);
        Ok(match self.format {
            ExportFormat::Json => BridgeReportExporter::to_json(&records)?,
            ExportFormat::Csv => BridgeReportExporter::to_csv(&records)?,
        })
    }

    /// Region-pair ranking
    pub fn region_pairs(&self, metric: RegionPairMetric) -> Result<String> {
        let resolver = RegionResolver::new(&self.snapshot);
        let graph = self.graph();
        let pairs = BridgeAnalyzer::new(&graph, &resolver).region_pairs_by(metric);

        let records = region_pair_records(&pairs);
        Ok(match self.format {
            ExportFormat::Json => RegionPairReportExporter::to_json(&records)?,
            ExportFormat::Csv => RegionPairReportExporter::to_csv(&records)?,
        })
    }

    /// Ranked co-activation edges
    pub fn edges(&self, limit: Option<usize>) -> Result<String> {
        let mut edges = self.graph().ranked_edges();
        if let Some(limit) = limit {
            edges.truncate(limit);
        }

        Ok(match self.format {
            ExportFormat::Json => EdgeReportExporter::to_json(&edges)?,
            ExportFormat::Csv => EdgeReportExporter::to_csv(&edges)?,
        })
    }

    /// "Trained together" list for one node
    pub fn partners(&self, node_id: &str, limit: Option<usize>) -> Result<String> {
        if !self.snapshot.contains(node_id) {
            return Err(Error::not_found(node_id).into());
        }

        let limit = limit.unwrap_or(self.config.max_partners);
        let partners = self.graph().top_partners(node_id, limit);

        Ok(match self.format {
            ExportFormat::Json => PartnerListExporter::to_json(&partners)?,
            ExportFormat::Csv => PartnerListExporter::to_csv(&partners)?,
        })
    }

    /// Tab list for a region page, using every guide section in the snapshot
    pub fn tabs(&self, region_id: &str, overrides: &OverrideConfig) -> Result<String> {
        let tabs = TabAssembler::new(&self.snapshot, overrides).assemble_for_snapshot_guides(region_id)?;

        Ok(match self.format {
            ExportFormat::Json => TabListExporter::to_json(&tabs)?,
            ExportFormat::Csv => TabListExporter::to_csv(&tabs)?,
        })
    }

    /// Integrity report
    pub fn integrity(&self) -> Result<String> {
        let resolver = RegionResolver::new(&self.snapshot);
        let graph = self.graph();
        let report = IntegrityAnalyzer::new(&resolver, &graph).analyze();

        if !report.is_healthy() {
            log::warn!("Snapshot integrity score: {}", report.integrity_score);
        }

        Ok(match self.format {
            ExportFormat::Json => IntegrityReportExporter::to_json(&report)?,
            ExportFormat::Csv => IntegrityReportExporter::to_csv(&report)?,
        })
    }

    /// Combined analysis report
    pub fn report(&self, snapshot_name: &str) -> Result<String> {
        let resolver = RegionResolver::new(&self.snapshot);
        let graph = self.graph();
        let analyzer = BridgeAnalyzer::new(&graph, &resolver).with_config(&self.config);
        let bridges = analyzer.find_bridges();
        let pairs = analyzer.region_pairs();
        let integrity = IntegrityAnalyzer::new(&resolver, &graph).analyze();

        let report = create_analysis_report(snapshot_name, graph.stats(), &bridges, &pairs, &integrity);
        Ok(match self.format {
            ExportFormat::Json => AnalysisReportExporter::to_json(&report)?,
            ExportFormat::Csv => AnalysisReportExporter::to_csv(&report)?,
        })
    }

    /// Apply an override action to the file at `path`. Edits are saved back;
    /// `validate` only reads.
    pub fn overrides(&self, path: &Path, action: &OverrideAction) -> Result<String> {
        let config = OverrideConfig::load(path)?;
        let mut editor = OverrideEditor::for_snapshot(config, &self.snapshot);

        let changed = match action {
            OverrideAction::Validate => {
                let outcome = ValidationOutcome::from_errors(editor.validate());
                for problem in &outcome.problems {
                    log::warn!("{}", problem);
                }
                return Ok(serde_json::to_string_pretty(&outcome)?);
            }
            OverrideAction::Add { region, node } => {
                self.warn_if_unknown(node);
                editor.add_cross_reference(region, node)?
            }
            OverrideAction::Remove { region, node } => editor.remove_cross_reference(region, node)?,
            OverrideAction::Exclude { region, child } => {
                self.warn_if_unknown(child);
                editor.exclude_child(region, child)?
            }
            OverrideAction::Include { region, child } => editor.include_child(region, child)?,
        };

        if changed {
            editor.config().save(path)?;
            log::info!("Saved overrides to {}", path.display());
        }

        Ok(serde_json::to_string_pretty(&EditOutcome {
            changed,
            regions: editor.config().len(),
        })?)
    }

    fn warn_if_unknown(&self, node_id: &str) {
        if !self.snapshot.contains(node_id) {
            log::warn!("{}; stored in overrides anyway", Error::not_found(node_id));
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ValidationOutcome {
    valid: bool,
    problems: Vec<String>,
}

impl ValidationOutcome {
    fn from_errors(errors: Vec<Error>) -> Self {
        Self {
            valid: errors.is_empty(),
            problems: errors.iter().map(ToString::to_string).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EditOutcome {
    changed: bool,
    regions: usize,
}
