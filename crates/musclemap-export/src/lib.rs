//! # Export System
//!
//! Report records and exporters for co-activation analysis in JSON and CSV.
//! These are the shapes consumed by the reporting tool, the page composer,
//! and the override editor.
//!
//! ## Quick Start
//!
//! ```
//! use musclemap_export::{BridgeRecord, BridgeReportExporter};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let records = vec![BridgeRecord {
//!     node_id: "rear-delts".to_string(),
//!     node_name: "Rear Deltoids".to_string(),
//!     home_region_id: "shoulders".to_string(),
//!     foreign_regions: vec!["back".to_string()],
//!     cross_region_score: 2,
//! }];
//!
//! let json = BridgeReportExporter::to_json(&records)?;
//! assert!(json.contains("\"crossRegionScore\": 2"));
//!
//! let csv = BridgeReportExporter::to_csv(&records)?;
//! assert!(csv.starts_with("node_id,"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Export Formats
//!
//! ### JSON Export
//! - Pretty-printed, camelCase keys
//! - Ordered lists exactly as ranked by the analyzers
//!
//! ### CSV Export
//! - Header row included
//! - List fields joined with `|`
//! - Fields quoted when they contain delimiters
//!
//! ## Core Exporters
//!
//! - [`BridgeReportExporter`]: `{nodeId, nodeName, homeRegionId, foreignRegions, crossRegionScore}`
//! - [`RegionPairReportExporter`]: `{regionPairKey, totalScore}`
//! - [`TabListExporter`]: `{nodeId, name, kind, isCrossReference}`
//! - [`EdgeReportExporter`]: ranked co-activation edges
//! - [`PartnerListExporter`]: "trained together" lists
//! - [`IntegrityReportExporter`]: dangling links, broken chains, unlinked nodes
//! - [`AnalysisReportExporter`]: combined summary with timestamp
//!
//! Exporters return strings and perform no I/O.

use chrono::Utc;
use musclemap_core::prelude::*;
use musclemap_core::{CSVBuilder, to_json_string};
use musclemap_graph::{
    BridgeAnalysis, BridgeScore, CoActivationEdge, GraphStats, IntegrityReport, Partner,
    RegionPairStats, Tab,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// JSON format (pretty-printed)
    Json,
    /// CSV format (flattened)
    Csv,
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            other => Err(Error::config_error(format!(
                "Unknown export format '{}' (expected json or csv)",
                other
            ))),
        }
    }
}

/// One row of the bridge report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeRecord {
    pub node_id: String,
    pub node_name: String,
    pub home_region_id: String,
    pub foreign_regions: Vec<String>,
    pub cross_region_score: u64,
}

impl From<&BridgeScore> for BridgeRecord {
    fn from(score: &BridgeScore) -> Self {
        Self {
            node_id: score.node_id.clone(),
            node_name: score.node_name.clone(),
            home_region_id: score.home_region_id.clone(),
            foreign_regions: score.foreign_regions.clone(),
            cross_region_score: score.cross_region_score,
        }
    }
}

/// Bridge records in ranked order
pub fn bridge_records(analysis: &BridgeAnalysis) -> Vec<BridgeRecord> {
    analysis.bridges.iter().map(BridgeRecord::from).collect()
}

/// One row of the region-pair report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionPairRecord {
    pub region_pair_key: String,
    pub total_score: u64,
}

impl From<&RegionPairStats> for RegionPairRecord {
    fn from(stats: &RegionPairStats) -> Self {
        Self {
            region_pair_key: stats.region_pair_key.clone(),
            total_score: stats.total_score,
        }
    }
}

/// Region-pair records in ranked order
pub fn region_pair_records(pairs: &[RegionPairStats]) -> Vec<RegionPairRecord> {
    pairs.iter().map(RegionPairRecord::from).collect()
}

/// Bridge report exporter
pub struct BridgeReportExporter;

impl BridgeReportExporter {
    /// Export bridge records as JSON
    pub fn to_json(records: &[BridgeRecord]) -> Result<String> {
        to_json_string(records, "bridge report")
    }

    /// Export bridge records as CSV
    pub fn to_csv(records: &[BridgeRecord]) -> Result<String> {
        let csv = records.iter().fold(
            CSVBuilder::new(vec![
                "node_id",
                "node_name",
                "home_region_id",
                "foreign_regions",
                "cross_region_score",
            ]),
            |csv, r| {
                csv.add_row_owned(vec![
                    r.node_id.clone(),
                    r.node_name.clone(),
                    r.home_region_id.clone(),
                    r.foreign_regions.join("|"),
                    r.cross_region_score.to_string(),
                ])
            },
        );
        Ok(csv.build())
    }
}

/// Region-pair report exporter
pub struct RegionPairReportExporter;

impl RegionPairReportExporter {
    /// Export region-pair records as JSON
    pub fn to_json(records: &[RegionPairRecord]) -> Result<String> {
        to_json_string(records, "region-pair report")
    }

    /// Export region-pair records as CSV
    pub fn to_csv(records: &[RegionPairRecord]) -> Result<String> {
        let csv = records.iter().fold(
            CSVBuilder::new(vec!["region_pair_key", "total_score"]),
            |csv, r| csv.add_row_owned(vec![r.region_pair_key.clone(), r.total_score.to_string()]),
        );
        Ok(csv.build())
    }
}

/// Region tab list exporter
pub struct TabListExporter;

impl TabListExporter {
    /// Export tabs as JSON
    pub fn to_json(tabs: &[Tab]) -> Result<String> {
        to_json_string(tabs, "tab list")
    }

    /// Export tabs as CSV
    pub fn to_csv(tabs: &[Tab]) -> Result<String> {
        let csv = tabs.iter().fold(
            CSVBuilder::new(vec!["node_id", "name", "kind", "is_cross_reference"]),
            |csv, t| {
                csv.add_row_owned(vec![
                    t.node_id.clone(),
                    t.name.clone(),
                    t.kind.to_string(),
                    t.is_cross_reference.to_string(),
                ])
            },
        );
        Ok(csv.build())
    }
}

/// Co-activation edge exporter
pub struct EdgeReportExporter;

impl EdgeReportExporter {
    /// Export edges as JSON
    pub fn to_json(edges: &[CoActivationEdge]) -> Result<String> {
        to_json_string(edges, "co-activation edges")
    }

    /// Export edges as CSV
    pub fn to_csv(edges: &[CoActivationEdge]) -> Result<String> {
        let csv = edges.iter().fold(
            CSVBuilder::new(vec!["a", "b", "weight"]),
            |csv, e| csv.add_row_owned(vec![e.a.clone(), e.b.clone(), e.weight.to_string()]),
        );
        Ok(csv.build())
    }
}

/// "Trained together" partner list exporter
pub struct PartnerListExporter;

impl PartnerListExporter {
    /// Export partners as JSON
    pub fn to_json(partners: &[Partner]) -> Result<String> {
        to_json_string(partners, "partner list")
    }

    /// Export partners as CSV
    pub fn to_csv(partners: &[Partner]) -> Result<String> {
        let csv = partners.iter().fold(
            CSVBuilder::new(vec!["node_id", "weight"]),
            |csv, p| csv.add_row_owned(vec![p.node_id.clone(), p.weight.to_string()]),
        );
        Ok(csv.build())
    }
}

/// Integrity report exporter
pub struct IntegrityReportExporter;

impl IntegrityReportExporter {
    /// Export integrity report as JSON
    pub fn to_json(report: &IntegrityReport) -> Result<String> {
        to_json_string(report, "integrity report")
    }

    /// Export integrity issues as CSV, one row per issue
    pub fn to_csv(report: &IntegrityReport) -> Result<String> {
        let mut csv = CSVBuilder::new(vec!["kind", "subject", "detail"]);

        for dangling in &report.dangling_links {
            csv = csv.add_row_owned(vec![
                "dangling-link".to_string(),
                format!("{}|{}", dangling.link.exercise_id, dangling.link.anatomy_node_id),
                dangling.to_error().to_string(),
            ]);
        }
        for failure in &report.resolution_failures {
            csv = csv.add_row_owned(vec![
                failure.kind.clone(),
                failure.node_id.clone(),
                failure.detail.clone(),
            ]);
        }
        for node_id in &report.unlinked_nodes {
            csv = csv.add_row_owned(vec![
                "unlinked".to_string(),
                node_id.clone(),
                String::new(),
            ]);
        }

        Ok(csv.build())
    }
}

/// Full analysis report combining graph, bridge, and integrity metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub timestamp: String,
    pub snapshot_name: String,
    pub stats: GraphStats,
    pub bridges: Vec<BridgeRecord>,
    pub region_pairs: Vec<RegionPairRecord>,
    pub integrity_score: u8,
    pub dangling_links: usize,
    pub resolution_failures: usize,
    pub recommendations: Vec<String>,
}

/// Analysis report exporter
pub struct AnalysisReportExporter;

impl AnalysisReportExporter {
    /// Export analysis report as JSON
    pub fn to_json(report: &AnalysisReport) -> Result<String> {
        to_json_string(report, "analysis report")
    }

    /// Export analysis report as CSV (summary metrics only, flattened)
    pub fn to_csv(report: &AnalysisReport) -> Result<String> {
        let top_pair = report
            .region_pairs
            .first()
            .map(|p| p.region_pair_key.clone())
            .unwrap_or_default();

        let csv = CSVBuilder::new(vec![
            "timestamp",
            "snapshot_name",
            "total_nodes",
            "total_edges",
            "bridges",
            "top_region_pair",
            "integrity_score",
            "dangling_links",
            "resolution_failures",
            "recommendations",
        ])
        .add_row_owned(vec![
            report.timestamp.clone(),
            report.snapshot_name.clone(),
            report.stats.total_nodes.to_string(),
            report.stats.total_edges.to_string(),
            report.bridges.len().to_string(),
            top_pair,
            report.integrity_score.to_string(),
            report.dangling_links.to_string(),
            report.resolution_failures.to_string(),
            report.recommendations.join("|"),
        ]);
        Ok(csv.build())
    }
}

/// Create an analysis report with recommendations
pub fn create_analysis_report(
    snapshot_name: &str,
    stats: GraphStats,
    bridges: &BridgeAnalysis,
    region_pairs: &[RegionPairStats],
    integrity: &IntegrityReport,
) -> AnalysisReport {
    let mut recommendations = Vec::new();

    if !integrity.dangling_links.is_empty() {
        recommendations.push(format!(
            "Found {} links to unknown anatomy or exercises. They were left out of the graph.",
            integrity.dangling_links.len()
        ));
    }

    if !integrity.resolution_failures.is_empty() {
        recommendations.push(format!(
            "{} anatomy nodes have broken parent chains and were skipped.",
            integrity.resolution_failures.len()
        ));
    }

    if stats.total_nodes > 0 && stats.isolated_nodes as f64 / stats.total_nodes as f64 > 0.5 {
        recommendations.push(
            "Over half of the anatomy nodes share no exercise with any other node.".to_string(),
        );
    }

    if stats.total_edges > 0 && bridges.bridges.is_empty() {
        recommendations
            .push("No exercise couples two regions. Check region assignments.".to_string());
    }

    AnalysisReport {
        timestamp: Utc::now().to_rfc3339(),
        snapshot_name: snapshot_name.to_string(),
        stats,
        bridges: bridge_records(bridges),
        region_pairs: region_pair_records(region_pairs),
        integrity_score: integrity.integrity_score,
        dangling_links: integrity.dangling_links.len(),
        resolution_failures: integrity.resolution_failures.len(),
        recommendations,
    }
}
