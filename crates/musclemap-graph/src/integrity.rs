//! Data-integrity analysis for a snapshot.
//!
//! Collects the warnings that region resolution and graph construction
//! degrade around (dangling links, broken parent chains, unlinked nodes)
//! into a single report with an overall score.

use crate::coactivation::{CoActivationGraph, DanglingLink};
use crate::region::RegionResolver;
use musclemap_core::prelude::*;
use serde::{Deserialize, Serialize};

/// A node whose region could not be resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionFailure {
    pub node_id: NodeId,
    /// `"cycle"` or `"missing-parent"`
    pub kind: String,
    pub detail: String,
}

/// Integrity report for one snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrityReport {
    pub total_nodes: usize,
    pub total_links: usize,
    pub dangling_links: Vec<DanglingLink>,
    pub resolution_failures: Vec<ResolutionFailure>,
    /// Nodes no counted exercise links to (regions included)
    pub unlinked_nodes: Vec<NodeId>,
    /// Overall integrity score (0-100)
    pub integrity_score: u8,
}

impl IntegrityReport {
    /// Create a new empty report
    pub fn new() -> Self {
        Self {
            total_nodes: 0,
            total_links: 0,
            dangling_links: Vec::new(),
            resolution_failures: Vec::new(),
            unlinked_nodes: Vec::new(),
            integrity_score: 100,
        }
    }

    /// Calculate the score based on issues
    pub fn calculate_score(&mut self) {
        if self.total_nodes == 0 {
            self.integrity_score = 0;
            return;
        }

        let mut score: f32 = 100.0;

        // Dangling links (up to -40 points)
        let dangling_ratio = self.dangling_links.len() as f32 / self.total_links.max(1) as f32;
        score -= dangling_ratio.min(1.0) * 40.0;

        // Broken parent chains (up to -40 points)
        let failure_ratio = self.resolution_failures.len() as f32 / self.total_nodes as f32;
        score -= failure_ratio.min(1.0) * 40.0;

        // Unlinked nodes (up to -20 points)
        let unlinked_ratio = self.unlinked_nodes.len() as f32 / self.total_nodes as f32;
        score -= unlinked_ratio.min(1.0) * 20.0;

        self.integrity_score = score.clamp(0.0, 100.0) as u8;
    }

    /// Check if the snapshot is sound (score >= 80, no broken chains)
    pub fn is_healthy(&self) -> bool {
        self.integrity_score >= 80 && self.resolution_failures.is_empty()
    }
}

impl Default for IntegrityReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot integrity analyzer
pub struct IntegrityAnalyzer<'a> {
    resolver: &'a RegionResolver<'a>,
    graph: &'a CoActivationGraph,
}

impl<'a> IntegrityAnalyzer<'a> {
    /// Create a new integrity analyzer
    pub fn new(resolver: &'a RegionResolver<'a>, graph: &'a CoActivationGraph) -> Self {
        Self { resolver, graph }
    }

    /// Run a full integrity analysis
    pub fn analyze(&self) -> IntegrityReport {
        let snapshot = self.resolver.snapshot();
        let mut report = IntegrityReport::new();

        report.total_nodes = snapshot.len();
        report.total_links = snapshot.links().len();
        report.dangling_links = self.graph.dangling_links().to_vec();
        report.resolution_failures = self.resolution_failures();
        report.unlinked_nodes = self.graph.unlinked_nodes();

        report.calculate_score();
        report
    }

    fn resolution_failures(&self) -> Vec<ResolutionFailure> {
        self.resolver
            .failures()
            .into_iter()
            .map(|(node_id, error)| {
                let kind = match &error {
                    Error::Cycle { .. } => "cycle",
                    _ => "missing-parent",
                };
                ResolutionFailure {
                    node_id,
                    kind: kind.to_string(),
                    detail: error.to_string(),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_creation() {
        let report = IntegrityReport::new();
        assert_eq!(report.total_nodes, 0);
        assert_eq!(report.integrity_score, 100);
        assert!(report.is_healthy());
    }

    #[test]
    fn test_empty_snapshot_scores_zero() {
        let snap = AnatomySnapshot::default();
        let resolver = RegionResolver::new(&snap);
        let graph = CoActivationGraph::build(&snap, &AnalysisConfig::default());
        let report = IntegrityAnalyzer::new(&resolver, &graph).analyze();
        assert_eq!(report.integrity_score, 0);
    }

    #[test]
    fn test_collects_all_issue_kinds() {
        let snap = AnatomySnapshot::new(
            vec![
                AnatomyNode::region("back", "Back"),
                AnatomyNode::new("lats", "Lats", AnatomyKind::Muscle, Some("back")),
                AnatomyNode::new("traps", "Traps", AnatomyKind::Muscle, Some("back")),
                AnatomyNode::new("a", "A", AnatomyKind::Muscle, Some("b")),
                AnatomyNode::new("b", "B", AnatomyKind::Muscle, Some("a")),
                AnatomyNode::new("stray", "Stray", AnatomyKind::Muscle, Some("nowhere")),
            ],
            vec![
                ExerciseAnatomyLink::primary("row", "lats"),
                ExerciseAnatomyLink::primary("row", "traps"),
                ExerciseAnatomyLink::primary("row", "teres"),
            ],
        );
        let resolver = RegionResolver::new(&snap);
        let graph = CoActivationGraph::build(&snap, &AnalysisConfig::default());
        let report = IntegrityAnalyzer::new(&resolver, &graph).analyze();

        assert_eq!(report.dangling_links.len(), 1);
        assert_eq!(report.dangling_links[0].link.anatomy_node_id, "teres");

        let kinds: Vec<_> = report
            .resolution_failures
            .iter()
            .map(|f| (f.node_id.as_str(), f.kind.as_str()))
            .collect();
        assert_eq!(
            kinds,
            vec![("a", "cycle"), ("b", "cycle"), ("stray", "missing-parent")]
        );
        assert_eq!(report.unlinked_nodes, vec!["back", "a", "b", "stray"]);
        assert!(report.integrity_score < 100);
        assert!(!report.is_healthy());
    }

    #[test]
    fn test_clean_snapshot_is_healthy() {
        let snap = AnatomySnapshot::new(
            vec![
                AnatomyNode::region("legs", "Legs"),
                AnatomyNode::new("quads", "Quads", AnatomyKind::Muscle, Some("legs")),
                AnatomyNode::new("glutes", "Glutes", AnatomyKind::Muscle, Some("legs")),
            ],
            vec![
                ExerciseAnatomyLink::primary("squat", "legs"),
                ExerciseAnatomyLink::primary("squat", "quads"),
                ExerciseAnatomyLink::primary("squat", "glutes"),
            ],
        );
        let resolver = RegionResolver::new(&snap);
        let graph = CoActivationGraph::build(&snap, &AnalysisConfig::default());
        let report = IntegrityAnalyzer::new(&resolver, &graph).analyze();
        assert_eq!(report.integrity_score, 100);
        assert!(report.is_healthy());
    }
}
