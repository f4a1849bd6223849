//! Cross-region bridge analysis.
//!
//! A bridge node has at least one co-activation edge whose other endpoint
//! lives in a different region. Scores measure exercise-level coupling: the
//! sum of cross-region edge weights.

use crate::coactivation::{CoActivationGraph, pair_key};
use crate::region::RegionResolver;
use musclemap_core::prelude::*;
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Cross-region coupling for one node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeScore {
    pub node_id: NodeId,
    pub node_name: String,
    pub home_region_id: NodeId,
    /// Distinct foreign regions reached, sorted
    pub foreign_regions: Vec<NodeId>,
    /// Distinct cross-region edges
    pub cross_region_edges: usize,
    /// Sum of cross-region edge weights
    pub cross_region_score: u64,
}

/// Result of a bridge scan
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeAnalysis {
    /// Ranked by score descending, then node id
    pub bridges: Vec<BridgeScore>,
    /// Nodes with edges whose own region could not be resolved
    pub skipped_nodes: Vec<NodeId>,
}

/// Metric used to rank region pairs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegionPairMetric {
    /// Sum of cross-region edge weights
    #[default]
    TotalScore,
    /// Number of cross-region edges
    EdgeCount,
    /// Number of distinct nodes taking part
    BridgeNodes,
}

/// Aggregate interaction between two regions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionPairStats {
    /// `"a|b"` with `a < b`
    pub region_pair_key: String,
    pub region_a: NodeId,
    pub region_b: NodeId,
    pub total_score: u64,
    pub edge_count: usize,
    pub bridge_nodes: BTreeSet<NodeId>,
}

impl RegionPairStats {
    fn new(x: &str, y: &str) -> Self {
        let (a, b) = if x <= y { (x, y) } else { (y, x) };
        Self {
            region_pair_key: pair_key(a, b),
            region_a: a.to_string(),
            region_b: b.to_string(),
            total_score: 0,
            edge_count: 0,
            bridge_nodes: BTreeSet::new(),
        }
    }

    /// Value of a ranking metric
    pub fn metric(&self, metric: RegionPairMetric) -> u64 {
        match metric {
            RegionPairMetric::TotalScore => self.total_score,
            RegionPairMetric::EdgeCount => self.edge_count as u64,
            RegionPairMetric::BridgeNodes => self.bridge_nodes.len() as u64,
        }
    }
}

/// Bridge analyzer over a co-activation graph and a region resolver
pub struct BridgeAnalyzer<'a> {
    graph: &'a CoActivationGraph,
    resolver: &'a RegionResolver<'a>,
    max_results: Option<usize>,
}

impl<'a> BridgeAnalyzer<'a> {
    /// Create a new bridge analyzer
    pub fn new(graph: &'a CoActivationGraph, resolver: &'a RegionResolver<'a>) -> Self {
        Self {
            graph,
            resolver,
            max_results: None,
        }
    }

    /// Apply the config's result limit
    pub fn with_config(mut self, config: &AnalysisConfig) -> Self {
        self.max_results = config.max_bridge_results;
        self
    }

    /// Score every node with at least one cross-region edge
    pub fn find_bridges(&self) -> BridgeAnalysis {
        let inner = self.graph.inner();
        let snapshot = self.resolver.snapshot();
        let mut analysis = BridgeAnalysis::default();

        for idx in inner.node_indices() {
            if inner.edges(idx).next().is_none() {
                continue;
            }

            let Some(home) = self.resolver.region_index(idx.index()) else {
                log::warn!("Skipping bridge scoring for '{}': no region", inner[idx]);
                analysis.skipped_nodes.push(inner[idx].clone());
                continue;
            };

            let mut foreign = BTreeSet::new();
            let mut edges = 0usize;
            let mut score = 0u64;

            for edge in inner.edges(idx) {
                let other = if edge.source() == idx {
                    edge.target()
                } else {
                    edge.source()
                };
                let Some(region) = self.resolver.region_index(other.index()) else {
                    log::debug!(
                        "Ignoring edge {} - {}: neighbor has no region",
                        inner[idx],
                        inner[other]
                    );
                    continue;
                };
                if region != home {
                    foreign.insert(region);
                    edges += 1;
                    score += *edge.weight() as u64;
                }
            }

            if edges == 0 {
                continue;
            }

            let node = snapshot.node_at(idx.index());
            let region_id = |i: usize| {
                snapshot
                    .node_at(i)
                    .map(|n| n.id.clone())
                    .unwrap_or_default()
            };

            let mut foreign_regions: Vec<NodeId> = foreign.into_iter().map(&region_id).collect();
            foreign_regions.sort();

            analysis.bridges.push(BridgeScore {
                node_id: inner[idx].clone(),
                node_name: node.map(|n| n.name.clone()).unwrap_or_default(),
                home_region_id: region_id(home),
                foreign_regions,
                cross_region_edges: edges,
                cross_region_score: score,
            });
        }

        analysis.bridges.sort_by(|a, b| {
            b.cross_region_score
                .cmp(&a.cross_region_score)
                .then_with(|| a.node_id.cmp(&b.node_id))
        });
        if let Some(limit) = self.max_results {
            analysis.bridges.truncate(limit);
        }

        log::debug!(
            "Bridge scan: {} bridges, {} skipped",
            analysis.bridges.len(),
            analysis.skipped_nodes.len()
        );
        analysis
    }

    /// Cross-region interaction per unordered region pair, ranked by total score
    pub fn region_pairs(&self) -> Vec<RegionPairStats> {
        self.region_pairs_by(RegionPairMetric::TotalScore)
    }

    /// Region pairs ranked by `metric` descending, then pair key
    pub fn region_pairs_by(&self, metric: RegionPairMetric) -> Vec<RegionPairStats> {
        let inner = self.graph.inner();
        let snapshot = self.resolver.snapshot();
        let mut pairs: BTreeMap<String, RegionPairStats> = BTreeMap::new();

        for edge in inner.edge_references() {
            let (s, t) = (edge.source(), edge.target());
            let (Some(rs), Some(rt)) = (
                self.resolver.region_index(s.index()),
                self.resolver.region_index(t.index()),
            ) else {
                continue;
            };
            if rs == rt {
                continue;
            }
            let (Some(region_s), Some(region_t)) = (snapshot.node_at(rs), snapshot.node_at(rt))
            else {
                continue;
            };

            let key = pair_key(&region_s.id, &region_t.id);
            let stats = pairs
                .entry(key)
                .or_insert_with(|| RegionPairStats::new(&region_s.id, &region_t.id));
            stats.total_score += *edge.weight() as u64;
            stats.edge_count += 1;
            stats.bridge_nodes.insert(inner[s].clone());
            stats.bridge_nodes.insert(inner[t].clone());
        }

        let mut ranked: Vec<_> = pairs.into_values().collect();
        ranked.sort_by(|a, b| {
            b.metric(metric)
                .cmp(&a.metric(metric))
                .then_with(|| a.region_pair_key.cmp(&b.region_pair_key))
        });
        ranked
    }
}
