//! Co-activation graph: anatomy nodes joined by the exercises that train both.
//!
//! Construction goes through an inverted index (exercise → linked nodes) and
//! a pairwise counter, so the work is proportional to Σ k² over exercises
//! rather than to the square of the node count.

use musclemap_core::prelude::*;
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Undirected edge between two co-activated nodes; `a < b`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoActivationEdge {
    pub a: NodeId,
    pub b: NodeId,
    /// Number of distinct exercises linking both endpoints
    pub weight: u32,
}

impl CoActivationEdge {
    /// Create an edge with endpoints in canonical order
    pub fn new(x: impl Into<String>, y: impl Into<String>, weight: u32) -> Self {
        let (x, y) = (x.into(), y.into());
        if x <= y {
            Self { a: x, b: y, weight }
        } else {
            Self { a: y, b: x, weight }
        }
    }

    /// `"a|b"`
    pub fn pair_key(&self) -> String {
        pair_key(&self.a, &self.b)
    }

    /// Endpoint opposite `id`, if `id` is an endpoint
    pub fn other(&self, id: &str) -> Option<&str> {
        if self.a == id {
            Some(&self.b)
        } else if self.b == id {
            Some(&self.a)
        } else {
            None
        }
    }

    /// Ranking order: weight descending, then pair key ascending
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        other
            .weight
            .cmp(&self.weight)
            .then_with(|| self.pair_key().cmp(&other.pair_key()))
    }
}

/// Canonical key for an unordered pair
pub fn pair_key(x: &str, y: &str) -> String {
    if x <= y {
        format!("{}|{}", x, y)
    } else {
        format!("{}|{}", y, x)
    }
}

/// Why a link was left out of the graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DanglingReason {
    UnknownNode,
    UnknownExercise,
}

/// A link that references an id the snapshot doesn't contain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DanglingLink {
    pub link: ExerciseAnatomyLink,
    pub reason: DanglingReason,
}

impl DanglingLink {
    pub fn to_error(&self) -> Error {
        match self.reason {
            DanglingReason::UnknownNode => Error::not_found(&self.link.anatomy_node_id),
            DanglingReason::UnknownExercise => Error::not_found(&self.link.exercise_id),
        }
    }
}

/// Exercise → distinct linked nodes (snapshot arena indices, ascending)
#[derive(Debug, Clone, Default)]
pub struct InvertedIndex {
    exercises: BTreeMap<ExerciseId, Vec<usize>>,
    dangling: Vec<DanglingLink>,
    filtered_by_role: usize,
}

impl InvertedIndex {
    /// Index the snapshot's links, dropping dangling ones and roles the config excludes
    pub fn build(snapshot: &AnatomySnapshot, config: &AnalysisConfig) -> Self {
        let mut exercises: BTreeMap<ExerciseId, BTreeSet<usize>> = BTreeMap::new();
        let mut dangling = Vec::new();
        let mut filtered_by_role = 0;

        for link in snapshot.links() {
            if !config.includes_role(link.role) {
                filtered_by_role += 1;
                continue;
            }

            let Some(idx) = snapshot.index_of(&link.anatomy_node_id) else {
                log::warn!(
                    "Link {} -> {} references unknown anatomy node",
                    link.exercise_id,
                    link.anatomy_node_id
                );
                dangling.push(DanglingLink {
                    link: link.clone(),
                    reason: DanglingReason::UnknownNode,
                });
                continue;
            };

            if !snapshot.is_known_exercise(&link.exercise_id) {
                log::warn!(
                    "Link {} -> {} references unknown exercise",
                    link.exercise_id,
                    link.anatomy_node_id
                );
                dangling.push(DanglingLink {
                    link: link.clone(),
                    reason: DanglingReason::UnknownExercise,
                });
                continue;
            }

            exercises
                .entry(link.exercise_id.clone())
                .or_default()
                .insert(idx);
        }

        Self {
            exercises: exercises
                .into_iter()
                .map(|(id, nodes)| (id, nodes.into_iter().collect()))
                .collect(),
            dangling,
            filtered_by_role,
        }
    }

    /// Linked nodes for one exercise
    pub fn nodes_for(&self, exercise_id: &str) -> &[usize] {
        self.exercises
            .get(exercise_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn exercise_count(&self) -> usize {
        self.exercises.len()
    }

    pub fn dangling(&self) -> &[DanglingLink] {
        &self.dangling
    }

    /// Links skipped because their role is not included
    pub fn filtered_by_role(&self) -> usize {
        self.filtered_by_role
    }

    /// Σ C(k, 2) over exercises
    pub fn expected_pair_total(&self) -> u64 {
        self.exercises
            .values()
            .map(|nodes| {
                let k = nodes.len() as u64;
                k * k.saturating_sub(1) / 2
            })
            .sum()
    }

    /// Count pairs over every exercise
    pub fn count_pairs(&self) -> PairCounter {
        let mut counter = PairCounter::new();
        for nodes in self.exercises.values() {
            counter.add_exercise(nodes);
        }
        counter
    }

    /// Count pairs over disjoint exercise shards in parallel and merge
    pub fn count_pairs_sharded(&self, shards: usize) -> PairCounter {
        let groups: Vec<&Vec<usize>> = self.exercises.values().collect();
        if shards <= 1 || groups.len() < 2 {
            return self.count_pairs();
        }
        let chunk = groups.len().div_ceil(shards);

        groups
            .par_chunks(chunk)
            .map(|shard| {
                let mut counter = PairCounter::new();
                for nodes in shard {
                    counter.add_exercise(nodes);
                }
                counter
            })
            .reduce(PairCounter::new, |mut total, counter| {
                total.merge(counter);
                total
            })
    }
}

/// Pairwise shared-exercise counter keyed by arena index pairs `(low, high)`.
///
/// Counters built from the same snapshot can be merged, so disjoint exercise
/// shards can be counted independently.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PairCounter {
    counts: HashMap<(usize, usize), u32>,
}

impl PairCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment every pair among one exercise's distinct, ascending nodes
    pub fn add_exercise(&mut self, nodes: &[usize]) {
        for (i, &x) in nodes.iter().enumerate() {
            for &y in &nodes[i + 1..] {
                *self.counts.entry((x, y)).or_insert(0) += 1;
            }
        }
    }

    pub fn merge(&mut self, other: PairCounter) {
        for (pair, count) in other.counts {
            *self.counts.entry(pair).or_insert(0) += count;
        }
    }

    pub fn get(&self, x: usize, y: usize) -> u32 {
        let key = if x <= y { (x, y) } else { (y, x) };
        self.counts.get(&key).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.counts.values().map(|&c| c as u64).sum()
    }
}

/// Another node trained together with a given node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Partner {
    pub node_id: NodeId,
    pub weight: u32,
}

/// Statistics about the graph
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphStats {
    pub total_nodes: usize,
    pub total_edges: usize,
    pub total_exercises: usize,
    pub linked_nodes: usize,
    pub isolated_nodes: usize,
    pub total_weight: u64,
    pub average_weight: f64,
    pub dangling_links: usize,
}

/// Undirected weighted co-activation graph over every snapshot node
pub struct CoActivationGraph {
    /// Node weights are ids; node index i is snapshot arena index i
    graph: UnGraph<NodeId, u32>,
    /// Map from node id to graph index
    node_index: HashMap<NodeId, NodeIndex>,
    /// Exercises linked to each node
    link_counts: Vec<u32>,
    total_exercises: usize,
    dangling: Vec<DanglingLink>,
}

impl CoActivationGraph {
    /// Build the graph from a snapshot
    pub fn build(snapshot: &AnatomySnapshot, config: &AnalysisConfig) -> Self {
        let index = InvertedIndex::build(snapshot, config);
        let counter = if config.shards > 1 {
            index.count_pairs_sharded(config.shards)
        } else {
            index.count_pairs()
        };
        Self::from_parts(snapshot, &index, &counter, config.min_edge_weight)
    }

    /// Assemble from an index and counter built over the same snapshot
    pub(crate) fn from_parts(
        snapshot: &AnatomySnapshot,
        index: &InvertedIndex,
        counter: &PairCounter,
        min_edge_weight: u32,
    ) -> Self {
        let mut graph = UnGraph::with_capacity(snapshot.len(), counter.len());
        let mut node_index = HashMap::with_capacity(snapshot.len());
        for node in snapshot.nodes() {
            let idx = graph.add_node(node.id.clone());
            node_index.insert(node.id.clone(), idx);
        }

        let mut link_counts = vec![0u32; snapshot.len()];
        for nodes in index.exercises.values() {
            for &idx in nodes {
                link_counts[idx] += 1;
            }
        }

        // Sorted insertion keeps edge order stable across runs.
        let mut pairs: Vec<_> = counter
            .counts
            .iter()
            .filter(|(_, count)| **count >= min_edge_weight.max(1))
            .collect();
        pairs.sort_by_key(|(pair, _)| **pair);
        for (&(x, y), &count) in pairs {
            graph.add_edge(NodeIndex::new(x), NodeIndex::new(y), count);
        }

        log::debug!(
            "Co-activation graph: {} nodes, {} edges from {} exercises",
            graph.node_count(),
            graph.edge_count(),
            index.exercise_count()
        );

        Self {
            graph,
            node_index,
            link_counts,
            total_exercises: index.exercise_count(),
            dangling: index.dangling.clone(),
        }
    }

    fn node_index(&self, id: &str) -> Option<NodeIndex> {
        self.node_index.get(id).copied()
    }

    /// Underlying petgraph graph
    pub fn inner(&self) -> &UnGraph<NodeId, u32> {
        &self.graph
    }

    /// Shared-exercise count for a pair; symmetric, zero when unrelated
    pub fn weight(&self, a: &str, b: &str) -> u32 {
        if a == b {
            return 0;
        }
        match (self.node_index(a), self.node_index(b)) {
            (Some(x), Some(y)) => self
                .graph
                .find_edge(x, y)
                .map(|e| self.graph[e])
                .unwrap_or(0),
            _ => 0,
        }
    }

    /// Neighbors with weights, heaviest first then by id
    pub fn neighbors(&self, id: &str) -> Vec<(&str, u32)> {
        let Some(idx) = self.node_index(id) else {
            return Vec::new();
        };
        let mut out: Vec<(&str, u32)> = self
            .graph
            .edges(idx)
            .map(|e| {
                let other = if e.source() == idx { e.target() } else { e.source() };
                (self.graph[other].as_str(), *e.weight())
            })
            .collect();
        out.sort_by(|x, y| y.1.cmp(&x.1).then_with(|| x.0.cmp(y.0)));
        out
    }

    /// Strongest "trained together" partners of a node
    pub fn top_partners(&self, id: &str, limit: usize) -> Vec<Partner> {
        self.neighbors(id)
            .into_iter()
            .take(limit)
            .map(|(node_id, weight)| Partner {
                node_id: node_id.to_string(),
                weight,
            })
            .collect()
    }

    /// Number of edges at a node
    pub fn degree(&self, id: &str) -> usize {
        self.node_index(id)
            .map(|idx| self.graph.edges(idx).count())
            .unwrap_or(0)
    }

    /// All edges, unordered
    pub fn edges(&self) -> impl Iterator<Item = CoActivationEdge> + '_ {
        self.graph.edge_references().map(|e| {
            CoActivationEdge::new(
                self.graph[e.source()].clone(),
                self.graph[e.target()].clone(),
                *e.weight(),
            )
        })
    }

    /// All edges ranked by weight descending, then pair key
    pub fn ranked_edges(&self) -> Vec<CoActivationEdge> {
        let mut edges: Vec<_> = self.edges().collect();
        edges.sort_by(CoActivationEdge::rank_cmp);
        edges
    }

    /// Links left out of the graph
    pub fn dangling_links(&self) -> &[DanglingLink] {
        &self.dangling
    }

    /// Exercises linked to a node (after role filtering)
    pub fn link_count(&self, id: &str) -> u32 {
        self.node_index(id)
            .and_then(|idx| self.link_counts.get(idx.index()).copied())
            .unwrap_or(0)
    }

    /// Nodes with no counted exercise link, in snapshot order
    pub fn unlinked_nodes(&self) -> Vec<NodeId> {
        self.graph
            .node_indices()
            .filter(|idx| self.link_counts[idx.index()] == 0)
            .map(|idx| self.graph[idx].clone())
            .collect()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Sum of all edge weights
    pub fn total_weight(&self) -> u64 {
        self.graph.edge_weights().map(|&w| w as u64).sum()
    }

    /// Get statistics about the graph
    pub fn stats(&self) -> GraphStats {
        let total_edges = self.edge_count();
        let total_weight = self.total_weight();
        let isolated = self
            .graph
            .node_indices()
            .filter(|&idx| self.graph.edges(idx).next().is_none())
            .count();

        GraphStats {
            total_nodes: self.node_count(),
            total_edges,
            total_exercises: self.total_exercises,
            linked_nodes: self.link_counts.iter().filter(|&&c| c > 0).count(),
            isolated_nodes: isolated,
            total_weight,
            average_weight: if total_edges > 0 {
                total_weight as f64 / total_edges as f64
            } else {
                0.0
            },
            dangling_links: self.dangling.len(),
        }
    }
}
