//! # Anatomy Graph Analysis
//!
//! Relationship analysis over an [`AnatomySnapshot`](musclemap_core::AnatomySnapshot)
//! using petgraph.
//!
//! Provides:
//! - Region resolution (root ancestor of any node, memoized)
//! - Co-activation graph (nodes joined by shared exercises)
//! - Ranked co-activation edges and "trained together" partners
//! - Bridge analysis (couplings that cross region boundaries)
//! - Region-pair interaction ranking
//! - Cross-reference resolution for region pages
//! - Region tab assembly
//! - Snapshot integrity analysis
//!
//! ## Quick Start
//!
//! ```
//! use musclemap_graph::prelude::*;
//!
//! let snapshot = AnatomySnapshot::new(
//!     vec![
//!         AnatomyNode::region("back", "Back"),
//!         AnatomyNode::new("lats", "Lats", AnatomyKind::Muscle, Some("back")),
//!         AnatomyNode::region("shoulders", "Shoulders"),
//!         AnatomyNode::new("rear-delts", "Rear Delts", AnatomyKind::Muscle, Some("shoulders")),
//!     ],
//!     vec![
//!         ExerciseAnatomyLink::primary("face-pull", "lats"),
//!         ExerciseAnatomyLink::primary("face-pull", "rear-delts"),
//!     ],
//! );
//!
//! let resolver = RegionResolver::new(&snapshot);
//! let graph = CoActivationGraph::build(&snapshot, &AnalysisConfig::default());
//! let bridges = BridgeAnalyzer::new(&graph, &resolver).find_bridges();
//!
//! assert_eq!(graph.weight("lats", "rear-delts"), 1);
//! assert_eq!(bridges.bridges.len(), 2);
//! ```
//!
//! ## Modules
//!
//! - [`region`] - Region resolver
//! - [`coactivation`] - Co-activation graph builder
//! - [`bridge`] - Bridge analyzer and region-pair aggregate
//! - [`crossref`] - Cross-reference resolver
//! - [`tabs`] - Region tab assembly
//! - [`integrity`] - Snapshot integrity analysis
//!
//! ## Performance Characteristics
//!
//! - Region resolution: O(n) total, each parent chain walked once
//! - Graph construction: O(L + Σ k²) where k is nodes per exercise
//! - Bridge scan: O(n + m)
//! - Cross-reference resolution: O(r · s) for r references over a subtree of size s

pub mod bridge;
pub mod coactivation;
pub mod crossref;
pub mod integrity;
pub mod region;
pub mod tabs;

pub use bridge::{BridgeAnalysis, BridgeAnalyzer, BridgeScore, RegionPairMetric, RegionPairStats};
pub use coactivation::{
    CoActivationEdge, CoActivationGraph, DanglingLink, DanglingReason, GraphStats, InvertedIndex,
    PairCounter, Partner, pair_key,
};
pub use crossref::{is_covered_by_hierarchy, resolve_cross_references};
pub use integrity::{IntegrityAnalyzer, IntegrityReport, ResolutionFailure};
pub use region::RegionResolver;
pub use tabs::{Tab, TabAssembler};

pub mod prelude {
    pub use crate::bridge::{BridgeAnalysis, BridgeAnalyzer, BridgeScore, RegionPairStats};
    pub use crate::coactivation::{CoActivationEdge, CoActivationGraph, GraphStats};
    pub use crate::crossref::resolve_cross_references;
    pub use crate::integrity::{IntegrityAnalyzer, IntegrityReport};
    pub use crate::region::RegionResolver;
    pub use crate::tabs::{Tab, TabAssembler};
    pub use musclemap_core::prelude::*;
}
