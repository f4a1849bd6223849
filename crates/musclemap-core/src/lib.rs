//! # musclemap Core
//!
//! Core data models, error types, configuration, and the snapshot arena for the
//! anatomy/exercise knowledge base. This crate defines the canonical types that
//! all other crates depend on.
//!
//! ## Architecture Principles
//!
//! - **Snapshot In, Reports Out**: analysis reads one immutable [`AnatomySnapshot`]
//! - **Arena + Index**: the anatomy forest is a `Vec` plus id and children maps
//! - **Zero Panic in Libraries**: All errors are `Result<T, Error>`
//! - **Explicit Overrides**: page overrides are a value passed in, never global state
//!
//! ## Core Modules
//!
//! - [`models`] - Anatomy nodes, exercise links, guide sections
//! - [`snapshot`] - Arena snapshot and hierarchical subtrees
//! - [`store`] - Node store adapter trait and in-memory store
//! - [`error`] - Error types and Result alias
//! - [`config`] - Analysis configuration
//! - [`profiles`] - Configuration presets
//! - [`overrides`] - Per-region override value and editor
//! - [`utils`] - Serialization and file helpers
//!
//! ## Usage
//!
//! ```
//! use musclemap_core::prelude::*;
//!
//! let snapshot = AnatomySnapshot::new(
//!     vec![
//!         AnatomyNode::region("back", "Back"),
//!         AnatomyNode::new("lats", "Lats", AnatomyKind::Muscle, Some("back")),
//!     ],
//!     vec![ExerciseAnatomyLink::primary("pullup", "lats")],
//! );
//!
//! assert_eq!(snapshot.children_of("back").count(), 1);
//! ```

pub mod config;
pub mod error;
pub mod models;
pub mod overrides;
pub mod profiles;
pub mod snapshot;
pub mod store;
pub mod utils;

pub use config::{AnalysisConfig, AnalysisConfigBuilder};
pub use error::{Error, Result};
pub use models::*;
pub use overrides::{OverrideConfig, OverrideEditor, RegionOverride};
pub use profiles::ConfigProfile;
pub use snapshot::{AnatomySnapshot, RegionSubtree, SubtreeNode};
pub use store::{InMemoryStore, NodeStore, SnapshotFile};
pub use utils::{CSVBuilder, Format, to_json_string};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::AnalysisConfig;
    pub use crate::error::{Error, Result};
    pub use crate::models::{
        AnatomyKind, AnatomyNode, Exercise, ExerciseAnatomyLink, ExerciseId, GuideReferencedAnatomy,
        GuideSection, LinkRole, NodeId,
    };
    pub use crate::overrides::{OverrideConfig, OverrideEditor, RegionOverride};
    pub use crate::profiles::ConfigProfile;
    pub use crate::snapshot::{AnatomySnapshot, RegionSubtree, SubtreeNode};
    pub use crate::store::{InMemoryStore, NodeStore};
}
