//! Core data models for the anatomy and exercise knowledge base.
//!
//! These types are designed to be:
//! - **Serializable**: All types derive Serialize/Deserialize (camelCase on the wire)
//! - **Debuggable**: Derive Debug for easy inspection
//! - **Type-Safe**: Enums replace magic strings

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Anatomy node identifier
pub type NodeId = String;

/// Exercise identifier
pub type ExerciseId = String;

/// Level of an anatomy node in the hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnatomyKind {
    /// Body region (hierarchy root)
    Region,
    /// Muscle group
    Group,
    /// Individual muscle
    Muscle,
    /// Muscle head
    Head,
    /// Anything the store reports that we don't model
    #[serde(other)]
    Other,
}

impl AnatomyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Region => "region",
            Self::Group => "group",
            Self::Muscle => "muscle",
            Self::Head => "head",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for AnatomyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A muscle-hierarchy entry (region, group, or head)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnatomyNode {
    pub id: NodeId,
    pub name: String,
    pub kind: AnatomyKind,
    /// `None` only at region roots
    #[serde(default)]
    pub parent_id: Option<NodeId>,
}

impl AnatomyNode {
    /// Create a new node
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        kind: AnatomyKind,
        parent_id: Option<&str>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            parent_id: parent_id.map(str::to_string),
        }
    }

    /// Create a region root
    pub fn region(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(id, name, AnatomyKind::Region, None)
    }

    /// Whether this node has no parent
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// How an exercise engages an anatomy node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkRole {
    #[default]
    Primary,
    Secondary,
    Stabilizer,
    #[serde(other)]
    Other,
}

impl fmt::Display for LinkRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Primary => "primary",
            Self::Secondary => "secondary",
            Self::Stabilizer => "stabilizer",
            Self::Other => "other",
        };
        f.write_str(s)
    }
}

/// Many-to-many edge between an exercise and an anatomy node
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseAnatomyLink {
    pub exercise_id: ExerciseId,
    pub anatomy_node_id: NodeId,
    #[serde(default)]
    pub role: LinkRole,
}

impl ExerciseAnatomyLink {
    pub fn new(exercise_id: impl Into<String>, anatomy_node_id: impl Into<String>, role: LinkRole) -> Self {
        Self {
            exercise_id: exercise_id.into(),
            anatomy_node_id: anatomy_node_id.into(),
            role,
        }
    }

    /// Primary-role link
    pub fn primary(exercise_id: impl Into<String>, anatomy_node_id: impl Into<String>) -> Self {
        Self::new(exercise_id, anatomy_node_id, LinkRole::Primary)
    }
}

/// Exercise record, used only to detect links to unknown exercises
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub id: ExerciseId,
    #[serde(default)]
    pub name: String,
}

/// One section of a training guide and the anatomy it focuses on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuideSection {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub focus_anatomy_ids: Vec<NodeId>,
}

/// Deduplicated node ids mentioned by guide focus links, in first-mention order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuideReferencedAnatomy {
    ids: Vec<NodeId>,
}

impl GuideReferencedAnatomy {
    /// Collect references from any id sequence
    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for id in ids {
            let id = id.into();
            if seen.insert(id.clone()) {
                out.push(id);
            }
        }
        Self { ids: out }
    }

    /// Collect references across guide sections
    pub fn from_sections(sections: &[GuideSection]) -> Self {
        Self::from_ids(
            sections
                .iter()
                .flat_map(|s| s.focus_anatomy_ids.iter().cloned()),
        )
    }

    pub fn ids(&self) -> &[NodeId] {
        &self.ids
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|i| i == id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
