//! Immutable in-memory snapshot of the knowledge base.
//!
//! The anatomy forest is stored as an arena (`Vec<AnatomyNode>`) plus an
//! id → index map and a children-by-parent-id lookup. Nothing here follows
//! object references, so a snapshot can be shared across threads and analysis
//! runs freely.

use crate::error::{Error, Result};
use crate::models::{AnatomyKind, AnatomyNode, ExerciseAnatomyLink, ExerciseId, GuideSection, NodeId};
use crate::store::NodeStore;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Coherent, read-only view of nodes, links, and guides for one analysis run
#[derive(Debug, Clone, Default)]
pub struct AnatomySnapshot {
    nodes: Vec<AnatomyNode>,
    index: HashMap<NodeId, usize>,
    children: HashMap<NodeId, Vec<usize>>,
    links: Vec<ExerciseAnatomyLink>,
    exercises: Option<HashSet<ExerciseId>>,
    guide_sections: Vec<GuideSection>,
}

impl AnatomySnapshot {
    /// Build a snapshot from nodes and links.
    ///
    /// Duplicate node ids keep the first occurrence.
    pub fn new(nodes: Vec<AnatomyNode>, links: Vec<ExerciseAnatomyLink>) -> Self {
        let mut arena = Vec::with_capacity(nodes.len());
        let mut index = HashMap::with_capacity(nodes.len());

        for node in nodes {
            if index.contains_key(&node.id) {
                log::warn!("Duplicate anatomy node id '{}' ignored", node.id);
                continue;
            }
            index.insert(node.id.clone(), arena.len());
            arena.push(node);
        }

        let mut children: HashMap<NodeId, Vec<usize>> = HashMap::new();
        for (idx, node) in arena.iter().enumerate() {
            if let Some(parent) = &node.parent_id {
                children.entry(parent.clone()).or_default().push(idx);
            }
        }

        log::debug!(
            "Snapshot built: {} nodes, {} links",
            arena.len(),
            links.len()
        );

        Self {
            nodes: arena,
            index,
            children,
            links,
            exercises: None,
            guide_sections: Vec::new(),
        }
    }

    /// Read a full snapshot through a store adapter
    pub fn from_store(store: &dyn NodeStore) -> Result<Self> {
        let nodes = store.list_anatomy_nodes()?;
        let links = store.list_exercise_anatomy_links()?;
        let mut snapshot = Self::new(nodes, links);

        if let Some(exercises) = store.list_exercises()? {
            snapshot = snapshot.with_exercises(exercises.into_iter().map(|e| e.id));
        }
        snapshot.guide_sections = store.list_guide_sections()?;

        Ok(snapshot)
    }

    /// Register the known exercise ids; links to other exercises become dangling
    pub fn with_exercises<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exercises = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    /// Attach guide sections
    pub fn with_guide_sections(mut self, sections: Vec<GuideSection>) -> Self {
        self.guide_sections = sections;
        self
    }

    pub fn nodes(&self) -> &[AnatomyNode] {
        &self.nodes
    }

    pub fn links(&self) -> &[ExerciseAnatomyLink] {
        &self.links
    }

    pub fn guide_sections(&self) -> &[GuideSection] {
        &self.guide_sections
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Look up a node by id
    pub fn node(&self, id: &str) -> Option<&AnatomyNode> {
        self.index.get(id).map(|&idx| &self.nodes[idx])
    }

    /// Arena index of a node
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Node at an arena index
    pub fn node_at(&self, idx: usize) -> Option<&AnatomyNode> {
        self.nodes.get(idx)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Whether an exercise id is known. Always true when no registry was supplied.
    pub fn is_known_exercise(&self, id: &str) -> bool {
        self.exercises.as_ref().is_none_or(|set| set.contains(id))
    }

    /// Direct children of a node, in snapshot order
    pub fn children_of(&self, id: &str) -> impl Iterator<Item = &AnatomyNode> {
        self.children
            .get(id)
            .into_iter()
            .flatten()
            .map(|&idx| &self.nodes[idx])
    }

    /// Nodes with no parent
    pub fn roots(&self) -> impl Iterator<Item = &AnatomyNode> {
        self.nodes.iter().filter(|n| n.is_root())
    }

    /// Ids of all region roots
    pub fn region_ids(&self) -> HashSet<NodeId> {
        self.roots().map(|n| n.id.clone()).collect()
    }

    /// Build the hierarchical subtree under a node.
    ///
    /// Descent stops at any id already on the current path.
    pub fn region_subtree(&self, region_id: &str) -> Result<RegionSubtree> {
        if !self.contains(region_id) {
            return Err(Error::not_found(region_id));
        }

        Ok(RegionSubtree {
            region_id: region_id.to_string(),
            children: self.subtree_children(region_id),
        })
    }

    fn subtree_children<'s>(&'s self, region_id: &'s str) -> Vec<SubtreeNode> {
        let mut stack = vec![SubtreeFrame::new(region_id, None, self)];

        while let Some(frame) = stack.last_mut() {
            if let Some(child) = frame.pending.pop() {
                let parent_id = frame.id;
                if stack.iter().any(|f| f.id == child.id) {
                    log::warn!(
                        "Cycle in hierarchy below '{}': '{}' already on path",
                        parent_id,
                        child.id
                    );
                    continue;
                }
                stack.push(SubtreeFrame::new(&child.id, Some(child), self));
                continue;
            }

            let Some(done) = stack.pop() else { break };
            let Some(node) = done.node else {
                return done.built;
            };
            let built = SubtreeNode {
                id: node.id.clone(),
                name: node.name.clone(),
                kind: node.kind,
                children: done.built,
            };
            if let Some(parent) = stack.last_mut() {
                parent.built.push(built);
            }
        }
        Vec::new()
    }
}

/// One level of an in-progress subtree walk
struct SubtreeFrame<'s> {
    id: &'s str,
    node: Option<&'s AnatomyNode>,
    /// Children still to visit, last first
    pending: Vec<&'s AnatomyNode>,
    built: Vec<SubtreeNode>,
}

impl<'s> SubtreeFrame<'s> {
    fn new(id: &'s str, node: Option<&'s AnatomyNode>, snapshot: &'s AnatomySnapshot) -> Self {
        let mut pending: Vec<_> = snapshot.children_of(id).collect();
        pending.reverse();
        Self {
            id,
            node,
            pending,
            built: Vec::new(),
        }
    }
}

/// A region's direct children, each with its own descendant subtree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionSubtree {
    pub region_id: NodeId,
    #[serde(default)]
    pub children: Vec<SubtreeNode>,
}

impl RegionSubtree {
    pub fn child_ids(&self) -> impl Iterator<Item = &str> {
        self.children.iter().map(|c| c.id.as_str())
    }
}

/// One node of a hierarchical subtree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubtreeNode {
    pub id: NodeId,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_kind")]
    pub kind: AnatomyKind,
    #[serde(default)]
    pub children: Vec<SubtreeNode>,
}

fn default_kind() -> AnatomyKind {
    AnatomyKind::Other
}

impl SubtreeNode {
    /// Leaf with only an id
    pub fn leaf(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            kind: AnatomyKind::Other,
            children: Vec::new(),
        }
    }

    /// Add a child subtree
    pub fn with_child(mut self, child: SubtreeNode) -> Self {
        self.children.push(child);
        self
    }

    /// Height of this subtree (a leaf has depth 1)
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self, 1)];
        while let Some((node, level)) = stack.pop() {
            deepest = deepest.max(level);
            stack.extend(node.children.iter().map(|c| (c, level + 1)));
        }
        deepest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AnatomyKind, ExerciseAnatomyLink};

    fn arms_snapshot() -> AnatomySnapshot {
        AnatomySnapshot::new(
            vec![
                AnatomyNode::region("arms", "Arms"),
                AnatomyNode::new("biceps", "Biceps", AnatomyKind::Group, Some("arms")),
                AnatomyNode::new("triceps", "Triceps", AnatomyKind::Group, Some("arms")),
                AnatomyNode::new(
                    "biceps-short-head",
                    "Short Head",
                    AnatomyKind::Head,
                    Some("biceps"),
                ),
            ],
            vec![ExerciseAnatomyLink::primary("curl", "biceps")],
        )
    }

    #[test]
    fn test_index_and_children() {
        let snap = arms_snapshot();
        assert_eq!(snap.len(), 4);
        assert_eq!(snap.node("biceps").map(|n| n.name.as_str()), Some("Biceps"));

        let kids: Vec<_> = snap.children_of("arms").map(|n| n.id.as_str()).collect();
        assert_eq!(kids, vec!["biceps", "triceps"]);
        assert_eq!(snap.children_of("triceps").count(), 0);
        assert_eq!(snap.region_ids().len(), 1);
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let snap = AnatomySnapshot::new(
            vec![
                AnatomyNode::region("back", "Back"),
                AnatomyNode::region("back", "Back Again"),
            ],
            vec![],
        );
        assert_eq!(snap.len(), 1);
        assert_eq!(snap.node("back").unwrap().name, "Back");
    }

    #[test]
    fn test_region_subtree() {
        let snap = arms_snapshot();
        let subtree = snap.region_subtree("arms").unwrap();
        assert_eq!(subtree.child_ids().collect::<Vec<_>>(), vec!["biceps", "triceps"]);
        assert_eq!(subtree.children[0].children[0].id, "biceps-short-head");
        assert_eq!(subtree.children[0].depth(), 2);

        assert!(matches!(
            snap.region_subtree("legs"),
            Err(Error::NotFound { .. })
        ));
    }

    #[test]
    fn test_region_subtree_stops_on_cycle() {
        let snap = AnatomySnapshot::new(
            vec![
                AnatomyNode::new("a", "A", AnatomyKind::Group, Some("b")),
                AnatomyNode::new("b", "B", AnatomyKind::Group, Some("a")),
            ],
            vec![],
        );
        let subtree = snap.region_subtree("a").unwrap();
        assert_eq!(subtree.children.len(), 1);
        assert_eq!(subtree.children[0].id, "b");
        assert!(subtree.children[0].children.is_empty());
    }

    #[test]
    fn test_exercise_registry() {
        let snap = arms_snapshot();
        assert!(snap.is_known_exercise("anything"));

        let snap = snap.with_exercises(["curl"]);
        assert!(snap.is_known_exercise("curl"));
        assert!(!snap.is_known_exercise("press"));
    }
}
