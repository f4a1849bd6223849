//! Per-region tab list assembly.

use crate::crossref::resolve_cross_references;
use musclemap_core::prelude::*;
use serde::{Deserialize, Serialize};

/// One tab on a region page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tab {
    pub node_id: NodeId,
    pub name: String,
    pub kind: AnatomyKind,
    pub is_cross_reference: bool,
}

impl Tab {
    fn from_node(node: &AnatomyNode, is_cross_reference: bool) -> Self {
        Self {
            node_id: node.id.clone(),
            name: node.name.clone(),
            kind: node.kind,
            is_cross_reference,
        }
    }
}

/// Builds region tab lists from a snapshot and an explicit override value
pub struct TabAssembler<'a> {
    snapshot: &'a AnatomySnapshot,
    overrides: &'a OverrideConfig,
}

impl<'a> TabAssembler<'a> {
    pub fn new(snapshot: &'a AnatomySnapshot, overrides: &'a OverrideConfig) -> Self {
        Self {
            snapshot,
            overrides,
        }
    }

    /// Hierarchical children (minus exclusions) followed by cross-reference tabs.
    ///
    /// A manual cross-reference naming a child that is still listed keeps its
    /// hierarchy tab; each node appears at most once.
    pub fn assemble(&self, region_id: &str, referenced: &GuideReferencedAnatomy) -> Result<Vec<Tab>> {
        let subtree = self.snapshot.region_subtree(region_id)?;
        let region_override = self.overrides.get(region_id);

        let mut tabs: Vec<Tab> = self
            .snapshot
            .children_of(region_id)
            .filter(|child| !region_override.is_some_and(|o| o.excludes(&child.id)))
            .map(|child| Tab::from_node(child, false))
            .collect();
        tabs.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.node_id.cmp(&b.node_id)));

        for id in resolve_cross_references(&subtree, referenced, region_override) {
            if tabs.iter().any(|t| t.node_id == id) {
                log::debug!("'{}' already listed as a child of '{}'", id, region_id);
                continue;
            }
            match self.snapshot.node(&id) {
                Some(node) => tabs.push(Tab::from_node(node, true)),
                None => log::warn!(
                    "{}; cross-reference dropped from region '{}'",
                    Error::not_found(&id),
                    region_id
                ),
            }
        }

        Ok(tabs)
    }

    /// Assemble using the focus links of the given guide sections
    pub fn assemble_for_sections(&self, region_id: &str, sections: &[GuideSection]) -> Result<Vec<Tab>> {
        self.assemble(region_id, &GuideReferencedAnatomy::from_sections(sections))
    }

    /// Assemble using every guide section in the snapshot
    pub fn assemble_for_snapshot_guides(&self, region_id: &str) -> Result<Vec<Tab>> {
        self.assemble_for_sections(region_id, self.snapshot.guide_sections())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> AnatomySnapshot {
        AnatomySnapshot::new(
            vec![
                AnatomyNode::region("arms", "Arms"),
                AnatomyNode::new("triceps", "Triceps", AnatomyKind::Group, Some("arms")),
                AnatomyNode::new("biceps", "Biceps", AnatomyKind::Group, Some("arms")),
                AnatomyNode::new("biceps-short-head", "Short Head", AnatomyKind::Head, Some("biceps")),
                AnatomyNode::region("shoulders", "Shoulders"),
                AnatomyNode::new("rear-delts", "Rear Delts", AnatomyKind::Muscle, Some("shoulders")),
            ],
            vec![],
        )
        .with_guide_sections(vec![GuideSection {
            id: "curl-guide".into(),
            title: "Curl Variations".into(),
            focus_anatomy_ids: vec!["rear-delts".into(), "biceps-short-head".into(), "ghost".into()],
        }])
    }

    #[test]
    fn test_assemble_tabs() {
        let snap = snapshot();
        let overrides = OverrideConfig::new();
        let tabs = TabAssembler::new(&snap, &overrides)
            .assemble_for_snapshot_guides("arms")
            .unwrap();

        let summary: Vec<_> = tabs
            .iter()
            .map(|t| (t.node_id.as_str(), t.is_cross_reference))
            .collect();
        assert_eq!(
            summary,
            vec![("biceps", false), ("triceps", false), ("rear-delts", true)]
        );
        assert_eq!(tabs[2].kind, AnatomyKind::Muscle);
    }

    #[test]
    fn test_excluded_child_moves_to_cross_reference() {
        let snap = snapshot();
        let mut overrides = OverrideConfig::new();
        overrides.insert(
            "arms",
            RegionOverride {
                exclude_children: vec!["biceps".into()],
                ..RegionOverride::default()
            },
        );
        let tabs = TabAssembler::new(&snap, &overrides)
            .assemble_for_snapshot_guides("arms")
            .unwrap();

        let ids: Vec<_> = tabs.iter().map(|t| t.node_id.as_str()).collect();
        assert_eq!(ids, vec!["triceps", "rear-delts", "biceps-short-head"]);
    }

    #[test]
    fn test_manual_include_of_listed_child_is_not_duplicated() {
        let snap = snapshot();
        let mut overrides = OverrideConfig::new();
        overrides.insert(
            "arms",
            RegionOverride {
                cross_references: vec!["triceps".into()],
                ..RegionOverride::default()
            },
        );
        let tabs = TabAssembler::new(&snap, &overrides)
            .assemble("arms", &GuideReferencedAnatomy::default())
            .unwrap();

        let summary: Vec<_> = tabs
            .iter()
            .map(|t| (t.node_id.as_str(), t.is_cross_reference))
            .collect();
        assert_eq!(summary, vec![("biceps", false), ("triceps", false)]);
    }

    #[test]
    fn test_unknown_region() {
        let snap = snapshot();
        let overrides = OverrideConfig::new();
        let result = TabAssembler::new(&snap, &overrides)
            .assemble("legs", &GuideReferencedAnatomy::default());
        assert!(matches!(result, Err(Error::NotFound { .. })));
    }

    #[test]
    fn test_tab_wire_shape() {
        let tab = Tab {
            node_id: "rear-delts".into(),
            name: "Rear Delts".into(),
            kind: AnatomyKind::Muscle,
            is_cross_reference: true,
        };
        let json = serde_json::to_string(&tab).unwrap();
        assert_eq!(
            json,
            r#"{"nodeId":"rear-delts","name":"Rear Delts","kind":"muscle","isCrossReference":true}"#
        );
    }
}
