//! Cross-reference resolution for region pages.
//!
//! A guide may mention anatomy that the region page already shows through its
//! hierarchy. Only the mentions that fall outside every (non-excluded) child
//! subtree become extra tabs.

use musclemap_core::prelude::*;
use std::collections::HashSet;

/// Whether `target` is `root` or one of its descendants.
///
/// An id repeated on the current descent path is treated as not found.
fn subtree_contains(root: &SubtreeNode, target: &str) -> bool {
    let mut path: Vec<&str> = Vec::new();
    let mut stack = vec![(root, 0usize)];

    while let Some((node, depth)) = stack.pop() {
        path.truncate(depth);
        if path.contains(&node.id.as_str()) {
            continue;
        }
        if node.id == target {
            return true;
        }
        path.push(&node.id);
        stack.extend(node.children.iter().rev().map(|c| (c, depth + 1)));
    }
    false
}

/// Whether any child of the region (other than excluded ones) covers `target`
pub fn is_covered_by_hierarchy(
    subtree: &RegionSubtree,
    target: &str,
    overrides: Option<&RegionOverride>,
) -> bool {
    subtree
        .children
        .iter()
        .filter(|child| !overrides.is_some_and(|o| o.excludes(&child.id)))
        .any(|child| subtree_contains(child, target))
}

/// Referenced ids that deserve their own tab on the region page.
///
/// Passing references keep their first-mention order; manual
/// `crossReferences` follow, skipping any already present. Failing
/// references are dropped without error.
pub fn resolve_cross_references(
    subtree: &RegionSubtree,
    referenced: &GuideReferencedAnatomy,
    overrides: Option<&RegionOverride>,
) -> Vec<NodeId> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut out = Vec::new();

    for id in referenced.ids() {
        if !seen.insert(id) {
            continue;
        }
        if is_covered_by_hierarchy(subtree, id, overrides) {
            log::debug!(
                "Reference '{}' already under region '{}'",
                id,
                subtree.region_id
            );
            continue;
        }
        out.push(id.clone());
    }

    if let Some(o) = overrides {
        for id in &o.cross_references {
            if !out.contains(id) {
                out.push(id.clone());
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arms() -> RegionSubtree {
        RegionSubtree {
            region_id: "arms".into(),
            children: vec![
                SubtreeNode::leaf("biceps").with_child(SubtreeNode::leaf("biceps-short-head")),
                SubtreeNode::leaf("triceps"),
            ],
        }
    }

    #[test]
    fn test_descendants_are_dropped() {
        let refs = GuideReferencedAnatomy::from_ids(["rear-delts", "biceps-short-head"]);
        assert_eq!(resolve_cross_references(&arms(), &refs, None), vec!["rear-delts"]);
    }

    #[test]
    fn test_direct_children_are_dropped() {
        let refs = GuideReferencedAnatomy::from_ids(["triceps", "forearms"]);
        assert_eq!(resolve_cross_references(&arms(), &refs, None), vec!["forearms"]);
    }

    #[test]
    fn test_excluded_child_releases_its_subtree() {
        let overrides = RegionOverride {
            exclude_children: vec!["biceps".into()],
            ..RegionOverride::default()
        };
        let refs = GuideReferencedAnatomy::from_ids(["biceps-short-head"]);
        assert_eq!(
            resolve_cross_references(&arms(), &refs, Some(&overrides)),
            vec!["biceps-short-head"]
        );
    }

    #[test]
    fn test_manual_includes_bypass_predicate() {
        let overrides = RegionOverride {
            cross_references: vec!["triceps".into(), "rear-delts".into()],
            ..RegionOverride::default()
        };
        let refs = GuideReferencedAnatomy::from_ids(["rear-delts", "biceps"]);
        assert_eq!(
            resolve_cross_references(&arms(), &refs, Some(&overrides)),
            vec!["rear-delts", "triceps"]
        );
    }

    #[test]
    fn test_repeated_id_on_path_is_not_found() {
        let looped = RegionSubtree {
            region_id: "r".into(),
            children: vec![
                SubtreeNode::leaf("a").with_child(
                    SubtreeNode::leaf("b").with_child(
                        SubtreeNode::leaf("a").with_child(SubtreeNode::leaf("deep")),
                    ),
                ),
            ],
        };
        assert!(is_covered_by_hierarchy(&looped, "b", None));
        assert!(!is_covered_by_hierarchy(&looped, "deep", None));
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let refs = GuideReferencedAnatomy::from_ids(["rear-delts", "biceps", "glutes"]);
        let first = resolve_cross_references(&arms(), &refs, None);
        let second = resolve_cross_references(&arms(), &refs, None);
        assert_eq!(first, second);
        assert_eq!(first, vec!["rear-delts", "glutes"]);
    }
}
