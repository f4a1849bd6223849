//! End-to-end analysis over small fitness knowledge bases

use musclemap_graph::prelude::*;
use musclemap_graph::{InvertedIndex, is_covered_by_hierarchy};

fn upper_body() -> AnatomySnapshot {
    AnatomySnapshot::new(
        vec![
            AnatomyNode::region("arms", "Arms"),
            AnatomyNode::new("biceps", "Biceps", AnatomyKind::Group, Some("arms")),
            AnatomyNode::new("triceps", "Triceps", AnatomyKind::Group, Some("arms")),
            AnatomyNode::new("biceps-short-head", "Biceps Short Head", AnatomyKind::Head, Some("biceps")),
            AnatomyNode::region("back", "Back"),
            AnatomyNode::new("lats", "Latissimus Dorsi", AnatomyKind::Muscle, Some("back")),
            AnatomyNode::new("traps", "Trapezius", AnatomyKind::Muscle, Some("back")),
            AnatomyNode::region("shoulders", "Shoulders"),
            AnatomyNode::new("rear-delts", "Rear Deltoids", AnatomyKind::Muscle, Some("shoulders")),
        ],
        vec![
            ExerciseAnatomyLink::primary("E1", "lats"),
            ExerciseAnatomyLink::primary("E1", "traps"),
            ExerciseAnatomyLink::primary("E1", "rear-delts"),
            ExerciseAnatomyLink::primary("E2", "lats"),
            ExerciseAnatomyLink::primary("E2", "traps"),
        ],
    )
}

#[test]
fn test_cross_references_skip_hierarchy_descendants() {
    let snapshot = upper_body();
    let subtree = snapshot.region_subtree("arms").unwrap();
    let refs = GuideReferencedAnatomy::from_ids(["rear-delts", "biceps-short-head"]);

    let result = resolve_cross_references(&subtree, &refs, None);
    assert_eq!(result, vec!["rear-delts"]);
}

#[test]
fn test_coactivation_weights_from_shared_exercises() {
    let snapshot = upper_body();
    let graph = CoActivationGraph::build(&snapshot, &AnalysisConfig::default());

    assert_eq!(graph.weight("lats", "traps"), 2);
    assert_eq!(graph.weight("lats", "rear-delts"), 1);
    assert_eq!(graph.weight("traps", "rear-delts"), 1);
}

#[test]
fn test_bridge_score_counts_only_cross_region_edges() {
    let snapshot = upper_body();
    let resolver = RegionResolver::new(&snapshot);
    let graph = CoActivationGraph::build(&snapshot, &AnalysisConfig::default());
    let analysis = BridgeAnalyzer::new(&graph, &resolver).find_bridges();

    let lats = analysis
        .bridges
        .iter()
        .find(|b| b.node_id == "lats")
        .expect("lats is a bridge");
    assert_eq!(lats.home_region_id, "back");
    assert_eq!(lats.foreign_regions, vec!["shoulders"]);
    assert_eq!(lats.cross_region_edges, 1);
    assert_eq!(lats.cross_region_score, 1);

    let rear = analysis
        .bridges
        .iter()
        .find(|b| b.node_id == "rear-delts")
        .expect("rear-delts is a bridge");
    assert_eq!(rear.cross_region_score, 2);
    assert_eq!(analysis.bridges[0].node_id, "rear-delts");
}

#[test]
fn test_override_exclusion_takes_precedence() {
    let snapshot = upper_body();
    let subtree = snapshot.region_subtree("arms").unwrap();
    let refs = GuideReferencedAnatomy::from_ids(["biceps-short-head"]);
    let overrides = RegionOverride {
        exclude_children: vec!["biceps".into()],
        ..RegionOverride::default()
    };

    let result = resolve_cross_references(&subtree, &refs, Some(&overrides));
    assert_eq!(result, vec!["biceps-short-head"]);
}

#[test]
fn test_region_resolution_is_idempotent() {
    let snapshot = upper_body();
    let resolver = RegionResolver::new(&snapshot);
    for node in snapshot.nodes() {
        let region = resolver.region_of(&node.id).unwrap();
        assert_eq!(resolver.region_of(&region.id).unwrap(), region);
    }
}

#[test]
fn test_weight_is_symmetric_for_all_pairs() {
    let snapshot = upper_body();
    let graph = CoActivationGraph::build(&snapshot, &AnalysisConfig::default());
    for a in snapshot.nodes() {
        for b in snapshot.nodes() {
            assert_eq!(graph.weight(&a.id, &b.id), graph.weight(&b.id, &a.id));
        }
    }
}

#[test]
fn test_total_weight_matches_pair_count() {
    let mut links = upper_body().links().to_vec();
    links.push(ExerciseAnatomyLink::primary("curl", "biceps"));
    links.push(ExerciseAnatomyLink::primary("curl", "biceps-short-head"));
    links.push(ExerciseAnatomyLink::new("curl", "biceps", LinkRole::Secondary));
    links.push(ExerciseAnatomyLink::primary("pulldown", "lats"));
    links.push(ExerciseAnatomyLink::primary("pulldown", "biceps"));
    links.push(ExerciseAnatomyLink::primary("pulldown", "rear-delts"));
    links.push(ExerciseAnatomyLink::primary("pulldown", "traps"));
    let snapshot = AnatomySnapshot::new(upper_body().nodes().to_vec(), links);

    let config = AnalysisConfig::default();
    let index = InvertedIndex::build(&snapshot, &config);
    let graph = CoActivationGraph::build(&snapshot, &config);

    // E1: 3, E2: 1, curl: 1, pulldown: 6
    assert_eq!(index.expected_pair_total(), 11);
    assert_eq!(graph.total_weight(), 11);
}

#[test]
fn test_unlinked_nodes_never_appear_as_endpoints() {
    let snapshot = upper_body();
    let graph = CoActivationGraph::build(&snapshot, &AnalysisConfig::default());
    let unlinked = graph.unlinked_nodes();
    assert!(unlinked.contains(&"triceps".to_string()));

    for edge in graph.ranked_edges() {
        assert!(!unlinked.contains(&edge.a));
        assert!(!unlinked.contains(&edge.b));
    }
}

#[test]
fn test_cross_reference_resolution_is_idempotent() {
    let snapshot = upper_body();
    let subtree = snapshot.region_subtree("arms").unwrap();
    let refs = GuideReferencedAnatomy::from_ids(["rear-delts", "lats", "biceps", "triceps"]);
    let overrides = RegionOverride {
        cross_references: vec!["traps".into()],
        exclude_children: vec!["triceps".into()],
    };

    let first = resolve_cross_references(&subtree, &refs, Some(&overrides));
    let second = resolve_cross_references(&subtree, &refs, Some(&overrides));
    assert_eq!(first, second);
    assert_eq!(first, vec!["rear-delts", "lats", "triceps", "traps"]);
}

#[test]
fn test_cycle_does_not_block_other_nodes() {
    let mut nodes = upper_body().nodes().to_vec();
    nodes.push(AnatomyNode::new("loop-a", "Loop A", AnatomyKind::Muscle, Some("loop-b")));
    nodes.push(AnatomyNode::new("loop-b", "Loop B", AnatomyKind::Muscle, Some("loop-a")));
    let mut links = upper_body().links().to_vec();
    links.push(ExerciseAnatomyLink::primary("E1", "loop-a"));
    let snapshot = AnatomySnapshot::new(nodes, links);

    let resolver = RegionResolver::new(&snapshot);
    let graph = CoActivationGraph::build(&snapshot, &AnalysisConfig::default());
    let analysis = BridgeAnalyzer::new(&graph, &resolver).find_bridges();

    assert!(matches!(resolver.region_of("loop-a"), Err(Error::Cycle { .. })));
    assert_eq!(analysis.skipped_nodes, vec!["loop-a"]);
    assert!(analysis.bridges.iter().any(|b| b.node_id == "lats"));

    let overrides = OverrideConfig::new();
    let tabs = TabAssembler::new(&snapshot, &overrides)
        .assemble("arms", &GuideReferencedAnatomy::from_ids(["loop-a"]))
        .unwrap();
    assert_eq!(tabs.len(), 3);
    assert!(tabs[2].is_cross_reference);

    let report = IntegrityAnalyzer::new(&resolver, &graph).analyze();
    assert_eq!(report.resolution_failures.len(), 2);
}

#[test]
fn test_dangling_links_reported_not_fatal() {
    let mut links = upper_body().links().to_vec();
    links.push(ExerciseAnatomyLink::primary("E1", "serratus"));
    let snapshot = AnatomySnapshot::new(upper_body().nodes().to_vec(), links);

    let resolver = RegionResolver::new(&snapshot);
    let graph = CoActivationGraph::build(&snapshot, &AnalysisConfig::default());
    assert_eq!(graph.weight("lats", "traps"), 2);

    let report = IntegrityAnalyzer::new(&resolver, &graph).analyze();
    assert_eq!(report.dangling_links.len(), 1);
    assert_eq!(report.dangling_links[0].link.anatomy_node_id, "serratus");
}

#[test]
fn test_tab_list_for_region_page() {
    let snapshot = upper_body().with_guide_sections(vec![GuideSection {
        id: "pull-day".into(),
        title: "Pull Day".into(),
        focus_anatomy_ids: vec!["biceps-short-head".into(), "rear-delts".into()],
    }]);
    let mut editor = OverrideEditor::for_snapshot(OverrideConfig::new(), &snapshot);
    editor.add_cross_reference("arms", "lats").unwrap();
    assert!(editor.add_cross_reference("forearms", "lats").is_err());
    let overrides = editor.into_config();

    let tabs = TabAssembler::new(&snapshot, &overrides)
        .assemble_for_snapshot_guides("arms")
        .unwrap();
    let summary: Vec<_> = tabs
        .iter()
        .map(|t| (t.node_id.as_str(), t.is_cross_reference))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("biceps", false),
            ("triceps", false),
            ("rear-delts", true),
            ("lats", true),
        ]
    );
    assert!(!is_covered_by_hierarchy(
        &snapshot.region_subtree("arms").unwrap(),
        "lats",
        overrides.get("arms")
    ));
}
