//! DAG builder integration tests

use cim_domain_dag::{
    DagCommand, DagCommandError, DagCommandHandler, DagConfig, DagEditor, DagGraph, DagSnapshot,
    DagStatus, EdgeRejection, LayeredLayout, LayoutConfig, LayoutDirection, NodeId,
    PlacementConfig,
};

fn seeded_config() -> DagConfig {
    DagConfig {
        placement: PlacementConfig {
            seed: Some(7),
            ..PlacementConfig::default()
        },
        ..DagConfig::default()
    }
}

fn editor_with(labels: &[&str]) -> (DagEditor, Vec<NodeId>) {
    let mut editor = DagEditor::new(seeded_config());
    let ids = labels
        .iter()
        .map(|label| editor.add_node(*label).unwrap())
        .collect();
    (editor, ids)
}

#[test]
fn test_three_node_cycle_is_reported() {
    let (mut editor, ids) = editor_with(&["A", "B", "C"]);
    let (a, b, c) = (ids[0], ids[1], ids[2]);

    editor.add_edge(a, b).unwrap();
    editor.add_edge(b, c).unwrap();
    // closing the cycle is admitted; only the status reports it
    editor.add_edge(c, a).unwrap();

    assert_eq!(editor.status(), DagStatus::ContainsCycle);
    assert_eq!(editor.status().to_string(), "Invalid: Contains cycle");

    let cycle = editor.graph().find_cycle().unwrap();
    assert_eq!(cycle.len(), 3);
    for id in [a, b, c] {
        assert!(cycle.contains(&id));
    }
}

#[test]
fn test_unconnected_pair() {
    let (editor, _) = editor_with(&["A", "B"]);
    assert_eq!(editor.status(), DagStatus::InsufficientlyConnected);
    assert_eq!(
        editor.status().to_string(),
        "Invalid: Not all nodes are connected"
    );
}

#[test]
fn test_single_node_is_too_few() {
    let (editor, _) = editor_with(&["A"]);
    assert_eq!(
        editor.status().to_string(),
        "Invalid: Requires at least 2 nodes"
    );
}

#[test]
fn test_simple_edge_is_valid_and_flows_down() {
    let (mut editor, ids) = editor_with(&["A", "B"]);
    let (a, b) = (ids[0], ids[1]);
    editor.add_edge(a, b).unwrap();

    assert_eq!(editor.status(), DagStatus::Valid);
    assert_eq!(editor.status().to_string(), "Valid DAG");

    editor.auto_layout(LayoutDirection::TopToBottom);
    let ya = editor.graph().node(a).unwrap().position.y;
    let yb = editor.graph().node(b).unwrap().position.y;
    assert!(ya < yb);
}

#[test]
fn test_left_to_right_flows_right() {
    let (mut editor, ids) = editor_with(&["A", "B"]);
    let (a, b) = (ids[0], ids[1]);
    editor.add_edge(a, b).unwrap();

    editor.auto_layout(LayoutDirection::LeftToRight);
    let pa = editor.graph().node(a).unwrap().position;
    let pb = editor.graph().node(b).unwrap().position;
    assert!(pa.x < pb.x);
    assert_eq!(pa.y, pb.y);
}

#[test]
fn test_self_loop_rejected() {
    let (mut editor, ids) = editor_with(&["A"]);
    let a = ids[0];

    assert_eq!(
        editor.add_edge(a, a).unwrap_err(),
        DagCommandError::InvalidEdge(EdgeRejection::SelfLoop(a))
    );
    assert_eq!(editor.graph().edge_count(), 0);
}

#[test]
fn test_duplicate_edge_rejected_but_reverse_allowed() {
    let (mut editor, ids) = editor_with(&["A", "B"]);
    let (a, b) = (ids[0], ids[1]);

    editor.add_edge(a, b).unwrap();
    assert!(matches!(
        editor.add_edge(a, b),
        Err(DagCommandError::InvalidEdge(EdgeRejection::Duplicate { .. }))
    ));
    editor.add_edge(b, a).unwrap();
    assert_eq!(editor.graph().edge_count(), 2);
}

#[test]
fn test_edge_to_unknown_node_rejected() {
    let (mut editor, ids) = editor_with(&["A"]);
    let ghost = NodeId::new();
    assert_eq!(
        editor.add_edge(ids[0], ghost).unwrap_err(),
        DagCommandError::InvalidEdge(EdgeRejection::UnknownNode(ghost))
    );
}

#[test]
fn test_deleting_node_cascades_to_edges() {
    let (mut editor, ids) = editor_with(&["A", "B", "C"]);
    let (a, b, c) = (ids[0], ids[1], ids[2]);
    editor.add_edge(a, b).unwrap();
    editor.add_edge(b, c).unwrap();
    let ac = editor.add_edge(a, c).unwrap();

    editor.set_selection(&[b], &[]);
    let removal = editor.delete_selected();

    assert_eq!(removal.nodes, vec![b]);
    assert_eq!(removal.edges.len(), 2);
    let remaining: Vec<_> = editor.graph().edges().map(|e| e.id).collect();
    assert_eq!(remaining, vec![ac]);
    assert!(editor.graph().edges().all(|e| !e.touches(b)));
}

#[test]
fn test_delete_selected_twice_is_idempotent() {
    let (mut editor, ids) = editor_with(&["A", "B", "C"]);
    editor.add_edge(ids[0], ids[1]).unwrap();
    editor.set_selection(&[ids[2]], &[]);

    let first = editor.delete_selected();
    assert!(!first.is_empty());
    let after_first = editor.snapshot();

    let second = editor.delete_selected();
    assert!(second.is_empty());
    assert_eq!(editor.snapshot(), after_first);
}

#[test]
fn test_layout_is_deterministic_regardless_of_prior_positions() {
    let mut first = DagGraph::with_placement(PlacementConfig {
        seed: Some(1),
        ..PlacementConfig::default()
    });
    let a = first.add_node("A").unwrap();
    let b = first.add_node("B").unwrap();
    let c = first.add_node("C").unwrap();
    let d = first.add_node("D").unwrap();
    first.add_edge(a, b).unwrap();
    first.add_edge(a, c).unwrap();
    first.add_edge(b, d).unwrap();
    first.add_edge(c, d).unwrap();

    let snapshot = first.snapshot();
    let mut second = snapshot
        .restore(PlacementConfig {
            seed: Some(99),
            ..PlacementConfig::default()
        })
        .unwrap();
    second.move_node(d, cim_domain_dag::Position2D::new(-500.0, 900.0)).unwrap();

    let engine = LayeredLayout::new(LayoutConfig::default());
    let one = first.auto_layout(&engine, LayoutDirection::TopToBottom);
    let two = second.auto_layout(&engine, LayoutDirection::TopToBottom);
    assert_eq!(one, two);
}

#[test]
fn test_layout_of_cyclic_graph_terminates() {
    let (mut editor, ids) = editor_with(&["A", "B", "C"]);
    editor.add_edge(ids[0], ids[1]).unwrap();
    editor.add_edge(ids[1], ids[2]).unwrap();
    editor.add_edge(ids[2], ids[0]).unwrap();

    let positions = editor.auto_layout(LayoutDirection::TopToBottom);
    assert_eq!(positions.len(), 3);
    assert!(positions
        .iter()
        .all(|(_, p)| p.x.is_finite() && p.y.is_finite()));
}

#[test]
fn test_layout_leaves_edges_and_labels_alone() {
    let (mut editor, ids) = editor_with(&["A", "B", "C"]);
    editor.add_edge(ids[0], ids[2]).unwrap();
    editor.add_edge(ids[1], ids[2]).unwrap();
    let before = editor.snapshot();

    editor.auto_layout(LayoutDirection::TopToBottom);
    let after = editor.snapshot();

    assert_eq!(before.edges, after.edges);
    let labels = |s: &DagSnapshot| s.nodes.iter().map(|n| n.label.clone()).collect::<Vec<_>>();
    assert_eq!(labels(&before), labels(&after));
}

#[test]
fn test_command_flow_through_handler() {
    let mut editor = DagEditor::new(seeded_config());
    let mut ids = Vec::new();
    for label in ["Load", "Transform"] {
        let events = editor
            .handle(DagCommand::AddNode {
                label: label.to_string(),
            })
            .unwrap();
        if let cim_domain_dag::DagDomainEvent::NodeAdded(e) = &events[0] {
            ids.push(e.node_id);
        }
    }

    editor
        .handle(DagCommand::AddEdge {
            source: ids[0],
            target: ids[1],
        })
        .unwrap();
    let events = editor
        .handle(DagCommand::AutoLayout {
            direction: LayoutDirection::TopToBottom,
        })
        .unwrap();

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event_type(), "LayoutApplied");
    assert!(editor.status().is_valid());
}

#[test]
fn test_snapshot_json_round_trip() {
    let (mut editor, ids) = editor_with(&["A", "B"]);
    editor.add_edge(ids[0], ids[1]).unwrap();
    editor.auto_layout(LayoutDirection::TopToBottom);

    let json = serde_json::to_string(&editor.snapshot()).unwrap();
    let parsed: DagSnapshot = serde_json::from_str(&json).unwrap();
    let restored = DagEditor::from_snapshot(&parsed, seeded_config()).unwrap();

    assert_eq!(restored.snapshot(), editor.snapshot());
    assert_eq!(parsed.status(), DagStatus::Valid);
}
