//! Snapshot projection
//!
//! A plain, serializable read model of the whole DAG. This is the shape the
//! presentation layer renders and persists: nodes as
//! `{id, label, position, selected}` and edges as `{id, source, target, selected}`,
//! both in store order.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::aggregate::{DagEdge, DagGraph, DagNode};
use crate::commands::DagCommandResult;
use crate::config::PlacementConfig;
use crate::validation::{overall_status, DagStatus};
use crate::value_objects::{EdgeId, NodeId, Position2D};

/// Node as seen by the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeView {
    pub id: NodeId,
    pub label: String,
    pub position: Position2D,
    #[serde(default)]
    pub selected: bool,
}

impl From<&DagNode> for NodeView {
    fn from(node: &DagNode) -> Self {
        Self {
            id: node.id,
            label: node.label.clone(),
            position: node.position,
            selected: node.selected,
        }
    }
}

/// Edge as seen by the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeView {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    #[serde(default)]
    pub selected: bool,
}

impl From<&DagEdge> for EdgeView {
    fn from(edge: &DagEdge) -> Self {
        Self {
            id: edge.id,
            source: edge.source,
            target: edge.target,
            selected: edge.selected,
        }
    }
}

/// Read-only view of the whole DAG
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DagSnapshot {
    pub nodes: Vec<NodeView>,
    pub edges: Vec<EdgeView>,
}

impl DagSnapshot {
    /// Whole-graph status of the snapshot
    pub fn status(&self) -> DagStatus {
        overall_status(
            self.nodes.iter().map(|n| n.id),
            self.edges.iter().map(|e| (e.source, e.target)),
        )
    }

    /// Rebuild a graph from this snapshot.
    ///
    /// Every record goes through the same checks as interactive edits, so a
    /// snapshot with blank labels, repeated ids or invalid edges is rejected
    /// as a whole.
    pub fn restore(&self, placement: PlacementConfig) -> DagCommandResult<DagGraph> {
        let mut graph = DagGraph::with_placement(placement);
        for node in &self.nodes {
            graph.insert_node(node.id, node.label.clone(), node.position)?;
        }
        for edge in &self.edges {
            graph.insert_edge(edge.id, edge.source, edge.target)?;
        }

        let selected_nodes: Vec<NodeId> =
            self.nodes.iter().filter(|n| n.selected).map(|n| n.id).collect();
        let selected_edges: Vec<EdgeId> =
            self.edges.iter().filter(|e| e.selected).map(|e| e.id).collect();
        graph.set_selection(&selected_nodes, &selected_edges);

        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "graph restored from snapshot"
        );
        Ok(graph)
    }
}

impl From<&DagGraph> for DagSnapshot {
    fn from(graph: &DagGraph) -> Self {
        Self {
            nodes: graph.nodes().map(NodeView::from).collect(),
            edges: graph.edges().map(EdgeView::from).collect(),
        }
    }
}

impl DagGraph {
    /// Read-only snapshot of the current state
    pub fn snapshot(&self) -> DagSnapshot {
        DagSnapshot::from(self)
    }

    /// Rebuild a graph from a snapshot, see [`DagSnapshot::restore`]
    pub fn from_snapshot(
        snapshot: &DagSnapshot,
        placement: PlacementConfig,
    ) -> DagCommandResult<DagGraph> {
        snapshot.restore(placement)
    }
}
