//! DAG Graph Aggregate
//!
//! The canonical store of nodes and edges being edited. Every mutation goes
//! through this aggregate; validators, the cycle detector and the layout
//! engine only ever see read-only views of it.

use indexmap::IndexMap;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info, warn};

use crate::commands::{DagCommandError, DagCommandResult};
use crate::config::PlacementConfig;
use crate::layout::LayeredLayout;
use crate::validation::{self, DagStatus, EdgeRejection};
use crate::value_objects::{EdgeId, LayoutDirection, NodeId, Position2D};

/// A node of the DAG
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DagNode {
    /// Unique identifier for the node
    pub id: NodeId,
    /// Display label
    pub label: String,
    /// Top-left corner of the node's box
    pub position: Position2D,
    /// Whether the node is currently selected in the UI
    pub selected: bool,
}

impl DagNode {
    /// Create an unselected node
    pub fn new(id: NodeId, label: impl Into<String>, position: Position2D) -> Self {
        Self {
            id,
            label: label.into(),
            position,
            selected: false,
        }
    }
}

/// A directed edge of the DAG
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DagEdge {
    /// Unique identifier for the edge
    pub id: EdgeId,
    /// Source node of the edge
    pub source: NodeId,
    /// Target node of the edge
    pub target: NodeId,
    /// Whether the edge is currently selected in the UI
    pub selected: bool,
}

impl DagEdge {
    /// Create an unselected edge
    pub fn new(id: EdgeId, source: NodeId, target: NodeId) -> Self {
        Self {
            id,
            source,
            target,
            selected: false,
        }
    }

    /// Whether this edge starts or ends at `node`
    pub fn touches(&self, node: NodeId) -> bool {
        self.source == node || self.target == node
    }
}

/// Identifiers removed by [`DagGraph::delete_selected`], in store order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Removal {
    /// Removed nodes
    pub nodes: Vec<NodeId>,
    /// Removed edges, including those removed because an endpoint went away
    pub edges: Vec<EdgeId>,
}

impl Removal {
    /// Whether nothing was removed
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }
}

/// The DAG being built
#[derive(Debug, Clone)]
pub struct DagGraph {
    /// Nodes in insertion order
    nodes: IndexMap<NodeId, DagNode>,
    /// Edges in insertion order
    edges: IndexMap<EdgeId, DagEdge>,
    /// Initial placement of new nodes
    placement: PlacementConfig,
    rng: StdRng,
    /// Bumped on every committed mutation
    version: u64,
}

impl DagGraph {
    /// Create an empty graph with default placement
    pub fn new() -> Self {
        Self::with_placement(PlacementConfig::default())
    }

    /// Create an empty graph with the given placement settings
    pub fn with_placement(placement: PlacementConfig) -> Self {
        let rng = match placement.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            nodes: IndexMap::new(),
            edges: IndexMap::new(),
            placement,
            rng,
            version: 0,
        }
    }

    /// Current version
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &DagNode> {
        self.nodes.values()
    }

    /// Edges in insertion order
    pub fn edges(&self) -> impl Iterator<Item = &DagEdge> {
        self.edges.values()
    }

    /// Look up a node
    pub fn node(&self, id: NodeId) -> Option<&DagNode> {
        self.nodes.get(&id)
    }

    /// Look up an edge
    pub fn edge(&self, id: EdgeId) -> Option<&DagEdge> {
        self.edges.get(&id)
    }

    /// Check if the graph contains a node
    pub fn contains_node(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Check if the graph contains an edge
    pub fn contains_edge(&self, id: EdgeId) -> bool {
        self.edges.contains_key(&id)
    }

    /// Node ids in insertion order
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }

    /// `(source, target)` pairs in edge insertion order
    pub fn edge_pairs(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.edges.values().map(|e| (e.source, e.target))
    }

    /// Add a node with a fresh id at a random position.
    pub fn add_node(&mut self, label: impl Into<String>) -> DagCommandResult<NodeId> {
        let label = label.into();
        ensure_label(&label)?;

        let id = NodeId::new();
        let position = self.random_position();
        self.nodes.insert(id, DagNode::new(id, label, position));
        self.version += 1;

        debug!(node_id = %id, x = position.x, y = position.y, "node added");
        Ok(id)
    }

    /// Add a node with a caller-chosen id and position.
    pub fn insert_node(
        &mut self,
        id: NodeId,
        label: impl Into<String>,
        position: Position2D,
    ) -> DagCommandResult<()> {
        let label = label.into();
        ensure_label(&label)?;
        if self.nodes.contains_key(&id) {
            return Err(DagCommandError::DuplicateNode(id));
        }

        self.nodes.insert(id, DagNode::new(id, label, position));
        self.version += 1;

        debug!(node_id = %id, "node inserted");
        Ok(())
    }

    /// Connect `source` to `target`.
    ///
    /// Rejects self-loops, duplicate ordered pairs and unknown endpoints.
    /// Cycles are *not* rejected here; they show up in [`DagGraph::status`].
    pub fn add_edge(&mut self, source: NodeId, target: NodeId) -> DagCommandResult<EdgeId> {
        let id = EdgeId::new();
        self.insert_edge(id, source, target)?;
        Ok(id)
    }

    /// Connect `source` to `target` using a caller-chosen edge id.
    pub fn insert_edge(
        &mut self,
        id: EdgeId,
        source: NodeId,
        target: NodeId,
    ) -> DagCommandResult<()> {
        if let Err(rejection) = self.check_edge(source, target) {
            warn!(%source, %target, %rejection, "edge rejected");
            return Err(rejection.into());
        }
        if self.edges.contains_key(&id) {
            return Err(DagCommandError::DuplicateEdge(id));
        }

        self.edges.insert(id, DagEdge::new(id, source, target));
        self.version += 1;

        debug!(edge_id = %id, %source, %target, "edge added");
        Ok(())
    }

    fn check_edge(&self, source: NodeId, target: NodeId) -> Result<(), EdgeRejection> {
        validation::validate_edge(Some(source), Some(target), self.edges.values())?;
        for endpoint in [source, target] {
            if !self.nodes.contains_key(&endpoint) {
                return Err(EdgeRejection::UnknownNode(endpoint));
            }
        }
        Ok(())
    }

    /// Remove every selected node and edge.
    ///
    /// Edges incident to a removed node are removed too, selected or not.
    /// Calling this again without a new selection removes nothing.
    pub fn delete_selected(&mut self) -> Removal {
        let doomed: HashSet<NodeId> = self
            .nodes
            .values()
            .filter(|n| n.selected)
            .map(|n| n.id)
            .collect();

        let mut removal = Removal::default();
        self.edges.retain(|id, edge| {
            let keep = !edge.selected
                && !doomed.contains(&edge.source)
                && !doomed.contains(&edge.target);
            if !keep {
                removal.edges.push(*id);
            }
            keep
        });
        self.nodes.retain(|id, _| {
            let keep = !doomed.contains(id);
            if !keep {
                removal.nodes.push(*id);
            }
            keep
        });

        if !removal.is_empty() {
            self.version += 1;
            debug!(
                nodes = removal.nodes.len(),
                edges = removal.edges.len(),
                "selection deleted"
            );
        }
        removal
    }

    /// Select exactly the given nodes and edges, deselecting everything else.
    ///
    /// Unknown ids are ignored.
    pub fn set_selection(&mut self, node_ids: &[NodeId], edge_ids: &[EdgeId]) {
        let node_ids: HashSet<&NodeId> = node_ids.iter().collect();
        let edge_ids: HashSet<&EdgeId> = edge_ids.iter().collect();

        for id in node_ids.iter().filter(|id| !self.nodes.contains_key(**id)) {
            debug!(node_id = %id, "ignoring selection of unknown node");
        }
        for id in edge_ids.iter().filter(|id| !self.edges.contains_key(**id)) {
            debug!(edge_id = %id, "ignoring selection of unknown edge");
        }

        for node in self.nodes.values_mut() {
            node.selected = node_ids.contains(&node.id);
        }
        for edge in self.edges.values_mut() {
            edge.selected = edge_ids.contains(&edge.id);
        }
        self.version += 1;
    }

    /// Deselect everything
    pub fn clear_selection(&mut self) {
        self.set_selection(&[], &[]);
    }

    /// Currently selected nodes, in store order
    pub fn selected_node_ids(&self) -> Vec<NodeId> {
        self.nodes.values().filter(|n| n.selected).map(|n| n.id).collect()
    }

    /// Currently selected edges, in store order
    pub fn selected_edge_ids(&self) -> Vec<EdgeId> {
        self.edges.values().filter(|e| e.selected).map(|e| e.id).collect()
    }

    /// Move a node to a new top-left position
    pub fn move_node(&mut self, id: NodeId, position: Position2D) -> DagCommandResult<()> {
        let node = self
            .nodes
            .get_mut(&id)
            .ok_or(DagCommandError::NodeNotFound(id))?;
        node.position = position;
        self.version += 1;
        Ok(())
    }

    /// Change a node's label
    pub fn rename_node(&mut self, id: NodeId, label: impl Into<String>) -> DagCommandResult<()> {
        let label = label.into();
        ensure_label(&label)?;
        let node = self
            .nodes
            .get_mut(&id)
            .ok_or(DagCommandError::NodeNotFound(id))?;
        node.label = label;
        self.version += 1;
        Ok(())
    }

    /// Overwrite positions of known nodes; returns how many were updated.
    pub fn apply_positions<I>(&mut self, positions: I) -> usize
    where
        I: IntoIterator<Item = (NodeId, Position2D)>,
    {
        let mut applied = 0;
        for (id, position) in positions {
            if let Some(node) = self.nodes.get_mut(&id) {
                node.position = position;
                applied += 1;
            }
        }
        if applied > 0 {
            self.version += 1;
        }
        applied
    }

    /// Lay the graph out and write the new positions back.
    ///
    /// Returns the new position of every node, in store order. On an empty
    /// graph this is a no-op.
    pub fn auto_layout(
        &mut self,
        engine: &LayeredLayout,
        direction: LayoutDirection,
    ) -> Vec<(NodeId, Position2D)> {
        if self.nodes.is_empty() {
            return Vec::new();
        }
        let result = engine.compute(self.node_ids(), self.edge_pairs(), direction);
        let positions: Vec<(NodeId, Position2D)> =
            result.positions().iter().map(|(id, p)| (*id, *p)).collect();
        self.apply_positions(positions.iter().copied());

        info!(
            nodes = positions.len(),
            %direction,
            crossings = result.crossings(),
            "auto layout applied"
        );
        positions
    }

    /// Whole-graph validity
    pub fn status(&self) -> DagStatus {
        validation::overall_status(self.node_ids(), self.edge_pairs())
    }

    /// Whether any cycle exists
    pub fn has_cycle(&self) -> bool {
        validation::detect_cycle(self.node_ids(), self.edge_pairs())
    }

    /// The first cycle found, if any
    pub fn find_cycle(&self) -> Option<Vec<NodeId>> {
        validation::find_cycle(self.node_ids(), self.edge_pairs())
    }

    fn random_position(&mut self) -> Position2D {
        let spread = self.placement.spread;
        if spread > 0.0 {
            Position2D::new(self.rng.gen_range(0.0..spread), self.rng.gen_range(0.0..spread))
        } else {
            Position2D::origin()
        }
    }
}

impl Default for DagGraph {
    fn default() -> Self {
        Self::new()
    }
}

fn ensure_label(label: &str) -> DagCommandResult<()> {
    if label.trim().is_empty() {
        warn!("rejected node with empty label");
        return Err(DagCommandError::InvalidLabel);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> DagGraph {
        DagGraph::with_placement(PlacementConfig {
            seed: Some(42),
            ..PlacementConfig::default()
        })
    }

    #[test]
    fn test_add_node() {
        let mut graph = seeded();
        let id = graph.add_node("A").unwrap();

        let node = graph.node(id).unwrap();
        assert_eq!(node.label, "A");
        assert!(!node.selected);
        assert!((0.0..250.0).contains(&node.position.x));
        assert!((0.0..250.0).contains(&node.position.y));
        assert_eq!(graph.version(), 1);
    }

    #[test]
    fn test_empty_label_rejected() {
        let mut graph = seeded();
        assert_eq!(graph.add_node(""), Err(DagCommandError::InvalidLabel));
        assert_eq!(graph.add_node("   "), Err(DagCommandError::InvalidLabel));
        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.version(), 0);
    }

    #[test]
    fn test_seeded_placement_is_reproducible() {
        let mut first = seeded();
        let mut second = seeded();
        let a = first.add_node("A").unwrap();
        let b = second.add_node("A").unwrap();
        assert_eq!(first.node(a).unwrap().position, second.node(b).unwrap().position);
    }

    #[test]
    fn test_zero_spread_places_at_origin() {
        let mut graph = DagGraph::with_placement(PlacementConfig {
            spread: 0.0,
            seed: Some(1),
        });
        let id = graph.add_node("A").unwrap();
        assert_eq!(graph.node(id).unwrap().position, Position2D::origin());
    }

    #[test]
    fn test_insert_node_rejects_duplicate_id() {
        let mut graph = seeded();
        let id = NodeId::new();
        graph.insert_node(id, "A", Position2D::new(1.0, 2.0)).unwrap();
        assert_eq!(
            graph.insert_node(id, "B", Position2D::origin()),
            Err(DagCommandError::DuplicateNode(id))
        );
        assert_eq!(graph.node(id).unwrap().label, "A");
    }

    #[test]
    fn test_edge_rules() {
        let mut graph = seeded();
        let a = graph.add_node("A").unwrap();
        let b = graph.add_node("B").unwrap();

        graph.add_edge(a, b).unwrap();
        assert_eq!(
            graph.add_edge(a, b),
            Err(DagCommandError::InvalidEdge(EdgeRejection::Duplicate { from: a, to: b }))
        );
        assert_eq!(
            graph.add_edge(a, a),
            Err(DagCommandError::InvalidEdge(EdgeRejection::SelfLoop(a)))
        );

        let ghost = NodeId::new();
        assert_eq!(
            graph.add_edge(a, ghost),
            Err(DagCommandError::InvalidEdge(EdgeRejection::UnknownNode(ghost)))
        );
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_cycle_creating_edge_is_admitted() {
        let mut graph = seeded();
        let a = graph.add_node("A").unwrap();
        let b = graph.add_node("B").unwrap();
        graph.add_edge(a, b).unwrap();
        graph.add_edge(b, a).unwrap();

        assert_eq!(graph.edge_count(), 2);
        assert!(graph.has_cycle());
        assert_eq!(graph.status(), DagStatus::ContainsCycle);
        assert_eq!(graph.find_cycle(), Some(vec![a, b]));
    }

    #[test]
    fn test_delete_selected_cascades() {
        let mut graph = seeded();
        let a = graph.add_node("A").unwrap();
        let b = graph.add_node("B").unwrap();
        let c = graph.add_node("C").unwrap();
        let ab = graph.add_edge(a, b).unwrap();
        let bc = graph.add_edge(b, c).unwrap();
        let ac = graph.add_edge(a, c).unwrap();

        graph.set_selection(&[b], &[]);
        let removal = graph.delete_selected();

        assert_eq!(removal.nodes, vec![b]);
        assert_eq!(removal.edges, vec![ab, bc]);
        assert!(graph.contains_edge(ac));
        assert_eq!(graph.node_ids().collect::<Vec<_>>(), vec![a, c]);
    }

    #[test]
    fn test_delete_selected_is_idempotent() {
        let mut graph = seeded();
        let a = graph.add_node("A").unwrap();
        let b = graph.add_node("B").unwrap();
        let ab = graph.add_edge(a, b).unwrap();

        graph.set_selection(&[], &[ab]);
        assert_eq!(graph.delete_selected().edges, vec![ab]);

        let version = graph.version();
        assert!(graph.delete_selected().is_empty());
        assert_eq!(graph.version(), version);
        assert_eq!(graph.node_count(), 2);
    }

    #[test]
    fn test_set_selection_replaces_previous() {
        let mut graph = seeded();
        let a = graph.add_node("A").unwrap();
        let b = graph.add_node("B").unwrap();

        graph.set_selection(&[a], &[]);
        graph.set_selection(&[b, NodeId::new()], &[EdgeId::new()]);

        assert_eq!(graph.selected_node_ids(), vec![b]);
        assert!(graph.selected_edge_ids().is_empty());

        graph.clear_selection();
        assert!(graph.selected_node_ids().is_empty());
    }

    #[test]
    fn test_move_and_rename() {
        let mut graph = seeded();
        let a = graph.add_node("A").unwrap();

        graph.move_node(a, Position2D::new(10.0, 20.0)).unwrap();
        graph.rename_node(a, "Alpha").unwrap();
        assert_eq!(graph.rename_node(a, ""), Err(DagCommandError::InvalidLabel));

        let node = graph.node(a).unwrap();
        assert_eq!(node.position, Position2D::new(10.0, 20.0));
        assert_eq!(node.label, "Alpha");

        let ghost = NodeId::new();
        assert_eq!(
            graph.move_node(ghost, Position2D::origin()),
            Err(DagCommandError::NodeNotFound(ghost))
        );
    }

    #[test]
    fn test_auto_layout_on_empty_graph_is_noop() {
        let mut graph = seeded();
        let positions = graph.auto_layout(&LayeredLayout::default(), LayoutDirection::TopToBottom);
        assert!(positions.is_empty());
        assert_eq!(graph.version(), 0);
    }

    #[test]
    fn test_auto_layout_writes_positions() {
        let mut graph = seeded();
        let a = graph.add_node("A").unwrap();
        let b = graph.add_node("B").unwrap();
        graph.add_edge(a, b).unwrap();

        let positions = graph.auto_layout(&LayeredLayout::default(), LayoutDirection::TopToBottom);

        assert_eq!(positions.len(), 2);
        assert_eq!(positions[0].0, a);
        assert_eq!(graph.node(a).unwrap().position, positions[0].1);
        assert!(graph.node(a).unwrap().position.y < graph.node(b).unwrap().position.y);
    }
}
