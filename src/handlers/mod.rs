//! DAG command handlers
//!
//! Command handlers validate commands against the aggregate, apply them, and
//! emit the resulting events. They are the single entry point the
//! presentation layer drives.

use chrono::Utc;
use tracing::{info, warn};

use crate::{
    aggregate::{DagGraph, Removal},
    commands::{DagCommand, DagCommandResult},
    config::DagConfig,
    domain_events::DagDomainEvent,
    events::{
        EdgeAdded, LayoutApplied, NodeAdded, NodeMoved, NodeRenamed, SelectionChanged,
        SelectionDeleted,
    },
    layout::LayeredLayout,
    projections::DagSnapshot,
    validation::DagStatus,
    value_objects::{EdgeId, LayoutDirection, NodeId, Position2D},
};

/// Trait for handling DAG commands
pub trait DagCommandHandler {
    /// Apply a command, returning the events it produced.
    ///
    /// A rejected command returns an error and leaves the graph untouched.
    fn handle(&mut self, command: DagCommand) -> DagCommandResult<Vec<DagDomainEvent>>;
}

/// Owns one DAG and the layout engine used to arrange it
#[derive(Debug, Clone)]
pub struct DagEditor {
    graph: DagGraph,
    layout: LayeredLayout,
}

impl DagEditor {
    /// Create an empty editor
    pub fn new(config: DagConfig) -> Self {
        Self {
            graph: DagGraph::with_placement(config.placement),
            layout: LayeredLayout::new(config.layout),
        }
    }

    /// Start from a previously saved snapshot
    pub fn from_snapshot(snapshot: &DagSnapshot, config: DagConfig) -> DagCommandResult<Self> {
        Ok(Self {
            graph: snapshot.restore(config.placement)?,
            layout: LayeredLayout::new(config.layout),
        })
    }

    pub fn graph(&self) -> &DagGraph {
        &self.graph
    }

    pub fn layout(&self) -> &LayeredLayout {
        &self.layout
    }

    pub fn add_node(&mut self, label: impl Into<String>) -> DagCommandResult<NodeId> {
        self.graph.add_node(label)
    }

    pub fn add_edge(&mut self, source: NodeId, target: NodeId) -> DagCommandResult<EdgeId> {
        self.graph.add_edge(source, target)
    }

    pub fn set_selection(&mut self, node_ids: &[NodeId], edge_ids: &[EdgeId]) {
        self.graph.set_selection(node_ids, edge_ids);
    }

    pub fn delete_selected(&mut self) -> Removal {
        self.graph.delete_selected()
    }

    pub fn move_node(&mut self, id: NodeId, position: Position2D) -> DagCommandResult<()> {
        self.graph.move_node(id, position)
    }

    /// Lay out the whole graph; returns the new top-left corner of each node.
    pub fn auto_layout(&mut self, direction: LayoutDirection) -> Vec<(NodeId, Position2D)> {
        self.graph.auto_layout(&self.layout, direction)
    }

    /// Whole-graph status, as shown to the user
    pub fn status(&self) -> DagStatus {
        let status = self.graph.status();
        info!(%status, "dag status");
        status
    }

    pub fn snapshot(&self) -> DagSnapshot {
        self.graph.snapshot()
    }

    /// Give up the editor and keep the graph
    pub fn into_graph(self) -> DagGraph {
        self.graph
    }

    fn apply(&mut self, command: DagCommand) -> DagCommandResult<Vec<DagDomainEvent>> {
        let occurred_at = Utc::now();

        match command {
            DagCommand::AddNode { label } => {
                let node_id = self.graph.add_node(label.clone())?;
                let position = self
                    .graph
                    .node(node_id)
                    .map(|n| n.position)
                    .unwrap_or_default();

                Ok(vec![DagDomainEvent::NodeAdded(NodeAdded {
                    node_id,
                    label,
                    position,
                    occurred_at,
                })])
            }

            DagCommand::InsertNode {
                id,
                label,
                position,
            } => {
                self.graph.insert_node(id, label.clone(), position)?;

                Ok(vec![DagDomainEvent::NodeAdded(NodeAdded {
                    node_id: id,
                    label,
                    position,
                    occurred_at,
                })])
            }

            DagCommand::AddEdge { source, target } => {
                let edge_id = self.graph.add_edge(source, target)?;

                Ok(vec![DagDomainEvent::EdgeAdded(EdgeAdded {
                    edge_id,
                    source,
                    target,
                    occurred_at,
                })])
            }

            DagCommand::DeleteSelected => {
                let removal = self.graph.delete_selected();
                if removal.is_empty() {
                    return Ok(Vec::new());
                }

                Ok(vec![DagDomainEvent::SelectionDeleted(SelectionDeleted {
                    node_ids: removal.nodes,
                    edge_ids: removal.edges,
                    occurred_at,
                })])
            }

            DagCommand::SetSelection { node_ids, edge_ids } => {
                self.graph.set_selection(&node_ids, &edge_ids);

                Ok(vec![DagDomainEvent::SelectionChanged(SelectionChanged {
                    node_ids: self.graph.selected_node_ids(),
                    edge_ids: self.graph.selected_edge_ids(),
                    occurred_at,
                })])
            }

            DagCommand::MoveNode { node_id, position } => {
                self.graph.move_node(node_id, position)?;

                Ok(vec![DagDomainEvent::NodeMoved(NodeMoved {
                    node_id,
                    position,
                    occurred_at,
                })])
            }

            DagCommand::RenameNode { node_id, label } => {
                self.graph.rename_node(node_id, label.clone())?;

                Ok(vec![DagDomainEvent::NodeRenamed(NodeRenamed {
                    node_id,
                    label,
                    occurred_at,
                })])
            }

            DagCommand::AutoLayout { direction } => {
                let positions = self.auto_layout(direction);
                if positions.is_empty() {
                    return Ok(Vec::new());
                }

                Ok(vec![DagDomainEvent::LayoutApplied(LayoutApplied {
                    direction,
                    positions,
                    occurred_at,
                })])
            }
        }
    }
}

impl Default for DagEditor {
    fn default() -> Self {
        Self::new(DagConfig::default())
    }
}

impl DagCommandHandler for DagEditor {
    fn handle(&mut self, command: DagCommand) -> DagCommandResult<Vec<DagDomainEvent>> {
        let kind = command_name(&command);
        self.apply(command).inspect_err(|error| {
            warn!(command = kind, %error, "command rejected");
        })
    }
}

fn command_name(command: &DagCommand) -> &'static str {
    match command {
        DagCommand::AddNode { .. } => "AddNode",
        DagCommand::InsertNode { .. } => "InsertNode",
        DagCommand::AddEdge { .. } => "AddEdge",
        DagCommand::DeleteSelected => "DeleteSelected",
        DagCommand::SetSelection { .. } => "SetSelection",
        DagCommand::MoveNode { .. } => "MoveNode",
        DagCommand::RenameNode { .. } => "RenameNode",
        DagCommand::AutoLayout { .. } => "AutoLayout",
    }
}
