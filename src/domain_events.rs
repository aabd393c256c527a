//! Domain events enum for the DAG builder domain

use serde::{Deserialize, Serialize};

use crate::events::{
    EdgeAdded, LayoutApplied, NodeAdded, NodeMoved, NodeRenamed, SelectionChanged,
    SelectionDeleted,
};

/// Enum wrapper for DAG domain events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DagDomainEvent {
    /// A node was added
    NodeAdded(NodeAdded),
    /// A node was moved
    NodeMoved(NodeMoved),
    /// A node was renamed
    NodeRenamed(NodeRenamed),
    /// An edge was added between nodes
    EdgeAdded(EdgeAdded),
    /// The selection was replaced
    SelectionChanged(SelectionChanged),
    /// Selected nodes and edges were removed
    SelectionDeleted(SelectionDeleted),
    /// Auto-layout rewrote node positions
    LayoutApplied(LayoutApplied),
}

impl DagDomainEvent {
    /// Short name of the event
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::NodeAdded(_) => "NodeAdded",
            Self::NodeMoved(_) => "NodeMoved",
            Self::NodeRenamed(_) => "NodeRenamed",
            Self::EdgeAdded(_) => "EdgeAdded",
            Self::SelectionChanged(_) => "SelectionChanged",
            Self::SelectionDeleted(_) => "SelectionDeleted",
            Self::LayoutApplied(_) => "LayoutApplied",
        }
    }

    /// Versioned subject the event is published under
    pub fn subject(&self) -> String {
        let subject = match self {
            Self::NodeAdded(_) => "dag.node.added",
            Self::NodeMoved(_) => "dag.node.moved",
            Self::NodeRenamed(_) => "dag.node.renamed",
            Self::EdgeAdded(_) => "dag.edge.added",
            Self::SelectionChanged(_) => "dag.selection.changed",
            Self::SelectionDeleted(_) => "dag.selection.deleted",
            Self::LayoutApplied(_) => "dag.layout.applied",
        };
        format!("{subject}.v1")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::{NodeId, Position2D};

    #[test]
    fn test_subject_and_type() {
        let event = DagDomainEvent::NodeAdded(NodeAdded {
            node_id: NodeId::new(),
            label: "A".to_string(),
            position: Position2D::origin(),
            occurred_at: chrono::Utc::now(),
        });
        assert_eq!(event.event_type(), "NodeAdded");
        assert_eq!(event.subject(), "dag.node.added.v1");
    }

    #[test]
    fn test_event_serialization() {
        let event = DagDomainEvent::SelectionDeleted(SelectionDeleted {
            node_ids: vec![NodeId::new()],
            edge_ids: Vec::new(),
            occurred_at: chrono::Utc::now(),
        });
        let json = serde_json::to_string(&event).unwrap();
        let parsed: DagDomainEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, parsed);
    }
}
