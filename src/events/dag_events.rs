//! DAG domain events
//!
//! Every committed command produces one or more of these. The presentation
//! layer consumes them to refresh its view; rejected commands produce none.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{EdgeId, LayoutDirection, NodeId, Position2D};

/// Node added event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeAdded {
    /// The unique identifier of the node
    pub node_id: NodeId,
    /// The node's label
    pub label: String,
    /// Where the node was placed
    pub position: Position2D,
    /// When the node was added
    pub occurred_at: DateTime<Utc>,
}

/// Node moved event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeMoved {
    /// The node that moved
    pub node_id: NodeId,
    /// Its new top-left corner
    pub position: Position2D,
    /// When the node was moved
    pub occurred_at: DateTime<Utc>,
}

/// Node renamed event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRenamed {
    /// The node that was renamed
    pub node_id: NodeId,
    /// Its new label
    pub label: String,
    /// When the node was renamed
    pub occurred_at: DateTime<Utc>,
}

/// Edge added event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeAdded {
    /// The unique identifier of the edge
    pub edge_id: EdgeId,
    /// The source node of the edge
    pub source: NodeId,
    /// The target node of the edge
    pub target: NodeId,
    /// When the edge was added
    pub occurred_at: DateTime<Utc>,
}

/// Selection changed event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionChanged {
    /// Nodes now selected
    pub node_ids: Vec<NodeId>,
    /// Edges now selected
    pub edge_ids: Vec<EdgeId>,
    /// When the selection changed
    pub occurred_at: DateTime<Utc>,
}

/// Selection deleted event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionDeleted {
    /// Nodes that were removed
    pub node_ids: Vec<NodeId>,
    /// Edges that were removed, including cascaded ones
    pub edge_ids: Vec<EdgeId>,
    /// When the deletion happened
    pub occurred_at: DateTime<Utc>,
}

/// Layout applied event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutApplied {
    /// Direction of the layout
    pub direction: LayoutDirection,
    /// New top-left corner of every node
    pub positions: Vec<(NodeId, Position2D)>,
    /// When the layout was applied
    pub occurred_at: DateTime<Utc>,
}
