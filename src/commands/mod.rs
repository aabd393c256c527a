//! DAG commands
//!
//! Commands represent user intent to modify the DAG. They are processed by the
//! command handler, which validates them against the current graph and emits
//! the corresponding events. A rejected command leaves the graph untouched.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::validation::EdgeRejection;
use crate::value_objects::{EdgeId, LayoutDirection, NodeId, Position2D};

/// Commands issued by the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DagCommand {
    /// Add a node with a generated id and a random initial position
    AddNode {
        /// Display label; must not be blank
        label: String,
    },

    /// Add a node with a caller-chosen id and position
    InsertNode {
        /// The id to use; must not already be present
        id: NodeId,
        /// Display label; must not be blank
        label: String,
        /// Top-left corner of the node
        position: Position2D,
    },

    /// Connect two nodes
    AddEdge {
        /// The source node of the edge
        source: NodeId,
        /// The target node of the edge
        target: NodeId,
    },

    /// Remove every selected node and edge, plus edges touching removed nodes
    DeleteSelected,

    /// Replace the current selection
    SetSelection {
        /// Nodes to mark selected
        node_ids: Vec<NodeId>,
        /// Edges to mark selected
        edge_ids: Vec<EdgeId>,
    },

    /// Move a node (e.g. dragged by the user)
    MoveNode {
        /// The node to move
        node_id: NodeId,
        /// New top-left corner
        position: Position2D,
    },

    /// Change a node's label
    RenameNode {
        /// The node to rename
        node_id: NodeId,
        /// New label; must not be blank
        label: String,
    },

    /// Recompute every node position with the layered layout
    AutoLayout {
        /// Flow direction of the layout
        direction: LayoutDirection,
    },
}

/// Result type for DAG commands
pub type DagCommandResult<T> = Result<T, DagCommandError>;

/// Errors that can occur while processing a DAG command
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum DagCommandError {
    #[error("Node label must not be empty")]
    InvalidLabel,

    #[error("Invalid connection: {0}")]
    InvalidEdge(EdgeRejection),

    #[error("Node already exists: {0}")]
    DuplicateNode(NodeId),

    #[error("Edge already exists: {0}")]
    DuplicateEdge(EdgeId),

    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("Invalid layout direction: {0}")]
    InvalidDirection(String),
}

impl From<EdgeRejection> for DagCommandError {
    fn from(rejection: EdgeRejection) -> Self {
        DagCommandError::InvalidEdge(rejection)
    }
}
