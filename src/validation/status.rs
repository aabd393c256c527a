//! Whole-graph DAG status
//!
//! Recomputed from scratch on every query. The connectivity rule only compares
//! counts (`edges >= nodes - 1`); it does not check reachability.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::value_objects::NodeId;

use super::cycle::detect_cycle;

/// Overall validity of the graph being built
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DagStatus {
    /// Fewer than two nodes
    TooFewNodes,
    /// Fewer edges than needed to span the nodes
    InsufficientlyConnected,
    /// At least one cycle is present
    ContainsCycle,
    /// A valid DAG
    Valid,
}

impl DagStatus {
    /// Whether the graph is a valid DAG
    pub fn is_valid(&self) -> bool {
        matches!(self, DagStatus::Valid)
    }

    /// Status line shown to the user
    pub fn message(&self) -> &'static str {
        match self {
            DagStatus::TooFewNodes => "Invalid: Requires at least 2 nodes",
            DagStatus::InsufficientlyConnected => "Invalid: Not all nodes are connected",
            DagStatus::ContainsCycle => "Invalid: Contains cycle",
            DagStatus::Valid => "Valid DAG",
        }
    }
}

impl fmt::Display for DagStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Compute the status of a graph.
///
/// Checks run in order: node count, edge count, cycles.
pub fn overall_status<N, E>(nodes: N, edges: E) -> DagStatus
where
    N: IntoIterator<Item = NodeId>,
    E: IntoIterator<Item = (NodeId, NodeId)>,
{
    let nodes: Vec<NodeId> = nodes.into_iter().collect();
    let edges: Vec<(NodeId, NodeId)> = edges.into_iter().collect();

    if nodes.len() < 2 {
        return DagStatus::TooFewNodes;
    }
    if edges.len() < nodes.len() - 1 {
        return DagStatus::InsufficientlyConnected;
    }
    if detect_cycle(nodes, edges) {
        return DagStatus::ContainsCycle;
    }
    DagStatus::Valid
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: usize) -> Vec<NodeId> {
        (0..n).map(|_| NodeId::new()).collect()
    }

    #[test]
    fn test_too_few_nodes() {
        assert_eq!(overall_status(Vec::new(), Vec::new()), DagStatus::TooFewNodes);
        assert_eq!(overall_status(ids(1), Vec::new()), DagStatus::TooFewNodes);
    }

    #[test]
    fn test_insufficiently_connected() {
        let n = ids(3);
        assert_eq!(
            overall_status(n.clone(), vec![(n[0], n[1])]),
            DagStatus::InsufficientlyConnected
        );
    }

    #[test]
    fn test_count_heuristic_does_not_check_reachability() {
        // 4 nodes, 3 edges, but node 3 is isolated: still reported valid
        let n = ids(4);
        let edges = vec![(n[0], n[1]), (n[1], n[2]), (n[0], n[2])];
        assert_eq!(overall_status(n, edges), DagStatus::Valid);
    }

    #[test]
    fn test_cycle_reported() {
        let n = ids(3);
        let edges = vec![(n[0], n[1]), (n[1], n[2]), (n[2], n[0])];
        assert_eq!(overall_status(n, edges), DagStatus::ContainsCycle);
    }

    #[test]
    fn test_messages() {
        assert_eq!(DagStatus::Valid.to_string(), "Valid DAG");
        assert_eq!(DagStatus::ContainsCycle.to_string(), "Invalid: Contains cycle");
        assert!(!DagStatus::TooFewNodes.is_valid());
    }
}
