//! Cycle detection
//!
//! Depth-first traversal with a "fully visited" mark and an "on the current
//! path" mark; an edge into a node on the current path is a back-edge and
//! proves a cycle. Every node is tried as a root so cycles in components
//! unreachable from the first node are still found. Runs in O(V + E).

use crate::value_objects::NodeId;

use super::topology::Topology;

/// Returns true when the graph contains at least one cycle.
///
/// Edges referencing nodes outside `nodes` are ignored.
pub fn detect_cycle<N, E>(nodes: N, edges: E) -> bool
where
    N: IntoIterator<Item = NodeId>,
    E: IntoIterator<Item = (NodeId, NodeId)>,
{
    Topology::new(nodes, edges).first_cycle().is_some()
}

/// Returns the first cycle found, if any.
///
/// The cycle is listed in traversal order starting at the node the
/// back-edge points to; the last node has an edge back to the first.
pub fn find_cycle<N, E>(nodes: N, edges: E) -> Option<Vec<NodeId>>
where
    N: IntoIterator<Item = NodeId>,
    E: IntoIterator<Item = (NodeId, NodeId)>,
{
    let topology = Topology::new(nodes, edges);
    topology
        .first_cycle()
        .map(|cycle| cycle.into_iter().map(|n| topology.id(n)).collect())
}
