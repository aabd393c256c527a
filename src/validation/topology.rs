//! Index-based read view of a graph's topology
//!
//! Both the cycle detector and the layout engine work on dense indices rather
//! than on identifiers. Node order follows the order the ids were supplied in,
//! and each adjacency list follows edge order, so every traversal over a
//! `Topology` is deterministic.

use std::collections::HashMap;
use std::ops::ControlFlow;

use crate::value_objects::NodeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    OnStack,
    Done,
}

#[derive(Debug, Clone)]
pub(crate) struct Topology {
    ids: Vec<NodeId>,
    edges: Vec<(usize, usize)>,
    outgoing: Vec<Vec<usize>>,
}

impl Topology {
    /// Build a topology. Repeated node ids are ignored, as are edges with an
    /// endpoint that is not among `nodes`.
    pub(crate) fn new<N, E>(nodes: N, edges: E) -> Self
    where
        N: IntoIterator<Item = NodeId>,
        E: IntoIterator<Item = (NodeId, NodeId)>,
    {
        let mut ids = Vec::new();
        let mut index = HashMap::new();
        for id in nodes {
            if !index.contains_key(&id) {
                index.insert(id, ids.len());
                ids.push(id);
            }
        }

        let mut outgoing = vec![Vec::new(); ids.len()];
        let mut resolved = Vec::new();
        for (source, target) in edges {
            if let (Some(&s), Some(&t)) = (index.get(&source), index.get(&target)) {
                outgoing[s].push(resolved.len());
                resolved.push((s, t));
            }
        }

        Self {
            ids,
            edges: resolved,
            outgoing,
        }
    }

    pub(crate) fn node_count(&self) -> usize {
        self.ids.len()
    }

    pub(crate) fn id(&self, node: usize) -> NodeId {
        self.ids[node]
    }

    pub(crate) fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    /// Depth-first walk over every node, visiting roots in node order.
    ///
    /// Uses an explicit frame stack instead of recursion. `on_back_edge` is
    /// called with the current recursion path (root first) and the index of an
    /// edge whose target is on that path; returning `Break` stops the walk.
    pub(crate) fn walk<F>(&self, mut on_back_edge: F)
    where
        F: FnMut(&[usize], usize) -> ControlFlow<()>,
    {
        let mut marks = vec![Mark::Unvisited; self.ids.len()];
        // (node, cursor into its outgoing edge list)
        let mut frames: Vec<(usize, usize)> = Vec::new();
        let mut path: Vec<usize> = Vec::new();

        for root in 0..self.ids.len() {
            if marks[root] != Mark::Unvisited {
                continue;
            }
            marks[root] = Mark::OnStack;
            frames.push((root, 0));
            path.push(root);

            while let Some(frame) = frames.last_mut() {
                let (node, cursor) = *frame;
                match self.outgoing[node].get(cursor) {
                    Some(&edge) => {
                        frame.1 += 1;
                        let next = self.edges[edge].1;
                        match marks[next] {
                            Mark::OnStack => {
                                if on_back_edge(&path, edge).is_break() {
                                    return;
                                }
                            }
                            Mark::Unvisited => {
                                marks[next] = Mark::OnStack;
                                frames.push((next, 0));
                                path.push(next);
                            }
                            Mark::Done => {}
                        }
                    }
                    None => {
                        marks[node] = Mark::Done;
                        frames.pop();
                        path.pop();
                    }
                }
            }
        }
    }

    /// Indices of every back-edge found by [`Topology::walk`].
    pub(crate) fn back_edges(&self) -> Vec<usize> {
        let mut found = Vec::new();
        self.walk(|_, edge| {
            found.push(edge);
            ControlFlow::Continue(())
        });
        found
    }

    /// The first cycle found, as node indices in traversal order.
    pub(crate) fn first_cycle(&self) -> Option<Vec<usize>> {
        let mut cycle = None;
        self.walk(|path, edge| {
            let target = self.edges[edge].1;
            let start = path.iter().rposition(|&n| n == target).unwrap_or(0);
            cycle = Some(path[start..].to_vec());
            ControlFlow::Break(())
        });
        cycle
    }
}
