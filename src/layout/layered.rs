//! Layered (Sugiyama-style) layout
//!
//! Positions are a pure function of topology: previous positions are never
//! read. The pipeline, run per weakly connected component:
//!
//! 1. Break cycles by reversing DFS back-edges (for ranking only)
//! 2. Longest-path ranking, sources on rank 0
//! 3. Insert virtual nodes so every edge spans exactly one rank
//! 4. Barycenter sweeps to reduce crossings, keeping the best ordering
//! 5. Assign coordinates, centering every rank on the widest one
//!
//! Components are then tiled side by side along the within-rank axis.

use indexmap::IndexMap;
use petgraph::unionfind::UnionFind;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::debug;

use crate::aggregate::{DagEdge, DagNode};
use crate::validation::topology::Topology;
use crate::value_objects::{LayoutDirection, NodeId, Position2D, Size};

/// Configuration for the layered layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Box used for every node, whatever its label
    pub node_size: Size,
    /// Gap between neighbouring nodes on the same rank
    pub node_separation: f64,
    /// Gap between consecutive ranks
    pub rank_separation: f64,
    /// Gap between disconnected components
    pub component_separation: f64,
    /// Number of barycenter passes (alternating down and up)
    pub crossing_sweeps: usize,
    /// Direction used when the caller does not pick one
    pub direction: LayoutDirection,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_size: Size::default(),
            node_separation: 50.0,
            rank_separation: 50.0,
            component_separation: 50.0,
            crossing_sweeps: 8,
            direction: LayoutDirection::TopToBottom,
        }
    }
}

impl LayoutConfig {
    /// Check that boxes have a real extent and gaps are never negative
    pub fn validate(&self) -> Result<(), String> {
        Size::new(self.node_size.width, self.node_size.height)?;
        for (name, gap) in [
            ("node_separation", self.node_separation),
            ("rank_separation", self.rank_separation),
            ("component_separation", self.component_separation),
        ] {
            if !(gap >= 0.0 && gap.is_finite()) {
                return Err(format!("{name} must be a non-negative number, got {gap}"));
            }
        }
        Ok(())
    }
}

/// Bounding box of a layout
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LayoutBounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl LayoutBounds {
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// Output of a layout run
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutResult {
    /// Top-left corner of every node, in input order
    positions: IndexMap<NodeId, Position2D>,
    ranks: HashMap<NodeId, usize>,
    crossings: usize,
    bounds: LayoutBounds,
}

impl LayoutResult {
    fn empty() -> Self {
        Self {
            positions: IndexMap::new(),
            ranks: HashMap::new(),
            crossings: 0,
            bounds: LayoutBounds::default(),
        }
    }

    /// Top-left position of every node, in input order
    pub fn positions(&self) -> &IndexMap<NodeId, Position2D> {
        &self.positions
    }

    /// Top-left position of one node
    pub fn position(&self, id: NodeId) -> Option<Position2D> {
        self.positions.get(&id).copied()
    }

    /// Rank (layer) assigned to a node
    pub fn rank_of(&self, id: NodeId) -> Option<usize> {
        self.ranks.get(&id).copied()
    }

    /// Edge crossings remaining in the chosen ordering
    pub fn crossings(&self) -> usize {
        self.crossings
    }

    /// Area covered by the node boxes
    pub fn bounds(&self) -> LayoutBounds {
        self.bounds
    }

    pub fn node_count(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Vertex {
    Real(usize),
    Virtual,
}

/// One component, normalised so every edge joins adjacent ranks
#[derive(Debug, Default)]
struct LayeredComponent {
    vertices: Vec<Vertex>,
    layers: Vec<Vec<usize>>,
    upper: Vec<Vec<usize>>,
    lower: Vec<Vec<usize>>,
}

impl LayeredComponent {
    fn push(&mut self, vertex: Vertex, rank: usize) -> usize {
        let id = self.vertices.len();
        self.vertices.push(vertex);
        self.upper.push(Vec::new());
        self.lower.push(Vec::new());
        if self.layers.len() <= rank {
            self.layers.resize_with(rank + 1, Vec::new);
        }
        self.layers[rank].push(id);
        id
    }

    fn link(&mut self, from: usize, to: usize) {
        self.lower[from].push(to);
        self.upper[to].push(from);
    }

    /// Position of every vertex within its layer
    fn slots(&self) -> Vec<usize> {
        let mut slots = vec![0; self.vertices.len()];
        for layer in &self.layers {
            for (slot, &v) in layer.iter().enumerate() {
                slots[v] = slot;
            }
        }
        slots
    }

    fn crossings(&self) -> usize {
        let slots = self.slots();
        let mut total = 0;
        for layer in &self.layers {
            let segments: Vec<(usize, usize)> = layer
                .iter()
                .flat_map(|&u| self.lower[u].iter().map(move |&w| (u, w)))
                .map(|(u, w)| (slots[u], slots[w]))
                .collect();
            for (i, a) in segments.iter().enumerate() {
                for b in &segments[i + 1..] {
                    let top = a.0 as i64 - b.0 as i64;
                    let bottom = a.1 as i64 - b.1 as i64;
                    if top * bottom < 0 {
                        total += 1;
                    }
                }
            }
        }
        total
    }

    /// Reorder one layer by the mean slot of its neighbours.
    ///
    /// Vertices without neighbours keep their current slot as their key; the
    /// sort is stable so ties keep their relative order.
    fn reorder(&mut self, rank: usize, slots: &mut [usize], downward: bool) {
        let neighbours = if downward { &self.upper } else { &self.lower };
        let mut keyed: Vec<(f64, usize)> = self.layers[rank]
            .iter()
            .map(|&v| {
                let adjacent = &neighbours[v];
                let key = if adjacent.is_empty() {
                    slots[v] as f64
                } else {
                    adjacent.iter().map(|&n| slots[n] as f64).sum::<f64>() / adjacent.len() as f64
                };
                (key, v)
            })
            .collect();
        keyed.sort_by(|a, b| a.0.total_cmp(&b.0));

        self.layers[rank] = keyed.into_iter().map(|(_, v)| v).collect();
        for (slot, &v) in self.layers[rank].iter().enumerate() {
            slots[v] = slot;
        }
    }

    /// Run barycenter sweeps and keep the ordering with the fewest crossings.
    fn reduce_crossings(&mut self, sweeps: usize) -> usize {
        let mut best_layers = self.layers.clone();
        let mut best = self.crossings();
        let depth = self.layers.len();

        for sweep in 0..sweeps {
            if best == 0 || depth < 2 {
                break;
            }
            let mut slots = self.slots();
            if sweep % 2 == 0 {
                for rank in 1..depth {
                    self.reorder(rank, &mut slots, true);
                }
            } else {
                for rank in (0..depth - 1).rev() {
                    self.reorder(rank, &mut slots, false);
                }
            }

            let crossings = self.crossings();
            if crossings < best {
                best = crossings;
                best_layers = self.layers.clone();
            }
        }

        self.layers = best_layers;
        best
    }
}

/// Layered layout engine
#[derive(Debug, Clone, Default)]
pub struct LayeredLayout {
    config: LayoutConfig,
}

impl LayeredLayout {
    /// Create a layout engine
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    /// Lay out `nodes` and return new node records with positions overwritten.
    ///
    /// Edges are read but never changed.
    pub fn apply(
        &self,
        nodes: &[DagNode],
        edges: &[DagEdge],
        direction: LayoutDirection,
    ) -> Vec<DagNode> {
        let result = self.compute(
            nodes.iter().map(|n| n.id),
            edges.iter().map(|e| (e.source, e.target)),
            direction,
        );
        nodes
            .iter()
            .map(|node| DagNode {
                position: result.position(node.id).unwrap_or(node.position),
                ..node.clone()
            })
            .collect()
    }

    /// Compute top-left positions for every node.
    ///
    /// Terminates on cyclic input; edges with unknown endpoints and
    /// self-loops are ignored.
    pub fn compute<N, E>(&self, nodes: N, edges: E, direction: LayoutDirection) -> LayoutResult
    where
        N: IntoIterator<Item = NodeId>,
        E: IntoIterator<Item = (NodeId, NodeId)>,
    {
        let topology = Topology::new(nodes, edges);
        let count = topology.node_count();
        if count == 0 {
            return LayoutResult::empty();
        }

        let oriented = acyclic_orientation(&topology);
        let ranks = longest_path_ranks(count, &oriented);

        let mut components: UnionFind<usize> = UnionFind::new(count);
        for &(s, t) in &oriented {
            components.union(s, t);
        }
        let mut groups: IndexMap<usize, Vec<usize>> = IndexMap::new();
        for node in 0..count {
            groups.entry(components.find(node)).or_default().push(node);
        }

        let size = self.config.node_size;
        let (breadth, depth) = if direction.is_horizontal() {
            (size.height, size.width)
        } else {
            (size.width, size.height)
        };

        // (within-rank center, along-rank center) per node
        let mut centers = vec![(0.0, 0.0); count];
        let mut offset = 0.0;
        let mut crossings = 0;

        for members in groups.values() {
            let mut component = LayeredComponent::default();
            let mut vertex_of: HashMap<usize, usize> = HashMap::new();
            for &node in members {
                vertex_of.insert(node, component.push(Vertex::Real(node), ranks[node]));
            }
            for &(s, t) in &oriented {
                let (Some(&from), Some(&to)) = (vertex_of.get(&s), vertex_of.get(&t)) else {
                    continue;
                };
                let mut previous = from;
                for rank in ranks[s] + 1..ranks[t] {
                    let dummy = component.push(Vertex::Virtual, rank);
                    component.link(previous, dummy);
                    previous = dummy;
                }
                component.link(previous, to);
            }

            crossings += component.reduce_crossings(self.config.crossing_sweeps);

            let extent = |v: usize| match component.vertices[v] {
                Vertex::Real(_) => breadth,
                Vertex::Virtual => 0.0,
            };
            let sep = self.config.node_separation;
            let layer_width = |layer: &Vec<usize>| {
                layer.iter().map(|&v| extent(v)).sum::<f64>()
                    + sep * layer.len().saturating_sub(1) as f64
            };
            let width = component.layers.iter().map(&layer_width).fold(0.0, f64::max);

            for (rank, layer) in component.layers.iter().enumerate() {
                let along = rank as f64 * (depth + self.config.rank_separation) + depth / 2.0;
                let mut cursor = offset + (width - layer_width(layer)) / 2.0;
                for &v in layer {
                    if let Vertex::Real(node) = component.vertices[v] {
                        centers[node] = (cursor + breadth / 2.0, along);
                    }
                    cursor += extent(v) + sep;
                }
            }

            offset += width + self.config.component_separation;
        }

        let mut positions = IndexMap::with_capacity(count);
        let mut rank_map = HashMap::with_capacity(count);
        let mut bounds: Option<LayoutBounds> = None;
        for (node, &(across, along)) in centers.iter().enumerate() {
            let (cx, cy) = if direction.is_horizontal() {
                (along, across)
            } else {
                (across, along)
            };
            let top_left = Position2D::new(cx - size.width / 2.0, cy - size.height / 2.0);
            let id = topology.id(node);
            positions.insert(id, top_left);
            rank_map.insert(id, ranks[node]);

            let b = bounds.get_or_insert(LayoutBounds {
                min_x: top_left.x,
                min_y: top_left.y,
                max_x: top_left.x + size.width,
                max_y: top_left.y + size.height,
            });
            b.min_x = b.min_x.min(top_left.x);
            b.min_y = b.min_y.min(top_left.y);
            b.max_x = b.max_x.max(top_left.x + size.width);
            b.max_y = b.max_y.max(top_left.y + size.height);
        }

        debug!(
            nodes = count,
            components = groups.len(),
            crossings,
            %direction,
            "layered layout computed"
        );

        LayoutResult {
            positions,
            ranks: rank_map,
            crossings,
            bounds: bounds.unwrap_or_default(),
        }
    }
}

/// Edges with DFS back-edges reversed and self-loops dropped; always acyclic.
fn acyclic_orientation(topology: &Topology) -> Vec<(usize, usize)> {
    let reversed: HashSet<usize> = topology.back_edges().into_iter().collect();
    topology
        .edges()
        .iter()
        .enumerate()
        .filter(|(_, (s, t))| s != t)
        .map(|(i, &(s, t))| if reversed.contains(&i) { (t, s) } else { (s, t) })
        .collect()
}

/// Longest-path layering over an acyclic edge list (Kahn order).
fn longest_path_ranks(count: usize, edges: &[(usize, usize)]) -> Vec<usize> {
    let mut successors = vec![Vec::new(); count];
    let mut in_degree = vec![0usize; count];
    for &(s, t) in edges {
        successors[s].push(t);
        in_degree[t] += 1;
    }

    let mut ranks = vec![0usize; count];
    let mut queue: VecDeque<usize> = (0..count).filter(|&n| in_degree[n] == 0).collect();
    while let Some(node) = queue.pop_front() {
        for &next in &successors[node] {
            ranks[next] = ranks[next].max(ranks[node] + 1);
            in_degree[next] -= 1;
            if in_degree[next] == 0 {
                queue.push_back(next);
            }
        }
    }
    ranks
}
