//! Core graph data model for Pixgraph documents.
//!
//! A graph is two insertion-ordered sequences: nodes pinned to integer
//! coordinates in the background image's natural pixel space, and undirected
//! edges between pairs of those nodes. Nodes and edges are only ever appended
//! or removed, never edited in place.

use crate::error::{Error, Result};
use crate::id::{IdAllocator, NodeId};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

// ─── Nodes & Edges ───────────────────────────────────────────────────────

/// A labeled point on the background image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    /// Natural-pixel x coordinate.
    pub x: i32,
    /// Natural-pixel y coordinate.
    pub y: i32,
}

/// An undirected link between two nodes.
///
/// Stored in creation order: `from` is the node that was armed first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub from: NodeId,
    pub to: NodeId,
}

impl Edge {
    pub const fn new(from: NodeId, to: NodeId) -> Self {
        Self { from, to }
    }

    /// Whether either endpoint is `id`.
    pub fn touches(&self, id: NodeId) -> bool {
        self.from == id || self.to == id
    }

    /// Unordered endpoint comparison: `(a, b)` and `(b, a)` both match.
    pub fn connects(&self, a: NodeId, b: NodeId) -> bool {
        (self.from == a && self.to == b) || (self.from == b && self.to == a)
    }

    /// The endpoint opposite `id`, if `id` is an endpoint.
    pub fn other(&self, id: NodeId) -> Option<NodeId> {
        if self.from == id {
            Some(self.to)
        } else if self.to == id {
            Some(self.from)
        } else {
            None
        }
    }
}

/// What `Graph::remove_node` took out: the node plus every edge that
/// touched it, in their original order.
#[derive(Debug, Clone, PartialEq)]
pub struct RemovedNode {
    pub node: Node,
    pub edges: SmallVec<[Edge; 4]>,
}

// ─── Graph ───────────────────────────────────────────────────────────────

/// The authoritative node and edge store.
///
/// Node IDs come from a per-graph monotonic allocator, so an ID is never
/// handed out twice for the lifetime of the graph value, even across
/// `remove_node` and `clear`.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    ids: IdAllocator,
}

impl PartialEq for Graph {
    /// Two graphs are equal when their nodes and edges match in order.
    /// The ID allocator is bookkeeping and doesn't take part.
    fn eq(&self, other: &Self) -> bool {
        self.nodes == other.nodes && self.edges == other.edges
    }
}

impl Eq for Graph {}

impl Graph {
    /// Create a new empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from already-validated parts, seeding the allocator
    /// past every counter-style ID present.
    pub(crate) fn from_parts(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        let mut ids = IdAllocator::new();
        for node in &nodes {
            ids.observe(node.id);
        }
        Self { nodes, edges, ids }
    }

    /// Append a node at natural-pixel `(x, y)` under a fresh ID.
    pub fn add_node(&mut self, x: i32, y: i32) -> Node {
        let node = Node {
            id: self.ids.allocate(),
            x,
            y,
        };
        self.nodes.push(node);
        node
    }

    /// Append an edge between two distinct, existing nodes.
    ///
    /// Parallel edges and reversed duplicates are accepted as-is.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId) -> Result<Edge> {
        if from == to {
            return Err(Error::SelfLoop(from));
        }
        for id in [from, to] {
            if !self.contains(id) {
                return Err(Error::UnknownNode(id));
            }
        }
        let edge = Edge::new(from, to);
        self.edges.push(edge);
        Ok(edge)
    }

    /// Remove a node and every edge touching it.
    pub fn remove_node(&mut self, id: NodeId) -> Option<RemovedNode> {
        let pos = self.nodes.iter().position(|n| n.id == id)?;
        let node = self.nodes.remove(pos);

        let mut edges = SmallVec::new();
        self.edges.retain(|e| {
            if e.touches(id) {
                edges.push(*e);
                false
            } else {
                true
            }
        });
        Some(RemovedNode { node, edges })
    }

    /// Remove one edge with exactly this `(from, to)` direction.
    ///
    /// When parallel duplicates exist the most recently added one goes,
    /// which keeps undo an exact inverse of the add that created it.
    pub fn remove_edge(&mut self, from: NodeId, to: NodeId) -> Option<Edge> {
        let pos = self
            .edges
            .iter()
            .rposition(|e| e.from == from && e.to == to)?;
        Some(self.edges.remove(pos))
    }

    /// Drop all nodes and edges. The ID counter is not reset.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Edges in insertion order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Edges with `id` as either endpoint.
    pub fn edges_of(&self, id: NodeId) -> impl Iterator<Item = &Edge> {
        self.edges.iter().filter(move |e| e.touches(id))
    }

    /// Nodes connected to `id`, once per connecting edge.
    pub fn neighbors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.edges.iter().filter_map(move |e| e.other(id))
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    /// The allocator that will name the next node.
    pub fn id_allocator(&self) -> &IdAllocator {
        &self.ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn add_node_assigns_sequential_ids() {
        let mut g = Graph::new();
        let a = g.add_node(10, 20);
        let b = g.add_node(30, 40);
        assert_eq!(a.id.as_str(), "n1");
        assert_eq!(b.id.as_str(), "n2");
        assert_eq!(g.nodes(), &[a, b]);
    }

    #[test]
    fn ids_not_reused_after_removal() {
        let mut g = Graph::new();
        g.add_node(0, 0);
        let b = g.add_node(1, 1);
        g.remove_node(b.id);
        // Count-derived ids would produce `n2` again here.
        let c = g.add_node(2, 2);
        assert_eq!(c.id.as_str(), "n3");
    }

    #[test]
    fn ids_not_reused_after_clear() {
        let mut g = Graph::new();
        g.add_node(0, 0);
        g.clear();
        assert_eq!(g.add_node(0, 0).id.as_str(), "n2");
    }

    #[test]
    fn add_edge_rejects_self_loop() {
        let mut g = Graph::new();
        let a = g.add_node(0, 0);
        assert!(matches!(g.add_edge(a.id, a.id), Err(Error::SelfLoop(id)) if id == a.id));
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn add_edge_rejects_unknown_endpoint() {
        let mut g = Graph::new();
        let a = g.add_node(0, 0);
        let ghost = NodeId::intern("ghost");
        assert!(matches!(g.add_edge(a.id, ghost), Err(Error::UnknownNode(id)) if id == ghost));
    }

    #[test]
    fn parallel_and_reversed_edges_are_kept() {
        let mut g = Graph::new();
        let a = g.add_node(0, 0);
        let b = g.add_node(5, 5);
        g.add_edge(a.id, b.id).unwrap();
        g.add_edge(a.id, b.id).unwrap();
        g.add_edge(b.id, a.id).unwrap();
        assert_eq!(g.edge_count(), 3);
        assert!(g.edges().iter().all(|e| e.connects(a.id, b.id)));
    }

    #[test]
    fn remove_node_cascades_edges() {
        let mut g = Graph::new();
        let a = g.add_node(0, 0);
        let b = g.add_node(1, 0);
        let c = g.add_node(2, 0);
        g.add_edge(a.id, b.id).unwrap();
        g.add_edge(b.id, c.id).unwrap();
        g.add_edge(a.id, c.id).unwrap();

        let removed = g.remove_node(b.id).unwrap();
        assert_eq!(removed.node, b);
        assert_eq!(
            removed.edges.as_slice(),
            &[Edge::new(a.id, b.id), Edge::new(b.id, c.id)]
        );
        assert_eq!(g.edges(), &[Edge::new(a.id, c.id)]);
        assert_eq!(g.edges_of(b.id).count(), 0);
    }

    #[test]
    fn remove_edge_is_directional() {
        let mut g = Graph::new();
        let a = g.add_node(0, 0);
        let b = g.add_node(1, 1);
        g.add_edge(a.id, b.id).unwrap();
        assert_eq!(g.remove_edge(b.id, a.id), None);
        assert_eq!(g.remove_edge(a.id, b.id), Some(Edge::new(a.id, b.id)));
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn remove_edge_takes_latest_duplicate() {
        let mut g = Graph::new();
        let a = g.add_node(0, 0);
        let b = g.add_node(1, 1);
        let c = g.add_node(2, 2);
        g.add_edge(a.id, b.id).unwrap();
        g.add_edge(b.id, c.id).unwrap();
        g.add_edge(a.id, b.id).unwrap();

        g.remove_edge(a.id, b.id);
        assert_eq!(
            g.edges(),
            &[Edge::new(a.id, b.id), Edge::new(b.id, c.id)]
        );
    }

    #[test]
    fn neighbors_follow_both_directions() {
        let mut g = Graph::new();
        let a = g.add_node(0, 0);
        let b = g.add_node(1, 1);
        let c = g.add_node(2, 2);
        g.add_edge(a.id, b.id).unwrap();
        g.add_edge(c.id, a.id).unwrap();
        let n: Vec<_> = g.neighbors(a.id).collect();
        assert_eq!(n, vec![b.id, c.id]);
    }

    #[test]
    fn equality_ignores_allocator() {
        let mut g1 = Graph::new();
        g1.add_node(0, 0);
        g1.clear();
        assert_eq!(g1, Graph::new());
    }
}
