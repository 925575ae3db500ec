//! # Visibility Engine
//!
//! Computes which nodes and edges are currently shown from the set of
//! expanded node ids.
//!
//! Frameworks are always visible. Expanding a visible node reveals the
//! targets of its outgoing edges; expanded targets are walked in turn
//! (breadth-first). Each node is queued at most once, so diamonds and
//! cycles cost O(V + E).
//!
//! The result is monotonic in the expanded set: adding ids can only add
//! nodes and edges.

use crate::graph::LayeredGraph;
use crate::{Edge, EdgeId, Node, NodeId};
use std::collections::{BTreeSet, VecDeque};

/// The visible subset of a graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleGraph<'g> {
    /// Visible nodes in discovery order (frameworks first).
    nodes: Vec<&'g Node>,
    /// Visible edges in input order.
    edges: Vec<&'g Edge>,
    /// Membership set for `nodes`.
    ids: BTreeSet<&'g NodeId>,
}

impl<'g> VisibleGraph<'g> {
    /// Visible nodes in discovery order.
    #[must_use]
    pub fn nodes(&self) -> &[&'g Node] {
        &self.nodes
    }

    /// Visible edges in input order.
    #[must_use]
    pub fn edges(&self) -> &[&'g Edge] {
        &self.edges
    }

    /// Check if a node is visible.
    #[must_use]
    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.ids.contains(id)
    }

    /// Check if an edge is visible.
    #[must_use]
    pub fn contains_edge(&self, id: &EdgeId) -> bool {
        self.edges.iter().any(|e| &e.id == id)
    }

    /// Visible node ids, ordered.
    #[must_use]
    pub fn node_ids(&self) -> BTreeSet<NodeId> {
        self.ids.iter().map(|id| (*id).clone()).collect()
    }

    /// Visible edge ids, ordered.
    #[must_use]
    pub fn edge_ids(&self) -> BTreeSet<EdgeId> {
        self.edges.iter().map(|e| e.id.clone()).collect()
    }

    /// Number of visible nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of visible edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

/// Compute the visible nodes and edges for an expanded set.
///
/// Ids in `expanded` that are unknown or unreachable have no effect.
/// Edges pointing at unknown nodes never surface.
#[must_use]
pub fn compute_visible<'g>(graph: &'g LayeredGraph, expanded: &BTreeSet<NodeId>) -> VisibleGraph<'g> {
    let mut nodes: Vec<&'g Node> = Vec::new();
    let mut ids: BTreeSet<&'g NodeId> = BTreeSet::new();
    let mut queued: BTreeSet<&'g NodeId> = BTreeSet::new();
    let mut queue: VecDeque<&'g NodeId> = VecDeque::new();

    // Layer 1 is always fully shown.
    for framework in graph.frameworks() {
        if ids.insert(&framework.id) {
            nodes.push(framework);
        }
        if expanded.contains(&framework.id) && queued.insert(&framework.id) {
            queue.push_back(&framework.id);
        }
    }

    while let Some(current) = queue.pop_front() {
        for edge in graph.outgoing(current) {
            let Some(target) = graph.node(&edge.to_id) else {
                continue;
            };

            if ids.insert(&target.id) {
                nodes.push(target);
            }
            if expanded.contains(&target.id) && queued.insert(&target.id) {
                queue.push_back(&target.id);
            }
        }
    }

    let edges = graph
        .edges()
        .iter()
        .filter(|e| ids.contains(&e.from_id) && ids.contains(&e.to_id))
        .collect();

    VisibleGraph { nodes, edges, ids }
}

// =============================================================================
// TESTS
// =============================================================================
