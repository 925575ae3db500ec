//! # Graph Store
//!
//! Holds every node and edge of one snapshot and the lookup indices the
//! view computations need:
//! - node-by-id
//! - outgoing-edges-by-source-id (input order preserved per source)
//! - first-parent-edge-by-target-id (input order)
//!
//! Indices are built in full whenever a snapshot is loaded. There is no
//! incremental update. All maps are `BTreeMap` for deterministic ordering.

use crate::{Edge, EdgeId, Node, NodeId, NodeKind, RegmapError};
use std::borrow::Borrow;
use std::collections::BTreeMap;

// =============================================================================
// INDEX BUILDERS
// =============================================================================

/// Index nodes by id.
///
/// `nodes` is the concatenation of the four collections. Ids are one
/// namespace across all kinds, so a repeated id is rejected instead of
/// letting the later node shadow the earlier one.
pub fn build_node_index(nodes: &[Node]) -> Result<BTreeMap<NodeId, usize>, RegmapError> {
    let mut index = BTreeMap::new();
    for (position, node) in nodes.iter().enumerate() {
        if let Some(&existing) = index.get(&node.id) {
            let first: &Node = &nodes[existing];
            return Err(RegmapError::DuplicateNodeId {
                id: node.id.clone(),
                first: first.kind(),
                second: node.kind(),
            });
        }
        index.insert(node.id.clone(), position);
    }
    Ok(index)
}

/// Group edges by source id, preserving input order within each group.
#[must_use]
pub fn build_edge_index(edges: &[Edge]) -> BTreeMap<NodeId, Vec<usize>> {
    let mut index: BTreeMap<NodeId, Vec<usize>> = BTreeMap::new();
    for (position, edge) in edges.iter().enumerate() {
        index.entry(edge.from_id.clone()).or_default().push(position);
    }
    index
}

/// Map each target id to the first edge (input order) pointing at it.
fn build_parent_index(edges: &[Edge]) -> BTreeMap<NodeId, usize> {
    let mut index = BTreeMap::new();
    for (position, edge) in edges.iter().enumerate() {
        index.entry(edge.to_id.clone()).or_insert(position);
    }
    index
}

fn build_edge_id_index(edges: &[Edge]) -> Result<BTreeMap<EdgeId, usize>, RegmapError> {
    let mut index = BTreeMap::new();
    for (position, edge) in edges.iter().enumerate() {
        if index.insert(edge.id.clone(), position).is_some() {
            return Err(RegmapError::DuplicateEdgeId(edge.id.clone()));
        }
    }
    Ok(index)
}

// =============================================================================
// LAYERED GRAPH
// =============================================================================

/// The read-only graph of one snapshot.
#[derive(Debug, Clone, Default)]
pub struct LayeredGraph {
    /// Nodes in layer order, input order within a layer.
    nodes: Vec<Node>,

    /// NodeId -> position in `nodes`
    node_index: BTreeMap<NodeId, usize>,

    /// Edges in input order.
    edges: Vec<Edge>,

    /// EdgeId -> position in `edges`
    edge_ids: BTreeMap<EdgeId, usize>,

    /// from_id -> positions in `edges`
    outgoing: BTreeMap<NodeId, Vec<usize>>,

    /// to_id -> position of the first edge targeting it
    parents: BTreeMap<NodeId, usize>,
}

impl LayeredGraph {
    /// Create an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from nodes of any kind and edges.
    ///
    /// Nodes are stably ordered by layer, which is the same as concatenating
    /// the four per-kind collections. Edges keep their input order.
    pub fn build(mut nodes: Vec<Node>, edges: Vec<Edge>) -> Result<Self, RegmapError> {
        nodes.sort_by_key(|n| n.kind().rank());

        let node_index = build_node_index(&nodes)?;
        let edge_ids = build_edge_id_index(&edges)?;
        let outgoing = build_edge_index(&edges);
        let parents = build_parent_index(&edges);

        Ok(Self {
            nodes,
            node_index,
            edges,
            edge_ids,
            outgoing,
            parents,
        })
    }

    /// Build a graph from the four per-kind collections.
    ///
    /// Every node must belong to the collection it is passed in.
    pub fn from_layers(
        frameworks: Vec<Node>,
        controls: Vec<Node>,
        articles: Vec<Node>,
        provisions: Vec<Node>,
        edges: Vec<Edge>,
    ) -> Result<Self, RegmapError> {
        let layers = [
            (NodeKind::Framework, frameworks),
            (NodeKind::Control, controls),
            (NodeKind::Article, articles),
            (NodeKind::Provision, provisions),
        ];

        let mut nodes = Vec::new();
        for (kind, layer) in layers {
            if let Some(stray) = layer.iter().find(|n| n.kind() != kind) {
                return Err(RegmapError::InvalidSnapshot(format!(
                    "Node '{}' is a {} but was listed with the {}s",
                    stray.id,
                    stray.kind(),
                    kind
                )));
            }
            nodes.extend(layer);
        }

        Self::build(nodes, edges)
    }

    /// Lookup a node by id.
    pub fn node<Q>(&self, id: &Q) -> Option<&Node>
    where
        NodeId: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.node_index.get(id).map(|&i| &self.nodes[i])
    }

    /// Check if the graph contains a node.
    pub fn contains_node<Q>(&self, id: &Q) -> bool
    where
        NodeId: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.node_index.contains_key(id)
    }

    /// All nodes in layer order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// Nodes of one kind, in input order.
    pub fn nodes_of_kind(&self, kind: NodeKind) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(move |n| n.kind() == kind)
    }

    /// The roots of the map (always shown).
    pub fn frameworks(&self) -> impl Iterator<Item = &Node> {
        self.nodes_of_kind(NodeKind::Framework)
    }

    /// All edges in input order.
    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Lookup an edge by id.
    #[must_use]
    pub fn edge(&self, id: &EdgeId) -> Option<&Edge> {
        self.edge_ids.get(id).map(|&i| &self.edges[i])
    }

    /// Outgoing edges of a node, in input order.
    pub fn outgoing<'a>(&'a self, id: &NodeId) -> impl Iterator<Item = &'a Edge> + use<'a> {
        self.outgoing
            .get(id)
            .into_iter()
            .flat_map(move |positions| positions.iter().map(move |&i| &self.edges[i]))
    }

    /// The first edge (input order) whose target is `id`.
    ///
    /// Its `from_id` is the node's parent for breadcrumb purposes.
    #[must_use]
    pub fn first_parent_edge(&self, id: &NodeId) -> Option<&Edge> {
        self.parents.get(id).map(|&i| &self.edges[i])
    }

    /// Edges with at least one endpoint that is not a known node.
    pub fn dangling_edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges
            .iter()
            .filter(|e| !self.contains_node(&e.from_id) || !self.contains_node(&e.to_id))
    }

    /// Ids of every node.
    pub fn node_ids(&self) -> impl Iterator<Item = &NodeId> {
        self.nodes.iter().map(|n| &n.id)
    }

    /// Get the total number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get the total number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Check if the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::Relation;

    fn small_graph() -> LayeredGraph {
        LayeredGraph::from_layers(
            vec![Node::framework("F1", "PDPL")],
            vec![Node::control("C1", "Consent"), Node::control("C2", "Retention")],
            vec![],
            vec![],
            vec![
                Edge::link("F1", "C1", Relation::BasedOn),
                Edge::link("F1", "C2", Relation::BasedOn),
            ],
        )
        .expect("build")
    }

    #[test]
    fn lookup_by_str_and_id() {
        let graph = small_graph();
        assert_eq!(graph.node("F1").map(|n| n.name.as_str()), Some("PDPL"));
        assert!(graph.contains_node(&NodeId::from("C2")));
        assert!(graph.node("missing").is_none());
    }

    #[test]
    fn outgoing_preserves_input_order() {
        let graph = small_graph();
        let targets: Vec<_> = graph
            .outgoing(&NodeId::from("F1"))
            .map(|e| e.to_id.as_str())
            .collect();
        assert_eq!(targets, vec!["C1", "C2"]);
        assert_eq!(graph.outgoing(&NodeId::from("C1")).count(), 0);
    }

    #[test]
    fn duplicate_id_across_kinds_rejected() {
        let result = LayeredGraph::from_layers(
            vec![Node::framework("X", "Framework X")],
            vec![],
            vec![Node::article("X", "Article X")],
            vec![],
            vec![],
        );

        match result {
            Err(RegmapError::DuplicateNodeId { id, first, second }) => {
                assert_eq!(id.as_str(), "X");
                assert_eq!(first, NodeKind::Framework);
                assert_eq!(second, NodeKind::Article);
            }
            other => panic!("expected duplicate id error, got {other:?}"),
        }
    }

    #[test]
    fn duplicate_edge_id_rejected() {
        let result = LayeredGraph::build(
            vec![Node::framework("F", "F"), Node::control("C", "C")],
            vec![
                Edge::new("e1", "F", "C", Relation::BasedOn),
                Edge::new("e1", "F", "C", Relation::Restricts),
            ],
        );
        assert!(matches!(result, Err(RegmapError::DuplicateEdgeId(_))));
    }

    #[test]
    fn misplaced_node_rejected() {
        let result = LayeredGraph::from_layers(
            vec![Node::control("C1", "Consent")],
            vec![],
            vec![],
            vec![],
            vec![],
        );
        assert!(matches!(result, Err(RegmapError::InvalidSnapshot(_))));
    }

    #[test]
    fn build_orders_nodes_by_layer() {
        let graph = LayeredGraph::build(
            vec![
                Node::provision("P", "P"),
                Node::framework("F2", "F2"),
                Node::control("C", "C"),
                Node::framework("F1", "F1"),
            ],
            vec![],
        )
        .expect("build");

        let ids: Vec<_> = graph.node_ids().map(NodeId::as_str).collect();
        assert_eq!(ids, vec!["F2", "F1", "C", "P"]);
        let roots: Vec<_> = graph.frameworks().map(|n| n.id.as_str()).collect();
        assert_eq!(roots, vec!["F2", "F1"]);
    }

    #[test]
    fn first_parent_edge_uses_input_order() {
        let graph = LayeredGraph::build(
            vec![
                Node::framework("F1", "F1"),
                Node::framework("F2", "F2"),
                Node::control("C", "C"),
            ],
            vec![
                Edge::link("F2", "C", Relation::RefersTo),
                Edge::link("F1", "C", Relation::BasedOn),
            ],
        )
        .expect("build");

        let parent = graph.first_parent_edge(&NodeId::from("C")).map(|e| e.from_id.as_str());
        assert_eq!(parent, Some("F2"));
        assert!(graph.first_parent_edge(&NodeId::from("F1")).is_none());
    }

    #[test]
    fn dangling_edges_are_kept_but_reported() {
        let graph = LayeredGraph::build(
            vec![Node::framework("F", "F")],
            vec![Edge::link("F", "ghost", Relation::BasedOn)],
        )
        .expect("build");

        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.dangling_edges().count(), 1);
        assert!(graph.edge(&EdgeId::from("F->ghost")).is_some());
    }

    #[test]
    fn build_edge_index_groups_by_source() {
        let edges = vec![
            Edge::link("A", "B", Relation::BasedOn),
            Edge::link("C", "D", Relation::BasedOn),
            Edge::link("A", "E", Relation::BasedOn),
        ];
        let index = build_edge_index(&edges);
        assert_eq!(index.get("A"), Some(&vec![0, 2]));
        assert_eq!(index.get("C"), Some(&vec![1]));
    }

    #[test]
    fn empty_graph() {
        let graph = LayeredGraph::new();
        assert!(graph.is_empty());
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.frameworks().count(), 0);
    }
}
