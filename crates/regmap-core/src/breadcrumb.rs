//! # Breadcrumb
//!
//! Reconstructs the path from a root to a node by walking parent edges.
//!
//! The parent of a node is the `from_id` of the FIRST edge (input order)
//! whose `to_id` is that node. The walk stops when there is no such edge,
//! when the parent is not a known node, or when the parent was already
//! visited. A revisit is reported through [`Breadcrumb::cycle_at`].

use crate::graph::LayeredGraph;
use crate::{NodeId, RegmapError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Ordered path from the furthest ancestor to the selected node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breadcrumb {
    pub path: Vec<NodeId>,
    /// The node at which the parent walk looped back on itself.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cycle_at: Option<NodeId>,
}

impl Breadcrumb {
    /// The selected node (last element).
    #[must_use]
    pub fn target(&self) -> Option<&NodeId> {
        self.path.last()
    }

    /// The furthest ancestor reached (first element).
    #[must_use]
    pub fn root(&self) -> Option<&NodeId> {
        self.path.first()
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.path.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    #[must_use]
    pub fn has_cycle(&self) -> bool {
        self.cycle_at.is_some()
    }
}

/// Build the breadcrumb of a node.
///
/// # Errors
///
/// `NodeNotFound` if `id` is not in the graph.
pub fn breadcrumb(graph: &LayeredGraph, id: &NodeId) -> Result<Breadcrumb, RegmapError> {
    if !graph.contains_node(id) {
        return Err(RegmapError::NodeNotFound(id.clone()));
    }

    let mut path = vec![id.clone()];
    let mut visited: BTreeSet<&NodeId> = BTreeSet::from([id]);
    let mut cycle_at = None;
    let mut current = id;

    while let Some(edge) = graph.first_parent_edge(current) {
        let parent = &edge.from_id;
        if !graph.contains_node(parent) {
            break;
        }
        if !visited.insert(parent) {
            cycle_at = Some(parent.clone());
            break;
        }
        path.push(parent.clone());
        current = parent;
    }

    path.reverse();
    Ok(Breadcrumb { path, cycle_at })
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Edge, Node, Relation};

    fn names(crumb: &Breadcrumb) -> Vec<&str> {
        crumb.path.iter().map(NodeId::as_str).collect()
    }

    #[test]
    fn framework_is_its_own_breadcrumb() {
        let graph = LayeredGraph::build(vec![Node::framework("F1", "PDPL")], vec![]).expect("build");
        let crumb = breadcrumb(&graph, &NodeId::from("F1")).expect("crumb");
        assert_eq!(names(&crumb), vec!["F1"]);
        assert!(!crumb.has_cycle());
    }

    #[test]
    fn walks_up_to_root() {
        let graph = LayeredGraph::build(
            vec![
                Node::framework("F", "F"),
                Node::control("A", "A"),
                Node::article("B", "B"),
                Node::provision("N", "N"),
            ],
            vec![
                Edge::link("F", "A", Relation::BasedOn),
                Edge::link("A", "B", Relation::BasedOn),
                Edge::link("B", "N", Relation::Interprets),
            ],
        )
        .expect("build");

        let crumb = breadcrumb(&graph, &NodeId::from("N")).expect("crumb");
        assert_eq!(names(&crumb), vec!["F", "A", "B", "N"]);
        assert_eq!(crumb.root().map(NodeId::as_str), Some("F"));
        assert_eq!(crumb.target().map(NodeId::as_str), Some("N"));
        assert_eq!(crumb.depth(), 4);
    }

    #[test]
    fn unknown_node_is_an_error() {
        let graph = LayeredGraph::new();
        let result = breadcrumb(&graph, &NodeId::from("nope"));
        assert!(matches!(result, Err(RegmapError::NodeNotFound(_))));
    }

    #[test]
    fn unknown_parent_stops_walk() {
        let graph = LayeredGraph::build(
            vec![Node::control("C", "C")],
            vec![Edge::link("ghost", "C", Relation::BasedOn)],
        )
        .expect("build");

        let crumb = breadcrumb(&graph, &NodeId::from("C")).expect("crumb");
        assert_eq!(names(&crumb), vec!["C"]);
    }

    #[test]
    fn first_parent_edge_wins() {
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

        let crumb = breadcrumb(&graph, &NodeId::from("C")).expect("crumb");
        assert_eq!(names(&crumb), vec!["F2", "C"]);
    }

    #[test]
    fn two_cycle_terminates_and_reports() {
        let graph = LayeredGraph::build(
            vec![Node::control("N1", "N1"), Node::control("N2", "N2")],
            vec![
                Edge::link("N1", "N2", Relation::RefersTo),
                Edge::link("N2", "N1", Relation::RefersTo),
            ],
        )
        .expect("build");

        let crumb = breadcrumb(&graph, &NodeId::from("N1")).expect("crumb");
        assert_eq!(names(&crumb), vec!["N2", "N1"]);
        assert_eq!(crumb.cycle_at.as_ref().map(NodeId::as_str), Some("N1"));
    }

    #[test]
    fn self_loop_terminates() {
        let graph = LayeredGraph::build(
            vec![Node::article("A", "A")],
            vec![Edge::link("A", "A", Relation::RefersTo)],
        )
        .expect("build");

        let crumb = breadcrumb(&graph, &NodeId::from("A")).expect("crumb");
        assert_eq!(names(&crumb), vec!["A"]);
        assert!(crumb.has_cycle());
    }
}
