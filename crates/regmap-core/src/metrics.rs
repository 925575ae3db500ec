//! # Graph Metrics
//!
//! Informational counts over a loaded graph. Nothing is gated on them.

use crate::breadcrumb::breadcrumb;
use crate::graph::LayeredGraph;
use crate::{NodeKind, Relation};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Summary numbers for a graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphMetrics {
    /// Total number of nodes.
    pub node_count: usize,
    /// Total number of edges, dangling ones included.
    pub edge_count: usize,
    /// Node count per kind, every kind present (zero if empty).
    pub nodes_by_kind: BTreeMap<NodeKind, usize>,
    /// Edge count per relation, every relation present.
    pub edges_by_relation: BTreeMap<Relation, usize>,
    /// Edges with an unknown endpoint.
    pub dangling_edge_count: usize,
    /// Number of frameworks (always-visible roots).
    pub root_count: usize,
    /// Longest breadcrumb over all nodes.
    pub max_breadcrumb_depth: usize,
    /// Nodes whose breadcrumb walk ran into a cycle.
    pub cyclic_breadcrumb_count: usize,
}

impl GraphMetrics {
    /// Create new metrics with all zeros.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Compute metrics from a graph.
    #[must_use]
    pub fn from_graph(graph: &LayeredGraph) -> Self {
        let mut nodes_by_kind: BTreeMap<NodeKind, usize> =
            NodeKind::LAYERS.into_iter().map(|k| (k, 0)).collect();
        for node in graph.nodes() {
            *nodes_by_kind.entry(node.kind()).or_default() += 1;
        }

        let mut edges_by_relation: BTreeMap<Relation, usize> =
            Relation::ALL.into_iter().map(|r| (r, 0)).collect();
        for edge in graph.edges() {
            *edges_by_relation.entry(edge.relation).or_default() += 1;
        }

        let mut max_breadcrumb_depth = 0;
        let mut cyclic_breadcrumb_count = 0;
        for id in graph.node_ids() {
            if let Ok(crumb) = breadcrumb(graph, id) {
                max_breadcrumb_depth = max_breadcrumb_depth.max(crumb.depth());
                if crumb.has_cycle() {
                    cyclic_breadcrumb_count += 1;
                }
            }
        }

        Self {
            node_count: graph.node_count(),
            edge_count: graph.edge_count(),
            root_count: nodes_by_kind.get(&NodeKind::Framework).copied().unwrap_or(0),
            nodes_by_kind,
            edges_by_relation,
            dangling_edge_count: graph.dangling_edges().count(),
            max_breadcrumb_depth,
            cyclic_breadcrumb_count,
        }
    }

    /// Count for one kind.
    #[must_use]
    pub fn count_of(&self, kind: NodeKind) -> usize {
        self.nodes_by_kind.get(&kind).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingestor::Ingestor;
    use crate::{Edge, Node, sample};

    #[test]
    fn empty_graph_all_zero() {
        let metrics = GraphMetrics::from_graph(&LayeredGraph::new());
        assert_eq!(metrics.node_count, 0);
        assert_eq!(metrics.count_of(NodeKind::Article), 0);
        assert_eq!(metrics.edges_by_relation.len(), 4);
        assert_eq!(metrics.max_breadcrumb_depth, 0);
    }

    #[test]
    fn counts_sample_dataset() {
        let graph = Ingestor::load(sample::sample_snapshot()).expect("load");
        let metrics = GraphMetrics::from_graph(&graph);

        assert_eq!(metrics.root_count, 2);
        assert_eq!(metrics.count_of(NodeKind::Control), 3);
        assert_eq!(metrics.count_of(NodeKind::Article), 5);
        assert_eq!(metrics.count_of(NodeKind::Provision), 2);
        assert_eq!(metrics.dangling_edge_count, 0);
        assert_eq!(metrics.max_breadcrumb_depth, 4);
    }

    #[test]
    fn reports_dangling_and_cycles() {
        let graph = LayeredGraph::build(
            vec![Node::control("A", "A"), Node::control("B", "B")],
            vec![
                Edge::link("A", "B", Relation::RefersTo),
                Edge::link("B", "A", Relation::RefersTo),
                Edge::link("B", "ghost", Relation::Restricts),
            ],
        )
        .expect("build");
        let metrics = GraphMetrics::from_graph(&graph);

        assert_eq!(metrics.dangling_edge_count, 1);
        assert_eq!(metrics.cyclic_breadcrumb_count, 2);
        assert_eq!(metrics.edges_by_relation.get(&Relation::RefersTo), Some(&2));
        assert_eq!(metrics.root_count, 0);
    }
}
