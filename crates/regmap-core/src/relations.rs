//! # Relations
//!
//! Every edge touching one node, resolved against the graph. Backs the
//! detail panel of a selected node.

use crate::graph::LayeredGraph;
use crate::{Edge, Node, NodeId, RegmapError};
use serde::{Deserialize, Serialize};

/// Which end of the edge the inspected node sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// The node is the edge's `from_id`.
    Outgoing,
    /// The node is the edge's `to_id`.
    Incoming,
}

/// One resolved relation of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Relationship<'g> {
    pub edge: &'g Edge,
    pub direction: Direction,
    /// The node on the other end.
    pub other: &'g Node,
}

/// List the relations of a node in edge input order.
///
/// Edges whose other endpoint is unknown are skipped. A self-loop is
/// reported once, as outgoing.
///
/// # Errors
///
/// `NodeNotFound` if `id` is not in the graph.
pub fn relations<'g>(graph: &'g LayeredGraph, id: &NodeId) -> Result<Vec<Relationship<'g>>, RegmapError> {
    if !graph.contains_node(id) {
        return Err(RegmapError::NodeNotFound(id.clone()));
    }

    let list = graph
        .edges()
        .iter()
        .filter_map(|edge| {
            let (direction, other_id) = if &edge.from_id == id {
                (Direction::Outgoing, &edge.to_id)
            } else if &edge.to_id == id {
                (Direction::Incoming, &edge.from_id)
            } else {
                return None;
            };
            graph.node(other_id).map(|other| Relationship {
                edge,
                direction,
                other,
            })
        })
        .collect();

    Ok(list)
}
