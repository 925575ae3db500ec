//! # Layout Assigner
//!
//! Maps the visible node set to integer grid coordinates.
//!
//! Visible nodes are bucketed by kind (bucket order follows the visible
//! order). Each bucket becomes one column; nodes in a column are stacked
//! top to bottom. The result is a pure function of the visible graph, the
//! expanded set and the configuration; nothing is persisted between calls.

use crate::primitives::{LAYER_SPACING, NODE_SPACING};
use crate::visibility::VisibleGraph;
use crate::{NodeId, NodeKind};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

// =============================================================================
// CONFIGURATION
// =============================================================================

/// How layer columns are assigned to kinds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerSlots {
    /// Non-empty layers take consecutive columns; empty layers take none.
    #[default]
    Compact,
    /// Every kind keeps its own column; empty layers leave a gap.
    Fixed,
}

/// Spacing and slot policy for the layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub layer_spacing: i64,
    pub node_spacing: i64,
    pub slots: LayerSlots,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            layer_spacing: LAYER_SPACING,
            node_spacing: NODE_SPACING,
            slots: LayerSlots::Compact,
        }
    }
}

impl LayoutConfig {
    /// Same spacings, fixed layer slots.
    #[must_use]
    pub fn fixed(self) -> Self {
        Self {
            slots: LayerSlots::Fixed,
            ..self
        }
    }
}

// =============================================================================
// OUTPUT
// =============================================================================

/// Grid coordinates of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub x: i64,
    pub y: i64,
}

/// One positioned node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub node_id: NodeId,
    pub kind: NodeKind,
    /// Column index.
    pub layer: usize,
    /// Row index within the column.
    pub row: usize,
    pub position: Position,
    /// Whether the node is in the expanded set (renderers show a collapse hint).
    pub expanded: bool,
}

/// Positions of all visible nodes, in layer order then row order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    pub placements: Vec<Placement>,
}

impl Layout {
    /// Position of a visible node.
    #[must_use]
    pub fn position(&self, id: &NodeId) -> Option<Position> {
        self.placement(id).map(|p| p.position)
    }

    /// Full placement of a visible node.
    #[must_use]
    pub fn placement(&self, id: &NodeId) -> Option<&Placement> {
        self.placements.iter().find(|p| &p.node_id == id)
    }

    /// Number of columns in use.
    #[must_use]
    pub fn layer_count(&self) -> usize {
        self.placements
            .iter()
            .map(|p| p.layer)
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// Number of positioned nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.placements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }
}

// =============================================================================
// ASSIGNMENT
// =============================================================================

/// Assign a grid position to every visible node.
#[must_use]
pub fn assign_layout(
    visible: &VisibleGraph<'_>,
    expanded: &BTreeSet<NodeId>,
    config: &LayoutConfig,
) -> Layout {
    let mut buckets: BTreeMap<NodeKind, Vec<&NodeId>> = BTreeMap::new();
    for node in visible.nodes() {
        buckets.entry(node.kind()).or_default().push(&node.id);
    }

    let mut placements = Vec::with_capacity(visible.node_count());
    let mut next_slot = 0usize;

    // BTreeMap iterates kinds in layer order.
    for (kind, ids) in buckets {
        let layer = match config.slots {
            LayerSlots::Compact => next_slot,
            LayerSlots::Fixed => kind.rank(),
        };
        next_slot += 1;

        for (row, id) in ids.into_iter().enumerate() {
            placements.push(Placement {
                node_id: id.clone(),
                kind,
                layer,
                row,
                position: Position {
                    x: coordinate(layer, config.layer_spacing),
                    y: coordinate(row, config.node_spacing),
                },
                expanded: expanded.contains(id),
            });
        }
    }

    Layout { placements }
}

/// `index * spacing`, saturating instead of overflowing.
fn coordinate(index: usize, spacing: i64) -> i64 {
    i64::try_from(index)
        .unwrap_or(i64::MAX)
        .saturating_mul(spacing)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::LayeredGraph;
    use crate::visibility::compute_visible;
    use crate::{Edge, Node, Relation};

    fn ids(list: &[&str]) -> BTreeSet<NodeId> {
        list.iter().map(|s| NodeId::from(*s)).collect()
    }

    fn graph() -> LayeredGraph {
        LayeredGraph::build(
            vec![
                Node::framework("F1", "PDPL"),
                Node::control("C1", "Consent"),
                Node::control("C2", "Retention"),
                Node::provision("P1", "Ruling"),
            ],
            vec![
                Edge::link("F1", "C1", Relation::BasedOn),
                Edge::link("F1", "C2", Relation::BasedOn),
                Edge::link("F1", "P1", Relation::RefersTo),
            ],
        )
        .expect("build")
    }

    #[test]
    fn frameworks_at_layer_zero_controls_stacked() {
        let graph = graph();
        let expanded = ids(&["F1"]);
        let visible = compute_visible(&graph, &expanded);
        let layout = assign_layout(&visible, &expanded, &LayoutConfig::default());

        assert_eq!(layout.position(&NodeId::from("F1")), Some(Position { x: 0, y: 0 }));
        assert_eq!(layout.position(&NodeId::from("C1")), Some(Position { x: 350, y: 0 }));
        assert_eq!(layout.position(&NodeId::from("C2")), Some(Position { x: 350, y: 150 }));
    }

    #[test]
    fn compact_slots_skip_empty_layers() {
        let graph = graph();
        let expanded = ids(&["F1"]);
        let visible = compute_visible(&graph, &expanded);
        let layout = assign_layout(&visible, &expanded, &LayoutConfig::default());

        // No article is visible, so the provision takes column 2.
        let p1 = layout.placement(&NodeId::from("P1")).expect("placed");
        assert_eq!(p1.layer, 2);
        assert_eq!(p1.position.x, 700);
        assert_eq!(layout.layer_count(), 3);
    }

    #[test]
    fn fixed_slots_keep_gaps() {
        let graph = graph();
        let expanded = ids(&["F1"]);
        let visible = compute_visible(&graph, &expanded);
        let layout = assign_layout(&visible, &expanded, &LayoutConfig::default().fixed());

        let p1 = layout.placement(&NodeId::from("P1")).expect("placed");
        assert_eq!(p1.layer, 3);
        assert_eq!(p1.position.x, 1050);
    }

    #[test]
    fn expanded_flag_follows_set() {
        let graph = graph();
        let expanded = ids(&["F1"]);
        let visible = compute_visible(&graph, &expanded);
        let layout = assign_layout(&visible, &expanded, &LayoutConfig::default());

        assert!(layout.placement(&NodeId::from("F1")).is_some_and(|p| p.expanded));
        assert!(layout.placement(&NodeId::from("C1")).is_some_and(|p| !p.expanded));
    }

    #[test]
    fn custom_spacing() {
        let graph = graph();
        let expanded = ids(&["F1"]);
        let visible = compute_visible(&graph, &expanded);
        let config = LayoutConfig {
            layer_spacing: 10,
            node_spacing: 3,
            slots: LayerSlots::Compact,
        };
        let layout = assign_layout(&visible, &expanded, &config);
        assert_eq!(layout.position(&NodeId::from("C2")), Some(Position { x: 10, y: 3 }));
    }

    #[test]
    fn hidden_node_has_no_position() {
        let graph = graph();
        let visible = compute_visible(&graph, &BTreeSet::new());
        let layout = assign_layout(&visible, &BTreeSet::new(), &LayoutConfig::default());

        assert_eq!(layout.len(), 1);
        assert!(layout.position(&NodeId::from("C1")).is_none());
    }

    #[test]
    fn empty_graph_empty_layout() {
        let graph = LayeredGraph::new();
        let visible = compute_visible(&graph, &BTreeSet::new());
        let layout = assign_layout(&visible, &BTreeSet::new(), &LayoutConfig::default());
        assert!(layout.is_empty());
        assert_eq!(layout.layer_count(), 0);
    }

    #[test]
    fn slots_parse_lowercase() {
        let slots: LayerSlots = serde_json::from_str("\"fixed\"").expect("parse");
        assert_eq!(slots, LayerSlots::Fixed);
    }
}
