//! # API Request/Response Types
//!
//! This module defines the JSON structures for the HTTP API.
//!
//! Relation colours live here, not in the core: they are a rendering
//! concern. The mapping is an exhaustive `match`, so a new relation variant
//! does not compile until it has a colour.

use regmap_core::{
    Breadcrumb, Direction, Edge, GraphMetrics, GraphSnapshot, LayeredGraph, Node, NodeId,
    NodeKind, Placement, Relation, Relationship,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// =============================================================================
// PRESENTATION MAPPINGS
// =============================================================================

/// Stroke colour of an edge carrying `relation`.
#[must_use]
pub const fn relation_color(relation: Relation) -> &'static str {
    match relation {
        Relation::BasedOn => "#3b82f6",
        Relation::Interprets => "#10b981",
        Relation::Restricts => "#f59e0b",
        Relation::RefersTo => "#8b5cf6",
    }
}

/// Hint shown under a node card.
#[must_use]
pub const fn expand_hint(expanded: bool) -> &'static str {
    if expanded {
        "انقر للطي"
    } else {
        "انقر للتوسّع"
    }
}

// =============================================================================
// HEALTH RESPONSE
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

// =============================================================================
// STATUS RESPONSE
// =============================================================================

/// Graph and session status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub node_count: usize,
    pub edge_count: usize,
    /// Keyed by kind wire name.
    pub nodes_by_kind: BTreeMap<String, usize>,
    /// Keyed by relation slug.
    pub edges_by_relation: BTreeMap<String, usize>,
    pub dangling_edges: usize,
    pub roots: usize,
    pub max_breadcrumb_depth: usize,
    pub cyclic_breadcrumbs: usize,
    pub checksum: u64,
    pub expanded_count: usize,
    pub selected: Option<String>,
}

impl StatusResponse {
    pub fn new(
        metrics: &GraphMetrics,
        checksum: u64,
        expanded_count: usize,
        selected: Option<&NodeId>,
    ) -> Self {
        Self {
            node_count: metrics.node_count,
            edge_count: metrics.edge_count,
            nodes_by_kind: metrics
                .nodes_by_kind
                .iter()
                .map(|(k, n)| (k.as_str().to_string(), *n))
                .collect(),
            edges_by_relation: metrics
                .edges_by_relation
                .iter()
                .map(|(r, n)| (r.slug().to_string(), *n))
                .collect(),
            dangling_edges: metrics.dangling_edge_count,
            roots: metrics.root_count,
            max_breadcrumb_depth: metrics.max_breadcrumb_depth,
            cyclic_breadcrumbs: metrics.cyclic_breadcrumb_count,
            checksum,
            expanded_count,
            selected: selected.map(|id| id.to_string()),
        }
    }
}

// =============================================================================
// VIEW RESPONSE
// =============================================================================

/// A positioned node card.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeJson {
    pub id: String,
    pub kind: NodeKind,
    /// Short kind label shown on the card.
    pub label: String,
    pub name: String,
    pub description: Option<String>,
    pub layer: usize,
    pub row: usize,
    pub x: i64,
    pub y: i64,
    pub expanded: bool,
    pub selected: bool,
    pub hint: String,
}

impl NodeJson {
    pub fn new(node: &Node, placement: &Placement, selected: bool) -> Self {
        Self {
            id: node.id.to_string(),
            kind: node.kind(),
            label: node.kind().label().to_string(),
            name: node.name.clone(),
            description: node.description.clone(),
            layer: placement.layer,
            row: placement.row,
            x: placement.position.x,
            y: placement.position.y,
            expanded: placement.expanded,
            selected,
            hint: expand_hint(placement.expanded).to_string(),
        }
    }
}

/// A styled edge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeJson {
    pub id: String,
    pub from_id: String,
    pub to_id: String,
    /// Wire string, also used as the edge label.
    pub relation: Relation,
    pub relation_slug: String,
    pub color: String,
}

impl From<&Edge> for EdgeJson {
    fn from(edge: &Edge) -> Self {
        Self {
            id: edge.id.to_string(),
            from_id: edge.from_id.to_string(),
            to_id: edge.to_id.to_string(),
            relation: edge.relation,
            relation_slug: edge.relation.slug().to_string(),
            color: relation_color(edge.relation).to_string(),
        }
    }
}

/// One breadcrumb step, resolved to its node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrumbJson {
    pub id: String,
    pub kind: NodeKind,
    pub name: String,
}

/// Breadcrumb of the current selection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BreadcrumbJson {
    pub path: Vec<CrumbJson>,
    pub cycle_at: Option<String>,
}

impl BreadcrumbJson {
    pub fn new(graph: &LayeredGraph, crumb: &Breadcrumb) -> Self {
        Self {
            path: crumb
                .path
                .iter()
                .filter_map(|id| graph.node(id))
                .map(|node| CrumbJson {
                    id: node.id.to_string(),
                    kind: node.kind(),
                    name: node.name.clone(),
                })
                .collect(),
            cycle_at: crumb.cycle_at.as_ref().map(|id| id.to_string()),
        }
    }
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewResponse {
    pub nodes: Vec<NodeJson>,
    pub edges: Vec<EdgeJson>,
    pub selected: Option<String>,
    pub breadcrumb: BreadcrumbJson,
}

// =============================================================================
// NODE ACTION REQUEST/RESPONSES
// =============================================================================

/// Body of `POST /nodes/activate` and `POST /nodes/toggle`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeRequest {
    pub node_id: String,
}

/// Result of activating a node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivateResponse {
    pub success: bool,
    pub selected: Option<String>,
    pub breadcrumb: Option<BreadcrumbJson>,
    pub error: Option<String>,
}

impl ActivateResponse {
    pub fn success(selected: &NodeId, breadcrumb: BreadcrumbJson) -> Self {
        Self {
            success: true,
            selected: Some(selected.to_string()),
            breadcrumb: Some(breadcrumb),
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            selected: None,
            breadcrumb: None,
            error: Some(msg.into()),
        }
    }
}

/// Result of toggling a node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToggleResponse {
    pub success: bool,
    pub node_id: String,
    pub expanded: bool,
    pub error: Option<String>,
}

impl ToggleResponse {
    pub fn success(node_id: &NodeId, expanded: bool) -> Self {
        Self {
            success: true,
            node_id: node_id.to_string(),
            expanded,
            error: None,
        }
    }

    pub fn error(node_id: &NodeId, msg: impl Into<String>) -> Self {
        Self {
            success: false,
            node_id: node_id.to_string(),
            expanded: false,
            error: Some(msg.into()),
        }
    }
}

/// Result of a view-wide action (expand all, reset, clear selection).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewStateResponse {
    pub success: bool,
    pub expanded_count: usize,
    pub selected: Option<String>,
}

// =============================================================================
// RELATIONS RESPONSE
// =============================================================================

/// One relation of the inspected node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationJson {
    pub edge_id: String,
    pub direction: Direction,
    pub relation: Relation,
    pub color: String,
    pub other_id: String,
    pub other_kind: NodeKind,
    pub other_name: String,
}

impl From<&Relationship<'_>> for RelationJson {
    fn from(rel: &Relationship<'_>) -> Self {
        Self {
            edge_id: rel.edge.id.to_string(),
            direction: rel.direction,
            relation: rel.edge.relation,
            color: relation_color(rel.edge.relation).to_string(),
            other_id: rel.other.id.to_string(),
            other_kind: rel.other.kind(),
            other_name: rel.other.name.clone(),
        }
    }
}

/// Relations of one node, with the node itself for the detail panel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationsResponse {
    pub success: bool,
    pub node: Option<Node>,
    pub relations: Vec<RelationJson>,
    pub error: Option<String>,
}

impl RelationsResponse {
    pub fn success(node: Node, relations: Vec<RelationJson>) -> Self {
        Self {
            success: true,
            node: Some(node),
            relations,
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            node: None,
            relations: Vec::new(),
            error: Some(msg.into()),
        }
    }
}

// =============================================================================
// SNAPSHOT / EXPORT RESPONSES
// =============================================================================

/// Result of replacing the loaded snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotResponse {
    pub success: bool,
    pub node_count: usize,
    pub edge_count: usize,
    pub checksum: Option<u64>,
    pub error: Option<String>,
}

impl SnapshotResponse {
    pub fn success(node_count: usize, edge_count: usize, checksum: u64) -> Self {
        Self {
            success: true,
            node_count,
            edge_count,
            checksum: Some(checksum),
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            node_count: 0,
            edge_count: 0,
            checksum: None,
            error: Some(msg.into()),
        }
    }
}

/// The loaded snapshot with its fingerprints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportResponse {
    pub success: bool,
    pub checksum: u64,
    /// BLAKE3 hex digest of the canonical export.
    pub hash: String,
    pub snapshot: GraphSnapshot,
}
