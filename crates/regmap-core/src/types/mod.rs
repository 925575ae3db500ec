//! # Core Type Definitions
//!
//! This module contains all core types for the regmap layered graph:
//! - Identifiers (`NodeId`, `EdgeId`)
//! - Layer and relation enums (`NodeKind`, `Relation`, `Priority`)
//! - Nodes and their per-kind details (`Node`, `NodeDetail`)
//! - Edges (`Edge`)
//! - Error types (`RegmapError`)
//!
//! ## Determinism Guarantees
//!
//! All identifier and enum types implement `Ord` so they can key
//! `BTreeMap`/`BTreeSet` collections with a stable iteration order.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// =============================================================================
// IDENTIFIERS
// =============================================================================

/// Identifier of a node. One flat namespace across all four kinds.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
    /// Create a node id from any string-like value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Identifier of an edge.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(pub String);

impl EdgeId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EdgeId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for EdgeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

// =============================================================================
// NODE KIND (LAYER)
// =============================================================================

/// The four layers of the map.
///
/// The declaration order is the visual layer order and is fixed;
/// it is never derived from data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// Top-level regulatory document.
    Framework,
    /// Operational requirement derived from a framework.
    Control,
    /// Numbered legal clause.
    Article,
    /// Individual rule, ruling or paragraph.
    Provision,
}

impl NodeKind {
    /// All kinds in layer order.
    pub const LAYERS: [NodeKind; 4] = [
        NodeKind::Framework,
        NodeKind::Control,
        NodeKind::Article,
        NodeKind::Provision,
    ];

    /// Zero-based position of this kind in the layer order.
    #[must_use]
    pub const fn rank(self) -> usize {
        match self {
            Self::Framework => 0,
            Self::Control => 1,
            Self::Article => 2,
            Self::Provision => 3,
        }
    }

    /// Wire name of the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Framework => "framework",
            Self::Control => "control",
            Self::Article => "article",
            Self::Provision => "provision",
        }
    }

    /// Short display label shown on node cards.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Framework => "إطار",
            Self::Control => "ضابط",
            Self::Article => "مادة",
            Self::Provision => "حكم",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// RELATION
// =============================================================================

/// Typed relation carried by an edge.
///
/// The set is closed. Any other wire string is rejected at deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Relation {
    /// "based on"
    #[serde(rename = "يستند إلى")]
    BasedOn,
    /// "interprets"
    #[serde(rename = "يفسّر")]
    Interprets,
    /// "restricts"
    #[serde(rename = "يقيّد")]
    Restricts,
    /// "refers to"
    #[serde(rename = "يحيل إلى")]
    RefersTo,
}

impl Relation {
    /// All relations in declaration order.
    pub const ALL: [Relation; 4] = [
        Relation::BasedOn,
        Relation::Interprets,
        Relation::Restricts,
        Relation::RefersTo,
    ];

    /// Wire string (the label shown on the edge).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BasedOn => "يستند إلى",
            Self::Interprets => "يفسّر",
            Self::Restricts => "يقيّد",
            Self::RefersTo => "يحيل إلى",
        }
    }

    /// ASCII slug, handy for CLI flags and logs.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::BasedOn => "based-on",
            Self::Interprets => "interprets",
            Self::Restricts => "restricts",
            Self::RefersTo => "refers-to",
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Relation {
    type Err = RegmapError;

    /// Accepts either the wire string or the ASCII slug.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|r| r.as_str() == s || r.slug() == s)
            .ok_or_else(|| RegmapError::InvalidSnapshot(format!("Unknown relation: {s}")))
    }
}

// =============================================================================
// PRIORITY
// =============================================================================

/// Priority of a control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

// =============================================================================
// PER-KIND DETAILS
// =============================================================================

/// Fields specific to a framework.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameworkDetail {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jurisdiction: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_url: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

/// Fields specific to a control.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlDetail {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub implementation_guidance: Option<String>,
}

/// Fields specific to an article.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleDetail {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub article_no: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legal_text: Option<String>,
    /// Ordered references to other instruments.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<String>,
}

/// Fields specific to a provision.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisionDetail {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub citation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub court: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

/// Per-kind payload of a node, discriminated by `kind` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum NodeDetail {
    Framework(FrameworkDetail),
    Control(ControlDetail),
    Article(ArticleDetail),
    Provision(ProvisionDetail),
}

impl NodeDetail {
    /// The layer this payload belongs to.
    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        match self {
            Self::Framework(_) => NodeKind::Framework,
            Self::Control(_) => NodeKind::Control,
            Self::Article(_) => NodeKind::Article,
            Self::Provision(_) => NodeKind::Provision,
        }
    }
}

/// A per-kind detail struct that knows which layer it belongs to.
pub trait LayerDetail: Sized {
    /// The layer of nodes carrying this detail.
    const KIND: NodeKind;

    /// Wrap into the tagged union.
    fn into_detail(self) -> NodeDetail;
}

impl LayerDetail for FrameworkDetail {
    const KIND: NodeKind = NodeKind::Framework;

    fn into_detail(self) -> NodeDetail {
        NodeDetail::Framework(self)
    }
}

impl LayerDetail for ControlDetail {
    const KIND: NodeKind = NodeKind::Control;

    fn into_detail(self) -> NodeDetail {
        NodeDetail::Control(self)
    }
}

impl LayerDetail for ArticleDetail {
    const KIND: NodeKind = NodeKind::Article;

    fn into_detail(self) -> NodeDetail {
        NodeDetail::Article(self)
    }
}

impl LayerDetail for ProvisionDetail {
    const KIND: NodeKind = NodeKind::Provision;

    fn into_detail(self) -> NodeDetail {
        NodeDetail::Provision(self)
    }
}

// =============================================================================
// NODE
// =============================================================================

/// A node of the layered map.
///
/// Nodes are immutable once ingested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: NodeId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regulator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,
    #[serde(flatten)]
    pub detail: NodeDetail,
}

impl Node {
    /// Create a node with only the required fields set.
    #[must_use]
    pub fn new(id: impl Into<NodeId>, name: impl Into<String>, detail: NodeDetail) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            version: None,
            regulator: None,
            sector: None,
            detail,
        }
    }

    /// Shorthand for a framework with default details.
    #[must_use]
    pub fn framework(id: &str, name: &str) -> Self {
        Self::new(id, name, NodeDetail::Framework(FrameworkDetail::default()))
    }

    /// Shorthand for a control with default details.
    #[must_use]
    pub fn control(id: &str, name: &str) -> Self {
        Self::new(id, name, NodeDetail::Control(ControlDetail::default()))
    }

    /// Shorthand for an article with default details.
    #[must_use]
    pub fn article(id: &str, name: &str) -> Self {
        Self::new(id, name, NodeDetail::Article(ArticleDetail::default()))
    }

    /// Shorthand for a provision with default details.
    #[must_use]
    pub fn provision(id: &str, name: &str) -> Self {
        Self::new(id, name, NodeDetail::Provision(ProvisionDetail::default()))
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// The layer this node belongs to.
    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        self.detail.kind()
    }
}

// =============================================================================
// EDGE
// =============================================================================

/// A typed, directed relation between two nodes.
///
/// Visibility walks `from_id -> to_id`. The breadcrumb walk treats
/// `from_id` as the parent of `to_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub id: EdgeId,
    pub from_id: NodeId,
    pub to_id: NodeId,
    pub relation: Relation,
}

impl Edge {
    /// Create a new edge.
    #[must_use]
    pub fn new(
        id: impl Into<EdgeId>,
        from_id: impl Into<NodeId>,
        to_id: impl Into<NodeId>,
        relation: Relation,
    ) -> Self {
        Self {
            id: id.into(),
            from_id: from_id.into(),
            to_id: to_id.into(),
            relation,
        }
    }

    /// Edge with the conventional `from->to` id.
    #[must_use]
    pub fn link(from_id: &str, to_id: &str, relation: Relation) -> Self {
        Self::new(format!("{from_id}->{to_id}"), from_id, to_id, relation)
    }

    /// Whether this edge touches the given node on either end.
    #[must_use]
    pub fn touches(&self, id: &NodeId) -> bool {
        &self.from_id == id || &self.to_id == id
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the regmap engine.
///
/// - No silent failures for caller mistakes
/// - Use `Result<T, RegmapError>` for fallible operations
/// - The engine never panics; all errors are recoverable
#[derive(Debug, Error)]
pub enum RegmapError {
    /// The snapshot violates a structural rule or limit.
    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),

    /// Two nodes share an id (ids are one namespace across all kinds).
    #[error("Duplicate node id '{id}' (first seen as {first}, again as {second})")]
    DuplicateNodeId {
        id: NodeId,
        first: NodeKind,
        second: NodeKind,
    },

    /// Two edges share an id.
    #[error("Duplicate edge id: {0}")]
    DuplicateEdgeId(EdgeId),

    /// The requested node was not found in the graph.
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    /// A serialization error occurred.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// A deserialization error occurred.
    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(String),
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn layer_order_is_fixed() {
        let ranks: Vec<_> = NodeKind::LAYERS.iter().map(|k| k.rank()).collect();
        assert_eq!(ranks, vec![0, 1, 2, 3]);
        assert!(NodeKind::Framework < NodeKind::Provision);
    }

    #[test]
    fn relation_wire_strings() {
        let json = serde_json::to_string(&Relation::BasedOn).expect("serialize");
        assert_eq!(json, "\"يستند إلى\"");

        let parsed: Relation = serde_json::from_str("\"يحيل إلى\"").expect("deserialize");
        assert_eq!(parsed, Relation::RefersTo);
    }

    #[test]
    fn unknown_relation_rejected() {
        let parsed: Result<Relation, _> = serde_json::from_str("\"يلغي\"");
        assert!(parsed.is_err());
        assert!("يلغي".parse::<Relation>().is_err());
    }

    #[test]
    fn relation_parses_slug_and_wire() {
        assert_eq!("restricts".parse::<Relation>().ok(), Some(Relation::Restricts));
        assert_eq!("يفسّر".parse::<Relation>().ok(), Some(Relation::Interprets));
    }

    #[test]
    fn node_serializes_with_kind_tag() {
        let mut node = Node::control("ctl-consent", "إدارة الموافقات");
        if let NodeDetail::Control(detail) = &mut node.detail {
            detail.priority = Some(Priority::High);
        }

        let json = serde_json::to_value(&node).expect("serialize");
        assert_eq!(json["kind"], "control");
        assert_eq!(json["priority"], "high");
        assert_eq!(json["id"], "ctl-consent");

        let back: Node = serde_json::from_value(json).expect("deserialize");
        assert_eq!(back, node);
    }

    #[test]
    fn node_deserializes_camel_case_fields() {
        let json = r#"{
            "id": "art-1",
            "kind": "article",
            "name": "Lawfulness",
            "articleNo": "3",
            "legalText": "Processing must be lawful.",
            "references": ["PDPL 3", "IR ch. 2"]
        }"#;
        let node: Node = serde_json::from_str(json).expect("deserialize");
        assert_eq!(node.kind(), NodeKind::Article);
        match node.detail {
            NodeDetail::Article(a) => {
                assert_eq!(a.article_no.as_deref(), Some("3"));
                assert_eq!(a.references, vec!["PDPL 3", "IR ch. 2"]);
            }
            other => panic!("unexpected detail: {other:?}"),
        }
    }

    #[test]
    fn edge_link_builds_conventional_id() {
        let edge = Edge::link("fw-pdpl", "ctl-consent", Relation::Interprets);
        assert_eq!(edge.id.as_str(), "fw-pdpl->ctl-consent");
        assert!(edge.touches(&NodeId::from("fw-pdpl")));
        assert!(!edge.touches(&NodeId::from("other")));
    }
}
