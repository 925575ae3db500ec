//! # Snapshot Format
//!
//! The document the upstream API delivers: four node collections and one
//! edge collection, camelCase JSON as served by the compliance platform.
//!
//! The `kind` of a node is implied by the collection it arrives in. An
//! explicit `kind` field is accepted and checked by the Ingestor.
//!
//! ## Security
//!
//! The payload size is checked against `MAX_SNAPSHOT_BYTES` BEFORE parsing.

use crate::primitives::MAX_SNAPSHOT_BYTES;
use crate::{
    ArticleDetail, ControlDetail, Edge, FrameworkDetail, LayerDetail, Node, NodeId, NodeKind,
    ProvisionDetail, RegmapError,
};
use serde::{Deserialize, Serialize};

// =============================================================================
// RECORDS
// =============================================================================

/// One node as it appears inside its collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRecord<D> {
    pub id: NodeId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<NodeKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regulator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,
    #[serde(flatten)]
    pub detail: D,
}

impl<D: LayerDetail> NodeRecord<D> {
    /// A record with only the required fields set.
    #[must_use]
    pub fn new(id: &str, name: &str, detail: D) -> Self {
        Self {
            id: NodeId::new(id),
            name: name.to_string(),
            kind: None,
            description: None,
            version: None,
            regulator: None,
            sector: None,
            detail,
        }
    }

    /// Rebuild a record from a node's common fields and its detail.
    #[must_use]
    pub fn from_parts(node: &Node, detail: D) -> Self {
        Self {
            id: node.id.clone(),
            name: node.name.clone(),
            kind: Some(D::KIND),
            description: node.description.clone(),
            version: node.version.clone(),
            regulator: node.regulator.clone(),
            sector: node.sector.clone(),
            detail,
        }
    }

    /// Whether an explicit `kind` field contradicts the collection.
    #[must_use]
    pub fn kind_mismatch(&self) -> Option<NodeKind> {
        self.kind.filter(|k| *k != D::KIND)
    }

    /// Convert into an engine node.
    #[must_use]
    pub fn into_node(self) -> Node {
        Node {
            id: self.id,
            name: self.name,
            description: self.description,
            version: self.version,
            regulator: self.regulator,
            sector: self.sector,
            detail: self.detail.into_detail(),
        }
    }
}

pub type FrameworkRecord = NodeRecord<FrameworkDetail>;
pub type ControlRecord = NodeRecord<ControlDetail>;
pub type ArticleRecord = NodeRecord<ArticleDetail>;
pub type ProvisionRecord = NodeRecord<ProvisionDetail>;

// =============================================================================
// SNAPSHOT
// =============================================================================

/// The full graph as delivered by the upstream query layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    #[serde(default)]
    pub frameworks: Vec<FrameworkRecord>,
    #[serde(default)]
    pub controls: Vec<ControlRecord>,
    #[serde(default)]
    pub articles: Vec<ArticleRecord>,
    #[serde(default)]
    pub provisions: Vec<ProvisionRecord>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl GraphSnapshot {
    /// Create an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of node records across all four collections.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.frameworks.len() + self.controls.len() + self.articles.len() + self.provisions.len()
    }

    /// Flatten the four collections into nodes, in layer order.
    #[must_use]
    pub fn into_parts(self) -> (Vec<Node>, Vec<Edge>) {
        let mut nodes = Vec::with_capacity(self.node_count());
        nodes.extend(self.frameworks.into_iter().map(NodeRecord::into_node));
        nodes.extend(self.controls.into_iter().map(NodeRecord::into_node));
        nodes.extend(self.articles.into_iter().map(NodeRecord::into_node));
        nodes.extend(self.provisions.into_iter().map(NodeRecord::into_node));
        (nodes, self.edges)
    }
}

// =============================================================================
// JSON CODEC
// =============================================================================

/// Parse a snapshot from JSON bytes.
pub fn snapshot_from_json(data: &[u8]) -> Result<GraphSnapshot, RegmapError> {
    if data.len() > MAX_SNAPSHOT_BYTES {
        return Err(RegmapError::DeserializationError(format!(
            "Snapshot size {} bytes exceeds maximum allowed {} bytes",
            data.len(),
            MAX_SNAPSHOT_BYTES
        )));
    }

    serde_json::from_slice(data).map_err(|e| RegmapError::DeserializationError(e.to_string()))
}

/// Serialize a snapshot to pretty-printed JSON bytes.
pub fn snapshot_to_json(snapshot: &GraphSnapshot) -> Result<Vec<u8>, RegmapError> {
    serde_json::to_vec_pretty(snapshot).map_err(|e| RegmapError::SerializationError(e.to_string()))
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{NodeDetail, Relation};

    const DOCUMENT: &str = r#"{
        "frameworks": [
            {"id": "fw-pdpl", "version": "1.0.0", "kind": "framework", "name": "PDPL",
             "regulator": "SDAIA", "effectiveDate": "2022-09-01", "tags": ["privacy"]}
        ],
        "controls": [
            {"id": "ctl-consent", "name": "Consent management", "priority": "high",
             "frameworkId": "fw-pdpl", "implementationGuidance": "Record consent."}
        ],
        "edges": [
            {"id": "fw-pdpl->ctl-consent", "fromId": "fw-pdpl", "toId": "ctl-consent",
             "relation": "يفسّر", "createdAt": "2024-01-01T00:00:00Z", "createdBy": "system"}
        ]
    }"#;

    #[test]
    fn parses_platform_document() {
        let snapshot = snapshot_from_json(DOCUMENT.as_bytes()).expect("parse");

        assert_eq!(snapshot.node_count(), 2);
        assert!(snapshot.articles.is_empty());
        assert_eq!(snapshot.frameworks[0].detail.effective_date.as_deref(), Some("2022-09-01"));
        assert_eq!(snapshot.edges[0].relation, Relation::Interprets);
    }

    #[test]
    fn into_parts_keeps_layer_order() {
        let snapshot = snapshot_from_json(DOCUMENT.as_bytes()).expect("parse");
        let (nodes, edges) = snapshot.into_parts();

        let kinds: Vec<_> = nodes.iter().map(Node::kind).collect();
        assert_eq!(kinds, vec![NodeKind::Framework, NodeKind::Control]);
        assert_eq!(edges.len(), 1);
        assert!(matches!(nodes[1].detail, NodeDetail::Control(_)));
    }

    #[test]
    fn kind_mismatch_detected() {
        let mut record = FrameworkRecord::new("x", "X", FrameworkDetail::default());
        assert_eq!(record.kind_mismatch(), None);

        record.kind = Some(NodeKind::Article);
        assert_eq!(record.kind_mismatch(), Some(NodeKind::Article));
    }

    #[test]
    fn rejects_unknown_relation() {
        let doc = r#"{"edges": [{"id": "e", "fromId": "a", "toId": "b", "relation": "supersedes"}]}"#;
        let result = snapshot_from_json(doc.as_bytes());
        assert!(matches!(result, Err(RegmapError::DeserializationError(_))));
    }

    #[test]
    fn rejects_garbage() {
        assert!(snapshot_from_json(b"not json").is_err());
    }

    #[test]
    fn empty_object_is_empty_snapshot() {
        let snapshot = snapshot_from_json(b"{}").expect("parse");
        assert_eq!(snapshot, GraphSnapshot::new());
    }

    #[test]
    fn json_output_is_reparseable() {
        let snapshot = snapshot_from_json(DOCUMENT.as_bytes()).expect("parse");
        let bytes = snapshot_to_json(&snapshot).expect("serialize");
        let again = snapshot_from_json(&bytes).expect("reparse");
        assert_eq!(snapshot, again);
    }
}
