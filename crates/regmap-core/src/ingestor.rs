//! # Ingestor Module
//!
//! Snapshot validation and loading.
//!
//! - Validate a snapshot before any index is built
//! - Reject malformed or oversized input
//! - No enrichment: records are loaded as delivered
//!
//! Dangling edges are NOT rejected here. They are kept in the store and
//! filtered out of every derived view.

use crate::formats::{GraphSnapshot, NodeRecord};
use crate::graph::LayeredGraph;
use crate::primitives::{MAX_EDGES, MAX_ID_LENGTH, MAX_NAME_LENGTH, MAX_NODES, MAX_TEXT_LENGTH};
use crate::{LayerDetail, Node, NodeDetail, RegmapError};

/// Validates snapshots and turns them into graphs.
pub struct Ingestor;

impl Ingestor {
    /// Validate a snapshot.
    ///
    /// A snapshot is valid if:
    /// - Node and edge counts are within limits
    /// - Every id and name is non-empty and within length limits
    /// - Free-text fields are within `MAX_TEXT_LENGTH`
    /// - No record carries a `kind` that contradicts its collection
    ///
    /// Duplicate ids are detected when the graph indices are built.
    pub fn validate_snapshot(snapshot: &GraphSnapshot) -> Result<(), RegmapError> {
        if snapshot.node_count() > MAX_NODES {
            return Err(invalid(format!(
                "{} nodes exceeds maximum of {MAX_NODES}",
                snapshot.node_count()
            )));
        }
        if snapshot.edges.len() > MAX_EDGES {
            return Err(invalid(format!(
                "{} edges exceeds maximum of {MAX_EDGES}",
                snapshot.edges.len()
            )));
        }

        snapshot.frameworks.iter().try_for_each(Self::validate_record)?;
        snapshot.controls.iter().try_for_each(Self::validate_record)?;
        snapshot.articles.iter().try_for_each(Self::validate_record)?;
        snapshot.provisions.iter().try_for_each(Self::validate_record)?;

        for edge in &snapshot.edges {
            check_id("edge id", edge.id.as_str())?;
            check_id("edge fromId", edge.from_id.as_str())?;
            check_id("edge toId", edge.to_id.as_str())?;
        }

        Ok(())
    }

    /// Validate a snapshot and build its graph.
    pub fn load(snapshot: GraphSnapshot) -> Result<LayeredGraph, RegmapError> {
        Self::validate_snapshot(&snapshot)?;
        let (nodes, edges) = snapshot.into_parts();
        LayeredGraph::build(nodes, edges)
    }

    fn validate_record<D: LayerDetail + Clone>(record: &NodeRecord<D>) -> Result<(), RegmapError> {
        check_id("node id", record.id.as_str())?;

        if let Some(kind) = record.kind_mismatch() {
            return Err(invalid(format!(
                "Node '{}' declares kind {kind} but is listed with the {}s",
                record.id,
                D::KIND
            )));
        }

        if record.name.is_empty() {
            return Err(invalid(format!("Node '{}' has an empty name", record.id)));
        }
        if record.name.len() > MAX_NAME_LENGTH {
            return Err(invalid(format!(
                "Node '{}' name exceeds {MAX_NAME_LENGTH} bytes",
                record.id
            )));
        }

        let node = record.clone().into_node();
        if let Some(field) = oversized_text(&node) {
            return Err(invalid(format!(
                "Node '{}' field {field} exceeds {MAX_TEXT_LENGTH} bytes",
                record.id
            )));
        }

        Ok(())
    }
}

fn invalid(message: String) -> RegmapError {
    RegmapError::InvalidSnapshot(message)
}

fn check_id(what: &str, id: &str) -> Result<(), RegmapError> {
    if id.is_empty() {
        return Err(invalid(format!("Empty {what}")));
    }
    if id.len() > MAX_ID_LENGTH {
        return Err(invalid(format!("{what} exceeds {MAX_ID_LENGTH} bytes")));
    }
    Ok(())
}

/// Name of the first free-text field over the limit.
fn oversized_text(node: &Node) -> Option<&'static str> {
    let too_long = |value: &Option<String>| value.as_ref().is_some_and(|v| v.len() > MAX_TEXT_LENGTH);

    if too_long(&node.description) {
        return Some("description");
    }
    match &node.detail {
        NodeDetail::Framework(d) => too_long(&d.external_url).then_some("externalUrl"),
        NodeDetail::Control(d) => too_long(&d.implementation_guidance).then_some("implementationGuidance"),
        NodeDetail::Article(d) => too_long(&d.legal_text)
            .then_some("legalText")
            .or_else(|| d.references.iter().any(|r| r.len() > MAX_TEXT_LENGTH).then_some("references")),
        NodeDetail::Provision(d) => too_long(&d.summary).then_some("summary"),
    }
}

// =============================================================================
// TESTS
// =============================================================================
