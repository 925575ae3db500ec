//! # Export Module
//!
//! Rebuilds snapshot documents from a loaded graph and fingerprints them.
//!
//! Two export shapes exist:
//! - [`export_snapshot`]: nodes grouped by kind in ingest order, edges in
//!   input order. Loading it again yields an identical graph.
//! - [`canonical_snapshot`]: every collection sorted by id. Two graphs with
//!   the same content produce byte-identical canonical JSON regardless of
//!   the order their snapshot listed things in.

use crate::formats::{GraphSnapshot, NodeRecord};
use crate::graph::LayeredGraph;
use crate::{Edge, Node, NodeDetail, RegmapError};

// =============================================================================
// SNAPSHOT EXPORT
// =============================================================================

/// Rebuild the snapshot document of a graph.
#[must_use]
pub fn export_snapshot(graph: &LayeredGraph) -> GraphSnapshot {
    let mut snapshot = GraphSnapshot::new();
    for node in graph.nodes() {
        push_record(&mut snapshot, node);
    }
    snapshot.edges = graph.edges().to_vec();
    snapshot
}

/// The snapshot with every collection sorted by id.
#[must_use]
pub fn canonical_snapshot(graph: &LayeredGraph) -> GraphSnapshot {
    let mut snapshot = export_snapshot(graph);
    snapshot.frameworks.sort_by(|a, b| a.id.cmp(&b.id));
    snapshot.controls.sort_by(|a, b| a.id.cmp(&b.id));
    snapshot.articles.sort_by(|a, b| a.id.cmp(&b.id));
    snapshot.provisions.sort_by(|a, b| a.id.cmp(&b.id));
    snapshot.edges.sort_by(|a, b| a.id.cmp(&b.id));
    snapshot
}

/// Compact JSON of the canonical snapshot.
pub fn export_canonical(graph: &LayeredGraph) -> Result<Vec<u8>, RegmapError> {
    serde_json::to_vec(&canonical_snapshot(graph))
        .map_err(|e| RegmapError::SerializationError(e.to_string()))
}

fn push_record(snapshot: &mut GraphSnapshot, node: &Node) {
    match &node.detail {
        NodeDetail::Framework(d) => snapshot.frameworks.push(NodeRecord::from_parts(node, d.clone())),
        NodeDetail::Control(d) => snapshot.controls.push(NodeRecord::from_parts(node, d.clone())),
        NodeDetail::Article(d) => snapshot.articles.push(NodeRecord::from_parts(node, d.clone())),
        NodeDetail::Provision(d) => snapshot.provisions.push(NodeRecord::from_parts(node, d.clone())),
    }
}

// =============================================================================
// CHECKSUMS
// =============================================================================

/// Fast, order-independent fingerprint of a graph.
///
/// All fields of one node or edge are folded into a single 64-bit value and
/// the per-record values are XORed together, so reordering a collection does
/// not change the result while equal field values on different records
/// cannot cancel out. Covers ids, names, kinds, endpoints and relations;
/// optional detail fields are not covered.
///
/// This is NOT a cryptographic hash. With the `crypto-hash` feature,
/// use [`canonical_crypto_hash`] for tamper detection.
#[must_use]
pub fn canonical_checksum(graph: &LayeredGraph) -> u64 {
    let mut hash: u64 = 0;

    for node in graph.nodes() {
        hash ^= node_fingerprint(node);
    }

    for edge in graph.edges() {
        hash ^= edge_fingerprint(edge);
    }

    hash ^= (graph.node_count() as u64).rotate_left(29);
    hash ^= (graph.edge_count() as u64).rotate_left(31);

    hash
}

fn node_fingerprint(node: &Node) -> u64 {
    fold_record(&["node", node.id.as_str(), &node.name, node.kind().as_str()])
}

fn edge_fingerprint(edge: &Edge) -> u64 {
    fold_record(&[
        "edge",
        edge.id.as_str(),
        edge.from_id.as_str(),
        edge.to_id.as_str(),
        edge.relation.slug(),
    ])
}

/// FNV-1a over the fields of one record.
///
/// Fields are separated by `0xFF`, which never occurs in UTF-8, so
/// `("ab", "c")` and `("a", "bc")` fold differently.
fn fold_record(fields: &[&str]) -> u64 {
    fields.iter().fold(0xcbf2_9ce4_8422_2325, |h, field| {
        field
            .bytes()
            .chain(std::iter::once(0xff))
            .fold(h, |h, b| (h ^ u64::from(b)).wrapping_mul(0x0000_0100_0000_01b3))
    })
}

/// BLAKE3 digest (hex) of the canonical JSON export.
///
/// Covers every field, including details.
///
/// # Requires
///
/// This function is only available with the `crypto-hash` feature enabled.
#[cfg(feature = "crypto-hash")]
#[must_use]
pub fn canonical_crypto_hash(graph: &LayeredGraph) -> String {
    let data = export_canonical(graph).unwrap_or_default();
    blake3::hash(&data).to_hex().to_string()
}

/// Check a graph against a BLAKE3 hex digest.
#[cfg(feature = "crypto-hash")]
#[must_use]
pub fn verify_crypto_hash(graph: &LayeredGraph, expected_hash: &str) -> bool {
    canonical_crypto_hash(graph) == expected_hash
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingestor::Ingestor;
    use crate::{Relation, sample};

    fn graph_in_order(edges_reversed: bool) -> LayeredGraph {
        let mut edges = vec![
            Edge::link("F1", "C1", Relation::BasedOn),
            Edge::link("F1", "C2", Relation::BasedOn),
        ];
        if edges_reversed {
            edges.reverse();
        }
        LayeredGraph::build(
            vec![
                Node::framework("F1", "PDPL"),
                Node::control("C1", "Consent"),
                Node::control("C2", "Retention"),
            ],
            edges,
        )
        .expect("build")
    }

    #[test]
    fn export_then_load_is_identical() {
        let graph = Ingestor::load(sample::sample_snapshot()).expect("load");
        let snapshot = export_snapshot(&graph);
        let again = Ingestor::load(snapshot.clone()).expect("reload");

        assert_eq!(export_snapshot(&again), snapshot);
        assert_eq!(canonical_checksum(&again), canonical_checksum(&graph));
    }

    #[test]
    fn exported_records_carry_kind() {
        let graph = graph_in_order(false);
        let snapshot = export_snapshot(&graph);
        assert_eq!(snapshot.frameworks.len(), 1);
        assert_eq!(snapshot.controls.len(), 2);
        assert!(snapshot.controls.iter().all(|r| r.kind_mismatch().is_none() && r.kind.is_some()));
    }

    #[test]
    fn checksum_ignores_input_order() {
        assert_eq!(
            canonical_checksum(&graph_in_order(false)),
            canonical_checksum(&graph_in_order(true))
        );
    }

    #[test]
    fn checksum_detects_relation_change() {
        let a = graph_in_order(false);
        let b = LayeredGraph::build(
            a.nodes().cloned().collect(),
            vec![
                Edge::link("F1", "C1", Relation::Restricts),
                Edge::link("F1", "C2", Relation::BasedOn),
            ],
        )
        .expect("build");
        assert_ne!(canonical_checksum(&a), canonical_checksum(&b));
    }

    #[test]
    fn checksum_detects_rename() {
        let a = graph_in_order(false);
        let mut nodes: Vec<Node> = a.nodes().cloned().collect();
        nodes[0].name = "ECC".to_string();
        let b = LayeredGraph::build(nodes, a.edges().to_vec()).expect("build");
        assert_ne!(canonical_checksum(&a), canonical_checksum(&b));
    }

    #[test]
    fn checksum_detects_same_relation_change_on_two_edges() {
        let a = graph_in_order(false);
        let b = LayeredGraph::build(
            a.nodes().cloned().collect(),
            vec![
                Edge::link("F1", "C1", Relation::Restricts),
                Edge::link("F1", "C2", Relation::Restricts),
            ],
        )
        .expect("build");
        assert_ne!(canonical_checksum(&a), canonical_checksum(&b));
    }

    #[test]
    fn checksum_detects_shared_rename_of_two_nodes() {
        let named = |name: &str| {
            LayeredGraph::build(
                vec![
                    Node::framework("F1", "PDPL"),
                    Node::control("C1", name),
                    Node::control("C2", name),
                ],
                vec![],
            )
            .expect("build")
        };
        assert_ne!(
            canonical_checksum(&named("Consent")),
            canonical_checksum(&named("Retention"))
        );
    }

    #[test]
    fn checksum_field_boundaries_matter() {
        let a = LayeredGraph::build(vec![Node::framework("ab", "c")], vec![]).expect("build");
        let b = LayeredGraph::build(vec![Node::framework("a", "bc")], vec![]).expect("build");
        assert_ne!(canonical_checksum(&a), canonical_checksum(&b));
    }

    #[test]
    fn canonical_export_is_order_independent() {
        let a = export_canonical(&graph_in_order(false)).expect("export");
        let b = export_canonical(&graph_in_order(true)).expect("export");
        assert_eq!(a, b);
    }

    #[test]
    fn empty_graph_checksum_is_zero() {
        assert_eq!(canonical_checksum(&LayeredGraph::new()), 0);
    }

    #[cfg(feature = "crypto-hash")]
    #[test]
    fn crypto_hash_is_stable() {
        let graph = graph_in_order(false);
        let hash = canonical_crypto_hash(&graph);
        assert_eq!(hash.len(), 64);
        assert!(verify_crypto_hash(&graph_in_order(true), &hash));
    }
}
