//! Unit tests for API types serialization/deserialization.

#![allow(clippy::unwrap_used, clippy::panic)]

use regmap::api::{
    ActivateResponse, BreadcrumbJson, EdgeJson, HealthResponse, NodeJson, NodeRequest,
    RelationJson, SnapshotResponse, StatusResponse, ToggleResponse, expand_hint, relation_color,
};
use regmap_core::{
    Breadcrumb, Edge, GraphMetrics, LayeredGraph, LayoutConfig, Node, NodeId, Relation,
    Relationship, assign_layout, compute_visible, relations,
};
use std::collections::BTreeSet;

fn small_graph() -> LayeredGraph {
    LayeredGraph::build(
        vec![
            Node::framework("F1", "PDPL").with_description("Personal data law"),
            Node::control("C1", "Consent"),
        ],
        vec![Edge::link("F1", "C1", Relation::Restricts)],
    )
    .unwrap()
}

// =============================================================================
// PRESENTATION MAPPING TESTS
// =============================================================================

#[test]
fn test_relation_colors_are_distinct() {
    let colors: BTreeSet<&str> = Relation::ALL.iter().map(|r| relation_color(*r)).collect();
    assert_eq!(colors.len(), Relation::ALL.len());
    assert_eq!(relation_color(Relation::BasedOn), "#3b82f6");
    assert_eq!(relation_color(Relation::Restricts), "#f59e0b");
}

#[test]
fn test_expand_hint() {
    assert_ne!(expand_hint(true), expand_hint(false));
}

// =============================================================================
// HEALTH RESPONSE TESTS
// =============================================================================

#[test]
fn test_health_response_default() {
    let health = HealthResponse::default();
    assert_eq!(health.status, "ok");
    assert!(!health.version.is_empty());
}

#[test]
fn test_health_response_deserialization() {
    let json = r#"{"status":"healthy","version":"1.0.0"}"#;
    let health: HealthResponse = serde_json::from_str(json).unwrap();

    assert_eq!(health.status, "healthy");
    assert_eq!(health.version, "1.0.0");
}

// =============================================================================
// STATUS RESPONSE TESTS
// =============================================================================

#[test]
fn test_status_response_uses_wire_names() {
    let graph = small_graph();
    let metrics = GraphMetrics::from_graph(&graph);
    let selected = NodeId::from("C1");

    let status = StatusResponse::new(&metrics, 42, 1, Some(&selected));

    let json = serde_json::to_string(&status).unwrap();
    assert!(json.contains("\"node_count\":2"));
    assert!(json.contains("\"framework\":1"));
    assert!(json.contains("\"restricts\":1"));
    assert!(json.contains("\"checksum\":42"));
    assert!(json.contains("\"selected\":\"C1\""));
}

// =============================================================================
// VIEW TYPE TESTS
// =============================================================================

#[test]
fn test_node_json_from_placement() {
    let graph = small_graph();
    let expanded: BTreeSet<NodeId> = [NodeId::from("F1")].into_iter().collect();
    let visible = compute_visible(&graph, &expanded);
    let layout = assign_layout(&visible, &expanded, &LayoutConfig::default());

    let f1 = graph.node(&NodeId::from("F1")).unwrap();
    let placement = layout.placement(&NodeId::from("F1")).unwrap();
    let json = NodeJson::new(f1, placement, true);

    assert_eq!(json.label, "إطار");
    assert_eq!(json.description.as_deref(), Some("Personal data law"));
    assert!(json.expanded);
    assert!(json.selected);
    assert_eq!(json.hint, expand_hint(true));
    assert_eq!((json.x, json.y), (0, 0));
}

#[test]
fn test_edge_json_carries_label_and_color() {
    let edge = Edge::link("F1", "C1", Relation::Interprets);
    let json = serde_json::to_value(EdgeJson::from(&edge)).unwrap();

    assert_eq!(json["id"], "F1->C1");
    assert_eq!(json["relation"], "يفسّر");
    assert_eq!(json["relation_slug"], "interprets");
    assert_eq!(json["color"], "#10b981");
}

#[test]
fn test_breadcrumb_json_resolves_names() {
    let graph = small_graph();
    let crumb = Breadcrumb {
        path: vec![NodeId::from("F1"), NodeId::from("C1")],
        cycle_at: None,
    };

    let json = BreadcrumbJson::new(&graph, &crumb);
    let names: Vec<&str> = json.path.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["PDPL", "Consent"]);
}

#[test]
fn test_relation_json_from_relationship() {
    let graph = small_graph();
    let rels: Vec<Relationship<'_>> = relations(&graph, &NodeId::from("C1")).unwrap();
    let json = RelationJson::from(&rels[0]);

    assert_eq!(json.other_id, "F1");
    assert_eq!(json.color, relation_color(Relation::Restricts));
    let value = serde_json::to_value(&json).unwrap();
    assert_eq!(value["direction"], "incoming");
}

// =============================================================================
// REQUEST/RESPONSE TESTS
// =============================================================================

#[test]
fn test_node_request_deserialization() {
    let request: NodeRequest = serde_json::from_str(r#"{"node_id":"fw-pdpl"}"#).unwrap();
    assert_eq!(request.node_id, "fw-pdpl");
    assert!(serde_json::from_str::<NodeRequest>("{}").is_err());
}

#[test]
fn test_error_responses() {
    let activate = ActivateResponse::error("Node not found: x");
    assert!(!activate.success);
    assert!(activate.breadcrumb.is_none());

    let toggle = ToggleResponse::error(&NodeId::from("x"), "nope");
    assert!(!toggle.expanded);
    assert_eq!(toggle.error.as_deref(), Some("nope"));

    let snapshot = SnapshotResponse::error("bad");
    assert!(snapshot.checksum.is_none());
    assert_eq!(snapshot.node_count, 0);
}
