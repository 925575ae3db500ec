//! # API Endpoint Handlers
//!
//! This module implements the actual HTTP endpoint handlers.
//!
//! Every handler takes the session lock once. Read-only endpoints share the
//! lock; state changes take it exclusively and return the new state.

use super::{
    AppState,
    types::{
        ActivateResponse, BreadcrumbJson, EdgeJson, ExportResponse, HealthResponse, NodeJson,
        NodeRequest, RelationJson, RelationsResponse, SnapshotResponse, StatusResponse,
        ToggleResponse, ViewResponse, ViewStateResponse,
    },
};
use axum::{
    Json,
    body::Bytes,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use regmap_core::{
    GraphMetrics, Ingestor, NodeId, RegmapError, Session, canonical_checksum,
    canonical_crypto_hash, canonical_snapshot, snapshot_from_json,
};

/// HTTP status for an engine error.
pub fn error_status(error: &RegmapError) -> StatusCode {
    match error {
        RegmapError::NodeNotFound(_) => StatusCode::NOT_FOUND,
        RegmapError::InvalidSnapshot(_)
        | RegmapError::DuplicateNodeId { .. }
        | RegmapError::DuplicateEdgeId(_)
        | RegmapError::DeserializationError(_) => StatusCode::BAD_REQUEST,
        RegmapError::SerializationError(_) | RegmapError::IoError(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Reject blank ids before they reach the engine.
fn parse_node_id(raw: &str) -> Option<NodeId> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(NodeId::from(trimmed))
    }
}

/// Render the current frame of a session.
pub fn build_view(session: &Session) -> ViewResponse {
    let graph = session.graph();
    let state = session.state();
    let view = session.view();
    let layout = session.layout();

    let nodes = layout
        .placements
        .iter()
        .filter_map(|placement| {
            graph.node(&placement.node_id).map(|node| {
                let selected = state.selected.as_ref() == Some(&node.id);
                NodeJson::new(node, placement, selected)
            })
        })
        .collect();

    ViewResponse {
        nodes,
        edges: view.edges().iter().map(|edge| EdgeJson::from(*edge)).collect(),
        selected: state.selected.as_ref().map(|id| id.to_string()),
        breadcrumb: BreadcrumbJson::new(graph, &state.breadcrumb),
    }
}

fn view_state_response(session: &Session) -> ViewStateResponse {
    ViewStateResponse {
        success: true,
        expanded_count: session.state().expanded.len(),
        selected: session.state().selected.as_ref().map(|id| id.to_string()),
    }
}

// =============================================================================
// HEALTH / STATUS HANDLERS
// =============================================================================

/// Health check endpoint.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse::default())
}

/// Graph statistics and view-state summary.
pub async fn status_handler(State(state): State<AppState>) -> impl IntoResponse {
    let session = state.session.read().await;
    let graph = session.graph();
    let metrics = GraphMetrics::from_graph(graph);

    let response = StatusResponse::new(
        &metrics,
        canonical_checksum(graph),
        session.state().expanded.len(),
        session.state().selected.as_ref(),
    );

    (StatusCode::OK, Json(response))
}

// =============================================================================
// VIEW HANDLERS
// =============================================================================

/// The visible nodes with positions, visible edges with colours and the
/// current breadcrumb.
pub async fn view_handler(State(state): State<AppState>) -> impl IntoResponse {
    let session = state.session.read().await;
    (StatusCode::OK, Json(build_view(&session)))
}

/// Breadcrumb of the selected node, empty without a selection.
pub async fn breadcrumb_handler(State(state): State<AppState>) -> impl IntoResponse {
    let session = state.session.read().await;
    let crumb = BreadcrumbJson::new(session.graph(), &session.state().breadcrumb);
    (StatusCode::OK, Json(crumb))
}

/// Expand every node.
pub async fn expand_all_handler(State(state): State<AppState>) -> impl IntoResponse {
    let mut session = state.session.write().await;
    session.expand_all();
    (StatusCode::OK, Json(view_state_response(&session)))
}

/// Forget expansion and selection.
pub async fn reset_handler(State(state): State<AppState>) -> impl IntoResponse {
    let mut session = state.session.write().await;
    session.reset();
    (StatusCode::OK, Json(view_state_response(&session)))
}

/// Drop the selection, keep expansion.
pub async fn clear_selection_handler(State(state): State<AppState>) -> impl IntoResponse {
    let mut session = state.session.write().await;
    session.clear_selection();
    (StatusCode::OK, Json(view_state_response(&session)))
}

// =============================================================================
// NODE HANDLERS
// =============================================================================

/// The node id of an action body, or the message for a 400.
///
/// Extractor rejections are folded in here so a malformed body still gets
/// the JSON error shape instead of axum's plain-text rejection.
fn requested_node(payload: Result<Json<NodeRequest>, JsonRejection>) -> Result<NodeId, String> {
    let Json(request) = payload.map_err(|rejection| rejection.body_text())?;
    parse_node_id(&request.node_id).ok_or_else(|| "node_id must not be empty".to_string())
}

/// Select and expand a node.
pub async fn activate_handler(
    State(state): State<AppState>,
    payload: Result<Json<NodeRequest>, JsonRejection>,
) -> impl IntoResponse {
    let id = match requested_node(payload) {
        Ok(id) => id,
        Err(msg) => return (StatusCode::BAD_REQUEST, Json(ActivateResponse::error(msg))),
    };

    let mut session = state.session.write().await;
    match session.activate(&id).cloned() {
        Ok(crumb) => {
            if let Some(at) = &crumb.cycle_at {
                tracing::warn!("Breadcrumb for {} stopped at cycle through {}", id, at);
            }
            let response = ActivateResponse::success(&id, BreadcrumbJson::new(session.graph(), &crumb));
            (StatusCode::OK, Json(response))
        }
        Err(e) => (error_status(&e), Json(ActivateResponse::error(e.to_string()))),
    }
}

/// Flip a node between expanded and collapsed.
pub async fn toggle_handler(
    State(state): State<AppState>,
    payload: Result<Json<NodeRequest>, JsonRejection>,
) -> impl IntoResponse {
    let id = match requested_node(payload) {
        Ok(id) => id,
        Err(msg) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ToggleResponse::error(&NodeId::from(""), msg)),
            );
        }
    };

    let mut session = state.session.write().await;
    match session.toggle(&id) {
        Ok(expanded) => (StatusCode::OK, Json(ToggleResponse::success(&id, expanded))),
        Err(e) => (error_status(&e), Json(ToggleResponse::error(&id, e.to_string()))),
    }
}

/// Incoming and outgoing relations of one node.
pub async fn relations_handler(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> impl IntoResponse {
    let Some(id) = parse_node_id(&raw) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(RelationsResponse::error("node id must not be empty")),
        );
    };

    let session = state.session.read().await;
    let Some(node) = session.graph().node(&id) else {
        return (
            StatusCode::NOT_FOUND,
            Json(RelationsResponse::error(RegmapError::NodeNotFound(id).to_string())),
        );
    };

    match session.relations(&id) {
        Ok(rels) => {
            let rels = rels.iter().map(RelationJson::from).collect();
            (StatusCode::OK, Json(RelationsResponse::success(node.clone(), rels)))
        }
        Err(e) => (error_status(&e), Json(RelationsResponse::error(e.to_string()))),
    }
}

// =============================================================================
// SNAPSHOT / EXPORT HANDLERS
// =============================================================================

/// Replace the loaded snapshot.
///
/// The body is parsed here rather than through `Json` so that every
/// malformed document maps to 400 with the engine's message.
pub async fn snapshot_handler(State(state): State<AppState>, body: Bytes) -> impl IntoResponse {
    let graph = match snapshot_from_json(&body).and_then(Ingestor::load) {
        Ok(graph) => graph,
        Err(e) => {
            tracing::warn!("Snapshot rejected: {}", e);
            return (error_status(&e), Json(SnapshotResponse::error(e.to_string())));
        }
    };

    let (nodes, edges) = (graph.node_count(), graph.edge_count());
    let checksum = canonical_checksum(&graph);

    let mut session = state.session.write().await;
    session.replace_graph(graph);
    tracing::info!("Snapshot replaced: {} nodes, {} edges", nodes, edges);

    (StatusCode::OK, Json(SnapshotResponse::success(nodes, edges, checksum)))
}

/// The loaded snapshot in canonical order with checksum and BLAKE3 hash.
pub async fn export_handler(State(state): State<AppState>) -> impl IntoResponse {
    let session = state.session.read().await;
    let graph = session.graph();

    let response = ExportResponse {
        success: true,
        checksum: canonical_checksum(graph),
        hash: canonical_crypto_hash(graph),
        snapshot: canonical_snapshot(graph),
    };

    (StatusCode::OK, Json(response))
}
