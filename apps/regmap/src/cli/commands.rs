//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.
//!
//! Every command reads the snapshot file fresh; nothing is written back
//! except by `export` and `init`.

use crate::api;
use crate::config::ServerConfig;
use regmap_core::{
    Direction, GraphMetrics, GraphSnapshot, Ingestor, LayoutConfig, NodeId, RegmapError, Session,
    assign_layout, breadcrumb, canonical_checksum, canonical_crypto_hash, compute_visible,
    export_canonical, primitives::MAX_SNAPSHOT_BYTES, relations, sample::sample_snapshot,
    snapshot_from_json, snapshot_to_json,
};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

// =============================================================================
// FILE VALIDATION
// =============================================================================

/// Validate file size before reading.
fn validate_file_size(path: &Path, max_size: u64) -> Result<(), RegmapError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| RegmapError::IoError(format!("Cannot read file metadata: {}", e)))?;

    if metadata.len() > max_size {
        return Err(RegmapError::InvalidSnapshot(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            max_size
        )));
    }
    Ok(())
}

/// Canonicalize an input path and make sure it is a regular file.
fn validate_file_path(path: &Path) -> Result<PathBuf, RegmapError> {
    let canonical = path.canonicalize().map_err(|e| {
        RegmapError::IoError(format!("Invalid file path '{}': {}", path.display(), e))
    })?;

    if !canonical.is_file() {
        return Err(RegmapError::IoError(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }

    Ok(canonical)
}

/// Canonicalize the parent of an output path and re-attach the file name.
fn validate_output_path(path: &Path) -> Result<PathBuf, RegmapError> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let canonical_parent = parent.canonicalize().map_err(|e| {
        RegmapError::IoError(format!(
            "Invalid output directory '{}': {}",
            parent.display(),
            e
        ))
    })?;

    if !canonical_parent.is_dir() {
        return Err(RegmapError::IoError(format!(
            "Output directory '{}' is not a valid directory",
            parent.display()
        )));
    }

    let filename = path
        .file_name()
        .ok_or_else(|| RegmapError::IoError("Output path has no filename".to_string()))?;

    Ok(canonical_parent.join(filename))
}

// =============================================================================
// SNAPSHOT LOADING
// =============================================================================

/// Read and parse a snapshot file without building the graph.
pub fn read_snapshot(path: &Path) -> Result<GraphSnapshot, RegmapError> {
    let path = validate_file_path(path)?;
    validate_file_size(&path, MAX_SNAPSHOT_BYTES as u64)?;

    let data = std::fs::read(&path)
        .map_err(|e| RegmapError::IoError(format!("Read snapshot: {}", e)))?;
    snapshot_from_json(&data)
}

/// Load a session from a snapshot file.
///
/// A missing file yields an empty session so the server can start before
/// the first upload.
pub fn load_session(path: &Path) -> Result<Session, RegmapError> {
    if !path.exists() {
        tracing::info!("No snapshot at {}, starting empty", path.display());
        return Ok(Session::new());
    }

    let graph = Ingestor::load(read_snapshot(path)?)?;
    tracing::debug!(
        "Loaded {} nodes and {} edges from {}",
        graph.node_count(),
        graph.edge_count(),
        path.display()
    );
    Ok(Session::with_graph(graph))
}

fn print_json(value: &serde_json::Value) {
    println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
}

// =============================================================================
// SERVER COMMAND
// =============================================================================

/// Start the HTTP server.
pub async fn cmd_server(
    snapshot: &Path,
    layout: LayoutConfig,
    server: ServerConfig,
) -> Result<(), RegmapError> {
    let session = load_session(snapshot)?.with_layout(layout);

    println!("regmap Layered Compliance Map Server Starting...");
    println!();
    println!("Configuration:");
    println!("  Host:       {}", server.host);
    println!("  Port:       {}", server.port);
    println!("  Snapshot:   {:?}", snapshot);
    println!("  Nodes:      {}", session.graph().node_count());
    println!("  Rate limit: {}/s", server.rate_limit);
    println!();
    println!("Endpoints:");
    println!("  GET  /view                 - Visible map with positions");
    println!("  POST /nodes/activate       - Select and expand a node");
    println!("  POST /nodes/toggle         - Expand or collapse a node");
    println!("  GET  /nodes/{{id}}/relations - Relations of a node");
    println!("  POST /snapshot             - Replace the snapshot");
    println!("  GET  /health               - Health check");
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    api::run_server(server, session).await
}

// =============================================================================
// STATUS COMMAND
// =============================================================================

/// Show snapshot statistics.
pub fn cmd_status(snapshot: &Path, json_mode: bool) -> Result<(), RegmapError> {
    let session = load_session(snapshot)?;
    let graph = session.graph();
    let metrics = GraphMetrics::from_graph(graph);

    if json_mode {
        print_json(&serde_json::json!({
            "snapshot": snapshot.to_string_lossy(),
            "node_count": metrics.node_count,
            "edge_count": metrics.edge_count,
            "nodes_by_kind": metrics.nodes_by_kind.iter()
                .map(|(k, n)| (k.as_str().to_string(), *n))
                .collect::<std::collections::BTreeMap<_, _>>(),
            "edges_by_relation": metrics.edges_by_relation.iter()
                .map(|(r, n)| (r.slug().to_string(), *n))
                .collect::<std::collections::BTreeMap<_, _>>(),
            "dangling_edges": metrics.dangling_edge_count,
            "roots": metrics.root_count,
            "max_breadcrumb_depth": metrics.max_breadcrumb_depth,
            "cyclic_breadcrumbs": metrics.cyclic_breadcrumb_count,
            "checksum": canonical_checksum(graph),
        }));
        return Ok(());
    }

    println!("regmap Snapshot Status");
    println!("======================");
    println!("Snapshot: {:?}", snapshot);
    println!();
    println!("Nodes: {}", metrics.node_count);
    for (kind, count) in &metrics.nodes_by_kind {
        println!("  {:<10} {:>6}  ({})", kind.as_str(), count, kind.label());
    }
    println!("Edges: {}", metrics.edge_count);
    for (relation, count) in &metrics.edges_by_relation {
        println!("  {:<10} {:>6}  ({})", relation.slug(), count, relation);
    }
    println!();
    println!("Dangling Edges:       {}", metrics.dangling_edge_count);
    println!("Roots:                {}", metrics.root_count);
    println!("Max Breadcrumb Depth: {}", metrics.max_breadcrumb_depth);
    println!("Cyclic Breadcrumbs:   {}", metrics.cyclic_breadcrumb_count);
    println!("Checksum:             {}", canonical_checksum(graph));

    Ok(())
}

// =============================================================================
// VALIDATE COMMAND
// =============================================================================

/// Parse, validate and index a snapshot; report dangling edges.
pub fn cmd_validate(snapshot: &Path, json_mode: bool) -> Result<(), RegmapError> {
    let parsed = read_snapshot(snapshot)?;
    let graph = Ingestor::load(parsed)?;

    let dangling: Vec<String> = graph.dangling_edges().map(|e| e.id.to_string()).collect();
    for id in &dangling {
        tracing::warn!("Edge {} references an unknown node and will never be shown", id);
    }

    if json_mode {
        print_json(&serde_json::json!({
            "valid": true,
            "node_count": graph.node_count(),
            "edge_count": graph.edge_count(),
            "dangling_edges": dangling,
        }));
        return Ok(());
    }

    println!(
        "Snapshot OK: {} nodes, {} edges",
        graph.node_count(),
        graph.edge_count()
    );
    if !dangling.is_empty() {
        println!("Dangling edges ({}): {}", dangling.len(), dangling.join(", "));
    }

    Ok(())
}

// =============================================================================
// VIEW COMMAND
// =============================================================================

/// Print the visible map for an expanded set.
pub fn cmd_view(
    snapshot: &Path,
    layout_config: LayoutConfig,
    expand: &[String],
    all: bool,
    json_mode: bool,
) -> Result<(), RegmapError> {
    let session = load_session(snapshot)?;
    let graph = session.graph();

    let expanded: BTreeSet<NodeId> = if all {
        graph.node_ids().cloned().collect()
    } else {
        expand
            .iter()
            .map(|raw| NodeId::from(raw.trim()))
            .filter(|id| {
                let known = graph.contains_node(id);
                if !known {
                    tracing::warn!("Ignoring unknown node '{}'", id);
                }
                known
            })
            .collect()
    };

    let visible = compute_visible(graph, &expanded);
    let layout = assign_layout(&visible, &expanded, &layout_config);

    if json_mode {
        let nodes: Vec<_> = layout
            .placements
            .iter()
            .filter_map(|p| {
                graph
                    .node(&p.node_id)
                    .map(|node| api::NodeJson::new(node, p, false))
            })
            .collect();
        let edges: Vec<_> = visible.edges().iter().map(|e| api::EdgeJson::from(*e)).collect();
        print_json(&serde_json::json!({ "nodes": nodes, "edges": edges }));
        return Ok(());
    }

    println!(
        "Visible: {} nodes, {} edges",
        visible.node_count(),
        visible.edge_count()
    );
    println!();
    for placement in &layout.placements {
        let name = graph
            .node(&placement.node_id)
            .map(|n| n.name.as_str())
            .unwrap_or_default();
        println!(
            "  [{},{}] ({:>5},{:>5})  {:<9} {}  {}  {}",
            placement.layer,
            placement.row,
            placement.position.x,
            placement.position.y,
            placement.kind.as_str(),
            placement.node_id,
            name,
            if placement.expanded { "[-]" } else { "[+]" },
        );
    }
    if !visible.edges().is_empty() {
        println!();
        for edge in visible.edges() {
            println!(
                "  {} --{}--> {}",
                edge.from_id,
                edge.relation.slug(),
                edge.to_id
            );
        }
    }

    Ok(())
}

// =============================================================================
// BREADCRUMB COMMAND
// =============================================================================

/// Print the breadcrumb of a node.
pub fn cmd_breadcrumb(snapshot: &Path, node: &str, json_mode: bool) -> Result<(), RegmapError> {
    let session = load_session(snapshot)?;
    let graph = session.graph();
    let crumb = breadcrumb(graph, &NodeId::from(node.trim()))?;

    if let Some(at) = &crumb.cycle_at {
        tracing::warn!("Parent chain of {} loops back through {}", node, at);
    }

    if json_mode {
        print_json(&serde_json::json!(api::BreadcrumbJson::new(graph, &crumb)));
        return Ok(());
    }

    let steps: Vec<String> = crumb
        .path
        .iter()
        .map(|id| match graph.node(id) {
            Some(n) => format!("{} ({})", n.name, id),
            None => id.to_string(),
        })
        .collect();
    println!("{}", steps.join(" > "));

    Ok(())
}

// =============================================================================
// RELATIONS COMMAND
// =============================================================================

/// List incoming and outgoing relations of a node.
pub fn cmd_relations(snapshot: &Path, node: &str, json_mode: bool) -> Result<(), RegmapError> {
    let session = load_session(snapshot)?;
    let id = NodeId::from(node.trim());
    let rels = relations(session.graph(), &id)?;

    if json_mode {
        let rels: Vec<api::RelationJson> = rels.iter().map(api::RelationJson::from).collect();
        print_json(&serde_json::json!({ "node_id": id.to_string(), "relations": rels }));
        return Ok(());
    }

    println!("Relations of {} ({}):", id, rels.len());
    for rel in &rels {
        let arrow = match rel.direction {
            Direction::Outgoing => "->",
            Direction::Incoming => "<-",
        };
        println!(
            "  {} {:<10} {} {}  {}",
            arrow,
            rel.edge.relation.slug(),
            rel.other.kind().as_str(),
            rel.other.id,
            rel.other.name
        );
    }

    Ok(())
}

// =============================================================================
// EXPORT / HASH COMMANDS
// =============================================================================

/// Write the snapshot in canonical order.
pub fn cmd_export(snapshot: &Path, output: &Path) -> Result<(), RegmapError> {
    let session = load_session(snapshot)?;
    let output = validate_output_path(output)?;

    let data = export_canonical(session.graph())?;
    std::fs::write(&output, &data)
        .map_err(|e| RegmapError::IoError(format!("Write export: {}", e)))?;

    println!(
        "Exported {} bytes to {:?} (checksum {})",
        data.len(),
        output,
        canonical_checksum(session.graph())
    );
    Ok(())
}

/// Compute the BLAKE3 hash of the canonical export.
pub fn cmd_hash(snapshot: &Path, json_mode: bool) -> Result<(), RegmapError> {
    let session = load_session(snapshot)?;
    let graph = session.graph();
    let hash = canonical_crypto_hash(graph);

    if json_mode {
        print_json(&serde_json::json!({
            "hash": hash,
            "algorithm": "blake3",
            "checksum": canonical_checksum(graph),
            "node_count": graph.node_count(),
            "edge_count": graph.edge_count(),
        }));
    } else {
        println!("BLAKE3: {}", hash);
    }
    Ok(())
}

// =============================================================================
// INIT COMMAND
// =============================================================================

/// Write the built-in sample snapshot.
pub fn cmd_init(snapshot: &Path, force: bool) -> Result<(), RegmapError> {
    if snapshot.exists() && !force {
        return Err(RegmapError::IoError(format!(
            "Snapshot {:?} already exists. Use --force to overwrite.",
            snapshot
        )));
    }

    let output = validate_output_path(snapshot)?;
    let sample = sample_snapshot();
    let data = snapshot_to_json(&sample)?;
    std::fs::write(&output, data)
        .map_err(|e| RegmapError::IoError(format!("Write snapshot: {}", e)))?;

    println!(
        "Wrote sample snapshot ({} nodes, {} edges) to {:?}",
        sample.node_count(),
        sample.edges.len(),
        output
    );
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_snapshot_gives_empty_session() {
        let dir = tempfile::tempdir().expect("tempdir");
        let session = load_session(&dir.path().join("absent.json")).expect("load");
        assert!(session.graph().is_empty());
    }

    #[test]
    fn init_then_load_round_trips_sample() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("regmap.json");

        cmd_init(&path, false).expect("init");
        let session = load_session(&path).expect("load");
        assert_eq!(session.graph().node_count(), 12);
        assert_eq!(session.graph().edge_count(), 10);
    }

    #[test]
    fn init_refuses_to_overwrite_without_force() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("regmap.json");

        cmd_init(&path, false).expect("first init");
        assert!(cmd_init(&path, false).is_err());
        assert!(cmd_init(&path, true).is_ok());
    }

    #[test]
    fn invalid_snapshot_file_is_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("broken.json");
        std::fs::write(&path, b"{\"frameworks\": [{\"id\": \"\", \"name\": \"x\"}]}").expect("write");

        assert!(matches!(
            load_session(&path),
            Err(RegmapError::InvalidSnapshot(_))
        ));
        assert!(cmd_validate(&path, true).is_err());
    }

    #[test]
    fn export_writes_canonical_bytes() {
        let dir = tempfile::tempdir().expect("tempdir");
        let snapshot = dir.path().join("regmap.json");
        let output = dir.path().join("export.json");

        cmd_init(&snapshot, false).expect("init");
        cmd_export(&snapshot, &output).expect("export");

        let graph = Ingestor::load(read_snapshot(&output).expect("read")).expect("load");
        let original = load_session(&snapshot).expect("load");
        assert_eq!(canonical_checksum(&graph), canonical_checksum(original.graph()));
    }

    #[test]
    fn output_path_without_directory_uses_cwd() {
        let resolved = validate_output_path(Path::new("out.json")).expect("resolve");
        assert_eq!(resolved.file_name().and_then(|n| n.to_str()), Some("out.json"));
    }

    #[test]
    fn breadcrumb_of_unknown_node_fails() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("regmap.json");
        cmd_init(&path, false).expect("init");

        assert!(matches!(
            cmd_breadcrumb(&path, "ghost", true),
            Err(RegmapError::NodeNotFound(_))
        ));
        assert!(cmd_breadcrumb(&path, "prov-001", true).is_ok());
    }
}
