//! # regmap-core
//!
//! The layered compliance graph engine for regmap - THE LOGIC.
//!
//! A regulatory knowledge map has four fixed layers
//! (Framework → Control → Article → Provision) joined by typed, directed
//! relations. This crate loads one snapshot of that map and computes the
//! view a renderer needs:
//! - which nodes and edges are visible for an expanded set (`visibility`)
//! - a grid position per visible node (`layout`)
//! - the path from a root to the selected node (`breadcrumb`)
//! - the incoming and outgoing relations of a node (`relations`)
//!
//! ## Architectural Constraints
//!
//! - Pure Rust: NO async, NO network, NO logging dependency
//! - Deterministic: `BTreeMap`/`BTreeSet` only, integer coordinates
//! - Snapshots are read-only once loaded; the only mutable state is the
//!   explicit `ViewState`
//! - Every recomputation is full; there are no incremental indices

// =============================================================================
// MODULES
// =============================================================================

pub mod breadcrumb;
pub mod export;
pub mod formats;
pub mod graph;
pub mod ingestor;
pub mod layout;
pub mod metrics;
pub mod primitives;
pub mod relations;
pub mod sample;
pub mod session;
pub mod types;
pub mod visibility;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{
    ArticleDetail, ControlDetail, Edge, EdgeId, FrameworkDetail, LayerDetail, Node, NodeDetail,
    NodeId, NodeKind, Priority, ProvisionDetail, RegmapError, Relation,
};

// =============================================================================
// RE-EXPORTS: Graph Engine
// =============================================================================

pub use breadcrumb::{Breadcrumb, breadcrumb};
pub use export::{canonical_checksum, canonical_snapshot, export_canonical, export_snapshot};
pub use graph::LayeredGraph;
pub use ingestor::Ingestor;
pub use layout::{LayerSlots, Layout, LayoutConfig, Placement, Position, assign_layout};
pub use metrics::GraphMetrics;
pub use relations::{Direction, Relationship, relations};
pub use session::{Session, ViewState, activate};
pub use visibility::{VisibleGraph, compute_visible};

#[cfg(feature = "crypto-hash")]
pub use export::{canonical_crypto_hash, verify_crypto_hash};

// =============================================================================
// RE-EXPORTS: Formats (from formats module)
// =============================================================================

pub use formats::{GraphSnapshot, snapshot_from_json, snapshot_to_json};
