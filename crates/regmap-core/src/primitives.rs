//! # Primitives
//!
//! Hardcoded constants for the regmap engine.
//!
//! These are compiled into the binary and immutable at runtime. The app layer
//! may override the layout spacings through its configuration; the input
//! limits are fixed.

/// Horizontal distance between two adjacent layers.
pub const LAYER_SPACING: i64 = 350;

/// Vertical distance between two nodes stacked in the same layer.
pub const NODE_SPACING: i64 = 150;

// =============================================================================
// INPUT VALIDATION LIMITS
// =============================================================================

/// Maximum length for node and edge ids.
///
/// Ids longer than this will be rejected by the Ingestor.
pub const MAX_ID_LENGTH: usize = 256;

/// Maximum length for node names.
pub const MAX_NAME_LENGTH: usize = 1024;

/// Maximum length for free-text fields (descriptions, legal text, summaries).
///
/// Values longer than this (64KB) will be rejected by the Ingestor.
pub const MAX_TEXT_LENGTH: usize = 65536;

/// Maximum number of nodes across all four collections of one snapshot.
pub const MAX_NODES: usize = 100_000;

/// Maximum number of edges in one snapshot.
pub const MAX_EDGES: usize = 500_000;

/// Maximum size of a serialized snapshot, checked before parsing.
pub const MAX_SNAPSHOT_BYTES: usize = 64 * 1024 * 1024;
