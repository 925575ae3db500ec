//! # Formats
//!
//! Wire formats for regmap snapshots. File I/O operations are in the app
//! layer; this module only transforms bytes.

pub mod snapshot;

pub use snapshot::{
    ArticleRecord, ControlRecord, FrameworkRecord, GraphSnapshot, NodeRecord, ProvisionRecord,
    snapshot_from_json, snapshot_to_json,
};
