//! # regmap
//!
//! HTTP server and CLI over the `regmap-core` engine.
//!
//! Exposed as a library so integration tests can build the router without
//! binding a socket.

pub mod api;
pub mod cli;
pub mod config;
