//! # regmap CLI Module
//!
//! This module implements the CLI interface for regmap.
//!
//! ## Available Commands
//!
//! - `server` - Start the HTTP server
//! - `status` - Show snapshot statistics
//! - `validate` - Check a snapshot file and report problems
//! - `view` - Print the visible map for a set of expanded nodes
//! - `breadcrumb` - Print the path from a root to a node
//! - `relations` - List the relations of a node
//! - `export` - Write the snapshot in canonical order
//! - `hash` - Compute BLAKE3 cryptographic hash of the snapshot
//! - `init` - Write the sample snapshot

mod commands;

use crate::config::Config;
use clap::{Parser, Subcommand};
use regmap_core::RegmapError;
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// regmap - Layered Compliance Map
///
/// Explore a regulatory knowledge map one layer at a time:
/// frameworks, controls, articles and court provisions.
#[derive(Parser, Debug)]
#[command(name = "regmap")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the snapshot JSON file
    #[arg(short = 'S', long, global = true, default_value = "regmap.json")]
    pub snapshot: PathBuf,

    /// Path to a TOML configuration file (default: ./regmap.toml if present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start HTTP server
    Server {
        /// Host to bind to (overrides config)
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to bind to (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Show snapshot statistics
    Status,

    /// Validate the snapshot file
    Validate,

    /// Print the visible map
    View {
        /// Node ids to expand (comma-separated)
        #[arg(short, long, value_delimiter = ',')]
        expand: Vec<String>,

        /// Expand every node
        #[arg(short, long)]
        all: bool,

        /// Place each kind in its own column even when lower layers are empty
        #[arg(long)]
        fixed_slots: bool,
    },

    /// Print the breadcrumb of a node
    Breadcrumb {
        /// Target node id
        #[arg(short, long)]
        node: String,
    },

    /// List incoming and outgoing relations of a node
    Relations {
        /// Node id
        #[arg(short, long)]
        node: String,
    },

    /// Export the snapshot in canonical order
    Export {
        /// Output file path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Compute BLAKE3 cryptographic hash of the snapshot
    Hash,

    /// Write the built-in sample snapshot
    Init {
        /// Overwrite an existing snapshot file
        #[arg(short, long)]
        force: bool,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), RegmapError> {
    let config = Config::load(cli.config.as_deref())?;
    if cli.verbose {
        tracing::info!("Using configuration: {:?}", config);
    }

    let snapshot = cli.snapshot.as_path();
    let json_mode = cli.json_mode;

    match cli.command {
        Some(Commands::Server { host, port }) => {
            let mut server = config.server;
            if let Some(host) = host {
                server.host = host;
            }
            if let Some(port) = port {
                server.port = port;
            }
            cmd_server(snapshot, config.layout, server).await
        }
        Some(Commands::Status) => cmd_status(snapshot, json_mode),
        Some(Commands::Validate) => cmd_validate(snapshot, json_mode),
        Some(Commands::View {
            expand,
            all,
            fixed_slots,
        }) => {
            let layout = if fixed_slots {
                config.layout.fixed()
            } else {
                config.layout
            };
            cmd_view(snapshot, layout, &expand, all, json_mode)
        }
        Some(Commands::Breadcrumb { node }) => cmd_breadcrumb(snapshot, &node, json_mode),
        Some(Commands::Relations { node }) => cmd_relations(snapshot, &node, json_mode),
        Some(Commands::Export { output }) => cmd_export(snapshot, &output),
        Some(Commands::Hash) => cmd_hash(snapshot, json_mode),
        Some(Commands::Init { force }) => cmd_init(snapshot, force),
        // No subcommand - show status by default
        None => cmd_status(snapshot, json_mode),
    }
}
