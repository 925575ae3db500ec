//! # regmap - Layered Compliance Map Server
//!
//! The main binary for the regmap compliance graph engine.
//!
//! This application provides:
//! - HTTP REST API server (axum-based)
//! - CLI interface for snapshot inspection
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │            apps/regmap (THE BINARY)           │
//! │                                               │
//! │  ┌─────────────┐   ┌─────────────┐            │
//! │  │    CLI      │   │  HTTP API   │  config    │
//! │  │   (clap)    │   │   (axum)    │  (toml)    │
//! │  └──────┬──────┘   └──────┬──────┘            │
//! │         └────────┬────────┘                   │
//! │                  ▼                            │
//! │          ┌───────────────┐                    │
//! │          │  regmap-core  │                    │
//! │          │  (THE LOGIC)  │                    │
//! │          └───────────────┘                    │
//! └───────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! regmap init
//! regmap server --port 8080
//! regmap view --expand fw-pdpl,ctl-retention
//! regmap breadcrumb --node prov-001
//! ```

use clap::Parser;
use regmap::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    // REGMAP_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("REGMAP_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "regmap=info,tower_http=debug".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }

    let cli = cli::Cli::parse();

    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the regmap startup banner.
fn print_banner() {
    println!(
        r#"
  ┬─┐┌─┐┌─┐┌┬┐┌─┐┌─┐
  ├┬┘├┤ │ ┬│││├─┤├─┘
  ┴└─└─┘└─┘┴ ┴┴ ┴┴

  Layered Compliance Map v{}

  Framework → Control → Article → Provision
"#,
        env!("CARGO_PKG_VERSION")
    );
}
