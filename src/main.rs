//! Multi-tenant static-site edge router.
//!
//! # Architecture Overview
//!
//! ```text
//!                 ┌──────────────────────────────────────────────────────┐
//!                 │                     EDGE ROUTER                      │
//!                 │                                                      │
//!  Client Request │  ┌─────────┐    ┌───────────┐    ┌──────────────┐    │
//!  ───────────────┼─▶│  http   │───▶│  rewrite  │───▶│   forward    │────┼──▶ Storage
//!  Host + path    │  │ server  │    │middleware │    │  to origin   │    │    Origin
//!                 │  └─────────┘    └─────┬─────┘    └──────────────┘    │   /production/...
//!                 │                       │                              │   /<tenant>/...
//!                 │                       ▼                              │
//!                 │                 ┌───────────┐                        │
//!                 │                 │  routing  │ tenant, base dir,      │
//!                 │                 │  (pure)   │ file vs SPA route      │
//!                 │                 └───────────┘                        │
//!                 │                                                      │
//!                 │  config (TOML + hot reload) · observability · admin  │
//!                 └──────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use edge_router::lifecycle::startup::{self, StartupOptions};

#[derive(Parser)]
#[command(name = "edge-router")]
#[command(about = "Edge URI router for multi-tenant static sites", long_about = None)]
struct Args {
    /// Path to the TOML configuration file (watched for changes).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    startup::run(StartupOptions {
        config_path: args.config,
    })
    .await?;

    Ok(())
}
