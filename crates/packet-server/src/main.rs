//! Packet Server - HTTP service for generating submittal packets.

mod routes;
mod state;

use anyhow::{Context, Result};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use packet_core::AppConfig;
use state::AppState;

/// Request bodies are JSON form payloads plus document lists; 50MB
/// leaves generous headroom.
const MAX_BODY_BYTES: usize = 50 * 1024 * 1024;

#[derive(Parser, Debug)]
#[command(name = "packet-server")]
#[command(author, version, about = "Submittal Packet Server", long_about = None)]
struct Args {
    /// Host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to bind to
    #[arg(short, long, default_value = "3000")]
    port: u16,

    /// Content-store base URL
    #[arg(long, env = "STORAGE_BASE_URL")]
    storage_url: Option<String>,

    /// Content-store service key (sent as a bearer token on writes)
    #[arg(long, env = "STORAGE_SERVICE_KEY")]
    service_key: Option<String>,

    /// Path to a config file (defaults to ./config.toml when present)
    #[arg(long, env = "PACKET_CONFIG")]
    config: Option<String>,

    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (before parsing args so env vars are available)
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Setup logging
    let default_level = match args.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();

    // Config file first, then CLI/env overrides
    let mut config = match args.config.as_deref() {
        Some(path) => AppConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {path}"))?,
        None => AppConfig::load(),
    };
    if let Some(url) = args.storage_url {
        config.storage.base_url = url;
    }
    if let Some(key) = args.service_key {
        config.storage.service_key = Some(key);
    }

    let state = Arc::new(
        AppState::new(config).context("Failed to initialize application state")?,
    );
    info!("Using content store at {}", state.config.storage.base_url);

    // Build router. CORS is fully permissive (the packet endpoint is
    // consumed cross-origin) and answers OPTIONS preflights with 200.
    let app = Router::new()
        .route("/health", get(routes::health))
        .route("/api/documents", get(routes::list_documents))
        .route("/api/product-sizes", get(routes::list_product_sizes))
        .route("/api/generate-packet", post(routes::generate_packet))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
