//! Server binary for pdf-textract.
//!
//! A thin shim over the library crate: loads configuration from the
//! environment, constructs the Textract client once, and serves the router.

use anyhow::{Context, Result};
use pdf_textract::server::AppState;
use pdf_textract::{ServiceConfig, TextractDetector};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pdf_textract=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();

    // Missing credentials are fatal here, never per-request.
    let config = ServiceConfig::from_env().context("Failed to load service configuration")?;

    tracing::info!("Starting pdf-textract v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("AWS region: {}", config.aws_region);

    // One provider client for the process lifetime, injected into the
    // router state — the client is stateless-safe for concurrent use.
    let detector = Arc::new(TextractDetector::from_env(&config.aws_region).await);

    let bind_addr = config.bind_addr.clone();
    let app = pdf_textract::server::router(AppState::new(detector, config));

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", bind_addr))?;
    tracing::info!("Listening on {}", bind_addr);

    axum::serve(listener, app)
        .await
        .context("Server terminated unexpectedly")?;

    Ok(())
}
