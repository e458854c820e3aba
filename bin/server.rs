// Olympic Medals - Web Server
// REST API with Axum over the live medal feed

use anyhow::{Context, Result};
use olympic_medals::api::router;
use olympic_medals::{FeedConfig, HttpMedalFeed, MedalService, ReferenceStore, ServerConfig, TotalsFilter};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let feed_config = FeedConfig::from_env();
    let server_config = ServerConfig::from_env();

    // Loaded once, shared read-only by every request
    let reference = ReferenceStore::load_or_bundled(server_config.reference_path.as_deref())?;
    info!(records = reference.len(), "country code reference loaded");

    let totals = TotalsFilter::from(&feed_config);
    info!(medal_url = %feed_config.medal_url, noc_url = %feed_config.noc_url, "medal feed configured");

    let service = MedalService::new(HttpMedalFeed::new(feed_config)?, Arc::new(reference), totals);
    let app = router(Arc::new(service), &server_config.web_dir);

    let listener = tokio::net::TcpListener::bind(&server_config.bind)
        .await
        .with_context(|| format!("Failed to bind to {}", server_config.bind))?;

    info!(addr = %server_config.bind, "server running");
    info!("  API: /api/medals, /api/medals/top?n=3");

    axum::serve(listener, app)
        .await
        .context("Server terminated")?;

    Ok(())
}
