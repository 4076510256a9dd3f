use std::sync::Arc;

use clap::Parser;
use gateway::{config::GatewayConfig, create_router, upstream::UpstreamClient, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "gateway=debug,tower_http=debug,axum::rejection=trace".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = GatewayConfig::parse();
    let upstream = UpstreamClient::new(&config.upstream, config.timeout())?;
    tracing::info!("relaying routing calls to {}", upstream.base_url());

    if !config.static_dir.join("index.html").exists() {
        tracing::warn!(
            "no index.html in {}; only the API will be useful",
            config.static_dir.display()
        );
    }
    tracing::info!("serving client from {}", config.static_dir.display());

    let state = AppState {
        upstream: Arc::new(upstream),
    };
    let app = create_router(state, &config.static_dir);

    let listener = tokio::net::TcpListener::bind(config.listen).await?;
    tracing::info!("starting gateway on http://{}", config.listen);
    tracing::info!("  POST /api/route - route between two points");
    tracing::info!("  POST /download_gpx - GPX file for the same route");
    tracing::info!("  GET /health - liveness");
    axum::serve(listener, app).await?;

    Ok(())
}
