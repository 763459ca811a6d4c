// SPDX-License-Identifier: MIT

//! Strava Heatmap API Server
//!
//! Serves activity routes, map bounds and personal-record statistics to the
//! dashboard frontend, backed by the Strava API.

use std::sync::Arc;
use strava_heatmap::{
    config::Config,
    services::{MemoryTokenStore, StravaClient},
    AppState,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging()?;

    let config = Config::from_env()?;
    tracing::info!(
        port = config.port,
        frontend = %config.frontend_url,
        "Starting Strava Heatmap API"
    );

    let strava = StravaClient::new(&config);
    let tokens = Arc::new(MemoryTokenStore::new());

    let state = Arc::new(AppState {
        config: config.clone(),
        strava,
        tokens,
    });

    let app = strava_heatmap::routes::create_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("strava_heatmap=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .with(format)
        .init();

    Ok(())
}
