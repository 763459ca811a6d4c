// SPDX-License-Identifier: MIT

use axum::body::Body;
use axum::response::Response;
use std::sync::Arc;
use strava_heatmap::config::Config;
use strava_heatmap::routes::create_router;
use strava_heatmap::services::{MemoryTokenStore, StravaClient};
use strava_heatmap::AppState;

/// Create a test app whose Strava client points at a closed port.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    create_test_app_with(Config::test_default())
}

/// Create a test app from a custom config.
#[allow(dead_code)]
pub fn create_test_app_with(config: Config) -> (axum::Router, Arc<AppState>) {
    let strava = StravaClient::new(&config);

    let state = Arc::new(AppState {
        config,
        strava,
        tokens: Arc::new(MemoryTokenStore::new()),
    });

    (create_router(state.clone()), state)
}

/// Read a response body as JSON.
#[allow(dead_code)]
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
