// SPDX-License-Identifier: MIT

//! Strava Heatmap: a personal dashboard backend for Strava activities.
//!
//! This crate proxies activity data from Strava, decodes route polylines
//! for map display, and reduces activity lists into personal-record
//! statistics.

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use services::{StravaClient, TokenStore};
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub strava: StravaClient,
    pub tokens: Arc<dyn TokenStore>,
}
