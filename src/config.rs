// SPDX-License-Identifier: MIT

//! Application configuration loaded from environment variables.

use std::env;

const DEFAULT_FRONTEND_URL: &str = "http://localhost:3000";
const DEFAULT_API_URL: &str = "http://localhost:3001";
const DEFAULT_STRAVA_API_URL: &str = "https://www.strava.com/api/v3";
const DEFAULT_STRAVA_OAUTH_URL: &str = "https://www.strava.com/oauth";

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Strava OAuth client ID (public)
    pub strava_client_id: String,
    /// Strava OAuth client secret
    pub strava_client_secret: String,
    /// Frontend URL for OAuth redirects and CORS
    pub frontend_url: String,
    /// Public base URL of this API (used for the OAuth callback)
    pub api_url: String,
    /// Server port
    pub port: u16,
    /// Strava REST API base URL
    pub strava_api_url: String,
    /// Strava OAuth base URL
    pub strava_oauth_url: String,
    /// Page size requested when listing activities
    pub activities_per_page: u32,
    /// Hard cap on the number of activity pages fetched per load
    pub max_activity_pages: u32,
}

impl Config {
    /// Load configuration from environment variables (and `.env` if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            strava_client_id: env::var("STRAVA_CLIENT_ID")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("STRAVA_CLIENT_ID"))?,
            strava_client_secret: env::var("STRAVA_CLIENT_SECRET")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("STRAVA_CLIENT_SECRET"))?,
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| DEFAULT_FRONTEND_URL.to_string()),
            api_url: env::var("API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            port: parse_or("PORT", 3001)?,
            strava_api_url: env::var("STRAVA_API_URL")
                .unwrap_or_else(|_| DEFAULT_STRAVA_API_URL.to_string()),
            strava_oauth_url: env::var("STRAVA_OAUTH_URL")
                .unwrap_or_else(|_| DEFAULT_STRAVA_OAUTH_URL.to_string()),
            activities_per_page: parse_or("STRAVA_ACTIVITIES_PER_PAGE", 50)?,
            max_activity_pages: parse_or("STRAVA_MAX_PAGES", 10)?,
        })
    }

    /// Config for tests. Upstream URLs point at a closed local port so any
    /// Strava call fails fast.
    pub fn test_default() -> Self {
        Self {
            strava_client_id: "test_client_id".to_string(),
            strava_client_secret: "test_secret".to_string(),
            frontend_url: DEFAULT_FRONTEND_URL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            port: 3001,
            strava_api_url: "http://127.0.0.1:9/api/v3".to_string(),
            strava_oauth_url: "http://127.0.0.1:9/oauth".to_string(),
            activities_per_page: 50,
            max_activity_pages: 10,
        }
    }

    /// OAuth callback URL registered with Strava.
    pub fn callback_url(&self) -> String {
        format!("{}/auth/callback", self.api_url.trim_end_matches('/'))
    }
}

/// Parse an optional numeric variable, falling back to `default` when unset.
fn parse_or<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid(name, raw)),
        Err(_) => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1:?}")]
    Invalid(&'static str, String),
}
