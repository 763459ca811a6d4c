// SPDX-License-Identifier: MIT

//! Strava API client.
//!
//! Handles:
//! - OAuth authorization URL, code exchange and token refresh
//! - Paginated activity listing with a hard page cap
//! - Rate limit and token error detection

use std::future::Future;

use crate::config::Config;
use crate::error::AppError;
use crate::models::{Activity, TokenPair};
use reqwest::StatusCode;
use serde::Deserialize;

/// Strava API client.
#[derive(Clone)]
pub struct StravaClient {
    http: reqwest::Client,
    api_url: String,
    oauth_url: String,
    client_id: String,
    client_secret: String,
    per_page: u32,
    max_pages: u32,
}

impl StravaClient {
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url: config.strava_api_url.trim_end_matches('/').to_string(),
            oauth_url: config.strava_oauth_url.trim_end_matches('/').to_string(),
            client_id: config.strava_client_id.clone(),
            client_secret: config.strava_client_secret.clone(),
            per_page: config.activities_per_page.max(1),
            max_pages: config.max_activity_pages.max(1),
        }
    }

    /// URL the athlete is sent to for authorizing this app.
    pub fn authorize_url(&self, redirect_uri: &str) -> String {
        format!(
            "{}/authorize?\
             client_id={}&\
             redirect_uri={}&\
             response_type=code&\
             approval_prompt=auto&\
             scope=read,activity:read_all",
            self.oauth_url,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(redirect_uri),
        )
    }

    /// Exchange an OAuth authorization code for tokens.
    pub async fn exchange_code(&self, code: &str) -> Result<TokenPair, AppError> {
        let response = self
            .http
            .post(format!("{}/token", self.oauth_url))
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("code", code),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .map_err(|e| {
                AppError::StravaApi(format!("Code exchange request failed: {}", e.without_url()))
            })?;

        let token: TokenResponse = check_response_json(response, OAUTH_TOKEN_REJECTED).await?;
        if let Some(athlete) = &token.athlete {
            tracing::info!(athlete_id = athlete.id, "Strava authorization code exchanged");
        }
        Ok(token.into())
    }

    /// Refresh an expired access token.
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<TokenPair, AppError> {
        let response = self
            .http
            .post(format!("{}/token", self.oauth_url))
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("refresh_token", refresh_token),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await
            .map_err(|e| {
                AppError::StravaApi(format!("Refresh request failed: {}", e.without_url()))
            })?;

        let token: TokenResponse = check_response_json(response, OAUTH_TOKEN_REJECTED).await?;
        Ok(token.into())
    }

    /// List one page of the athlete's activities (newest first).
    pub async fn list_activities(
        &self,
        access_token: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<Activity>, AppError> {
        let url = format!("{}/athlete/activities", self.api_url);

        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .query(&[("page", page.to_string()), ("per_page", per_page.to_string())])
            .send()
            .await
            .map_err(|e| AppError::StravaApi(e.without_url().to_string()))?;

        check_response_json(response, API_TOKEN_REJECTED).await
    }

    /// Fetch all activities, up to the configured page cap. With `limit`,
    /// stop once that many have been collected; the page cap is then derived
    /// from the limit instead.
    pub async fn fetch_all_activities(
        &self,
        access_token: &str,
        limit: Option<usize>,
    ) -> Result<Vec<Activity>, AppError> {
        let per_page = self.per_page;
        let max_pages = match limit {
            Some(limit) => (limit as u32).div_ceil(per_page).max(1),
            None => self.max_pages,
        };

        let activities = paginate(per_page, max_pages, limit, move |page| {
            self.list_activities(access_token, page, per_page)
        })
        .await?;

        tracing::info!(count = activities.len(), ?limit, "Fetched activities from Strava");
        Ok(activities)
    }
}

/// Collect pages `1..=max_pages`, stopping early at the first page shorter
/// than `per_page` or once `max_items` have been collected. The result never
/// holds more than `max_items`.
pub async fn paginate<T, F, Fut>(
    per_page: u32,
    max_pages: u32,
    max_items: Option<usize>,
    mut fetch_page: F,
) -> Result<Vec<T>, AppError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Vec<T>, AppError>>,
{
    let mut items = Vec::new();

    for page in 1..=max_pages {
        let batch = fetch_page(page).await?;
        let batch_len = batch.len();
        items.extend(batch);

        if let Some(max) = max_items {
            if items.len() >= max {
                items.truncate(max);
                return Ok(items);
            }
        }
        if batch_len < per_page as usize {
            return Ok(items);
        }
    }

    tracing::debug!(max_pages, count = items.len(), "Activity page cap reached");
    Ok(items)
}

/// Statuses meaning Strava rejected the access token.
const API_TOKEN_REJECTED: &[StatusCode] = &[StatusCode::UNAUTHORIZED];

/// Statuses meaning Strava rejected the authorization code or refresh token.
const OAUTH_TOKEN_REJECTED: &[StatusCode] = &[StatusCode::BAD_REQUEST, StatusCode::UNAUTHORIZED];

/// Check response status and parse the JSON body. `token_rejected` lists the
/// statuses that map to [`AppError::STRAVA_TOKEN_ERROR`].
async fn check_response_json<T: for<'de> Deserialize<'de>>(
    response: reqwest::Response,
    token_rejected: &[StatusCode],
) -> Result<T, AppError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();

        if status == StatusCode::TOO_MANY_REQUESTS {
            tracing::warn!("Strava rate limit hit (429)");
            return Err(AppError::StravaApi(AppError::STRAVA_RATE_LIMIT.to_string()));
        }

        if token_rejected.contains(&status) {
            tracing::warn!(status = %status, "Strava rejected credentials");
            return Err(AppError::StravaApi(
                AppError::STRAVA_TOKEN_ERROR.to_string(),
            ));
        }

        return Err(AppError::StravaApi(format!("HTTP {}: {}", status, body)));
    }

    response
        .json()
        .await
        .map_err(|e| AppError::StravaApi(format!("JSON parse error: {}", e)))
}

/// Token response from Strava's OAuth endpoint.
#[derive(Debug, Clone, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    expires_at: i64,
    /// Only present on the initial code exchange
    #[serde(default)]
    athlete: Option<AthleteSummary>,
}

#[derive(Debug, Clone, Deserialize)]
struct AthleteSummary {
    id: u64,
}

impl From<TokenResponse> for TokenPair {
    fn from(t: TokenResponse) -> Self {
        TokenPair {
            access_token: t.access_token,
            refresh_token: t.refresh_token,
            expires_at: t.expires_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_authorize_url() {
        let client = StravaClient::new(&Config {
            strava_oauth_url: "https://www.strava.com/oauth/".to_string(),
            ..Config::test_default()
        });

        let url = client.authorize_url("http://localhost:3001/auth/callback");

        assert!(url.starts_with("https://www.strava.com/oauth/authorize?client_id=test_client_id&"));
        assert!(url.contains("redirect_uri=http%3A%2F%2Flocalhost%3A3001%2Fauth%2Fcallback"));
        assert!(url.contains("response_type=code"));
        assert!(url.contains("scope=read,activity:read_all"));
    }

    #[test]
    fn test_token_response_without_athlete() {
        let json = r#"{"token_type":"Bearer","access_token":"a","refresh_token":"r","expires_at":1700000000,"expires_in":21600}"#;
        let token: TokenResponse = serde_json::from_str(json).unwrap();
        let pair = TokenPair::from(token);
        assert_eq!(pair.expires_at, 1_700_000_000);
        assert_eq!(pair.refresh_token, "r");
    }

    #[tokio::test]
    async fn test_paginate_stops_on_short_page() {
        let calls = Cell::new(0);
        let items = paginate(3, 10, None, |page| {
            calls.set(calls.get() + 1);
            async move {
                let len = if page < 3 { 3 } else { 1 };
                Ok(vec![page; len])
            }
        })
        .await
        .unwrap();

        assert_eq!(calls.get(), 3);
        assert_eq!(items, vec![1, 1, 1, 2, 2, 2, 3]);
    }

    #[tokio::test]
    async fn test_paginate_respects_page_cap() {
        let items = paginate(2, 4, None, |page| async move { Ok(vec![page, page]) })
            .await
            .unwrap();

        assert_eq!(items.len(), 8);
        assert_eq!(items.last(), Some(&4));
    }

    #[tokio::test]
    async fn test_paginate_truncates_to_item_limit() {
        let calls = Cell::new(0);
        let items = paginate(3, 10, Some(7), |page| {
            calls.set(calls.get() + 1);
            async move { Ok(vec![page; 3]) }
        })
        .await
        .unwrap();

        // Third page is fetched, then cut down to the limit
        assert_eq!(calls.get(), 3);
        assert_eq!(items, vec![1, 1, 1, 2, 2, 2, 3]);
    }

    #[tokio::test]
    async fn test_paginate_limit_on_page_boundary() {
        let calls = Cell::new(0);
        let items = paginate(2, 10, Some(4), |page| {
            calls.set(calls.get() + 1);
            async move { Ok(vec![page; 2]) }
        })
        .await
        .unwrap();

        assert_eq!(calls.get(), 2);
        assert_eq!(items.len(), 4);
    }

    #[tokio::test]
    async fn test_paginate_empty_first_page() {
        let items: Vec<u32> = paginate(50, 10, None, |_| async { Ok(vec![]) }).await.unwrap();
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_paginate_propagates_errors() {
        let result: Result<Vec<u32>, AppError> = paginate(2, 4, None, |page| async move {
            if page == 2 {
                Err(AppError::StravaApi(AppError::STRAVA_RATE_LIMIT.to_string()))
            } else {
                Ok(vec![page, page])
            }
        })
        .await;

        assert!(matches!(result, Err(AppError::StravaApi(_))));
    }

    /// Serve canned Strava responses on a local port.
    async fn stub_strava(status: u16, body: &'static str) -> Config {
        use axum::{http::StatusCode, Router};

        let app = Router::new().fallback(move || async move {
            (StatusCode::from_u16(status).unwrap(), body)
        });
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await });

        Config {
            strava_api_url: format!("http://{}/api/v3", addr),
            strava_oauth_url: format!("http://{}/oauth", addr),
            ..Config::test_default()
        }
    }

    #[tokio::test]
    async fn test_rejected_refresh_is_token_error() {
        let client = StravaClient::new(&stub_strava(400, r#"{"message":"Bad Request"}"#).await);
        let err = client.refresh_token("stale").await.unwrap_err();
        assert!(err.is_strava_token_error());
    }

    #[tokio::test]
    async fn test_rejected_access_token_is_token_error() {
        let client = StravaClient::new(&stub_strava(401, "Authorization Error").await);
        let err = client.list_activities("stale", 1, 10).await.unwrap_err();
        assert!(err.is_strava_token_error());
    }

    #[tokio::test]
    async fn test_server_error_mentioning_token_is_not_token_error() {
        let client = StravaClient::new(&stub_strava(500, "invalid token cache state").await);
        let err = client.list_activities("good", 1, 10).await.unwrap_err();
        assert!(!err.is_strava_token_error());
        assert!(matches!(err, AppError::StravaApi(msg) if msg.starts_with("HTTP 500")));
    }

    #[tokio::test]
    async fn test_rate_limit_detected() {
        let client = StravaClient::new(&stub_strava(429, "").await);
        let err = client.list_activities("good", 1, 10).await.unwrap_err();
        assert!(matches!(err, AppError::StravaApi(msg) if msg == AppError::STRAVA_RATE_LIMIT));
    }

    #[tokio::test]
    async fn test_fetch_fails_when_strava_unreachable() {
        let client = StravaClient::new(&Config::test_default());
        let err = client.fetch_all_activities("token", None).await.unwrap_err();
        assert!(matches!(err, AppError::StravaApi(_)));
    }
}
