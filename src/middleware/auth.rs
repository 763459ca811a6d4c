// SPDX-License-Identifier: MIT

//! Strava access token resolution for API routes.

use crate::error::AppError;
use crate::services::{is_token_expired, SESSION_COOKIE};
use crate::AppState;
use axum::{
    extract::{Query, Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use std::sync::Arc;

/// Strava access token for the current request.
#[derive(Debug, Clone)]
pub struct AuthToken {
    pub access_token: String,
}

#[derive(Deserialize)]
struct TokenQuery {
    access_token: Option<String>,
}

/// Middleware that requires a usable Strava access token.
///
/// Looks in order at the `Authorization: Bearer` header, the `access_token`
/// query parameter, and the tokens stored for the caller's session cookie.
/// Stored tokens are refreshed with Strava when expired.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let from_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string());

    let from_query = Query::<TokenQuery>::try_from_uri(request.uri())
        .ok()
        .and_then(|q| q.0.access_token);

    let access_token = match from_header.or(from_query).filter(|t| !t.is_empty()) {
        Some(token) => token,
        None => {
            let session = jar.get(SESSION_COOKIE).ok_or(AppError::Unauthorized)?;
            stored_access_token(&state, session.value()).await?
        }
    };

    request.extensions_mut().insert(AuthToken { access_token });

    Ok(next.run(request).await)
}

/// Access token stored for `session`, refreshed if it has expired.
async fn stored_access_token(state: &AppState, session: &str) -> Result<String, AppError> {
    let tokens = state.tokens.get(session).ok_or(AppError::Unauthorized)?;

    let now = chrono::Utc::now().timestamp();
    if !is_token_expired(tokens.expires_at, now) {
        return Ok(tokens.access_token);
    }

    tracing::info!(expires_at = tokens.expires_at, "Access token expired, refreshing");

    match state.strava.refresh_token(&tokens.refresh_token).await {
        Ok(refreshed) => {
            let access_token = refreshed.access_token.clone();
            state.tokens.set(session, refreshed);
            tracing::info!("Token refreshed and stored");
            Ok(access_token)
        }
        Err(e) if e.is_strava_token_error() => {
            tracing::warn!(error = %e, "Refresh token rejected, clearing stored tokens");
            state.tokens.clear(session);
            Err(AppError::Unauthorized)
        }
        Err(e) => Err(e),
    }
}
