// SPDX-License-Identifier: MIT

//! Strava OAuth authentication routes.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Redirect,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use std::sync::Arc;

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::TokenPair;
use crate::services::{new_session_id, SESSION_COOKIE};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/strava", get(auth_start))
        .route("/auth/callback", get(auth_callback))
        .route("/auth/refresh", post(refresh))
        .route("/auth/logout", post(logout))
}

/// Start OAuth flow - redirect to Strava authorization.
async fn auth_start(State(state): State<Arc<AppState>>) -> Redirect {
    let auth_url = state.strava.authorize_url(&state.config.callback_url());

    tracing::info!(
        client_id = %state.config.strava_client_id,
        "Starting OAuth flow, redirecting to Strava"
    );

    Redirect::temporary(&auth_url)
}

#[derive(Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// OAuth callback - exchange code for tokens, start a session and hand the
/// tokens to the frontend.
async fn auth_callback(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Query(params): Query<CallbackParams>,
) -> Result<(CookieJar, Redirect)> {
    let frontend_url = state.config.frontend_url.trim_end_matches('/');

    if let Some(error) = params.error {
        tracing::warn!(error = %error, "OAuth error from Strava");
        return Ok((jar, error_redirect(frontend_url, &error)));
    }

    let code = params
        .code
        .filter(|c| !c.is_empty())
        .ok_or_else(|| AppError::BadRequest("Missing 'code' parameter".to_string()))?;

    tracing::info!("Exchanging authorization code for tokens");

    let tokens = match state.strava.exchange_code(&code).await {
        Ok(tokens) => tokens,
        Err(e) => {
            tracing::error!(error = %e, "Token exchange failed");
            return Ok((jar, error_redirect(frontend_url, "token_exchange_failed")));
        }
    };

    let redirect = format!(
        "{}/?access_token={}&refresh_token={}&expires_at={}",
        frontend_url,
        urlencoding::encode(&tokens.access_token),
        urlencoding::encode(&tokens.refresh_token),
        tokens.expires_at
    );

    // A fresh id per login; any previous session for this browser is dropped
    if let Some(old) = jar.get(SESSION_COOKIE).map(|c| c.value().to_string()) {
        state.tokens.clear(&old);
    }
    let session = new_session_id()?;
    state.tokens.set(&session, tokens);

    tracing::info!("OAuth successful, session started");
    Ok((
        jar.add(session_cookie(&state.config, session)),
        Redirect::temporary(&redirect),
    ))
}

fn session_cookie(config: &Config, session: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, session))
        .path("/")
        .http_only(true)
        .secure(config.api_url.starts_with("https://"))
        .same_site(SameSite::Lax)
        .build()
}

fn error_redirect(frontend_url: &str, error: &str) -> Redirect {
    Redirect::temporary(&format!(
        "{}/login?error={}",
        frontend_url,
        urlencoding::encode(error)
    ))
}

#[derive(Deserialize)]
pub struct RefreshRequest {
    refresh_token: String,
}

/// Exchange a refresh token for a new token pair. The caller's session, if
/// it has one, is updated too.
async fn refresh(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(body): Json<RefreshRequest>,
) -> Result<Json<TokenPair>> {
    if body.refresh_token.trim().is_empty() {
        return Err(AppError::BadRequest("Missing refresh_token".to_string()));
    }

    let tokens = state.strava.refresh_token(body.refresh_token.trim()).await?;

    if let Some(session) = jar.get(SESSION_COOKIE) {
        if state.tokens.get(session.value()).is_some() {
            state.tokens.set(session.value(), tokens.clone());
        }
    }

    tracing::info!(expires_at = tokens.expires_at, "Token refreshed");
    Ok(Json(tokens))
}

/// End the caller's session. Other sessions are untouched.
async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> (CookieJar, StatusCode) {
    let Some(session) = jar.get(SESSION_COOKIE).map(|c| c.value().to_string()) else {
        return (jar, StatusCode::NO_CONTENT);
    };

    state.tokens.clear(&session);
    tracing::info!("Session ended");

    (
        jar.remove(Cookie::build(SESSION_COOKIE).path("/")),
        StatusCode::NO_CONTENT,
    )
}
