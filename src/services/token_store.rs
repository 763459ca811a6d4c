// SPDX-License-Identifier: MIT

//! Per-session token storage.
//!
//! Each browser gets an opaque session id (kept in a cookie) after the
//! OAuth callback; tokens are only ever looked up by that id.

use crate::error::AppError;
use crate::models::TokenPair;
use dashmap::DashMap;
use ring::rand::{SecureRandom, SystemRandom};

/// Name of the cookie carrying the session id.
pub const SESSION_COOKIE: &str = "heatmap_session";

const SESSION_ID_BYTES: usize = 32;

/// Key-value storage for OAuth tokens, keyed by session id.
pub trait TokenStore: Send + Sync {
    fn get(&self, session: &str) -> Option<TokenPair>;
    fn set(&self, session: &str, tokens: TokenPair);
    fn clear(&self, session: &str);
}

/// Whether a token expiring at `expires_at` is expired at `now`
/// (both Unix epoch seconds).
pub fn is_token_expired(expires_at: i64, now: i64) -> bool {
    now > expires_at
}

/// Generate a fresh random session id (hex encoded).
pub fn new_session_id() -> Result<String, AppError> {
    let mut bytes = [0u8; SESSION_ID_BYTES];
    SystemRandom::new()
        .fill(&mut bytes)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Session id generation failed")))?;
    Ok(hex::encode(bytes))
}

/// In-process token store. Tokens are lost on restart.
#[derive(Default)]
pub struct MemoryTokenStore {
    sessions: DashMap<String, TokenPair>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self, session: &str) -> Option<TokenPair> {
        self.sessions.get(session).map(|t| t.clone())
    }

    fn set(&self, session: &str, tokens: TokenPair) {
        self.sessions.insert(session.to_string(), tokens);
    }

    fn clear(&self, session: &str) {
        self.sessions.remove(session);
    }
}
