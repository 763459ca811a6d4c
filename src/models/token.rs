// SPDX-License-Identifier: MIT

//! OAuth token model.

use serde::{Deserialize, Serialize};

/// Strava OAuth tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// When the access token expires (Unix epoch seconds)
    pub expires_at: i64,
}
