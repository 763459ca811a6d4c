// SPDX-License-Identifier: MIT

//! Middleware modules (token resolution, security headers).

pub mod auth;
pub mod security;

pub use auth::{require_auth, AuthToken};
