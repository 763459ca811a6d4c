// SPDX-License-Identifier: MIT

//! Services module - business logic layer.

pub mod activity;
pub mod demo;
pub mod filter;
pub mod geometry;
pub mod polyline;
pub mod records;
pub mod strava;
pub mod token_store;

pub use activity::{load_activities, ActivityRoute, LoadedActivities, ACTIVITY_LIMITS};
pub use filter::ActivityFilter;
pub use strava::StravaClient;
pub use token_store::{is_token_expired, new_session_id, MemoryTokenStore, TokenStore, SESSION_COOKIE};
