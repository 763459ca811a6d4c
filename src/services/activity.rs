// SPDX-License-Identifier: MIT

//! Activity loading and route preparation.
//!
//! Handles the dashboard workflow:
//! 1. Fetch all activities from Strava
//! 2. Fall back to the demo dataset if the fetch fails
//! 3. Decode each activity's polyline into a route

use crate::models::{Activity, ActivityType, Coordinate};
use crate::services::{demo::demo_activities, polyline, StravaClient};

/// Activities for one dashboard load.
#[derive(Debug, Clone)]
pub struct LoadedActivities {
    pub activities: Vec<Activity>,
    /// True when Strava couldn't be reached and demo data was substituted
    pub demo: bool,
}

/// Activity counts a client may ask to load.
pub const ACTIVITY_LIMITS: [usize; 5] = [50, 100, 200, 500, 1000];

/// Fetch the athlete's activities, substituting demo data on failure.
/// `limit` caps how many are fetched; see [`ACTIVITY_LIMITS`].
pub async fn load_activities(
    strava: &StravaClient,
    access_token: &str,
    limit: Option<usize>,
) -> LoadedActivities {
    match strava.fetch_all_activities(access_token, limit).await {
        Ok(activities) => LoadedActivities {
            activities,
            demo: false,
        },
        Err(e) => {
            tracing::warn!(error = %e, "Failed to fetch activities, using demo data");
            LoadedActivities {
                activities: demo_activities(),
                demo: true,
            }
        }
    }
}

/// A decoded activity route.
#[derive(Debug, Clone)]
pub struct ActivityRoute {
    pub id: u64,
    pub name: String,
    pub activity_type: ActivityType,
    pub coordinates: Vec<Coordinate>,
}

/// Decode every activity's summary polyline. Activities without a usable
/// path are left out.
pub fn decode_routes(activities: &[Activity]) -> Vec<ActivityRoute> {
    activities
        .iter()
        .map(|a| ActivityRoute {
            id: a.id,
            name: a.name.clone(),
            activity_type: a.activity_type.clone(),
            coordinates: polyline::decode(a.summary_polyline()),
        })
        .filter(|r| !r.coordinates.is_empty())
        .collect()
}

/// All route coordinates flattened into one list, for map framing.
pub fn all_coordinates(routes: &[ActivityRoute]) -> Vec<Coordinate> {
    routes
        .iter()
        .flat_map(|r| r.coordinates.iter().copied())
        .collect()
}
