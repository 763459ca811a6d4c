// SPDX-License-Identifier: MIT

//! Strava activity model as delivered by the activities API.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// One recorded exercise session.
///
/// Numeric fields missing from the feed (or `null`) deserialize to zero: the activity
/// still counts, it just contributes nothing for that field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    /// Strava activity ID
    pub id: u64,
    /// Activity name/title
    pub name: String,
    /// Activity type (Run, Ride, ...)
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    /// Distance in meters
    #[serde(default, deserialize_with = "null_as_zero")]
    pub distance: f64,
    /// Moving time in seconds
    #[serde(default, deserialize_with = "null_as_zero")]
    pub moving_time: u64,
    /// Elapsed time in seconds
    #[serde(default, deserialize_with = "null_as_zero")]
    pub elapsed_time: u64,
    /// Elevation gain in meters
    #[serde(default, deserialize_with = "null_as_zero")]
    pub total_elevation_gain: f64,
    /// Absolute start time
    pub start_date: DateTime<Utc>,
    /// Wall-clock start time in the athlete's timezone (no offset recorded)
    #[serde(with = "crate::time_utils::local_datetime")]
    pub start_date_local: NaiveDateTime,
    /// Average speed in m/s
    #[serde(default, deserialize_with = "null_as_zero")]
    pub average_speed: f64,
    /// Max speed in m/s
    #[serde(default, deserialize_with = "null_as_zero")]
    pub max_speed: f64,
    #[serde(default)]
    pub map: ActivityMap,
}

impl Activity {
    /// Encoded route for map display; empty when the activity has no GPS track.
    pub fn summary_polyline(&self) -> &str {
        self.map.summary_polyline.as_deref().unwrap_or("")
    }

    /// Local calendar date the activity started on.
    pub fn local_date(&self) -> NaiveDate {
        self.start_date_local.date()
    }

    /// Average speed converted to km/h.
    pub fn average_speed_kmh(&self) -> f64 {
        self.average_speed * 3.6
    }
}

/// Read a number that Strava may send as `null`.
fn null_as_zero<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Activity map data with polylines.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActivityMap {
    #[serde(default)]
    pub summary_polyline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polyline: Option<String>,
}

/// Activity type. Unknown Strava types are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ActivityType {
    Run,
    Ride,
    Walk,
    Hike,
    Swim,
    Other(String),
}

impl ActivityType {
    pub fn as_str(&self) -> &str {
        match self {
            ActivityType::Run => "Run",
            ActivityType::Ride => "Ride",
            ActivityType::Walk => "Walk",
            ActivityType::Hike => "Hike",
            ActivityType::Swim => "Swim",
            ActivityType::Other(other) => other,
        }
    }
}

impl From<String> for ActivityType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Run" => ActivityType::Run,
            "Ride" => ActivityType::Ride,
            "Walk" => ActivityType::Walk,
            "Hike" => ActivityType::Hike,
            "Swim" => ActivityType::Swim,
            _ => ActivityType::Other(value),
        }
    }
}

impl From<&str> for ActivityType {
    fn from(value: &str) -> Self {
        ActivityType::from(value.to_string())
    }
}

impl From<ActivityType> for String {
    fn from(value: ActivityType) -> Self {
        match value {
            ActivityType::Other(other) => other,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
