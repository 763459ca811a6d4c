// SPDX-License-Identifier: MIT

//! Statistics computed over an activity list.
//!
//! Everything here is derived fresh from the input list on each request;
//! nothing is stored or updated incrementally.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::Activity;

/// Quick-glance statistics for the dashboard header.
///
/// Unlike [`Summary`], this is defined for an empty list (all zeros), since
/// the header is shown even when filters match nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ActivityStats {
    /// Total distance in kilometers
    pub total_distance_km: f64,
    /// Total elevation gain in meters
    pub total_elevation_m: f64,
    /// Mean of per-activity average speeds, in km/h
    pub average_speed_kmh: f64,
    pub activity_count: u32,
}

impl ActivityStats {
    pub fn from_activities(activities: &[Activity]) -> Self {
        if activities.is_empty() {
            return Self::default();
        }

        let count = activities.len() as f64;
        let total_distance: f64 = activities.iter().map(|a| a.distance).sum();
        let total_elevation: f64 = activities.iter().map(|a| a.total_elevation_gain).sum();
        let speed_sum: f64 = activities.iter().map(|a| a.average_speed).sum();

        Self {
            total_distance_km: total_distance / 1000.0,
            total_elevation_m: total_elevation,
            average_speed_kmh: speed_sum / count * 3.6,
            activity_count: activities.len() as u32,
        }
    }
}

/// Aggregate statistics and personal records for a non-empty activity list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Summary {
    pub totals: Totals,
    pub averages: Averages,

    // ─── Personal Records ────────────────────────────────────────
    /// Longest distance (value in meters)
    pub longest_distance: ActivityHighlight,
    /// Biggest elevation gain (value in meters)
    pub biggest_climb: ActivityHighlight,
    /// Fastest average speed overall (value in km/h)
    pub fastest: ActivityHighlight,
    /// Fastest average speed among activities over 20 km (value in km/h)
    pub fastest_long_ride: ActivityHighlight,
    /// Longest moving time (value in seconds)
    pub longest_duration: ActivityHighlight,

    // ─── Consistency ─────────────────────────────────────────────
    pub most_active_month: PeriodCount,
    /// Consecutive days with activity, ending today
    pub current_streak_days: u32,
    /// Percent of the last 90 days with at least one activity
    pub consistency_percent: u32,
    /// Progress toward the yearly distance goal, capped at 100
    pub yearly_goal_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Totals {
    pub distance_meters: f64,
    pub elevation_gain_meters: f64,
    pub moving_time_secs: u64,
    pub activity_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Averages {
    pub distance_meters: f64,
    pub elevation_gain_meters: f64,
    pub moving_time_secs: f64,
    /// Mean of per-activity average speeds (not total distance / total time)
    pub speed_kmh: f64,
}

/// The activity holding a record, with the record value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ActivityHighlight {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub id: u64,
    pub name: String,
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub start_date: DateTime<Utc>,
    pub value: f64,
}

impl ActivityHighlight {
    pub fn new(activity: &Activity, value: f64) -> Self {
        Self {
            id: activity.id,
            name: activity.name.clone(),
            start_date: activity.start_date,
            value,
        }
    }
}

/// Activity count for a calendar period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct PeriodCount {
    /// Display label, e.g. "Nov 2024"
    pub label: String,
    pub count: u32,
}
