// SPDX-License-Identifier: MIT

//! Fixed demo activities, served when Strava data can't be loaded.

use crate::models::{Activity, ActivityMap, ActivityType};
use chrono::{NaiveDate, NaiveDateTime, TimeZone, Utc};

struct DemoActivity {
    id: u64,
    name: &'static str,
    activity_type: ActivityType,
    distance: f64,
    moving_time: u64,
    elapsed_time: u64,
    total_elevation_gain: f64,
    /// (day of November 2024, hour, minute) in UTC
    start_utc: (u32, u32, u32),
    /// UTC offset of the athlete's wall clock, in hours
    local_offset_hours: i64,
    average_speed: f64,
    max_speed: f64,
    summary_polyline: &'static str,
}

/// Three activities from November 2024.
pub fn demo_activities() -> Vec<Activity> {
    [
        DemoActivity {
            id: 1,
            name: "Morning Run in Central Park",
            activity_type: ActivityType::Run,
            distance: 5420.3,
            moving_time: 1823,
            elapsed_time: 1920,
            total_elevation_gain: 45.2,
            start_utc: (9, 7, 30),
            local_offset_hours: -5,
            average_speed: 2.97,
            max_speed: 4.5,
            summary_polyline: "a~l~Fjk~uOwHJy@P",
        },
        DemoActivity {
            id: 2,
            name: "Evening Bike Ride",
            activity_type: ActivityType::Ride,
            distance: 15230.5,
            moving_time: 2847,
            elapsed_time: 3000,
            total_elevation_gain: 125.8,
            start_utc: (8, 18, 0),
            local_offset_hours: -5,
            average_speed: 5.35,
            max_speed: 8.2,
            summary_polyline: "w`l~Fjk~uO@bH@pI",
        },
        DemoActivity {
            id: 3,
            name: "Weekend Long Run",
            activity_type: ActivityType::Run,
            distance: 10842.7,
            moving_time: 3625,
            elapsed_time: 3780,
            total_elevation_gain: 89.3,
            start_utc: (7, 8, 15),
            local_offset_hours: -5,
            average_speed: 2.99,
            max_speed: 4.8,
            summary_polyline: "y~l~Fjk~uOsHvD",
        },
    ]
    .into_iter()
    .filter_map(DemoActivity::into_activity)
    .collect()
}

impl DemoActivity {
    fn into_activity(self) -> Option<Activity> {
        let (day, hour, minute) = self.start_utc;
        let start: NaiveDateTime =
            NaiveDate::from_ymd_opt(2024, 11, day)?.and_hms_opt(hour, minute, 0)?;
        let local = start + chrono::Duration::hours(self.local_offset_hours);

        Some(Activity {
            id: self.id,
            name: self.name.to_string(),
            activity_type: self.activity_type,
            distance: self.distance,
            moving_time: self.moving_time,
            elapsed_time: self.elapsed_time,
            total_elevation_gain: self.total_elevation_gain,
            start_date: Utc.from_utc_datetime(&start),
            start_date_local: local,
            average_speed: self.average_speed,
            max_speed: self.max_speed,
            map: ActivityMap {
                summary_polyline: Some(self.summary_polyline.to_string()),
                polyline: None,
            },
        })
    }
}
