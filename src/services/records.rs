// SPDX-License-Identifier: MIT

//! Personal records and lifetime statistics.
//!
//! `summarize` is a pure function of the activity list and the current
//! date. Ties between equal values always go to the item seen first in the
//! input order.

use chrono::{Datelike, Days, NaiveDate};
use std::collections::{BTreeSet, HashMap, HashSet};

use crate::models::{
    Activity, ActivityHighlight, Averages, PeriodCount, RecordCategory, RecordSummary, Summary,
    Totals,
};
use crate::time_utils::format_display_date;

/// Activities longer than this count toward "Fastest Ride (20km+)".
pub const LONG_RIDE_THRESHOLD_METERS: f64 = 20_000.0;

/// Trailing window for the consistency ratio.
pub const CONSISTENCY_WINDOW_DAYS: u64 = 90;

/// Yearly distance goal (2000 km).
pub const YEARLY_GOAL_METERS: f64 = 2_000_000.0;

/// Compute the summary for `activities` as of the local date `today`.
///
/// Returns `None` for an empty list.
pub fn summarize(activities: &[Activity], today: NaiveDate) -> Option<Summary> {
    if activities.is_empty() {
        return None;
    }

    let count = activities.len() as f64;
    let totals = Totals {
        distance_meters: activities.iter().map(|a| a.distance).sum(),
        elevation_gain_meters: activities.iter().map(|a| a.total_elevation_gain).sum(),
        moving_time_secs: activities.iter().map(|a| a.moving_time).sum(),
        activity_count: activities.len() as u32,
    };
    let averages = Averages {
        distance_meters: totals.distance_meters / count,
        elevation_gain_meters: totals.elevation_gain_meters / count,
        moving_time_secs: totals.moving_time_secs as f64 / count,
        speed_kmh: activities.iter().map(|a| a.average_speed).sum::<f64>() / count * 3.6,
    };

    let longest = first_max_by(activities, |a| a.distance)?;
    let climb = first_max_by(activities, |a| a.total_elevation_gain)?;
    let fastest = first_max_by(activities, |a| a.average_speed)?;
    let duration = first_max_by(activities, |a| a.moving_time as f64)?;

    let long_rides: Vec<&Activity> = activities
        .iter()
        .filter(|a| a.distance > LONG_RIDE_THRESHOLD_METERS)
        .collect();
    let fastest_long = long_rides
        .into_iter()
        .reduce(|best, a| {
            if a.average_speed > best.average_speed {
                a
            } else {
                best
            }
        })
        .unwrap_or(fastest);

    Some(Summary {
        longest_distance: ActivityHighlight::new(longest, longest.distance),
        biggest_climb: ActivityHighlight::new(climb, climb.total_elevation_gain),
        fastest: ActivityHighlight::new(fastest, fastest.average_speed_kmh()),
        fastest_long_ride: ActivityHighlight::new(fastest_long, fastest_long.average_speed_kmh()),
        longest_duration: ActivityHighlight::new(duration, duration.moving_time as f64),
        most_active_month: most_active_month(activities),
        current_streak_days: current_streak(activities, today),
        consistency_percent: consistency_percent(activities, today),
        yearly_goal_percent: (totals.distance_meters / YEARLY_GOAL_METERS * 100.0).min(100.0),
        totals,
        averages,
    })
}

/// Activity with the largest `key`; the earliest one on ties.
fn first_max_by<F>(activities: &[Activity], key: F) -> Option<&Activity>
where
    F: Fn(&Activity) -> f64,
{
    activities
        .iter()
        .reduce(|best, a| if key(a) > key(best) { a } else { best })
}

/// Calendar month with the most activities, keyed on the UTC start date.
fn most_active_month(activities: &[Activity]) -> PeriodCount {
    // (year, month) -> index into `periods`, which keeps first-seen order
    let mut index: HashMap<(i32, u32), usize> = HashMap::new();
    let mut periods: Vec<PeriodCount> = Vec::new();

    for activity in activities {
        let date = activity.start_date;
        let slot = *index.entry((date.year(), date.month())).or_insert_with(|| {
            periods.push(PeriodCount {
                label: date.format("%b %Y").to_string(),
                count: 0,
            });
            periods.len() - 1
        });
        periods[slot].count += 1;
    }

    periods
        .into_iter()
        .reduce(|best, p| if p.count > best.count { p } else { best })
        .unwrap_or(PeriodCount {
            label: String::new(),
            count: 0,
        })
}

/// Consecutive local days with activity, counting back from `today`.
///
/// Anchored to today rather than to the latest activity: no activity today
/// means a streak of zero.
pub fn current_streak(activities: &[Activity], today: NaiveDate) -> u32 {
    let dates: BTreeSet<NaiveDate> = activities.iter().map(Activity::local_date).collect();

    let mut streak = 0;
    for (offset, date) in dates.iter().rev().enumerate() {
        let expected = today.checked_sub_days(Days::new(offset as u64));
        if expected != Some(*date) {
            break;
        }
        streak += 1;
    }
    streak
}

/// Percentage of the last 90 days (ending today) with at least one activity.
pub fn consistency_percent(activities: &[Activity], today: NaiveDate) -> u32 {
    let Some(window_start) = today.checked_sub_days(Days::new(CONSISTENCY_WINDOW_DAYS - 1)) else {
        return 0;
    };

    let active_days: HashSet<NaiveDate> = activities
        .iter()
        .map(|a| a.start_date.date_naive())
        .filter(|d| *d >= window_start && *d <= today)
        .collect();

    (active_days.len() as f64 / CONSISTENCY_WINDOW_DAYS as f64 * 100.0).round() as u32
}

/// Format seconds as whole hours and remaining whole minutes, e.g. "1h 30m".
pub fn format_duration(secs: u64) -> String {
    format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
}

/// Project a summary into display cards.
pub fn record_cards(summary: &Summary) -> Vec<RecordSummary> {
    let card = |category, title: &str, value: String, subtitle: String| RecordSummary {
        title: title.to_string(),
        value,
        subtitle,
        category,
    };
    let dated = |h: &ActivityHighlight| format!("{} • {}", h.name, format_display_date(h.start_date));

    let streak = summary.current_streak_days;

    vec![
        card(
            RecordCategory::LongestDistance,
            "Longest Distance",
            format!("{:.2} km", summary.longest_distance.value / 1000.0),
            dated(&summary.longest_distance),
        ),
        card(
            RecordCategory::LongestDuration,
            "Longest Duration",
            format_duration(summary.longest_duration.value as u64),
            dated(&summary.longest_duration),
        ),
        card(
            RecordCategory::FastestLongRide,
            "Fastest Ride (20km+)",
            format!("{:.1} km/h", summary.fastest_long_ride.value),
            summary.fastest_long_ride.name.clone(),
        ),
        card(
            RecordCategory::BiggestClimb,
            "Biggest Climb",
            format!("{:.0} m", summary.biggest_climb.value),
            dated(&summary.biggest_climb),
        ),
        card(
            RecordCategory::MostActiveMonth,
            "Most Active Month",
            format!("{} activities", summary.most_active_month.count),
            summary.most_active_month.label.clone(),
        ),
        card(
            RecordCategory::CurrentStreak,
            "Current Streak",
            format!("{} days", streak),
            if streak > 0 {
                "Keep it going 🔥".to_string()
            } else {
                "Start a new streak!".to_string()
            },
        ),
        card(
            RecordCategory::Consistency,
            "Consistency",
            format!("{}%", summary.consistency_percent),
            "Active in last 90 days".to_string(),
        ),
        card(
            RecordCategory::TotalActivities,
            "Total Activities",
            summary.totals.activity_count.to_string(),
            "All-time".to_string(),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ActivityMap, ActivityType};
    use chrono::{DateTime, NaiveTime, TimeZone, Utc};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 11, 15).unwrap()
    }

    fn days_ago(n: u64) -> NaiveDate {
        today().checked_sub_days(Days::new(n)).unwrap()
    }

    fn at_noon(date: NaiveDate) -> DateTime<Utc> {
        Utc.from_utc_datetime(&date.and_time(NaiveTime::from_hms_opt(12, 0, 0).unwrap()))
    }

    fn make_activity(id: u64, date: NaiveDate, distance: f64, speed_kmh: f64) -> Activity {
        let start = at_noon(date);
        Activity {
            id,
            name: format!("Activity {}", id),
            activity_type: ActivityType::Ride,
            distance,
            moving_time: 3600,
            elapsed_time: 3700,
            total_elevation_gain: 100.0,
            start_date: start,
            start_date_local: start.naive_utc(),
            average_speed: speed_kmh / 3.6,
            max_speed: speed_kmh / 3.6 * 1.5,
            map: ActivityMap::default(),
        }
    }

    #[test]
    fn test_empty_is_no_data() {
        assert!(summarize(&[], today()).is_none());
    }

    #[test]
    fn test_totals_match_sum() {
        let activities: Vec<Activity> = (0..7)
            .map(|i| make_activity(i, days_ago(i), 1234.567 * (i + 1) as f64, 20.0))
            .collect();

        let summary = summarize(&activities, today()).unwrap();
        let expected: f64 = activities.iter().map(|a| a.distance).sum();

        assert!((summary.totals.distance_meters - expected).abs() <= expected * 1e-9);
        assert_eq!(summary.totals.activity_count, 7);
        assert_eq!(summary.totals.moving_time_secs, 7 * 3600);
        assert!((summary.averages.elevation_gain_meters - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_average_speed_is_mean_of_activity_speeds() {
        let activities = vec![
            make_activity(1, days_ago(0), 1000.0, 10.0),
            make_activity(2, days_ago(1), 100_000.0, 30.0),
        ];

        let summary = summarize(&activities, today()).unwrap();

        assert!((summary.averages.speed_kmh - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_fastest_over_threshold() {
        let activities = vec![
            make_activity(1, days_ago(3), 5_000.0, 10.0),
            make_activity(2, days_ago(2), 25_000.0, 8.0),
            make_activity(3, days_ago(1), 30_000.0, 12.0),
        ];

        let summary = summarize(&activities, today()).unwrap();

        assert_eq!(summary.fastest_long_ride.id, 3);
        assert!((summary.fastest_long_ride.value - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_fastest_over_threshold_falls_back_to_overall() {
        let activities = vec![
            make_activity(1, days_ago(3), 5_000.0, 10.0),
            make_activity(2, days_ago(2), 20_000.0, 14.0),
        ];

        let summary = summarize(&activities, today()).unwrap();

        // Exactly 20 km does not qualify.
        assert_eq!(summary.fastest_long_ride.id, 2);
        assert_eq!(summary.fastest_long_ride, summary.fastest);
    }

    #[test]
    fn test_ties_go_to_first_activity() {
        let activities = vec![
            make_activity(1, days_ago(2), 10_000.0, 20.0),
            make_activity(2, days_ago(1), 10_000.0, 20.0),
        ];

        let summary = summarize(&activities, today()).unwrap();

        assert_eq!(summary.longest_distance.id, 1);
        assert_eq!(summary.biggest_climb.id, 1);
        assert_eq!(summary.fastest.id, 1);
        assert_eq!(summary.longest_duration.id, 1);
    }

    #[test]
    fn test_streak_stops_at_gap() {
        let activities: Vec<Activity> = [0, 1, 2, 5]
            .iter()
            .map(|&n| make_activity(n, days_ago(n), 1000.0, 10.0))
            .collect();

        assert_eq!(current_streak(&activities, today()), 3);
    }

    #[test]
    fn test_streak_counts_each_day_once() {
        let activities = vec![
            make_activity(1, days_ago(0), 1000.0, 10.0),
            make_activity(2, days_ago(0), 1000.0, 10.0),
            make_activity(3, days_ago(1), 1000.0, 10.0),
        ];

        assert_eq!(current_streak(&activities, today()), 2);
    }

    #[test]
    fn test_streak_is_zero_without_activity_today() {
        let activities: Vec<Activity> = (1..5)
            .map(|n| make_activity(n, days_ago(n), 1000.0, 10.0))
            .collect();

        assert_eq!(current_streak(&activities, today()), 0);
    }

    #[test]
    fn test_streak_uses_local_date() {
        let mut activity = make_activity(1, days_ago(1), 1000.0, 10.0);
        // Yesterday in UTC, but already today on the athlete's wall clock.
        activity.start_date_local = today().and_hms_opt(1, 30, 0).unwrap();

        assert_eq!(current_streak(&[activity], today()), 1);
    }

    #[test]
    fn test_streak_breaks_on_local_date_after_today() {
        let mut ahead = make_activity(1, today(), 1000.0, 10.0);
        ahead.start_date_local = today().succ_opt().unwrap().and_hms_opt(6, 0, 0).unwrap();
        let activities = vec![
            ahead,
            make_activity(2, today(), 1000.0, 10.0),
            make_activity(3, days_ago(1), 1000.0, 10.0),
        ];

        // `today` must be the athlete's own date; a later local date means
        // the caller's clock is behind.
        assert_eq!(current_streak(&activities, today()), 0);
        assert_eq!(current_streak(&activities, today().succ_opt().unwrap()), 3);
    }

    #[test]
    fn test_consistency_nine_days_is_ten_percent() {
        let activities: Vec<Activity> = [0, 3, 10, 20, 30, 45, 60, 75, 89]
            .iter()
            .map(|&n| make_activity(n, days_ago(n), 1000.0, 10.0))
            .collect();

        assert_eq!(consistency_percent(&activities, today()), 10);
    }

    #[test]
    fn test_consistency_ignores_days_outside_window() {
        let activities = vec![
            make_activity(1, days_ago(0), 1000.0, 10.0),
            make_activity(2, days_ago(0), 1000.0, 10.0),
            make_activity(3, days_ago(90), 1000.0, 10.0),
            make_activity(4, days_ago(400), 1000.0, 10.0),
        ];

        // 1 / 90 = 1.1%
        assert_eq!(consistency_percent(&activities, today()), 1);
    }

    #[test]
    fn test_most_active_month_first_seen_wins_ties() {
        let nov = NaiveDate::from_ymd_opt(2024, 11, 3).unwrap();
        let oct = NaiveDate::from_ymd_opt(2024, 10, 3).unwrap();
        let activities = vec![
            make_activity(1, nov, 1000.0, 10.0),
            make_activity(2, oct, 1000.0, 10.0),
            make_activity(3, oct, 1000.0, 10.0),
            make_activity(4, nov, 1000.0, 10.0),
        ];

        let summary = summarize(&activities, today()).unwrap();

        assert_eq!(summary.most_active_month.label, "Nov 2024");
        assert_eq!(summary.most_active_month.count, 2);
    }

    #[test]
    fn test_yearly_goal_is_capped() {
        let activities = vec![make_activity(1, days_ago(0), 2_500_000.0, 25.0)];
        let summary = summarize(&activities, today()).unwrap();
        assert_eq!(summary.yearly_goal_percent, 100.0);

        let activities = vec![make_activity(1, days_ago(0), 500_000.0, 25.0)];
        let summary = summarize(&activities, today()).unwrap();
        assert!((summary.yearly_goal_percent - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_format_duration_floors() {
        assert_eq!(format_duration(5425), "1h 30m");
        assert_eq!(format_duration(59), "0h 0m");
        assert_eq!(format_duration(7200), "2h 0m");
    }

    #[test]
    fn test_record_cards() {
        let mut long = make_activity(2, days_ago(1), 42_200.0, 12.0);
        long.name = "Marathon".to_string();
        long.moving_time = 5425;
        long.total_elevation_gain = 310.4;
        let activities = vec![make_activity(1, days_ago(0), 5_000.0, 10.0), long];

        let summary = summarize(&activities, today()).unwrap();
        let cards = record_cards(&summary);

        assert_eq!(cards.len(), 8);
        assert_eq!(cards[0].category, RecordCategory::LongestDistance);
        assert_eq!(cards[0].value, "42.20 km");
        assert_eq!(cards[0].subtitle, "Marathon • Nov 14, 2024");
        assert_eq!(cards[1].value, "1h 30m");
        assert_eq!(cards[2].value, "12.0 km/h");
        assert_eq!(cards[3].value, "310 m");
        assert_eq!(cards[5].value, "2 days");
        assert_eq!(cards[5].subtitle, "Keep it going 🔥");
        assert_eq!(cards[6].value, "2%");
        assert_eq!(cards[7].value, "2");
    }
}
