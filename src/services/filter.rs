// SPDX-License-Identifier: MIT

//! Activity filtering by type and date range.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use crate::error::{AppError, Result};
use crate::models::{Activity, ActivityType};
use crate::time_utils::parse_date;

/// Activity filter. Empty/unset fields don't restrict anything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActivityFilter {
    pub activity_types: Vec<ActivityType>,
    /// Keep activities starting on or after this date (UTC)
    pub start: Option<NaiveDate>,
    /// Keep activities starting on or before the end of this date (UTC)
    pub end: Option<NaiveDate>,
}

impl ActivityFilter {
    /// Build a filter from query-string values: a comma-separated type list
    /// and `YYYY-MM-DD` dates. Blank values are ignored.
    pub fn from_query(types: Option<&str>, start: Option<&str>, end: Option<&str>) -> Result<Self> {
        let activity_types = types
            .unwrap_or("")
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(ActivityType::from)
            .collect();

        let start = parse_bound("start", start)?;
        let end = parse_bound("end", end)?;

        if let (Some(s), Some(e)) = (start, end) {
            if s > e {
                return Err(AppError::BadRequest(
                    "'start' must not be after 'end'".to_string(),
                ));
            }
        }

        Ok(Self {
            activity_types,
            start,
            end,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.activity_types.is_empty() && self.start.is_none() && self.end.is_none()
    }

    pub fn matches(&self, activity: &Activity) -> bool {
        if !self.activity_types.is_empty() && !self.activity_types.contains(&activity.activity_type)
        {
            return false;
        }
        if let Some(start) = self.start {
            if activity.start_date < start_of_day(start) {
                return false;
            }
        }
        if let Some(end) = self.end {
            if activity.start_date > end_of_day(end) {
                return false;
            }
        }
        true
    }

    /// Activities that pass the filter, in input order.
    pub fn apply(&self, activities: &[Activity]) -> Vec<Activity> {
        if self.is_empty() {
            return activities.to_vec();
        }
        activities
            .iter()
            .filter(|a| self.matches(a))
            .cloned()
            .collect()
    }
}

fn parse_bound(name: &str, raw: Option<&str>) -> Result<Option<NaiveDate>> {
    match raw.map(str::trim).filter(|r| !r.is_empty()) {
        None => Ok(None),
        Some(value) => parse_date(value).map(Some).ok_or_else(|| {
            AppError::BadRequest(format!("Invalid '{}' parameter: must be YYYY-MM-DD", name))
        }),
    }
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

fn end_of_day(date: NaiveDate) -> DateTime<Utc> {
    // 23:59:59.999 includes the whole end day
    let last_ms = NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN);
    date.and_time(last_ms).and_utc()
}
