// SPDX-License-Identifier: MIT

//! Personal record cards for display.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Which record a card shows. Display metadata (icon, colors) is looked up
/// from this tag at the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum RecordCategory {
    LongestDistance,
    LongestDuration,
    FastestLongRide,
    BiggestClimb,
    MostActiveMonth,
    CurrentStreak,
    Consistency,
    TotalActivities,
}

/// A formatted personal record card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RecordSummary {
    pub title: String,
    pub value: String,
    pub subtitle: String,
    pub category: RecordCategory,
}
