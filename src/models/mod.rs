// SPDX-License-Identifier: MIT

//! Data models for the application.

pub mod activity;
pub mod geometry;
pub mod record;
pub mod stats;
pub mod token;

pub use activity::{Activity, ActivityMap, ActivityType};
pub use geometry::{BoundingBox, Coordinate};
pub use record::{RecordCategory, RecordSummary};
pub use stats::{ActivityHighlight, ActivityStats, Averages, PeriodCount, Summary, Totals};
pub use token::TokenPair;
