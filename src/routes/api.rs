// SPDX-License-Identifier: MIT

//! API routes for the dashboard (require a Strava access token).

use crate::error::{AppError, Result};
use crate::middleware::AuthToken;
use crate::models::{
    Activity, ActivityStats, ActivityType, BoundingBox, Coordinate, RecordCategory, RecordSummary,
    Summary,
};
use crate::services::{
    activity::{all_coordinates, decode_routes},
    geometry, load_activities, records, ActivityFilter, ACTIVITY_LIMITS,
};
use crate::time_utils::parse_date;
use crate::AppState;
use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use chrono::{NaiveDate, Utc};
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// API routes. The token middleware is applied in routes/mod.rs.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/activities", get(get_activities))
        .route("/api/dashboard", get(get_dashboard))
        .route("/api/records", get(get_records))
        .route("/api/routes.geojson", get(get_routes_geojson))
}

// ─── Activities Proxy ────────────────────────────────────────

#[derive(Deserialize)]
struct ActivitiesQuery {
    /// Pagination: page number (1-indexed)
    #[serde(default = "default_page")]
    page: u32,
    /// Pagination: items per page
    #[serde(default = "default_per_page")]
    per_page: u32,
}

fn default_page() -> u32 {
    1
}
fn default_per_page() -> u32 {
    30
}

const MAX_PER_PAGE: u32 = 200;

/// Proxy one page of the athlete's activities from Strava.
async fn get_activities(
    State(state): State<Arc<AppState>>,
    Extension(token): Extension<AuthToken>,
    Query(params): Query<ActivitiesQuery>,
) -> Result<Json<Vec<Activity>>> {
    if params.page < 1 {
        return Err(AppError::BadRequest(
            "Page must be greater than 0".to_string(),
        ));
    }
    if params.per_page < 1 {
        return Err(AppError::BadRequest(
            "per_page must be greater than 0".to_string(),
        ));
    }
    let per_page = params.per_page.min(MAX_PER_PAGE);

    tracing::debug!(page = params.page, per_page, "Proxying activities page");

    let activities = state
        .strava
        .list_activities(&token.access_token, params.page, per_page)
        .await?;

    Ok(Json(activities))
}

// ─── Shared Filtering ────────────────────────────────────────

#[derive(Deserialize)]
struct FilterQuery {
    /// Comma-separated activity types, e.g. "Run,Ride"
    types: Option<String>,
    /// Start date (YYYY-MM-DD)
    start: Option<String>,
    /// End date (YYYY-MM-DD), inclusive
    end: Option<String>,
    /// How many activities to load from Strava (one of `ACTIVITY_LIMITS`)
    limit: Option<usize>,
    /// The athlete's local date (YYYY-MM-DD); streaks count back from it
    today: Option<String>,
}

impl FilterQuery {
    fn to_filter(&self) -> Result<ActivityFilter> {
        ActivityFilter::from_query(
            self.types.as_deref(),
            self.start.as_deref(),
            self.end.as_deref(),
        )
    }

    fn activity_limit(&self) -> Result<Option<usize>> {
        match self.limit {
            Some(limit) if !ACTIVITY_LIMITS.contains(&limit) => Err(AppError::BadRequest(format!(
                "Invalid 'limit' parameter: must be one of {:?}",
                ACTIVITY_LIMITS
            ))),
            limit => Ok(limit),
        }
    }

    /// The athlete's date, or the current UTC date when not given.
    fn today(&self) -> Result<NaiveDate> {
        match self.today.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            None => Ok(Utc::now().date_naive()),
            Some(raw) => parse_date(raw).ok_or_else(|| {
                AppError::BadRequest("Invalid 'today' parameter: must be YYYY-MM-DD".to_string())
            }),
        }
    }
}

/// Activities after filtering, plus load metadata.
struct FilteredActivities {
    activities: Vec<Activity>,
    total_count: usize,
    demo: bool,
}

async fn load_filtered(
    state: &AppState,
    token: &AuthToken,
    query: &FilterQuery,
) -> Result<FilteredActivities> {
    // Validate before hitting Strava
    let filter = query.to_filter()?;
    let limit = query.activity_limit()?;

    let loaded = load_activities(&state.strava, &token.access_token, limit).await;
    let activities = filter.apply(&loaded.activities);

    tracing::debug!(
        total = loaded.activities.len(),
        shown = activities.len(),
        demo = loaded.demo,
        "Loaded activities"
    );

    Ok(FilteredActivities {
        total_count: loaded.activities.len(),
        activities,
        demo: loaded.demo,
    })
}

// ─── Dashboard ───────────────────────────────────────────────

/// Map line color per activity type.
fn route_color(activity_type: &ActivityType) -> &'static str {
    match activity_type {
        ActivityType::Run => "#FC4C02",
        ActivityType::Ride => "#3B82F6",
        ActivityType::Walk => "#10B981",
        _ => "#6B7280",
    }
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RouteView {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub id: u64,
    pub name: String,
    pub activity_type: String,
    pub color: String,
    pub coordinates: Vec<Coordinate>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DashboardResponse {
    /// True when showing demo data because Strava couldn't be reached
    pub demo: bool,
    /// Activities loaded before filtering
    pub total_count: u32,
    /// Activities matching the filter
    pub shown_count: u32,
    pub stats: ActivityStats,
    pub routes: Vec<RouteView>,
    /// Box around every route, for the initial map view
    pub bounds: Option<BoundingBox>,
    pub center: Option<Coordinate>,
}

/// Stats, decoded routes and map framing for the filtered activities.
async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Extension(token): Extension<AuthToken>,
    Query(query): Query<FilterQuery>,
) -> Result<Json<DashboardResponse>> {
    let loaded = load_filtered(&state, &token, &query).await?;

    let routes = decode_routes(&loaded.activities);
    let coords = all_coordinates(&routes);

    Ok(Json(DashboardResponse {
        demo: loaded.demo,
        total_count: loaded.total_count as u32,
        shown_count: loaded.activities.len() as u32,
        stats: ActivityStats::from_activities(&loaded.activities),
        bounds: geometry::bounds(&coords),
        center: geometry::centroid(&coords),
        routes: routes
            .into_iter()
            .map(|r| RouteView {
                id: r.id,
                name: r.name,
                color: route_color(&r.activity_type).to_string(),
                activity_type: r.activity_type.to_string(),
                coordinates: r.coordinates,
            })
            .collect(),
    }))
}

// ─── Personal Records ────────────────────────────────────────

/// Icon and colors for a record card.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DisplayMeta {
    pub icon: String,
    pub color: String,
    pub bg_color: String,
}

fn display_meta(category: RecordCategory) -> DisplayMeta {
    let (icon, color) = match category {
        RecordCategory::LongestDistance => ("trophy", "yellow"),
        RecordCategory::LongestDuration => ("clock", "emerald"),
        RecordCategory::FastestLongRide => ("zap", "blue"),
        RecordCategory::BiggestClimb => ("mountain", "green"),
        RecordCategory::MostActiveMonth => ("calendar", "purple"),
        RecordCategory::CurrentStreak => ("flame", "orange"),
        RecordCategory::Consistency => ("target", "pink"),
        RecordCategory::TotalActivities => ("award", "red"),
    };
    DisplayMeta {
        icon: icon.to_string(),
        color: format!("text-{}-600", color),
        bg_color: format!("bg-{}-50", color),
    }
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RecordCard {
    #[serde(flatten)]
    #[cfg_attr(feature = "binding-generation", ts(flatten))]
    pub record: RecordSummary,
    pub display: DisplayMeta,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RecordsResponse {
    pub demo: bool,
    /// `None` when no activities match
    pub summary: Option<Summary>,
    pub records: Vec<RecordCard>,
}

/// Personal records and lifetime stats for the filtered activities.
async fn get_records(
    State(state): State<Arc<AppState>>,
    Extension(token): Extension<AuthToken>,
    Query(query): Query<FilterQuery>,
) -> Result<Json<RecordsResponse>> {
    let today = query.today()?;
    let loaded = load_filtered(&state, &token, &query).await?;

    let summary = records::summarize(&loaded.activities, today);

    let cards = summary
        .as_ref()
        .map(records::record_cards)
        .unwrap_or_default()
        .into_iter()
        .map(|record| RecordCard {
            display: display_meta(record.category),
            record,
        })
        .collect();

    Ok(Json(RecordsResponse {
        demo: loaded.demo,
        summary,
        records: cards,
    }))
}

// ─── GeoJSON ─────────────────────────────────────────────────

/// Decoded routes as a GeoJSON FeatureCollection of LineStrings.
async fn get_routes_geojson(
    State(state): State<Arc<AppState>>,
    Extension(token): Extension<AuthToken>,
    Query(query): Query<FilterQuery>,
) -> Result<impl IntoResponse> {
    let loaded = load_filtered(&state, &token, &query).await?;
    let routes = decode_routes(&loaded.activities);
    let coords = all_coordinates(&routes);

    let features = routes
        .into_iter()
        .map(|r| {
            let mut properties = JsonObject::new();
            properties.insert("name".to_string(), r.name.into());
            properties.insert("type".to_string(), r.activity_type.to_string().into());
            properties.insert("color".to_string(), route_color(&r.activity_type).into());

            let line = r.coordinates.iter().map(|c| vec![c.lng, c.lat]).collect();
            Feature {
                bbox: None,
                geometry: Some(Geometry::new(Value::LineString(line))),
                id: Some(geojson::feature::Id::Number(r.id.into())),
                properties: Some(properties),
                foreign_members: None,
            }
        })
        .collect();

    let collection = FeatureCollection {
        bbox: geometry::bounds(&coords).map(|b| {
            let (min_lat, min_lng, max_lat, max_lng) = b.as_tuple();
            vec![min_lng, min_lat, max_lng, max_lat]
        }),
        features,
        foreign_members: None,
    };

    Ok((
        [(header::CONTENT_TYPE, "application/geo+json")],
        Json(collection),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_colors() {
        assert_eq!(route_color(&ActivityType::Run), "#FC4C02");
        assert_eq!(route_color(&ActivityType::Ride), "#3B82F6");
        assert_eq!(route_color(&ActivityType::Walk), "#10B981");
        assert_eq!(route_color(&ActivityType::Swim), "#6B7280");
        assert_eq!(
            route_color(&ActivityType::Other("Kayaking".to_string())),
            "#6B7280"
        );
    }

    #[test]
    fn test_display_meta() {
        let meta = display_meta(RecordCategory::CurrentStreak);
        assert_eq!(meta.icon, "flame");
        assert_eq!(meta.color, "text-orange-600");
        assert_eq!(meta.bg_color, "bg-orange-50");
    }

    #[test]
    fn test_record_card_flattens_summary() {
        let card = RecordCard {
            record: RecordSummary {
                title: "Consistency".to_string(),
                value: "10%".to_string(),
                subtitle: "Active in last 90 days".to_string(),
                category: RecordCategory::Consistency,
            },
            display: display_meta(RecordCategory::Consistency),
        };

        let json = serde_json::to_value(&card).unwrap();

        assert_eq!(json["title"], "Consistency");
        assert_eq!(json["category"], "consistency");
        assert_eq!(json["display"]["icon"], "target");
    }
}
