//! Dashboard and activity tools

use chrono::NaiveDate;
use serde::Serialize;

use super::store_err;
use crate::engine::buckets::{activity_counts, day_key, CountBucket, ViewMode};
use crate::engine::dashboard::{build_dashboard, DashboardInput, DashboardSummary};
use crate::store::RecordStore;

/// Response for get_workout_activity
#[derive(Debug, Serialize)]
pub struct ActivityResponse {
    pub view: ViewMode,
    pub buckets: Vec<CountBucket>,
}

pub fn parse_view(view: Option<&str>) -> Result<ViewMode, String> {
    match view {
        None => Ok(ViewMode::Daily),
        Some(v) => ViewMode::from_str(v)
            .ok_or_else(|| format!("Unknown view '{}'. Expected daily, weekly or monthly", v)),
    }
}

/// Today's dashboard, with workout activity in the requested view
pub fn get_dashboard(
    store: &dyn RecordStore,
    view: Option<&str>,
    today: NaiveDate,
) -> Result<DashboardSummary, String> {
    let view = parse_view(view)?;

    let measurements = store
        .list_measurements()
        .map_err(store_err("Failed to list measurements"))?;
    let workouts = store
        .list_workouts()
        .map_err(store_err("Failed to list workouts"))?;
    let meals = store.list_meals().map_err(store_err("Failed to list meals"))?;
    let water = store
        .water_for_date(&day_key(today))
        .map_err(store_err("Failed to get water log"))?;
    let profile = store
        .get_profile()
        .map_err(store_err("Failed to get profile"))?;

    let input = DashboardInput {
        measurements: &measurements,
        workouts: &workouts,
        meals: &meals,
        water: &water,
        profile: &profile,
    };

    Ok(build_dashboard(&input, view, today))
}

pub fn get_workout_activity(
    store: &dyn RecordStore,
    view: Option<&str>,
    today: NaiveDate,
) -> Result<ActivityResponse, String> {
    let view = parse_view(view)?;
    let workouts = store
        .list_workouts()
        .map_err(store_err("Failed to list workouts"))?;

    Ok(ActivityResponse {
        view,
        buckets: activity_counts(&workouts, view, today),
    })
}
