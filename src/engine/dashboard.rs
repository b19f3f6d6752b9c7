//! Dashboard summary
//!
//! Combines the per-day metrics and chart series shown on the dashboard.

use chrono::NaiveDate;
use serde::Serialize;

use super::buckets::{activity_counts, day_key, CountBucket, SeriesPoint, ViewMode};
use super::metrics::{calorie_balance, hydration, weight_change, CalorieBalance, Hydration, WeightChange};
use super::trends::weight_progress;
use crate::models::{BodyMeasurement, MealLog, UserProfile, WaterLog, WorkoutLog};

/// Snapshot of everything the dashboard needs, taken from the store
pub struct DashboardInput<'a> {
    pub measurements: &'a [BodyMeasurement],
    pub workouts: &'a [WorkoutLog],
    pub meals: &'a [MealLog],
    /// Today's log, or an empty one carrying the profile goal
    pub water: &'a WaterLog,
    pub profile: &'a UserProfile,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub date: String,
    pub profile_name: String,
    pub water: Hydration,
    pub calories: CalorieBalance,
    pub weight: WeightChange,
    pub weight_progress: Vec<SeriesPoint>,
    pub activity_view: ViewMode,
    pub activity: Vec<CountBucket>,
    pub workouts_today: usize,
    pub meals_today: usize,
}

pub fn build_dashboard(input: &DashboardInput<'_>, view: ViewMode, today: NaiveDate) -> DashboardSummary {
    let date = day_key(today);

    DashboardSummary {
        water: hydration(input.water.glasses, input.water.goal),
        calories: calorie_balance(input.meals, input.workouts, input.profile, &date),
        weight: weight_change(input.measurements),
        weight_progress: weight_progress(input.measurements),
        activity_view: view,
        activity: activity_counts(input.workouts, view, today),
        workouts_today: input.workouts.iter().filter(|w| w.date == date).count(),
        meals_today: input.meals.iter().filter(|m| m.date == date).count(),
        profile_name: input.profile.name.clone(),
        date,
    }
}
