//! Date bucketing
//!
//! Groups dated records into the time buckets used by activity and trend
//! charts. Dates are calendar days in `YYYY-MM-DD` form; anything that
//! does not parse is left out of grouped views.

use std::collections::HashMap;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::WorkoutLog;

/// Days shown by the daily view
pub const DAILY_WINDOW: i64 = 7;
/// Most recent weeks kept by the weekly view
pub const WEEKLY_LIMIT: usize = 8;
/// Most recent months kept by the monthly view
pub const MONTHLY_LIMIT: usize = 6;

/// Chart granularity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Daily,
    Weekly,
    Monthly,
}

impl ViewMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::Daily => "daily",
            ViewMode::Weekly => "weekly",
            ViewMode::Monthly => "monthly",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "daily" | "day" => Some(ViewMode::Daily),
            "weekly" | "week" => Some(ViewMode::Weekly),
            "monthly" | "month" => Some(ViewMode::Monthly),
            _ => None,
        }
    }
}

/// Number of records falling in a bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountBucket {
    pub label: String,
    pub count: u32,
}

/// One charted value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub label: String,
    pub value: f64,
}

/// Parse a `YYYY-MM-DD` calendar day
pub fn parse_day(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

/// `YYYY-MM-DD` form of a day
pub fn day_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Monday of the week containing `date`. Sunday belongs to the week that
/// started six days earlier.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// "Oct 5"
pub fn short_date_label(date: NaiveDate) -> String {
    date.format("%b %-d").to_string()
}

/// "Oct 26"
pub fn month_label(date: NaiveDate) -> String {
    date.format("%b %y").to_string()
}

/// "Mon"
pub fn weekday_label(date: NaiveDate) -> String {
    date.format("%a").to_string()
}

/// Round to one decimal place
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Identifies a weekly or monthly bucket. Keyed on the period itself so
/// that equal labels from different years stay apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum PeriodKey {
    Week(NaiveDate),
    Month(i32, u32),
}

impl PeriodKey {
    fn of(date: NaiveDate, view: ViewMode) -> Self {
        match view {
            ViewMode::Monthly => PeriodKey::Month(date.year(), date.month()),
            _ => PeriodKey::Week(week_start(date)),
        }
    }

    fn label(&self, date: NaiveDate) -> String {
        match self {
            PeriodKey::Week(monday) => short_date_label(*monday),
            PeriodKey::Month(..) => month_label(date),
        }
    }
}

fn period_limit(view: ViewMode) -> usize {
    match view {
        ViewMode::Monthly => MONTHLY_LIMIT,
        _ => WEEKLY_LIMIT,
    }
}

/// Group dated values into weekly or monthly buckets.
///
/// Records are stably sorted by date first, so buckets come out in
/// chronological order of first appearance. Only the most recent
/// `WEEKLY_LIMIT` or `MONTHLY_LIMIT` buckets are returned. Daily view is
/// treated as weekly here; callers handle the daily window themselves.
pub fn group_by_period<T>(
    records: impl IntoIterator<Item = (NaiveDate, T)>,
    view: ViewMode,
) -> Vec<(String, Vec<T>)> {
    let mut records: Vec<(NaiveDate, T)> = records.into_iter().collect();
    records.sort_by_key(|(date, _)| *date);

    let mut index: HashMap<PeriodKey, usize> = HashMap::new();
    let mut groups: Vec<(String, Vec<T>)> = Vec::new();

    for (date, value) in records {
        let key = PeriodKey::of(date, view);
        let slot = *index.entry(key).or_insert_with(|| {
            groups.push((key.label(date), Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(value);
    }

    let skip = groups.len().saturating_sub(period_limit(view));
    groups.split_off(skip)
}

/// Workout counts for each of the last seven days ending `today`.
///
/// Always seven entries, oldest first, matched on exact date string.
pub fn daily_activity(workouts: &[WorkoutLog], today: NaiveDate) -> Vec<CountBucket> {
    (0..DAILY_WINDOW)
        .rev()
        .map(|offset| {
            let day = today - Duration::days(offset);
            let key = day_key(day);
            let count = workouts.iter().filter(|w| w.date == key).count() as u32;
            CountBucket {
                label: weekday_label(day),
                count,
            }
        })
        .collect()
}

/// Workout counts per bucket for the chosen view
pub fn activity_counts(workouts: &[WorkoutLog], view: ViewMode, today: NaiveDate) -> Vec<CountBucket> {
    match view {
        ViewMode::Daily => daily_activity(workouts, today),
        ViewMode::Weekly | ViewMode::Monthly => {
            let dated = workouts.iter().filter_map(|w| parse_day(&w.date).map(|d| (d, ())));
            group_by_period(dated, view)
                .into_iter()
                .map(|(label, items)| CountBucket {
                    label,
                    count: items.len() as u32,
                })
                .collect()
        }
    }
}

/// Mean of each bucket's values, rounded to one decimal. Buckets without
/// values never appear.
pub fn period_means(
    values: impl IntoIterator<Item = (NaiveDate, f64)>,
    view: ViewMode,
) -> Vec<SeriesPoint> {
    group_by_period(values, view)
        .into_iter()
        .filter(|(_, vals)| !vals.is_empty())
        .map(|(label, vals)| {
            let mean = vals.iter().sum::<f64>() / vals.len() as f64;
            SeriesPoint {
                label,
                value: round1(mean),
            }
        })
        .collect()
}
