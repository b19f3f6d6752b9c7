//! Body-metric trend extraction

use chrono::NaiveDate;

use super::buckets::{parse_day, period_means, short_date_label, SeriesPoint, ViewMode};
use crate::models::{BodyMeasurement, BodyMetric};

/// Points shown by the dashboard weight-progress chart
pub const WEIGHT_PROGRESS_POINTS: usize = 5;

/// Measurements with a parseable date, oldest first. Same-date records
/// keep their relative order.
fn chronological(measurements: &[BodyMeasurement]) -> Vec<(NaiveDate, &BodyMeasurement)> {
    let mut dated: Vec<(NaiveDate, &BodyMeasurement)> = measurements
        .iter()
        .filter_map(|m| parse_day(&m.date).map(|d| (d, m)))
        .collect();
    dated.sort_by_key(|(date, _)| *date);
    dated
}

/// Chartable series for one metric.
///
/// Daily view gives one raw point per measurement carrying the metric.
/// Weekly and monthly views give the rounded mean per bucket, omitting
/// buckets where no measurement carried the metric.
pub fn metric_trend(
    measurements: &[BodyMeasurement],
    metric: BodyMetric,
    view: ViewMode,
) -> Vec<SeriesPoint> {
    let sorted = chronological(measurements);

    match view {
        ViewMode::Daily => sorted
            .into_iter()
            .filter_map(|(date, m)| {
                m.metric(metric).map(|value| SeriesPoint {
                    label: short_date_label(date),
                    value,
                })
            })
            .collect(),
        ViewMode::Weekly | ViewMode::Monthly => {
            let values = sorted
                .into_iter()
                .filter_map(|(date, m)| m.metric(metric).map(|v| (date, v)));
            period_means(values, view)
        }
    }
}

/// Last few raw weights, oldest first, independent of any view mode
pub fn weight_progress(measurements: &[BodyMeasurement]) -> Vec<SeriesPoint> {
    let sorted = chronological(measurements);
    let skip = sorted.len().saturating_sub(WEIGHT_PROGRESS_POINTS);

    sorted
        .into_iter()
        .skip(skip)
        .map(|(date, m)| SeriesPoint {
            label: short_date_label(date),
            value: m.weight,
        })
        .collect()
}
