//! Body measurement tools

use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;

use super::{resolve_date, store_err, DeleteResponse};
use crate::engine::buckets::{SeriesPoint, ViewMode};
use crate::engine::metrics::{bmi, BmiResult};
use crate::engine::trends::metric_trend;
use crate::models::{new_id, BodyMeasurement, BodyMetric};
use crate::store::RecordStore;

/// Values for a new or edited measurement
#[derive(Debug, Clone, Default)]
pub struct MeasurementInput {
    /// Existing id to replace; a new id is generated when absent
    pub id: Option<String>,
    pub date: Option<String>,
    pub weight: f64,
    pub height: Option<f64>,
    pub chest: Option<f64>,
    pub waist: Option<f64>,
    pub belly: Option<f64>,
    pub hips: Option<f64>,
    pub arms_left: Option<f64>,
    pub arms_right: Option<f64>,
    pub thighs_left: Option<f64>,
    pub thighs_right: Option<f64>,
    pub neck: Option<f64>,
}

/// Response for save_measurement
#[derive(Debug, Serialize)]
pub struct SaveMeasurementResponse {
    pub created: bool,
    pub measurement: BodyMeasurement,
    pub bmi: BmiResult,
}

/// Measurement with its BMI, for listing
#[derive(Debug, Serialize)]
pub struct MeasurementSummary {
    #[serde(flatten)]
    pub measurement: BodyMeasurement,
    pub bmi: BmiResult,
}

impl From<BodyMeasurement> for MeasurementSummary {
    fn from(m: BodyMeasurement) -> Self {
        let bmi = bmi(m.weight, m.height);
        Self { measurement: m, bmi }
    }
}

/// Response for list_measurements
#[derive(Debug, Serialize)]
pub struct ListMeasurementsResponse {
    pub measurements: Vec<MeasurementSummary>,
    pub total: usize,
}

/// Response for get_metric_trend
#[derive(Debug, Serialize)]
pub struct MetricTrendResponse {
    pub metric: BodyMetric,
    pub metric_display: &'static str,
    pub unit: &'static str,
    pub view: ViewMode,
    pub points: Vec<SeriesPoint>,
}

fn check_optional(name: &str, value: Option<f64>) -> Result<(), String> {
    match value {
        Some(v) if !v.is_finite() || v < 0.0 => Err(format!("{} must be a non-negative number", name)),
        _ => Ok(()),
    }
}

/// Create a measurement, or fully replace the one with the same id
pub fn save_measurement(
    store: &dyn RecordStore,
    input: MeasurementInput,
    today: NaiveDate,
) -> Result<SaveMeasurementResponse, String> {
    if !input.weight.is_finite() || input.weight <= 0.0 {
        return Err("Weight must be greater than 0".to_string());
    }
    check_optional("height", input.height)?;
    for (name, value) in [
        ("chest", input.chest),
        ("waist", input.waist),
        ("belly", input.belly),
        ("hips", input.hips),
        ("arms_left", input.arms_left),
        ("arms_right", input.arms_right),
        ("thighs_left", input.thighs_left),
        ("thighs_right", input.thighs_right),
        ("neck", input.neck),
    ] {
        check_optional(name, value)?;
    }

    let date = resolve_date(input.date.as_deref(), today)?;
    let id = input
        .id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(new_id);

    let existed = store
        .get_measurement(&id)
        .map_err(store_err("Failed to look up measurement"))?
        .is_some();

    let measurement = BodyMeasurement {
        id,
        date,
        weight: input.weight,
        height: input.height.unwrap_or(0.0),
        chest: input.chest,
        waist: input.waist,
        belly: input.belly,
        hips: input.hips,
        arms_left: input.arms_left,
        arms_right: input.arms_right,
        thighs_left: input.thighs_left,
        thighs_right: input.thighs_right,
        neck: input.neck,
    };

    store
        .upsert_measurement(&measurement)
        .map_err(store_err("Failed to save measurement"))?;

    info!(id = %measurement.id, date = %measurement.date, replaced = existed, "Saved measurement");

    Ok(SaveMeasurementResponse {
        created: !existed,
        bmi: bmi(measurement.weight, measurement.height),
        measurement,
    })
}

/// List all measurements, newest date first
pub fn list_measurements(store: &dyn RecordStore) -> Result<ListMeasurementsResponse, String> {
    let measurements: Vec<MeasurementSummary> = store
        .list_measurements()
        .map_err(store_err("Failed to list measurements"))?
        .into_iter()
        .map(MeasurementSummary::from)
        .collect();

    let total = measurements.len();
    Ok(ListMeasurementsResponse { measurements, total })
}

pub fn get_measurement(store: &dyn RecordStore, id: &str) -> Result<Option<MeasurementSummary>, String> {
    let m = store
        .get_measurement(id)
        .map_err(store_err("Failed to get measurement"))?;
    Ok(m.map(MeasurementSummary::from))
}

pub fn delete_measurement(store: &dyn RecordStore, id: &str) -> Result<DeleteResponse, String> {
    let deleted = store
        .delete_measurement(id)
        .map_err(store_err("Failed to delete measurement"))?;

    if !deleted {
        return Err(format!("Measurement {} not found", id));
    }

    info!(id = %id, "Deleted measurement");
    Ok(DeleteResponse {
        success: true,
        deleted_id: id.to_string(),
    })
}

/// BMI for a weight/height pair without saving anything
pub fn preview_bmi(weight: f64, height: f64) -> BmiResult {
    bmi(weight, height)
}

/// Chart series for one metric
pub fn get_metric_trend(
    store: &dyn RecordStore,
    metric: &str,
    view: &str,
) -> Result<MetricTrendResponse, String> {
    let metric = BodyMetric::from_str(metric).ok_or_else(|| {
        let known: Vec<&str> = BodyMetric::ALL.iter().map(|m| m.as_str()).collect();
        format!("Unknown metric '{}'. Expected one of: {}", metric, known.join(", "))
    })?;
    let view = ViewMode::from_str(view)
        .ok_or_else(|| format!("Unknown view '{}'. Expected daily, weekly or monthly", view))?;

    let measurements = store
        .list_measurements()
        .map_err(store_err("Failed to list measurements"))?;

    Ok(MetricTrendResponse {
        metric,
        metric_display: metric.display_name(),
        unit: metric.unit(),
        view,
        points: metric_trend(&measurements, metric, view),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::BmiCategory;
    use crate::store::MemoryStore;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, 16).unwrap()
    }

    fn input(weight: f64) -> MeasurementInput {
        MeasurementInput {
            weight,
            height: Some(175.0),
            ..Default::default()
        }
    }

    #[test]
    fn test_save_defaults_date_and_id() {
        let store = MemoryStore::new();
        let resp = save_measurement(&store, input(70.0), today()).unwrap();

        assert!(resp.created);
        assert_eq!(resp.measurement.date, "2025-10-16");
        assert!(!resp.measurement.id.is_empty());
        assert_eq!(resp.bmi.value, 22.9);
        assert_eq!(resp.bmi.category, BmiCategory::Normal);
    }

    #[test]
    fn test_save_replaces_existing_id() {
        let store = MemoryStore::new();
        let first = save_measurement(&store, input(70.0), today()).unwrap();

        let mut edit = input(69.0);
        edit.id = Some(first.measurement.id.clone());
        edit.date = Some("2025-10-15".into());
        let second = save_measurement(&store, edit, today()).unwrap();

        assert!(!second.created);
        let list = list_measurements(&store).unwrap();
        assert_eq!(list.total, 1);
        assert_eq!(list.measurements[0].measurement.weight, 69.0);
        assert_eq!(list.measurements[0].measurement.date, "2025-10-15");
    }

    #[test]
    fn test_save_rejects_bad_input() {
        let store = MemoryStore::new();
        assert!(save_measurement(&store, input(0.0), today()).is_err());
        assert!(save_measurement(&store, input(-3.0), today()).is_err());

        let mut bad_date = input(70.0);
        bad_date.date = Some("16/10/2025".into());
        assert!(save_measurement(&store, bad_date, today()).is_err());

        let mut bad_waist = input(70.0);
        bad_waist.waist = Some(-1.0);
        assert!(save_measurement(&store, bad_waist, today()).is_err());

        assert_eq!(list_measurements(&store).unwrap().total, 0);
    }

    #[test]
    fn test_missing_height_is_zero_and_bmi_unknown() {
        let store = MemoryStore::new();
        let resp = save_measurement(
            &store,
            MeasurementInput {
                weight: 70.0,
                ..Default::default()
            },
            today(),
        )
        .unwrap();
        assert_eq!(resp.measurement.height, 0.0);
        assert_eq!(resp.bmi.category, BmiCategory::Unknown);
    }

    #[test]
    fn test_delete() {
        let store = MemoryStore::new();
        let resp = save_measurement(&store, input(70.0), today()).unwrap();
        let id = resp.measurement.id;

        assert!(get_measurement(&store, &id).unwrap().is_some());
        assert!(delete_measurement(&store, &id).unwrap().success);
        assert!(delete_measurement(&store, &id).is_err());
        assert!(get_measurement(&store, &id).unwrap().is_none());
    }

    #[test]
    fn test_metric_trend_tool() {
        let store = MemoryStore::new();
        for (date, waist) in [("2025-10-13", 90.0), ("2025-10-14", 88.0)] {
            let mut m = input(70.0);
            m.date = Some(date.into());
            m.waist = Some(waist);
            save_measurement(&store, m, today()).unwrap();
        }

        let resp = get_metric_trend(&store, "waist", "weekly").unwrap();
        assert_eq!(resp.unit, "cm");
        assert_eq!(resp.points.len(), 1);
        assert_eq!(resp.points[0].value, 89.0);

        assert!(get_metric_trend(&store, "height", "weekly").is_err());
        assert!(get_metric_trend(&store, "waist", "hourly").is_err());
    }
}
