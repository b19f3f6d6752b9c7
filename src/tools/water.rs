//! Water intake tools

use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;

use super::{resolve_date, store_err, DeleteResponse};
use crate::engine::buckets::{day_key, parse_day};
use crate::engine::metrics::{hydration, Hydration};
use crate::models::WaterLog;
use crate::store::RecordStore;

/// Water log for a day with its hydration figures
#[derive(Debug, Serialize)]
pub struct WaterResponse {
    pub date: String,
    pub hydration: Hydration,
    /// False when no glass was ever logged for the day
    pub stored: bool,
}

impl WaterResponse {
    fn new(log: WaterLog, stored: bool) -> Self {
        Self {
            hydration: hydration(log.glasses, log.goal),
            date: log.date,
            stored,
        }
    }
}

/// Response for list_water_logs
#[derive(Debug, Serialize)]
pub struct ListWaterResponse {
    pub logs: Vec<WaterLog>,
    pub total: usize,
}

/// The day's log, defaulting to zero glasses and the profile goal
pub fn get_water(store: &dyn RecordStore, date: Option<&str>, today: NaiveDate) -> Result<WaterResponse, String> {
    let date = resolve_date(date, today)?;
    let stored = store
        .get_water_log(&date)
        .map_err(store_err("Failed to get water log"))?;

    match stored {
        Some(log) => Ok(WaterResponse::new(log, true)),
        None => {
            let log = store
                .water_for_date(&date)
                .map_err(store_err("Failed to get water log"))?;
            Ok(WaterResponse::new(log, false))
        }
    }
}

/// Add (or remove, with a negative change) glasses; never below zero
pub fn adjust_water(
    store: &dyn RecordStore,
    date: Option<&str>,
    change: i64,
    today: NaiveDate,
) -> Result<WaterResponse, String> {
    let date = resolve_date(date, today)?;
    let current = store
        .water_for_date(&date)
        .map_err(store_err("Failed to get water log"))?;

    let updated = current.adjusted(change);
    store
        .upsert_water_log(&updated)
        .map_err(store_err("Failed to save water log"))?;

    info!(date = %updated.date, glasses = updated.glasses, "Updated water intake");
    Ok(WaterResponse::new(updated, true))
}

/// Set the glass count outright
pub fn set_water(
    store: &dyn RecordStore,
    date: Option<&str>,
    glasses: u32,
    today: NaiveDate,
) -> Result<WaterResponse, String> {
    let date = resolve_date(date, today)?;
    let current = store
        .water_for_date(&date)
        .map_err(store_err("Failed to get water log"))?;

    let updated = WaterLog { glasses, ..current };
    store
        .upsert_water_log(&updated)
        .map_err(store_err("Failed to save water log"))?;

    info!(date = %updated.date, glasses = updated.glasses, "Set water intake");
    Ok(WaterResponse::new(updated, true))
}

pub fn list_water_logs(store: &dyn RecordStore) -> Result<ListWaterResponse, String> {
    let logs = store
        .list_water_logs()
        .map_err(store_err("Failed to list water logs"))?;
    let total = logs.len();
    Ok(ListWaterResponse { logs, total })
}

/// Clear a day's log; the day falls back to zero glasses and the current goal
pub fn delete_water_log(store: &dyn RecordStore, date: &str) -> Result<DeleteResponse, String> {
    let date = parse_day(date.trim())
        .map(day_key)
        .ok_or_else(|| format!("Invalid date '{}': expected YYYY-MM-DD", date))?;
    let deleted = store
        .delete_water_log(&date)
        .map_err(store_err("Failed to delete water log"))?;

    if !deleted {
        return Err(format!("No water log for {}", date));
    }

    info!(date = %date, "Deleted water log");
    Ok(DeleteResponse {
        success: true,
        deleted_id: date,
    })
}
