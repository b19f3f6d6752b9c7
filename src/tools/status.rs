//! FitVeda Status Tool
//!
//! Runtime status of the service, plus the usage guide for assistants.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;
use crate::config::StorageBackend;

/// Usage guide for AI assistants
pub const LOGGING_INSTRUCTIONS: &str = r#"
# FitVeda Logging Instructions

FitVeda tracks body measurements, workouts, meals and water intake for a
single user, and summarizes them on a dashboard.

## Dates

All dates are calendar days in `YYYY-MM-DD` form. When a date is omitted the
server's local day is used. Resolve relative dates ("yesterday") before
calling a tool.

---

## Meals: estimate, review, log

1. Call `estimate_meal` with the user's own description, e.g.
   "2 bhakari, 1 bowl moong dal and some sabji".
2. Show the estimated items, protein and calories. Let the user correct them.
3. Call `log_meal` with the reviewed items and a meal type
   (`morning`, `lunch`, `dinner` or `snack`). Pass `total_protein` and
   `total_calories` only if the user accepted the estimate's totals as is;
   otherwise they are summed from the items.

Estimates are never saved on their own.

---

## Workouts: estimate, review, log

1. Call `estimate_workout` with the description, e.g.
   "3 sets of 10 squats at 60kg then 20 minutes on the bike".
2. Review exercises, sets, duration and calories with the user.
3. Call `log_workout`. Exercises without a name are dropped. If
   `calories_burned` is missing or 0 and a duration is given, it is filled
   as duration x 6. Use `suggest_workout_calories` to preview that value.

Workouts and meals cannot be edited. Delete and log again instead.

---

## Measurements

`save_measurement` needs a weight in kg. Height (cm) is optional but BMI is
only computed when it is present. Circumferences are in cm: chest, waist,
belly, hips, arms_left, arms_right, thighs_left, thighs_right, neck.
Pass an existing `id` to replace that entry completely.

`get_metric_trend` charts one metric in `daily`, `weekly` or `monthly` view.
Weekly and monthly points are averages; periods without data are skipped.

---

## Water

`adjust_water` adds glasses (use a negative change to remove; never below 0).
`set_water` sets the count outright and `delete_water_log` clears a day. The day's goal is copied from the
profile when the day is first logged.

---

## Dashboard

`get_dashboard` returns today's calories (eaten, burned, net, remaining
against the profile target), protein, water, latest weight with change, the
last five weights and workout activity for the chosen view.
"#;

/// Runtime status of the FitVeda service
#[derive(Debug, Clone, Serialize)]
pub struct FitvedaStatus {
    /// Build information
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,

    /// Storage information
    pub storage: &'static str,
    pub database_path: Option<String>,
    pub database_size_bytes: Option<u64>,

    /// Estimator in use, "gemini" or "mock"
    pub estimator: &'static str,

    /// Process information
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
    storage: StorageBackend,
    database_path: Option<PathBuf>,
    estimator: &'static str,
}

impl StatusTracker {
    /// `database_path` is `None` for the in-memory store
    pub fn new(storage: StorageBackend, database_path: Option<PathBuf>, estimator: &'static str) -> Self {
        Self {
            start_time: Instant::now(),
            storage,
            database_path,
            estimator,
        }
    }

    /// Get the current status
    pub fn get_status(&self) -> FitvedaStatus {
        let build_info = BuildInfo::current();

        let database_size_bytes = self
            .database_path
            .as_ref()
            .and_then(|p| std::fs::metadata(p).ok())
            .map(|m| m.len());

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        FitvedaStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            storage: self.storage.as_str(),
            database_path: self.database_path.as_ref().map(|p| p.display().to_string()),
            database_size_bytes,
            estimator: self.estimator,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}
