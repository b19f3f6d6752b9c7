//! FitVeda Tools module
//!
//! Operations behind the MCP tools. Each takes the record store, returns a
//! serializable response, and reports failures as readable strings.

pub mod charts;
pub mod dashboard;
pub mod estimates;
pub mod meals;
pub mod measurements;
pub mod profile;
pub mod status;
pub mod water;
pub mod workouts;

use chrono::{Local, NaiveDate};
use serde::Serialize;

use crate::engine::buckets::{day_key, parse_day};
use crate::store::StoreError;

/// Response for delete operations
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub deleted_id: String,
}

/// The local calendar day
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Validate an optional `YYYY-MM-DD` date, defaulting to `today`
pub(crate) fn resolve_date(date: Option<&str>, today: NaiveDate) -> Result<String, String> {
    match date.map(str::trim).filter(|d| !d.is_empty()) {
        None => Ok(day_key(today)),
        Some(d) => parse_day(d)
            .map(day_key)
            .ok_or_else(|| format!("Invalid date '{}': expected YYYY-MM-DD", d)),
    }
}

pub(crate) fn store_err(context: &str) -> impl Fn(StoreError) -> String + '_ {
    move |e| format!("{}: {}", context, e)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_date() {
        let today = NaiveDate::from_ymd_opt(2025, 10, 16).unwrap();
        assert_eq!(resolve_date(None, today).unwrap(), "2025-10-16");
        assert_eq!(resolve_date(Some("  "), today).unwrap(), "2025-10-16");
        assert_eq!(resolve_date(Some("2025-01-02"), today).unwrap(), "2025-01-02");
        assert!(resolve_date(Some("02/01/2025"), today).is_err());
        assert!(resolve_date(Some("2025-02-30"), today).is_err());
    }
}
