//! Water log model
//!
//! One counter per calendar day. The goal is copied from the profile when
//! the day's log is first created and is not kept in sync afterwards.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaterLog {
    pub date: String,
    pub glasses: u32,
    pub goal: u32,
}

impl WaterLog {
    /// A fresh log for a day with nothing drunk yet
    pub fn empty(date: impl Into<String>, goal: u32) -> Self {
        Self {
            date: date.into(),
            glasses: 0,
            goal,
        }
    }

    /// Copy of this log with `change` glasses added; never drops below zero
    pub fn adjusted(&self, change: i64) -> Self {
        let glasses = i64::from(self.glasses)
            .saturating_add(change)
            .clamp(0, i64::from(u32::MAX)) as u32;
        Self {
            glasses,
            ..self.clone()
        }
    }

    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            date: row.get("date")?,
            glasses: row.get("glasses")?,
            goal: row.get("goal")?,
        })
    }

    /// Insert or replace the log for its date
    pub fn upsert(conn: &Connection, log: &WaterLog) -> DbResult<()> {
        conn.execute(
            r#"
            INSERT INTO water_logs (date, glasses, goal)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(date) DO UPDATE SET
                glasses = excluded.glasses,
                goal = excluded.goal,
                updated_at = datetime('now')
            "#,
            params![log.date, log.glasses, log.goal],
        )?;
        Ok(())
    }

    /// Get the log for a date
    pub fn get_by_date(conn: &Connection, date: &str) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM water_logs WHERE date = ?1")?;

        let result = stmt.query_row([date], Self::from_row);
        match result {
            Ok(log) => Ok(Some(log)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List all logs in the order they were first created
    pub fn list(conn: &Connection) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM water_logs ORDER BY rowid ASC")?;
        let logs = stmt
            .query_map([], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(logs)
    }

    /// Delete the log for a date
    pub fn delete(conn: &Connection, date: &str) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM water_logs WHERE date = ?1", [date])?;
        Ok(rows > 0)
    }
}
