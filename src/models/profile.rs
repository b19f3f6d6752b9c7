//! User profile model
//!
//! Single row holding the user's targets.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    /// Maintenance calories (BMR + sedentary activity)
    pub target_calories: f64,
    /// Glasses per day
    pub daily_water_goal: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_protein: Option<f64>,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            name: "User".to_string(),
            target_calories: 2000.0,
            daily_water_goal: 10,
            target_weight: None,
            target_protein: None,
        }
    }
}

impl UserProfile {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            name: row.get("name")?,
            target_calories: row.get("target_calories")?,
            daily_water_goal: row.get("daily_water_goal")?,
            target_weight: row.get("target_weight")?,
            target_protein: row.get("target_protein")?,
        })
    }

    /// Get the stored profile, if one was ever saved
    pub fn get(conn: &Connection) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM profile WHERE id = 1")?;

        let result = stmt.query_row([], Self::from_row);
        match result {
            Ok(profile) => Ok(Some(profile)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Set or replace the profile (upsert)
    pub fn save(conn: &Connection, profile: &UserProfile) -> DbResult<()> {
        conn.execute(
            r#"
            INSERT INTO profile (id, name, target_calories, daily_water_goal, target_weight, target_protein)
            VALUES (1, ?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                target_calories = excluded.target_calories,
                daily_water_goal = excluded.daily_water_goal,
                target_weight = excluded.target_weight,
                target_protein = excluded.target_protein,
                updated_at = datetime('now')
            "#,
            params![
                profile.name,
                profile.target_calories,
                profile.daily_water_goal,
                profile.target_weight,
                profile.target_protein,
            ],
        )?;
        Ok(())
    }
}
