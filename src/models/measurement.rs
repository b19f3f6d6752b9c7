//! Body measurement model
//!
//! Weight, height and body-part circumferences for a calendar day. Several
//! measurements may share a date; edits replace the whole record by id.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;

/// A chartable body metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyMetric {
    Weight,
    Chest,
    Waist,
    Belly,
    Hips,
    ArmsLeft,
    ArmsRight,
    ThighsLeft,
    ThighsRight,
    Neck,
}

impl BodyMetric {
    pub const ALL: [BodyMetric; 10] = [
        BodyMetric::Weight,
        BodyMetric::Chest,
        BodyMetric::Waist,
        BodyMetric::Belly,
        BodyMetric::Hips,
        BodyMetric::ArmsLeft,
        BodyMetric::ArmsRight,
        BodyMetric::ThighsLeft,
        BodyMetric::ThighsRight,
        BodyMetric::Neck,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BodyMetric::Weight => "weight",
            BodyMetric::Chest => "chest",
            BodyMetric::Waist => "waist",
            BodyMetric::Belly => "belly",
            BodyMetric::Hips => "hips",
            BodyMetric::ArmsLeft => "arms_left",
            BodyMetric::ArmsRight => "arms_right",
            BodyMetric::ThighsLeft => "thighs_left",
            BodyMetric::ThighsRight => "thighs_right",
            BodyMetric::Neck => "neck",
        }
    }

    /// Accepts snake_case, camelCase and kebab-case names
    pub fn from_str(s: &str) -> Option<Self> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-' && !c.is_whitespace())
            .collect::<String>()
            .to_lowercase();

        match normalized.as_str() {
            "weight" => Some(BodyMetric::Weight),
            "chest" => Some(BodyMetric::Chest),
            "waist" => Some(BodyMetric::Waist),
            "belly" => Some(BodyMetric::Belly),
            "hips" => Some(BodyMetric::Hips),
            "armsleft" | "leftarm" => Some(BodyMetric::ArmsLeft),
            "armsright" | "rightarm" => Some(BodyMetric::ArmsRight),
            "thighsleft" | "leftthigh" => Some(BodyMetric::ThighsLeft),
            "thighsright" | "rightthigh" => Some(BodyMetric::ThighsRight),
            "neck" => Some(BodyMetric::Neck),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            BodyMetric::Weight => "Weight",
            BodyMetric::Chest => "Chest",
            BodyMetric::Waist => "Waist",
            BodyMetric::Belly => "Belly",
            BodyMetric::Hips => "Hips",
            BodyMetric::ArmsLeft => "Left Arm",
            BodyMetric::ArmsRight => "Right Arm",
            BodyMetric::ThighsLeft => "Left Thigh",
            BodyMetric::ThighsRight => "Right Thigh",
            BodyMetric::Neck => "Neck",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            BodyMetric::Weight => "kg",
            _ => "cm",
        }
    }
}

/// A body measurement record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyMeasurement {
    pub id: String,
    pub date: String,
    /// kg
    pub weight: f64,
    /// cm, 0 when unknown
    #[serde(default)]
    pub height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chest: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waist: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub belly: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hips: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arms_left: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arms_right: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thighs_left: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thighs_right: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub neck: Option<f64>,
}

impl BodyMeasurement {
    /// A measurement with only the required fields set
    pub fn new(id: impl Into<String>, date: impl Into<String>, weight: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            date: date.into(),
            weight,
            height,
            chest: None,
            waist: None,
            belly: None,
            hips: None,
            arms_left: None,
            arms_right: None,
            thighs_left: None,
            thighs_right: None,
            neck: None,
        }
    }

    /// Value of the given metric, if recorded
    pub fn metric(&self, metric: BodyMetric) -> Option<f64> {
        match metric {
            BodyMetric::Weight => Some(self.weight),
            BodyMetric::Chest => self.chest,
            BodyMetric::Waist => self.waist,
            BodyMetric::Belly => self.belly,
            BodyMetric::Hips => self.hips,
            BodyMetric::ArmsLeft => self.arms_left,
            BodyMetric::ArmsRight => self.arms_right,
            BodyMetric::ThighsLeft => self.thighs_left,
            BodyMetric::ThighsRight => self.thighs_right,
            BodyMetric::Neck => self.neck,
        }
    }

    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            date: row.get("date")?,
            weight: row.get("weight")?,
            height: row.get("height")?,
            chest: row.get("chest")?,
            waist: row.get("waist")?,
            belly: row.get("belly")?,
            hips: row.get("hips")?,
            arms_left: row.get("arms_left")?,
            arms_right: row.get("arms_right")?,
            thighs_left: row.get("thighs_left")?,
            thighs_right: row.get("thighs_right")?,
            neck: row.get("neck")?,
        })
    }

    /// Insert, or replace every field of the record with the same id
    pub fn upsert(conn: &Connection, m: &BodyMeasurement) -> DbResult<()> {
        conn.execute(
            r#"
            INSERT INTO measurements
                (id, date, weight, height, chest, waist, belly, hips,
                 arms_left, arms_right, thighs_left, thighs_right, neck)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
            ON CONFLICT(id) DO UPDATE SET
                date = excluded.date,
                weight = excluded.weight,
                height = excluded.height,
                chest = excluded.chest,
                waist = excluded.waist,
                belly = excluded.belly,
                hips = excluded.hips,
                arms_left = excluded.arms_left,
                arms_right = excluded.arms_right,
                thighs_left = excluded.thighs_left,
                thighs_right = excluded.thighs_right,
                neck = excluded.neck,
                updated_at = datetime('now')
            "#,
            params![
                m.id,
                m.date,
                m.weight,
                m.height,
                m.chest,
                m.waist,
                m.belly,
                m.hips,
                m.arms_left,
                m.arms_right,
                m.thighs_left,
                m.thighs_right,
                m.neck,
            ],
        )?;
        Ok(())
    }

    /// Get a measurement by ID
    pub fn get_by_id(conn: &Connection, id: &str) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM measurements WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(m) => Ok(Some(m)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List all measurements, newest date first; same-date records keep
    /// their insertion order
    pub fn list(conn: &Connection) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM measurements ORDER BY date DESC, seq ASC")?;
        let measurements = stmt
            .query_map([], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(measurements)
    }

    /// Delete a measurement
    pub fn delete(conn: &Connection, id: &str) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM measurements WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }
}
