//! Workout model
//!
//! A workout is a dated list of exercises with optional calorie and
//! duration totals. Workouts are immutable once saved.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;

/// Rough burn rate used to pre-fill calories from a duration
pub const CALORIES_PER_MINUTE: f64 = 6.0;

/// One set of an exercise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseSet {
    pub reps: u32,
    /// kg
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

/// An exercise within a workout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub sets: Vec<ExerciseSet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<f64>,
}

impl Exercise {
    /// Only named exercises are kept when a workout is saved
    pub fn is_valid(&self) -> bool {
        !self.name.trim().is_empty()
    }

    /// Heaviest set weight, 0 when no set carries a weight
    pub fn max_weight(&self) -> f64 {
        self.sets
            .iter()
            .filter_map(|s| s.weight)
            .fold(0.0, f64::max)
    }
}

/// A saved workout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutLog {
    pub id: String,
    pub date: String,
    pub exercises: Vec<Exercise>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calories_burned: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl WorkoutLog {
    /// Build a workout from drafted exercises.
    ///
    /// Exercises with a blank name are discarded. Returns `None` when no
    /// named exercise remains, in which case nothing should be saved.
    pub fn from_draft(
        id: impl Into<String>,
        date: impl Into<String>,
        exercises: Vec<Exercise>,
        calories_burned: Option<f64>,
        duration_minutes: Option<f64>,
        notes: Option<String>,
    ) -> Option<Self> {
        let exercises: Vec<Exercise> = exercises
            .into_iter()
            .filter(Exercise::is_valid)
            .map(|mut e| {
                e.name = e.name.trim().to_string();
                e
            })
            .collect();

        if exercises.is_empty() {
            return None;
        }

        Some(Self {
            id: id.into(),
            date: date.into(),
            exercises,
            calories_burned,
            duration_minutes,
            notes,
        })
    }

    /// Total number of sets across all exercises
    pub fn set_count(&self) -> usize {
        self.exercises.iter().map(|e| e.sets.len()).sum()
    }

    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let exercises_json: String = row.get("exercises")?;
        let exercises = serde_json::from_str(&exercises_json).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
        })?;

        Ok(Self {
            id: row.get("id")?,
            date: row.get("date")?,
            exercises,
            calories_burned: row.get("calories_burned")?,
            duration_minutes: row.get("duration_minutes")?,
            notes: row.get("notes")?,
        })
    }

    /// Append a new workout
    pub fn add(conn: &Connection, w: &WorkoutLog) -> DbResult<()> {
        let exercises_json = serde_json::to_string(&w.exercises)?;

        conn.execute(
            r#"
            INSERT INTO workouts (id, date, exercises, calories_burned, duration_minutes, notes)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                w.id,
                w.date,
                exercises_json,
                w.calories_burned,
                w.duration_minutes,
                w.notes,
            ],
        )?;
        Ok(())
    }

    /// Get a workout by ID
    pub fn get_by_id(conn: &Connection, id: &str) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM workouts WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(w) => Ok(Some(w)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List all workouts, most recently added first
    pub fn list(conn: &Connection) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM workouts ORDER BY seq DESC")?;
        let workouts = stmt
            .query_map([], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(workouts)
    }

    /// Delete a workout
    pub fn delete(conn: &Connection, id: &str) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM workouts WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }
}

/// Suggest a calorie burn for a workout being entered.
///
/// A value the user already typed (non-zero) always wins. Otherwise a
/// positive duration yields `round(duration * 6)`; without either the
/// current value is returned unchanged.
pub fn suggest_calories(duration_minutes: Option<f64>, current: Option<f64>) -> Option<f64> {
    match current {
        Some(c) if c != 0.0 => Some(c),
        _ => match duration_minutes {
            Some(d) if d > 0.0 => Some((d * CALORIES_PER_MINUTE).round()),
            _ => current,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise(name: &str) -> Exercise {
        Exercise {
            id: format!("ex-{}", name),
            name: name.to_string(),
            sets: vec![ExerciseSet { reps: 10, weight: Some(20.0) }],
            duration_minutes: None,
        }
    }

    #[test]
    fn test_blank_exercises_are_dropped() {
        let w = WorkoutLog::from_draft(
            "w1",
            "2025-03-01",
            vec![exercise("Squat"), exercise("   "), exercise(""), exercise(" Bench ")],
            None,
            None,
            None,
        )
        .unwrap();

        let names: Vec<&str> = w.exercises.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Squat", "Bench"]);
        assert_eq!(w.set_count(), 2);
    }

    #[test]
    fn test_workout_without_named_exercise_is_not_built() {
        let w = WorkoutLog::from_draft("w1", "2025-03-01", vec![exercise("")], None, None, None);
        assert!(w.is_none());
        let w = WorkoutLog::from_draft("w1", "2025-03-01", vec![], None, None, None);
        assert!(w.is_none());
    }

    #[test]
    fn test_max_weight_ignores_unweighted_sets() {
        let mut e = exercise("Row");
        e.sets.push(ExerciseSet { reps: 8, weight: Some(35.5) });
        e.sets.push(ExerciseSet { reps: 8, weight: None });
        assert_eq!(e.max_weight(), 35.5);

        let bodyweight = Exercise {
            id: "p".into(),
            name: "Pushups".into(),
            sets: vec![ExerciseSet { reps: 15, weight: None }],
            duration_minutes: None,
        };
        assert_eq!(bodyweight.max_weight(), 0.0);
    }

    #[test]
    fn test_suggest_calories_fills_from_duration() {
        assert_eq!(suggest_calories(Some(30.0), None), Some(180.0));
        assert_eq!(suggest_calories(Some(30.0), Some(0.0)), Some(180.0));
        assert_eq!(suggest_calories(Some(12.5), None), Some(75.0));
    }

    #[test]
    fn test_suggest_calories_keeps_user_value() {
        assert_eq!(suggest_calories(Some(30.0), Some(250.0)), Some(250.0));
    }

    #[test]
    fn test_suggest_calories_without_duration() {
        assert_eq!(suggest_calories(None, None), None);
        assert_eq!(suggest_calories(Some(0.0), Some(0.0)), Some(0.0));
        assert_eq!(suggest_calories(Some(-5.0), None), None);
    }
}
