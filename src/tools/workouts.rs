//! Workout tools

use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;

use super::{resolve_date, store_err, DeleteResponse};
use crate::models::{new_id, suggest_calories, Exercise, WorkoutLog};
use crate::store::RecordStore;

/// Response for log_workout
#[derive(Debug, Serialize)]
pub struct LogWorkoutResponse {
    pub workout: WorkoutLog,
    /// Exercises left out because they had no name
    pub dropped_exercises: usize,
}

/// Workout summary for listing
#[derive(Debug, Serialize)]
pub struct WorkoutSummary {
    pub id: String,
    pub date: String,
    pub exercise_names: Vec<String>,
    pub set_count: usize,
    pub max_weight: f64,
    pub calories_burned: Option<f64>,
    pub duration_minutes: Option<f64>,
    pub notes: Option<String>,
}

impl From<&WorkoutLog> for WorkoutSummary {
    fn from(w: &WorkoutLog) -> Self {
        Self {
            id: w.id.clone(),
            date: w.date.clone(),
            exercise_names: w.exercises.iter().map(|e| e.name.clone()).collect(),
            set_count: w.set_count(),
            max_weight: w.exercises.iter().map(Exercise::max_weight).fold(0.0, f64::max),
            calories_burned: w.calories_burned,
            duration_minutes: w.duration_minutes,
            notes: w.notes.clone(),
        }
    }
}

/// Response for list_workouts
#[derive(Debug, Serialize)]
pub struct ListWorkoutsResponse {
    pub workouts: Vec<WorkoutSummary>,
    pub total: usize,
}

/// Response for suggest_workout_calories
#[derive(Debug, Serialize)]
pub struct SuggestCaloriesResponse {
    pub calories_burned: Option<f64>,
    pub from_duration: bool,
}

/// Save a workout. Exercises without a name are dropped; when none
/// remain nothing is saved.
pub fn log_workout(
    store: &dyn RecordStore,
    date: Option<&str>,
    exercises: Vec<Exercise>,
    calories_burned: Option<f64>,
    duration_minutes: Option<f64>,
    notes: Option<String>,
    today: NaiveDate,
) -> Result<LogWorkoutResponse, String> {
    let date = resolve_date(date, today)?;
    let submitted = exercises.len();

    let exercises: Vec<Exercise> = exercises
        .into_iter()
        .map(|mut e| {
            if e.id.trim().is_empty() {
                e.id = new_id();
            }
            e
        })
        .collect();

    let calories = suggest_calories(duration_minutes, calories_burned).unwrap_or(0.0);
    let notes = notes.filter(|n| !n.trim().is_empty());

    let workout = WorkoutLog::from_draft(
        new_id(),
        date,
        exercises,
        Some(calories),
        Some(duration_minutes.unwrap_or(0.0)),
        notes,
    )
    .ok_or_else(|| "A workout needs at least one exercise with a name".to_string())?;

    store
        .add_workout(&workout)
        .map_err(store_err("Failed to save workout"))?;

    let dropped_exercises = submitted - workout.exercises.len();
    info!(
        id = %workout.id,
        exercises = workout.exercises.len(),
        dropped = dropped_exercises,
        "Logged workout"
    );

    Ok(LogWorkoutResponse {
        workout,
        dropped_exercises,
    })
}

/// List workouts, most recently logged first, optionally for one date
pub fn list_workouts(store: &dyn RecordStore, date: Option<&str>) -> Result<ListWorkoutsResponse, String> {
    let workouts: Vec<WorkoutSummary> = store
        .list_workouts()
        .map_err(store_err("Failed to list workouts"))?
        .iter()
        .filter(|w| date.map_or(true, |d| w.date == d))
        .map(WorkoutSummary::from)
        .collect();

    let total = workouts.len();
    Ok(ListWorkoutsResponse { workouts, total })
}

pub fn get_workout(store: &dyn RecordStore, id: &str) -> Result<Option<WorkoutLog>, String> {
    store.get_workout(id).map_err(store_err("Failed to get workout"))
}

pub fn delete_workout(store: &dyn RecordStore, id: &str) -> Result<DeleteResponse, String> {
    let deleted = store
        .delete_workout(id)
        .map_err(store_err("Failed to delete workout"))?;

    if !deleted {
        return Err(format!("Workout {} not found", id));
    }

    info!(id = %id, "Deleted workout");
    Ok(DeleteResponse {
        success: true,
        deleted_id: id.to_string(),
    })
}

/// Calorie pre-fill for a workout being entered
pub fn suggest_workout_calories(duration_minutes: Option<f64>, current: Option<f64>) -> SuggestCaloriesResponse {
    let suggested = suggest_calories(duration_minutes, current);
    let from_duration = suggested != current;
    SuggestCaloriesResponse {
        calories_burned: suggested,
        from_duration,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExerciseSet;
    use crate::store::MemoryStore;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, 16).unwrap()
    }

    fn exercise(name: &str, weights: &[f64]) -> Exercise {
        Exercise {
            id: String::new(),
            name: name.to_string(),
            sets: weights
                .iter()
                .map(|w| ExerciseSet { reps: 8, weight: Some(*w) })
                .collect(),
            duration_minutes: None,
        }
    }

    #[test]
    fn test_log_workout_fills_calories_from_duration() {
        let store = MemoryStore::new();
        let resp = log_workout(
            &store,
            None,
            vec![exercise("Deadlift", &[100.0, 120.0]), exercise("", &[])],
            None,
            Some(45.0),
            Some("felt strong".into()),
            today(),
        )
        .unwrap();

        assert_eq!(resp.dropped_exercises, 1);
        assert_eq!(resp.workout.date, "2025-10-16");
        assert_eq!(resp.workout.calories_burned, Some(270.0));
        assert_eq!(resp.workout.duration_minutes, Some(45.0));
        assert!(!resp.workout.exercises[0].id.is_empty());

        let list = list_workouts(&store, None).unwrap();
        assert_eq!(list.total, 1);
        assert_eq!(list.workouts[0].max_weight, 120.0);
        assert_eq!(list.workouts[0].set_count, 2);
    }

    #[test]
    fn test_log_workout_keeps_typed_calories_and_zero_fills() {
        let store = MemoryStore::new();
        let resp = log_workout(&store, None, vec![exercise("Yoga", &[])], Some(90.0), Some(45.0), None, today()).unwrap();
        assert_eq!(resp.workout.calories_burned, Some(90.0));

        let resp = log_workout(&store, None, vec![exercise("Yoga", &[])], None, None, None, today()).unwrap();
        assert_eq!(resp.workout.calories_burned, Some(0.0));
        assert_eq!(resp.workout.duration_minutes, Some(0.0));
    }

    #[test]
    fn test_log_workout_requires_named_exercise() {
        let store = MemoryStore::new();
        let err = log_workout(&store, None, vec![exercise("  ", &[])], None, None, None, today());
        assert!(err.is_err());
        assert_eq!(list_workouts(&store, None).unwrap().total, 0);
    }

    #[test]
    fn test_list_filter_and_delete() {
        let store = MemoryStore::new();
        log_workout(&store, Some("2025-10-15"), vec![exercise("Run", &[])], None, None, None, today()).unwrap();
        let second =
            log_workout(&store, Some("2025-10-16"), vec![exercise("Swim", &[])], None, None, None, today()).unwrap();

        let all = list_workouts(&store, None).unwrap();
        assert_eq!(all.workouts[0].exercise_names, vec!["Swim"]);
        assert_eq!(list_workouts(&store, Some("2025-10-15")).unwrap().total, 1);

        delete_workout(&store, &second.workout.id).unwrap();
        assert!(get_workout(&store, &second.workout.id).unwrap().is_none());
        assert!(delete_workout(&store, "missing").is_err());
    }

    #[test]
    fn test_suggest_tool() {
        let s = suggest_workout_calories(Some(20.0), None);
        assert_eq!(s.calories_burned, Some(120.0));
        assert!(s.from_duration);

        let s = suggest_workout_calories(Some(20.0), Some(300.0));
        assert_eq!(s.calories_burned, Some(300.0));
        assert!(!s.from_duration);
    }
}
