//! Record Store
//!
//! Persistence boundary for every record kind. Two backends implement the
//! same ordering rules:
//!
//! - measurements: newest date first, same-date records in insertion order
//! - workouts and meals: most recently added first
//! - water logs: one per date, in the order each date was first logged

mod memory;
mod sqlite;

use thiserror::Error;

use crate::db::DbError;
use crate::models::{BodyMeasurement, MealLog, UserProfile, WaterLog, WorkoutLog};

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Database(#[from] DbError),

    #[error("Record store lock poisoned")]
    Poisoned,
}

pub type StoreResult<T> = Result<T, StoreError>;

pub trait RecordStore: Send + Sync {
    // ========================================================================
    // Measurements
    // ========================================================================

    fn list_measurements(&self) -> StoreResult<Vec<BodyMeasurement>>;
    fn get_measurement(&self, id: &str) -> StoreResult<Option<BodyMeasurement>>;
    /// Replace the record with the same id, or add it
    fn upsert_measurement(&self, m: &BodyMeasurement) -> StoreResult<()>;
    fn delete_measurement(&self, id: &str) -> StoreResult<bool>;

    // ========================================================================
    // Workouts
    // ========================================================================

    fn list_workouts(&self) -> StoreResult<Vec<WorkoutLog>>;
    fn get_workout(&self, id: &str) -> StoreResult<Option<WorkoutLog>>;
    fn add_workout(&self, w: &WorkoutLog) -> StoreResult<()>;
    fn delete_workout(&self, id: &str) -> StoreResult<bool>;

    // ========================================================================
    // Meals
    // ========================================================================

    fn list_meals(&self) -> StoreResult<Vec<MealLog>>;
    fn get_meal(&self, id: &str) -> StoreResult<Option<MealLog>>;
    fn add_meal(&self, meal: &MealLog) -> StoreResult<()>;
    fn delete_meal(&self, id: &str) -> StoreResult<bool>;

    // ========================================================================
    // Water
    // ========================================================================

    fn list_water_logs(&self) -> StoreResult<Vec<WaterLog>>;
    fn get_water_log(&self, date: &str) -> StoreResult<Option<WaterLog>>;
    /// Replace the log for the same date, or add it
    fn upsert_water_log(&self, log: &WaterLog) -> StoreResult<()>;
    fn delete_water_log(&self, date: &str) -> StoreResult<bool>;

    // ========================================================================
    // Profile
    // ========================================================================

    /// Stored profile, or the default one when none was ever saved
    fn get_profile(&self) -> StoreResult<UserProfile>;
    fn save_profile(&self, profile: &UserProfile) -> StoreResult<()>;

    /// The water log for a date, or an empty one carrying the profile's
    /// current goal. Nothing is written.
    fn water_for_date(&self, date: &str) -> StoreResult<WaterLog> {
        match self.get_water_log(date)? {
            Some(log) => Ok(log),
            None => {
                let profile = self.get_profile()?;
                Ok(WaterLog::empty(date, profile.daily_water_goal))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{migrations, Database};
    use crate::models::{Exercise, ExerciseSet, FoodItem, MealType};
    use tempfile::TempDir;

    /// Both backends, each fresh. The TempDir keeps the SQLite file alive.
    fn backends() -> Vec<(&'static str, Box<dyn RecordStore>, Option<TempDir>)> {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(dir.path().join("test.db")).unwrap();
        db.with_conn(|conn| migrations::run_migrations(conn)).unwrap();

        vec![
            ("memory", Box::new(MemoryStore::new()), None),
            ("sqlite", Box::new(SqliteStore::new(db)), Some(dir)),
        ]
    }

    fn workout(id: &str, date: &str) -> WorkoutLog {
        WorkoutLog::from_draft(
            id,
            date,
            vec![Exercise {
                id: format!("{}-ex", id),
                name: "Squat".into(),
                sets: vec![ExerciseSet { reps: 5, weight: Some(100.0) }],
                duration_minutes: None,
            }],
            Some(200.0),
            Some(30.0),
            None,
        )
        .unwrap()
    }

    fn meal(id: &str, date: &str) -> MealLog {
        MealLog::from_items(
            id,
            date,
            MealType::Lunch,
            vec![FoodItem {
                name: "Dal".into(),
                quantity: "1 bowl".into(),
                protein: 8.0,
                calories: 150.0,
                carbs: None,
                fats: None,
            }],
        )
    }

    #[test]
    fn test_measurements_sorted_newest_date_first() {
        for (name, store, _dir) in backends() {
            store.upsert_measurement(&BodyMeasurement::new("a", "2025-01-05", 70.0, 175.0)).unwrap();
            store.upsert_measurement(&BodyMeasurement::new("b", "2025-01-10", 69.0, 175.0)).unwrap();
            store.upsert_measurement(&BodyMeasurement::new("c", "2025-01-01", 71.0, 175.0)).unwrap();
            store.upsert_measurement(&BodyMeasurement::new("d", "2025-01-05", 70.5, 175.0)).unwrap();

            let ids: Vec<String> = store.list_measurements().unwrap().into_iter().map(|m| m.id).collect();
            assert_eq!(ids, vec!["b", "a", "d", "c"], "backend {}", name);
        }
    }

    #[test]
    fn test_measurement_upsert_replaces_by_id() {
        for (name, store, _dir) in backends() {
            store.upsert_measurement(&BodyMeasurement::new("a", "2025-01-05", 70.0, 175.0)).unwrap();
            let mut edited = BodyMeasurement::new("a", "2025-01-06", 68.0, 175.0);
            edited.waist = Some(80.0);
            store.upsert_measurement(&edited).unwrap();

            let all = store.list_measurements().unwrap();
            assert_eq!(all.len(), 1, "backend {}", name);
            assert_eq!(all[0], edited, "backend {}", name);
            assert_eq!(store.get_measurement("a").unwrap(), Some(edited));
            assert!(store.delete_measurement("a").unwrap());
            assert!(!store.delete_measurement("a").unwrap());
            assert!(store.get_measurement("a").unwrap().is_none());
        }
    }

    #[test]
    fn test_workouts_and_meals_are_newest_first() {
        for (name, store, _dir) in backends() {
            store.add_workout(&workout("w1", "2025-01-10")).unwrap();
            store.add_workout(&workout("w2", "2025-01-01")).unwrap();
            store.add_meal(&meal("m1", "2025-01-10")).unwrap();
            store.add_meal(&meal("m2", "2025-01-01")).unwrap();

            let w: Vec<String> = store.list_workouts().unwrap().into_iter().map(|w| w.id).collect();
            let m: Vec<String> = store.list_meals().unwrap().into_iter().map(|m| m.id).collect();
            assert_eq!(w, vec!["w2", "w1"], "backend {}", name);
            assert_eq!(m, vec!["m2", "m1"], "backend {}", name);

            let stored = store.get_workout("w1").unwrap().unwrap();
            assert_eq!(stored.exercises[0].sets[0].weight, Some(100.0));
            assert_eq!(store.get_meal("m1").unwrap().unwrap().total_calories, 150.0);

            assert!(store.delete_workout("w1").unwrap());
            assert!(store.delete_meal("m2").unwrap());
            assert_eq!(store.list_workouts().unwrap().len(), 1);
            assert_eq!(store.list_meals().unwrap().len(), 1);
        }
    }

    #[test]
    fn test_water_is_one_log_per_date() {
        for (name, store, _dir) in backends() {
            store.upsert_water_log(&WaterLog { date: "2025-01-02".into(), glasses: 3, goal: 10 }).unwrap();
            store.upsert_water_log(&WaterLog { date: "2025-01-01".into(), glasses: 1, goal: 10 }).unwrap();
            store.upsert_water_log(&WaterLog { date: "2025-01-02".into(), glasses: 5, goal: 10 }).unwrap();

            let logs = store.list_water_logs().unwrap();
            assert_eq!(logs.len(), 2, "backend {}", name);
            assert_eq!(logs[0].date, "2025-01-02");
            assert_eq!(logs[0].glasses, 5);
            assert_eq!(logs[1].date, "2025-01-01");
        }
    }

    #[test]
    fn test_water_log_delete_by_date() {
        for (name, store, _dir) in backends() {
            store.upsert_water_log(&WaterLog { date: "2025-01-01".into(), glasses: 2, goal: 10 }).unwrap();
            store.upsert_water_log(&WaterLog { date: "2025-01-02".into(), glasses: 4, goal: 10 }).unwrap();

            assert!(store.delete_water_log("2025-01-01").unwrap(), "backend {}", name);
            assert!(!store.delete_water_log("2025-01-01").unwrap(), "backend {}", name);
            assert!(store.get_water_log("2025-01-01").unwrap().is_none());
            assert_eq!(store.list_water_logs().unwrap().len(), 1);
        }
    }

    #[test]
    fn test_water_for_missing_date_uses_profile_goal() {
        for (name, store, _dir) in backends() {
            let log = store.water_for_date("2025-03-03").unwrap();
            assert_eq!(log, WaterLog::empty("2025-03-03", 10), "backend {}", name);

            let mut profile = store.get_profile().unwrap();
            profile.daily_water_goal = 12;
            store.save_profile(&profile).unwrap();

            assert_eq!(store.water_for_date("2025-03-03").unwrap().goal, 12);
            assert!(store.list_water_logs().unwrap().is_empty());
        }
    }

    #[test]
    fn test_profile_defaults_then_replaces() {
        for (name, store, _dir) in backends() {
            assert_eq!(store.get_profile().unwrap(), UserProfile::default(), "backend {}", name);

            let profile = UserProfile {
                name: "Asha".into(),
                target_calories: 1800.0,
                daily_water_goal: 8,
                target_weight: Some(60.0),
                target_protein: None,
            };
            store.save_profile(&profile).unwrap();
            assert_eq!(store.get_profile().unwrap(), profile);
        }
    }
}
