//! SQLite-backed Record Store

use crate::db::Database;
use crate::models::{BodyMeasurement, MealLog, UserProfile, WaterLog, WorkoutLog};

use super::{RecordStore, StoreResult};

#[derive(Clone)]
pub struct SqliteStore {
    db: Database,
}

impl SqliteStore {
    /// Wrap an already migrated database
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

impl RecordStore for SqliteStore {
    fn list_measurements(&self) -> StoreResult<Vec<BodyMeasurement>> {
        Ok(self.db.with_conn(BodyMeasurement::list)?)
    }

    fn get_measurement(&self, id: &str) -> StoreResult<Option<BodyMeasurement>> {
        Ok(self.db.with_conn(|conn| BodyMeasurement::get_by_id(conn, id))?)
    }

    fn upsert_measurement(&self, m: &BodyMeasurement) -> StoreResult<()> {
        Ok(self.db.with_conn(|conn| BodyMeasurement::upsert(conn, m))?)
    }

    fn delete_measurement(&self, id: &str) -> StoreResult<bool> {
        Ok(self.db.with_conn(|conn| BodyMeasurement::delete(conn, id))?)
    }

    fn list_workouts(&self) -> StoreResult<Vec<WorkoutLog>> {
        Ok(self.db.with_conn(WorkoutLog::list)?)
    }

    fn get_workout(&self, id: &str) -> StoreResult<Option<WorkoutLog>> {
        Ok(self.db.with_conn(|conn| WorkoutLog::get_by_id(conn, id))?)
    }

    fn add_workout(&self, w: &WorkoutLog) -> StoreResult<()> {
        Ok(self.db.with_conn(|conn| WorkoutLog::add(conn, w))?)
    }

    fn delete_workout(&self, id: &str) -> StoreResult<bool> {
        Ok(self.db.with_conn(|conn| WorkoutLog::delete(conn, id))?)
    }

    fn list_meals(&self) -> StoreResult<Vec<MealLog>> {
        Ok(self.db.with_conn(MealLog::list)?)
    }

    fn get_meal(&self, id: &str) -> StoreResult<Option<MealLog>> {
        Ok(self.db.with_conn(|conn| MealLog::get_by_id(conn, id))?)
    }

    fn add_meal(&self, meal: &MealLog) -> StoreResult<()> {
        Ok(self.db.with_conn(|conn| MealLog::add(conn, meal))?)
    }

    fn delete_meal(&self, id: &str) -> StoreResult<bool> {
        Ok(self.db.with_conn(|conn| MealLog::delete(conn, id))?)
    }

    fn list_water_logs(&self) -> StoreResult<Vec<WaterLog>> {
        Ok(self.db.with_conn(WaterLog::list)?)
    }

    fn get_water_log(&self, date: &str) -> StoreResult<Option<WaterLog>> {
        Ok(self.db.with_conn(|conn| WaterLog::get_by_date(conn, date))?)
    }

    fn upsert_water_log(&self, log: &WaterLog) -> StoreResult<()> {
        Ok(self.db.with_conn(|conn| WaterLog::upsert(conn, log))?)
    }

    fn delete_water_log(&self, date: &str) -> StoreResult<bool> {
        Ok(self.db.with_conn(|conn| WaterLog::delete(conn, date))?)
    }

    fn get_profile(&self) -> StoreResult<UserProfile> {
        let stored = self.db.with_conn(UserProfile::get)?;
        Ok(stored.unwrap_or_default())
    }

    fn save_profile(&self, profile: &UserProfile) -> StoreResult<()> {
        Ok(self.db.with_conn(|conn| UserProfile::save(conn, profile))?)
    }
}
