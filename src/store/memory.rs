//! In-memory Record Store
//!
//! Keeps everything in ordered vectors. Nothing survives a restart.

use std::sync::{Mutex, MutexGuard};

use crate::models::{BodyMeasurement, MealLog, UserProfile, WaterLog, WorkoutLog};

use super::{RecordStore, StoreError, StoreResult};

#[derive(Default)]
struct Inner {
    measurements: Vec<BodyMeasurement>,
    workouts: Vec<WorkoutLog>,
    meals: Vec<MealLog>,
    water: Vec<WaterLog>,
    profile: Option<UserProfile>,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Inner>> {
        self.inner.lock().map_err(|_| StoreError::Poisoned)
    }
}

impl RecordStore for MemoryStore {
    fn list_measurements(&self) -> StoreResult<Vec<BodyMeasurement>> {
        Ok(self.lock()?.measurements.clone())
    }

    fn get_measurement(&self, id: &str) -> StoreResult<Option<BodyMeasurement>> {
        Ok(self.lock()?.measurements.iter().find(|m| m.id == id).cloned())
    }

    fn upsert_measurement(&self, m: &BodyMeasurement) -> StoreResult<()> {
        let mut inner = self.lock()?;
        match inner.measurements.iter_mut().find(|x| x.id == m.id) {
            Some(existing) => *existing = m.clone(),
            None => inner.measurements.push(m.clone()),
        }
        // Stable, so same-date records keep their order
        inner.measurements.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(())
    }

    fn delete_measurement(&self, id: &str) -> StoreResult<bool> {
        let mut inner = self.lock()?;
        let before = inner.measurements.len();
        inner.measurements.retain(|m| m.id != id);
        Ok(inner.measurements.len() < before)
    }

    fn list_workouts(&self) -> StoreResult<Vec<WorkoutLog>> {
        Ok(self.lock()?.workouts.clone())
    }

    fn get_workout(&self, id: &str) -> StoreResult<Option<WorkoutLog>> {
        Ok(self.lock()?.workouts.iter().find(|w| w.id == id).cloned())
    }

    fn add_workout(&self, w: &WorkoutLog) -> StoreResult<()> {
        self.lock()?.workouts.insert(0, w.clone());
        Ok(())
    }

    fn delete_workout(&self, id: &str) -> StoreResult<bool> {
        let mut inner = self.lock()?;
        let before = inner.workouts.len();
        inner.workouts.retain(|w| w.id != id);
        Ok(inner.workouts.len() < before)
    }

    fn list_meals(&self) -> StoreResult<Vec<MealLog>> {
        Ok(self.lock()?.meals.clone())
    }

    fn get_meal(&self, id: &str) -> StoreResult<Option<MealLog>> {
        Ok(self.lock()?.meals.iter().find(|m| m.id == id).cloned())
    }

    fn add_meal(&self, meal: &MealLog) -> StoreResult<()> {
        self.lock()?.meals.insert(0, meal.clone());
        Ok(())
    }

    fn delete_meal(&self, id: &str) -> StoreResult<bool> {
        let mut inner = self.lock()?;
        let before = inner.meals.len();
        inner.meals.retain(|m| m.id != id);
        Ok(inner.meals.len() < before)
    }

    fn list_water_logs(&self) -> StoreResult<Vec<WaterLog>> {
        Ok(self.lock()?.water.clone())
    }

    fn get_water_log(&self, date: &str) -> StoreResult<Option<WaterLog>> {
        Ok(self.lock()?.water.iter().find(|l| l.date == date).cloned())
    }

    fn upsert_water_log(&self, log: &WaterLog) -> StoreResult<()> {
        let mut inner = self.lock()?;
        match inner.water.iter_mut().find(|l| l.date == log.date) {
            Some(existing) => *existing = log.clone(),
            None => inner.water.push(log.clone()),
        }
        Ok(())
    }

    fn delete_water_log(&self, date: &str) -> StoreResult<bool> {
        let mut inner = self.lock()?;
        let before = inner.water.len();
        inner.water.retain(|l| l.date != date);
        Ok(inner.water.len() < before)
    }

    fn get_profile(&self) -> StoreResult<UserProfile> {
        Ok(self.lock()?.profile.clone().unwrap_or_default())
    }

    fn save_profile(&self, profile: &UserProfile) -> StoreResult<()> {
        self.lock()?.profile = Some(profile.clone());
        Ok(())
    }
}
