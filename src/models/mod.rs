//! Data models
//!
//! Rust structs representing stored records, each carrying its own SQL
//! row mapping.

mod meal;
mod measurement;
mod profile;
mod water;
mod workout;

pub use meal::{FoodItem, MealLog, MealType};
pub use measurement::{BodyMeasurement, BodyMetric};
pub use profile::UserProfile;
pub use water::WaterLog;
pub use workout::{suggest_calories, Exercise, ExerciseSet, WorkoutLog, CALORIES_PER_MINUTE};

/// Fresh unique record id
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
