//! Offline estimator returning fixed data

use async_trait::async_trait;

use super::{DietEstimate, Estimator, EstimatorResult, WorkoutEstimate};
use crate::models::{Exercise, ExerciseSet, FoodItem};

pub struct MockEstimator;

fn item(name: &str, quantity: &str, protein: f64, calories: f64) -> FoodItem {
    FoodItem {
        name: name.to_string(),
        quantity: quantity.to_string(),
        protein,
        calories,
        carbs: None,
        fats: None,
    }
}

#[async_trait]
impl Estimator for MockEstimator {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn analyze_diet(&self, _description: &str) -> EstimatorResult<DietEstimate> {
        Ok(DietEstimate {
            items: vec![
                item("Mock Roti", "2 pcs", 6.0, 200.0),
                item("Mock Dal", "1 bowl", 8.0, 150.0),
            ],
            total_protein: 14.0,
            total_calories: 350.0,
        })
    }

    async fn analyze_workout(&self, _description: &str) -> EstimatorResult<WorkoutEstimate> {
        let bodyweight = |reps| ExerciseSet {
            reps,
            weight: Some(0.0),
        };

        Ok(WorkoutEstimate {
            exercises: vec![
                Exercise {
                    id: "mock1".to_string(),
                    name: "Pushups".to_string(),
                    sets: vec![bodyweight(15), bodyweight(12)],
                    duration_minutes: None,
                },
                Exercise {
                    id: "mock2".to_string(),
                    name: "Running".to_string(),
                    sets: vec![],
                    duration_minutes: Some(10.0),
                },
            ],
            calories_burned: 150.0,
            duration_minutes: 20.0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_diet() {
        let est = MockEstimator.analyze_diet("anything").await.unwrap();
        assert_eq!(est.items.len(), 2);
        assert_eq!(est.items[0].name, "Mock Roti");
        assert_eq!(est.total_protein, 14.0);
        assert_eq!(est.total_calories, 350.0);
    }

    #[tokio::test]
    async fn test_mock_workout() {
        let est = MockEstimator.analyze_workout("anything").await.unwrap();
        assert_eq!(est.exercises.len(), 2);
        assert_eq!(est.exercises[0].sets.len(), 2);
        assert_eq!(est.exercises[1].duration_minutes, Some(10.0));
        assert_eq!(est.calories_burned, 150.0);
        assert_eq!(est.duration_minutes, 20.0);
    }
}
