//! AI estimate tools
//!
//! Produce candidate meals and workouts from free text. Nothing is saved;
//! the reviewed values go through `log_meal` or `log_workout`.

use tracing::{error, info};

use crate::ai::{DietEstimate, Estimator, WorkoutEstimate};

pub const DIET_FAILURE: &str = "Failed to analyze diet. Please check your API key or connection.";
pub const WORKOUT_FAILURE: &str = "Failed to analyze workout. Try again.";

fn require_description(description: &str) -> Result<&str, String> {
    let trimmed = description.trim();
    if trimmed.is_empty() {
        return Err("Description cannot be empty".to_string());
    }
    Ok(trimmed)
}

pub async fn estimate_meal(estimator: &dyn Estimator, description: &str) -> Result<DietEstimate, String> {
    let description = require_description(description)?;

    match estimator.analyze_diet(description).await {
        Ok(estimate) => {
            info!(
                estimator = estimator.name(),
                items = estimate.items.len(),
                calories = estimate.total_calories,
                "Estimated meal"
            );
            Ok(estimate)
        }
        Err(e) => {
            error!(estimator = estimator.name(), error = %e, "Diet analysis failed");
            Err(DIET_FAILURE.to_string())
        }
    }
}

pub async fn estimate_workout(estimator: &dyn Estimator, description: &str) -> Result<WorkoutEstimate, String> {
    let description = require_description(description)?;

    match estimator.analyze_workout(description).await {
        Ok(estimate) => {
            info!(
                estimator = estimator.name(),
                exercises = estimate.exercises.len(),
                calories = estimate.calories_burned,
                "Estimated workout"
            );
            Ok(estimate)
        }
        Err(e) => {
            error!(estimator = estimator.name(), error = %e, "Workout analysis failed");
            Err(WORKOUT_FAILURE.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{EstimatorError, EstimatorResult, MockEstimator};
    use async_trait::async_trait;

    struct FailingEstimator;

    #[async_trait]
    impl Estimator for FailingEstimator {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn analyze_diet(&self, _description: &str) -> EstimatorResult<DietEstimate> {
            Err(EstimatorError::Api {
                status: 500,
                message: "internal".into(),
            })
        }

        async fn analyze_workout(&self, _description: &str) -> EstimatorResult<WorkoutEstimate> {
            Err(EstimatorError::Empty)
        }
    }

    #[tokio::test]
    async fn test_estimates_pass_through() {
        let meal = estimate_meal(&MockEstimator, "2 roti and dal").await.unwrap();
        assert_eq!(meal.total_calories, 350.0);

        let workout = estimate_workout(&MockEstimator, "pushups and a run").await.unwrap();
        assert_eq!(workout.calories_burned, 150.0);
    }

    #[tokio::test]
    async fn test_failures_are_generic() {
        let err = estimate_meal(&FailingEstimator, "dal").await.unwrap_err();
        assert_eq!(err, DIET_FAILURE);

        let err = estimate_workout(&FailingEstimator, "squats").await.unwrap_err();
        assert_eq!(err, WORKOUT_FAILURE);
    }

    #[tokio::test]
    async fn test_blank_description_rejected() {
        assert!(estimate_meal(&MockEstimator, "   ").await.is_err());
        assert!(estimate_workout(&MockEstimator, "").await.is_err());
    }
}
