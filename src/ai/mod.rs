//! AI Estimator
//!
//! Turns a free-text meal or workout description into a candidate record.
//! Estimates are never stored directly; the caller reviews them and logs
//! them through the record tools.

mod gemini;
mod mock;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::AppConfig;
use crate::models::{Exercise, FoodItem};

pub use gemini::GeminiEstimator;
pub use mock::MockEstimator;

#[derive(Debug, Error)]
pub enum EstimatorError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Gemini API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Empty response from AI")]
    Empty,

    #[error("Malformed AI response: {0}")]
    Parse(#[from] serde_json::Error),
}

pub type EstimatorResult<T> = Result<T, EstimatorError>;

/// Estimated nutrition for a described meal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DietEstimate {
    pub items: Vec<FoodItem>,
    pub total_protein: f64,
    pub total_calories: f64,
}

/// Estimated structure and burn for a described workout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutEstimate {
    pub exercises: Vec<Exercise>,
    pub calories_burned: f64,
    pub duration_minutes: f64,
}

#[async_trait]
pub trait Estimator: Send + Sync {
    /// Short name reported by the status tool
    fn name(&self) -> &'static str;

    async fn analyze_diet(&self, description: &str) -> EstimatorResult<DietEstimate>;

    async fn analyze_workout(&self, description: &str) -> EstimatorResult<WorkoutEstimate>;
}

/// Live estimator when an API key is configured, offline mock otherwise
pub fn from_config(config: &AppConfig) -> Arc<dyn Estimator> {
    match &config.api_key {
        Some(key) => Arc::new(
            GeminiEstimator::new(key.clone())
                .with_model(config.ai_model.clone())
                .with_base_url(config.ai_base_url.clone()),
        ),
        None => {
            tracing::warn!("No GEMINI_API_KEY set; using mock estimates");
            Arc::new(MockEstimator)
        }
    }
}
