//! Gemini estimator
//!
//! Calls the `generateContent` REST endpoint with a system instruction and
//! a JSON response schema, then parses the first candidate's text.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, error, instrument};

use super::{DietEstimate, Estimator, EstimatorError, EstimatorResult, WorkoutEstimate};
use crate::config::{DEFAULT_AI_BASE_URL, DEFAULT_AI_MODEL};
use crate::models::{new_id, Exercise, ExerciseSet, FoodItem};

const DIET_INSTRUCTION: &str = "You are an expert Indian Nutritionist. \
Analyze the user's meal description (which may contain Indian vegetarian items like Bhakari, Roti, Dal, Sabji, etc.). \
Estimate the protein (grams) and calories (kcal) for each item carefully. \
Be realistic with portion sizes if not specified (assume standard Indian serving sizes). \
Return a structured JSON response.";

const WORKOUT_INSTRUCTION: &str = "You are an expert Fitness Trainer. \
Analyze the user's workout description. \
1. Identify exercises, sets, reps, and weights. \
2. Estimate the TOTAL calories burned for a standard 75kg male based on intensity and duration. \
3. Estimate total duration in minutes if not specified. \
Return a structured JSON response.";

// ============================================================================
// API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    system_instruction: Content,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: Value,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    candidates: Option<Vec<Candidate>>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

// Shapes the model is asked to produce

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DietReply {
    #[serde(default)]
    items: Vec<DietReplyItem>,
    total_protein: Option<f64>,
    total_calories: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct DietReplyItem {
    name: String,
    #[serde(default)]
    quantity: String,
    #[serde(default)]
    protein: f64,
    #[serde(default)]
    calories: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WorkoutReply {
    #[serde(default)]
    exercises: Vec<WorkoutReplyExercise>,
    #[serde(default)]
    calories_burned: f64,
    #[serde(default)]
    duration_minutes: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WorkoutReplyExercise {
    name: String,
    #[serde(default)]
    sets: Vec<WorkoutReplySet>,
    duration_minutes: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct WorkoutReplySet {
    #[serde(default)]
    reps: f64,
    weight: Option<f64>,
}

fn diet_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "items": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "name": { "type": "STRING" },
                        "quantity": { "type": "STRING" },
                        "protein": { "type": "NUMBER" },
                        "calories": { "type": "NUMBER" }
                    }
                }
            },
            "totalProtein": { "type": "NUMBER" },
            "totalCalories": { "type": "NUMBER" }
        }
    })
}

fn workout_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "exercises": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "name": { "type": "STRING" },
                        "sets": {
                            "type": "ARRAY",
                            "items": {
                                "type": "OBJECT",
                                "properties": {
                                    "reps": { "type": "NUMBER" },
                                    "weight": { "type": "NUMBER" }
                                }
                            }
                        },
                        "durationMinutes": { "type": "NUMBER" }
                    }
                }
            },
            "caloriesBurned": { "type": "NUMBER" },
            "durationMinutes": { "type": "NUMBER" }
        }
    })
}

// ============================================================================
// Estimator
// ============================================================================

pub struct GeminiEstimator {
    api_key: String,
    client: Client,
    model: String,
    base_url: String,
}

impl GeminiEstimator {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            client: Client::new(),
            model: DEFAULT_AI_MODEL.to_string(),
            base_url: DEFAULT_AI_BASE_URL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn build_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        )
    }

    fn build_request(instruction: &str, prompt: String, schema: Value) -> GenerateRequest {
        GenerateRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part { text: Some(prompt) }],
            }],
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: Some(instruction.to_string()),
                }],
            },
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: schema,
            },
        }
    }

    /// Send a request and return the first candidate's text
    async fn generate(&self, request: &GenerateRequest) -> EstimatorResult<String> {
        debug!(model = %self.model, "Sending request to Gemini API");

        let response = self.client.post(self.build_url()).json(request).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            error!(status = %status, "Gemini API error");
            return Err(map_api_error(status.as_u16(), &body));
        }

        extract_text(&body)
    }
}

/// Pull the API's own error message out of the body when there is one
fn map_api_error(status: u16, body: &str) -> EstimatorError {
    let message = serde_json::from_str::<GenerateResponse>(body)
        .ok()
        .and_then(|r| r.error)
        .map_or_else(|| body.to_string(), |e| e.message);

    EstimatorError::Api { status, message }
}

fn extract_text(body: &str) -> EstimatorResult<String> {
    let response: GenerateResponse = serde_json::from_str(body)?;

    if let Some(err) = response.error {
        return Err(EstimatorError::Api {
            status: 200,
            message: err.message,
        });
    }

    response
        .candidates
        .and_then(|c| c.into_iter().next())
        .and_then(|c| c.content)
        .and_then(|content| content.parts.into_iter().find_map(|p| p.text))
        .filter(|text| !text.trim().is_empty())
        .ok_or(EstimatorError::Empty)
}

fn parse_diet(text: &str) -> EstimatorResult<DietEstimate> {
    let reply: DietReply = serde_json::from_str(text)?;

    let items: Vec<FoodItem> = reply
        .items
        .into_iter()
        .map(|i| FoodItem {
            name: i.name,
            quantity: i.quantity,
            protein: i.protein,
            calories: i.calories,
            carbs: None,
            fats: None,
        })
        .collect();

    let total_protein = reply
        .total_protein
        .unwrap_or_else(|| items.iter().map(|i| i.protein).sum());
    let total_calories = reply
        .total_calories
        .unwrap_or_else(|| items.iter().map(|i| i.calories).sum());

    Ok(DietEstimate {
        items,
        total_protein,
        total_calories,
    })
}

fn parse_workout(text: &str) -> EstimatorResult<WorkoutEstimate> {
    let reply: WorkoutReply = serde_json::from_str(text)?;

    let exercises = reply
        .exercises
        .into_iter()
        .map(|e| Exercise {
            id: new_id(),
            name: e.name,
            sets: e
                .sets
                .into_iter()
                .map(|s| ExerciseSet {
                    reps: s.reps.max(0.0).round() as u32,
                    weight: s.weight,
                })
                .collect(),
            duration_minutes: e.duration_minutes,
        })
        .collect();

    Ok(WorkoutEstimate {
        exercises,
        calories_burned: reply.calories_burned,
        duration_minutes: reply.duration_minutes,
    })
}

#[async_trait]
impl Estimator for GeminiEstimator {
    fn name(&self) -> &'static str {
        "gemini"
    }

    #[instrument(skip(self, description))]
    async fn analyze_diet(&self, description: &str) -> EstimatorResult<DietEstimate> {
        let request = Self::build_request(
            DIET_INSTRUCTION,
            format!("Analyze this meal: \"{}\"", description),
            diet_schema(),
        );
        let text = self.generate(&request).await?;
        parse_diet(&text)
    }

    #[instrument(skip(self, description))]
    async fn analyze_workout(&self, description: &str) -> EstimatorResult<WorkoutEstimate> {
        let request = Self::build_request(
            WORKOUT_INSTRUCTION,
            format!("Analyze this workout: \"{}\"", description),
            workout_schema(),
        );
        let text = self.generate(&request).await?;
        parse_workout(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let req = GeminiEstimator::build_request(DIET_INSTRUCTION, "Analyze this meal: \"dal\"".into(), diet_schema());
        let v = serde_json::to_value(&req).unwrap();

        assert_eq!(v["contents"][0]["role"], "user");
        assert_eq!(v["contents"][0]["parts"][0]["text"], "Analyze this meal: \"dal\"");
        assert!(v["systemInstruction"]["parts"][0]["text"]
            .as_str()
            .unwrap()
            .contains("Indian Nutritionist"));
        assert!(v["systemInstruction"].get("role").is_none());
        assert_eq!(v["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(v["generationConfig"]["responseSchema"]["properties"]["totalProtein"]["type"], "NUMBER");
    }

    #[test]
    fn test_url() {
        let est = GeminiEstimator::new("k").with_base_url("http://localhost:9000/v1beta/").with_model("m");
        assert_eq!(est.build_url(), "http://localhost:9000/v1beta/models/m:generateContent?key=k");
    }

    #[test]
    fn test_extract_text() {
        let body = r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"{\"items\":[]}"}]}}]}"#;
        assert_eq!(extract_text(body).unwrap(), r#"{"items":[]}"#);

        let empty = r#"{"candidates":[]}"#;
        assert!(matches!(extract_text(empty), Err(EstimatorError::Empty)));

        let blank = r#"{"candidates":[{"content":{"parts":[{"text":"  "}]}}]}"#;
        assert!(matches!(extract_text(blank), Err(EstimatorError::Empty)));

        assert!(matches!(extract_text("not json"), Err(EstimatorError::Parse(_))));
    }

    #[test]
    fn test_map_api_error() {
        let body = r#"{"error":{"code":429,"message":"Quota exceeded","status":"RESOURCE_EXHAUSTED"}}"#;
        match map_api_error(429, body) {
            EstimatorError::Api { status, message } => {
                assert_eq!(status, 429);
                assert_eq!(message, "Quota exceeded");
            }
            other => panic!("unexpected {:?}", other),
        }

        match map_api_error(502, "Bad Gateway") {
            EstimatorError::Api { message, .. } => assert_eq!(message, "Bad Gateway"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_parse_diet() {
        let text = r#"{
            "items": [
                {"name": "Bhakari", "quantity": "2 pcs", "protein": 5, "calories": 240},
                {"name": "Sabji", "protein": 3.5, "calories": 120}
            ],
            "totalProtein": 8.5,
            "totalCalories": 360
        }"#;
        let est = parse_diet(text).unwrap();
        assert_eq!(est.items.len(), 2);
        assert_eq!(est.items[1].quantity, "");
        assert_eq!(est.total_protein, 8.5);
        assert_eq!(est.total_calories, 360.0);
    }

    #[test]
    fn test_parse_diet_fills_missing_totals() {
        let text = r#"{"items": [{"name": "Dal", "quantity": "1 bowl", "protein": 8, "calories": 150},
                                 {"name": "Rice", "quantity": "1 cup", "protein": 4, "calories": 200}]}"#;
        let est = parse_diet(text).unwrap();
        assert_eq!(est.total_protein, 12.0);
        assert_eq!(est.total_calories, 350.0);
    }

    #[test]
    fn test_parse_workout_assigns_ids() {
        let text = r#"{
            "exercises": [
                {"name": "Squat", "sets": [{"reps": 5, "weight": 100}, {"reps": 5.0, "weight": 100}]},
                {"name": "Cycling", "sets": [], "durationMinutes": 25}
            ],
            "caloriesBurned": 320,
            "durationMinutes": 45
        }"#;
        let est = parse_workout(text).unwrap();
        assert_eq!(est.exercises.len(), 2);
        assert_ne!(est.exercises[0].id, est.exercises[1].id);
        assert!(!est.exercises[0].id.is_empty());
        assert_eq!(est.exercises[0].sets[1].reps, 5);
        assert_eq!(est.exercises[0].sets[0].weight, Some(100.0));
        assert_eq!(est.exercises[1].duration_minutes, Some(25.0));
        assert_eq!(est.calories_burned, 320.0);
        assert_eq!(est.duration_minutes, 45.0);
    }
}
