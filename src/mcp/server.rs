//! FitVeda MCP Server Implementation
//!
//! Exposes the tracker's tools over MCP.

use std::path::PathBuf;
use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::ai::Estimator;
use crate::models::{Exercise, ExerciseSet, FoodItem};
use crate::store::RecordStore;
use crate::tools::status::StatusTracker;
use crate::tools::{charts, dashboard, estimates, meals, measurements, profile, today, water, workouts};

/// FitVeda MCP Service
#[derive(Clone)]
pub struct FitvedaService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    store: Arc<dyn RecordStore>,
    estimator: Arc<dyn Estimator>,
    tool_router: ToolRouter<FitvedaService>,
}

impl FitvedaService {
    pub fn new(store: Arc<dyn RecordStore>, estimator: Arc<dyn Estimator>, status_tracker: StatusTracker) -> Self {
        Self {
            status_tracker: Arc::new(Mutex::new(status_tracker)),
            store,
            estimator,
            tool_router: Self::tool_router(),
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

fn not_found(kind: &str, id: &str) -> Result<CallToolResult, McpError> {
    let json = serde_json::json!({ "error": format!("{} not found", kind), "id": id });
    Ok(CallToolResult::success(vec![Content::text(json.to_string())]))
}

// ============================================================================
// Shared Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct IdParams {
    pub id: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DateFilterParams {
    /// YYYY-MM-DD; all dates when omitted
    pub date: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ViewParams {
    /// daily (default), weekly or monthly
    pub view: Option<String>,
}

// ============================================================================
// Measurement Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SaveMeasurementParams {
    /// Existing measurement id to replace; omit to create a new entry
    pub id: Option<String>,
    /// YYYY-MM-DD, defaults to today
    pub date: Option<String>,
    /// kg
    pub weight: f64,
    /// cm
    pub height: Option<f64>,
    pub chest: Option<f64>,
    pub waist: Option<f64>,
    pub belly: Option<f64>,
    pub hips: Option<f64>,
    pub arms_left: Option<f64>,
    pub arms_right: Option<f64>,
    pub thighs_left: Option<f64>,
    pub thighs_right: Option<f64>,
    pub neck: Option<f64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PreviewBmiParams {
    /// kg
    pub weight: f64,
    /// cm
    pub height: f64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct MetricTrendParams {
    /// weight, chest, waist, belly, hips, arms_left, arms_right, thighs_left, thighs_right or neck
    pub metric: String,
    #[serde(default = "default_view")]
    pub view: String,
}

fn default_view() -> String {
    "daily".to_string()
}

// ============================================================================
// Workout Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SetParam {
    pub reps: u32,
    /// kg
    pub weight: Option<f64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ExerciseParam {
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub sets: Vec<SetParam>,
    pub duration_minutes: Option<f64>,
}

impl From<ExerciseParam> for Exercise {
    fn from(p: ExerciseParam) -> Self {
        Exercise {
            id: p.id.unwrap_or_default(),
            name: p.name,
            sets: p
                .sets
                .into_iter()
                .map(|s| ExerciseSet {
                    reps: s.reps,
                    weight: s.weight,
                })
                .collect(),
            duration_minutes: p.duration_minutes,
        }
    }
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LogWorkoutParams {
    /// YYYY-MM-DD, defaults to today
    pub date: Option<String>,
    pub exercises: Vec<ExerciseParam>,
    pub calories_burned: Option<f64>,
    pub duration_minutes: Option<f64>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SuggestCaloriesParams {
    pub duration_minutes: Option<f64>,
    /// Value already entered, kept when non-zero
    pub calories_burned: Option<f64>,
}

// ============================================================================
// Meal Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct FoodItemParam {
    pub name: String,
    /// Free text portion, e.g. "2 pcs"
    pub quantity: Option<String>,
    /// grams
    pub protein: f64,
    /// kcal
    pub calories: f64,
    pub carbs: Option<f64>,
    pub fats: Option<f64>,
}

impl From<FoodItemParam> for FoodItem {
    fn from(p: FoodItemParam) -> Self {
        FoodItem {
            name: p.name,
            quantity: p.quantity.unwrap_or_default(),
            protein: p.protein,
            calories: p.calories,
            carbs: p.carbs,
            fats: p.fats,
        }
    }
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LogMealParams {
    /// YYYY-MM-DD, defaults to today
    pub date: Option<String>,
    /// morning, lunch, dinner or snack
    pub meal_type: String,
    pub items: Vec<FoodItemParam>,
    /// Accept an estimate's total as is instead of summing items
    pub total_protein: Option<f64>,
    pub total_calories: Option<f64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct EstimateParams {
    /// Free-text description of the meal or workout
    pub description: String,
}

// ============================================================================
// Water / Profile / Chart Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AdjustWaterParams {
    pub date: Option<String>,
    /// Glasses to add, negative to remove
    pub change: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct WaterDateParams {
    /// YYYY-MM-DD
    pub date: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SetWaterParams {
    pub date: Option<String>,
    pub glasses: u32,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateProfileParams {
    pub name: Option<String>,
    pub target_calories: Option<f64>,
    /// Glasses per day
    pub daily_water_goal: Option<u32>,
    /// kg; 0 clears it
    pub target_weight: Option<f64>,
    /// grams; 0 clears it
    pub target_protein: Option<f64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct MetricChartParams {
    pub metric: String,
    #[serde(default = "default_view")]
    pub view: String,
    /// Where to write the PNG
    pub output_path: String,
    #[serde(default = "default_chart_width")]
    pub width: u32,
    #[serde(default = "default_chart_height")]
    pub height: u32,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ActivityChartParams {
    pub view: Option<String>,
    /// Where to write the PNG
    pub output_path: String,
    #[serde(default = "default_chart_width")]
    pub width: u32,
    #[serde(default = "default_chart_height")]
    pub height: u32,
}

fn default_chart_width() -> u32 { charts::DEFAULT_WIDTH }
fn default_chart_height() -> u32 { charts::DEFAULT_HEIGHT }

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl FitvedaService {
    // --- Status ---

    #[tool(description = "Get the current status of the FitVeda service including build info, storage, estimator mode, and process information")]
    async fn fitveda_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        to_json(&tracker.get_status())
    }

    #[tool(description = "Get instructions for logging meals, workouts, measurements and water. Call this at the start of a session.")]
    fn logging_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::LOGGING_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(LOGGING_INSTRUCTIONS)]))
    }

    // --- Dashboard ---

    #[tool(description = "Get today's dashboard: calories eaten/burned/net/remaining, protein, water, latest weight and change, weight progress and workout activity")]
    fn get_dashboard(&self, Parameters(p): Parameters<ViewParams>) -> Result<CallToolResult, McpError> {
        let result = dashboard::get_dashboard(self.store.as_ref(), p.view.as_deref(), today())
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Count workouts per day (last 7 days), week (last 8) or month (last 6)")]
    fn get_workout_activity(&self, Parameters(p): Parameters<ViewParams>) -> Result<CallToolResult, McpError> {
        let result = dashboard::get_workout_activity(self.store.as_ref(), p.view.as_deref(), today())
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    // --- Measurements ---

    #[tool(description = "Save a body measurement. Pass an existing id to replace that entry completely.")]
    fn save_measurement(&self, Parameters(p): Parameters<SaveMeasurementParams>) -> Result<CallToolResult, McpError> {
        let input = measurements::MeasurementInput {
            id: p.id, date: p.date, weight: p.weight, height: p.height,
            chest: p.chest, waist: p.waist, belly: p.belly, hips: p.hips,
            arms_left: p.arms_left, arms_right: p.arms_right,
            thighs_left: p.thighs_left, thighs_right: p.thighs_right, neck: p.neck,
        };
        let result = measurements::save_measurement(self.store.as_ref(), input, today())
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "List all body measurements with BMI, newest first")]
    fn list_measurements(&self) -> Result<CallToolResult, McpError> {
        let result = measurements::list_measurements(self.store.as_ref())
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Get a body measurement by id")]
    fn get_measurement(&self, Parameters(p): Parameters<IdParams>) -> Result<CallToolResult, McpError> {
        match measurements::get_measurement(self.store.as_ref(), &p.id).map_err(|e| McpError::internal_error(e, None))? {
            Some(m) => to_json(&m),
            None => not_found("Measurement", &p.id),
        }
    }

    #[tool(description = "Delete a body measurement")]
    fn delete_measurement(&self, Parameters(p): Parameters<IdParams>) -> Result<CallToolResult, McpError> {
        let result = measurements::delete_measurement(self.store.as_ref(), &p.id)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Compute BMI for a weight (kg) and height (cm) without saving anything")]
    fn preview_bmi(&self, Parameters(p): Parameters<PreviewBmiParams>) -> Result<CallToolResult, McpError> {
        to_json(&measurements::preview_bmi(p.weight, p.height))
    }

    #[tool(description = "Chart series for one body metric in daily, weekly (averaged) or monthly (averaged) view")]
    fn get_metric_trend(&self, Parameters(p): Parameters<MetricTrendParams>) -> Result<CallToolResult, McpError> {
        let result = measurements::get_metric_trend(self.store.as_ref(), &p.metric, &p.view)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    // --- Workouts ---

    #[tool(description = "Log a workout. Exercises without a name are dropped. Missing calories are filled from duration x 6.")]
    fn log_workout(&self, Parameters(p): Parameters<LogWorkoutParams>) -> Result<CallToolResult, McpError> {
        let exercises = p.exercises.into_iter().map(Exercise::from).collect();
        let result = workouts::log_workout(
            self.store.as_ref(), p.date.as_deref(), exercises,
            p.calories_burned, p.duration_minutes, p.notes, today(),
        )
        .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "List workouts, most recent first, optionally for one date")]
    fn list_workouts(&self, Parameters(p): Parameters<DateFilterParams>) -> Result<CallToolResult, McpError> {
        let result = workouts::list_workouts(self.store.as_ref(), p.date.as_deref())
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Get a workout with all exercises and sets")]
    fn get_workout(&self, Parameters(p): Parameters<IdParams>) -> Result<CallToolResult, McpError> {
        match workouts::get_workout(self.store.as_ref(), &p.id).map_err(|e| McpError::internal_error(e, None))? {
            Some(w) => to_json(&w),
            None => not_found("Workout", &p.id),
        }
    }

    #[tool(description = "Delete a workout")]
    fn delete_workout(&self, Parameters(p): Parameters<IdParams>) -> Result<CallToolResult, McpError> {
        let result = workouts::delete_workout(self.store.as_ref(), &p.id)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Preview the calories that log_workout would fill in for a duration")]
    fn suggest_workout_calories(&self, Parameters(p): Parameters<SuggestCaloriesParams>) -> Result<CallToolResult, McpError> {
        to_json(&workouts::suggest_workout_calories(p.duration_minutes, p.calories_burned))
    }

    #[tool(description = "Estimate exercises, duration and calories burned from a workout description. Nothing is saved.")]
    async fn estimate_workout(&self, Parameters(p): Parameters<EstimateParams>) -> Result<CallToolResult, McpError> {
        let result = estimates::estimate_workout(self.estimator.as_ref(), &p.description)
            .await
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    // --- Meals ---

    #[tool(description = "Log a meal from food items. Totals are summed unless given.")]
    fn log_meal(&self, Parameters(p): Parameters<LogMealParams>) -> Result<CallToolResult, McpError> {
        let items = p.items.into_iter().map(FoodItem::from).collect();
        let result = meals::log_meal(
            self.store.as_ref(), p.date.as_deref(), &p.meal_type, items,
            p.total_protein, p.total_calories, today(),
        )
        .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "List meals, most recent first, optionally for one date, with protein and calorie totals")]
    fn list_meals(&self, Parameters(p): Parameters<DateFilterParams>) -> Result<CallToolResult, McpError> {
        let result = meals::list_meals(self.store.as_ref(), p.date.as_deref())
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Get a meal with its food items")]
    fn get_meal(&self, Parameters(p): Parameters<IdParams>) -> Result<CallToolResult, McpError> {
        match meals::get_meal(self.store.as_ref(), &p.id).map_err(|e| McpError::internal_error(e, None))? {
            Some(m) => to_json(&m),
            None => not_found("Meal", &p.id),
        }
    }

    #[tool(description = "Delete a meal")]
    fn delete_meal(&self, Parameters(p): Parameters<IdParams>) -> Result<CallToolResult, McpError> {
        let result = meals::delete_meal(self.store.as_ref(), &p.id)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Estimate food items with protein and calories from a meal description (Indian vegetarian food aware). Nothing is saved.")]
    async fn estimate_meal(&self, Parameters(p): Parameters<EstimateParams>) -> Result<CallToolResult, McpError> {
        let result = estimates::estimate_meal(self.estimator.as_ref(), &p.description)
            .await
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    // --- Water ---

    #[tool(description = "Get water intake for a day (defaults to today) with liters and progress")]
    fn get_water(&self, Parameters(p): Parameters<DateFilterParams>) -> Result<CallToolResult, McpError> {
        let result = water::get_water(self.store.as_ref(), p.date.as_deref(), today())
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Add or remove glasses of water for a day; never goes below zero")]
    fn adjust_water(&self, Parameters(p): Parameters<AdjustWaterParams>) -> Result<CallToolResult, McpError> {
        let result = water::adjust_water(self.store.as_ref(), p.date.as_deref(), p.change, today())
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Set the number of glasses of water for a day")]
    fn set_water(&self, Parameters(p): Parameters<SetWaterParams>) -> Result<CallToolResult, McpError> {
        let result = water::set_water(self.store.as_ref(), p.date.as_deref(), p.glasses, today())
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Delete the water log for a date; the day goes back to zero glasses")]
    fn delete_water_log(&self, Parameters(p): Parameters<WaterDateParams>) -> Result<CallToolResult, McpError> {
        let result = water::delete_water_log(self.store.as_ref(), &p.date)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "List all daily water logs")]
    fn list_water_logs(&self) -> Result<CallToolResult, McpError> {
        let result = water::list_water_logs(self.store.as_ref())
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    // --- Profile ---

    #[tool(description = "Get the user profile and targets")]
    fn get_profile(&self) -> Result<CallToolResult, McpError> {
        let result = profile::get_profile(self.store.as_ref())
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Update any of the profile fields: name, target_calories, daily_water_goal, target_weight, target_protein")]
    fn update_profile(&self, Parameters(p): Parameters<UpdateProfileParams>) -> Result<CallToolResult, McpError> {
        let update = profile::ProfileUpdate {
            name: p.name,
            target_calories: p.target_calories,
            daily_water_goal: p.daily_water_goal,
            target_weight: p.target_weight,
            target_protein: p.target_protein,
        };
        let result = profile::update_profile(self.store.as_ref(), update)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    // --- Charts ---

    #[tool(description = "Render a body metric trend chart to a PNG file")]
    fn export_metric_chart(&self, Parameters(p): Parameters<MetricChartParams>) -> Result<CallToolResult, McpError> {
        let path = PathBuf::from(&p.output_path);
        let result = charts::export_metric_chart(self.store.as_ref(), &p.metric, &p.view, &path, p.width, p.height)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Render a workout activity bar chart to a PNG file")]
    fn export_activity_chart(&self, Parameters(p): Parameters<ActivityChartParams>) -> Result<CallToolResult, McpError> {
        let path = PathBuf::from(&p.output_path);
        let result = charts::export_activity_chart(self.store.as_ref(), p.view.as_deref(), &path, p.width, p.height, today())
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }
}

#[tool_handler]
impl ServerHandler for FitvedaService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "fitveda".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("FitVeda Fitness Tracker".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "FitVeda - workouts, meals, water and body measurements. \
                 IMPORTANT: Call logging_instructions first. \
                 Dashboard: get_dashboard, get_workout_activity. \
                 Measurements: save/get/list/delete_measurement, preview_bmi, get_metric_trend. \
                 Workouts: estimate_workout, log_workout, suggest_workout_calories, get/list/delete_workout. \
                 Meals: estimate_meal, log_meal, get/list/delete_meal. \
                 Water: get_water, adjust_water, set_water, delete_water_log, list_water_logs. \
                 Profile: get_profile, update_profile. \
                 Charts: export_metric_chart, export_activity_chart (PNG). \
                 Estimates are never saved; log the reviewed values."
                    .into(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::MockEstimator;
    use crate::config::StorageBackend;
    use crate::store::MemoryStore;

    fn service() -> FitvedaService {
        FitvedaService::new(
            Arc::new(MemoryStore::new()),
            Arc::new(MockEstimator),
            StatusTracker::new(StorageBackend::Memory, None, "mock"),
        )
    }

    #[test]
    fn test_exercise_param_defaults() {
        let p: ExerciseParam = serde_json::from_value(serde_json::json!({ "name": "Plank" })).unwrap();
        let exercise = Exercise::from(p);
        assert_eq!(exercise.id, "");
        assert!(exercise.sets.is_empty());
        assert!(exercise.duration_minutes.is_none());
    }

    #[test]
    fn test_food_item_param_quantity_optional() {
        let p: FoodItemParam = serde_json::from_value(serde_json::json!({
            "name": "Moong Dal",
            "protein": 9.0,
            "calories": 180.0
        }))
        .unwrap();
        let item = FoodItem::from(p);
        assert_eq!(item.quantity, "");
        assert_eq!(item.calories, 180.0);
    }

    #[test]
    fn test_chart_params_default_size() {
        let p: MetricChartParams = serde_json::from_value(serde_json::json!({
            "metric": "weight",
            "output_path": "/tmp/weight.png"
        }))
        .unwrap();
        assert_eq!(p.view, "daily");
        assert_eq!((p.width, p.height), (charts::DEFAULT_WIDTH, charts::DEFAULT_HEIGHT));
    }

    #[test]
    fn test_server_info() {
        let info = service().get_info();
        assert_eq!(info.server_info.name, "fitveda");
        assert!(info.instructions.unwrap().contains("logging_instructions"));
    }
}
