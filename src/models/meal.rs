//! Meal model
//!
//! A meal is a dated list of food items. Protein and calorie totals are
//! computed once when the meal is created and stored alongside the items.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;

/// Meal type enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Morning,
    Lunch,
    Dinner,
    Snack,
}

impl MealType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Morning => "morning",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snack => "snack",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "morning" | "breakfast" => Some(MealType::Morning),
            "lunch" => Some(MealType::Lunch),
            "dinner" => Some(MealType::Dinner),
            "snack" => Some(MealType::Snack),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            MealType::Morning => "Morning",
            MealType::Lunch => "Lunch",
            MealType::Dinner => "Dinner",
            MealType::Snack => "Snack",
        }
    }
}

/// A single food item within a meal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodItem {
    pub name: String,
    /// Free text portion, e.g. "2 pcs" or "1 bowl"
    #[serde(default)]
    pub quantity: String,
    /// grams
    pub protein: f64,
    /// kcal
    pub calories: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carbs: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fats: Option<f64>,
}

/// A logged meal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealLog {
    pub id: String,
    pub date: String,
    pub meal_type: MealType,
    pub items: Vec<FoodItem>,
    pub total_protein: f64,
    pub total_calories: f64,
}

impl MealLog {
    /// Build a meal, summing the item totals once
    pub fn from_items(
        id: impl Into<String>,
        date: impl Into<String>,
        meal_type: MealType,
        items: Vec<FoodItem>,
    ) -> Self {
        let total_protein = items.iter().map(|i| i.protein).sum();
        let total_calories = items.iter().map(|i| i.calories).sum();

        Self {
            id: id.into(),
            date: date.into(),
            meal_type,
            items,
            total_protein,
            total_calories,
        }
    }

    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let meal_type_str: String = row.get("meal_type")?;
        let meal_type = MealType::from_str(&meal_type_str).unwrap_or(MealType::Snack);

        let items_json: String = row.get("items")?;
        let items = serde_json::from_str(&items_json).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
        })?;

        Ok(Self {
            id: row.get("id")?,
            date: row.get("date")?,
            meal_type,
            items,
            total_protein: row.get("total_protein")?,
            total_calories: row.get("total_calories")?,
        })
    }

    /// Append a new meal
    pub fn add(conn: &Connection, meal: &MealLog) -> DbResult<()> {
        let items_json = serde_json::to_string(&meal.items)?;

        conn.execute(
            r#"
            INSERT INTO meals (id, date, meal_type, items, total_protein, total_calories)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                meal.id,
                meal.date,
                meal.meal_type.as_str(),
                items_json,
                meal.total_protein,
                meal.total_calories,
            ],
        )?;
        Ok(())
    }

    /// Get a meal by ID
    pub fn get_by_id(conn: &Connection, id: &str) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM meals WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(m) => Ok(Some(m)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List all meals, most recently added first
    pub fn list(conn: &Connection) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM meals ORDER BY seq DESC")?;
        let meals = stmt
            .query_map([], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(meals)
    }

    /// Delete a meal
    pub fn delete(conn: &Connection, id: &str) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM meals WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }
}
