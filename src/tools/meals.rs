//! Meal tools

use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;

use super::{resolve_date, store_err, DeleteResponse};
use crate::models::{new_id, FoodItem, MealLog, MealType};
use crate::store::RecordStore;

/// Response for list_meals
#[derive(Debug, Serialize)]
pub struct ListMealsResponse {
    pub meals: Vec<MealLog>,
    pub total: usize,
    pub total_protein: f64,
    pub total_calories: f64,
}

/// Parse a meal type name
pub fn parse_meal_type(s: &str) -> Result<MealType, String> {
    MealType::from_str(s).ok_or_else(|| {
        format!(
            "Invalid meal type '{}'. Must be one of: morning, lunch, dinner, snack",
            s
        )
    })
}

fn valid_amount(v: f64) -> bool {
    v.is_finite() && v >= 0.0
}

/// Save a meal.
///
/// Totals are summed from the items unless given explicitly, which is how
/// a reviewed estimate is accepted verbatim.
pub fn log_meal(
    store: &dyn RecordStore,
    date: Option<&str>,
    meal_type: &str,
    items: Vec<FoodItem>,
    total_protein: Option<f64>,
    total_calories: Option<f64>,
    today: NaiveDate,
) -> Result<MealLog, String> {
    let meal_type = parse_meal_type(meal_type)?;
    let date = resolve_date(date, today)?;

    let items: Vec<FoodItem> = items
        .into_iter()
        .filter(|i| !i.name.trim().is_empty())
        .collect();
    if items.is_empty() {
        return Err("A meal needs at least one food item".to_string());
    }
    if items
        .iter()
        .any(|i| !(valid_amount(i.protein) && valid_amount(i.calories)))
    {
        return Err("Food item protein and calories must be non-negative".to_string());
    }
    if !total_protein.into_iter().chain(total_calories).all(valid_amount) {
        return Err("Meal totals must be non-negative".to_string());
    }

    let mut meal = MealLog::from_items(new_id(), date, meal_type, items);
    if let Some(p) = total_protein {
        meal.total_protein = p;
    }
    if let Some(c) = total_calories {
        meal.total_calories = c;
    }

    store.add_meal(&meal).map_err(store_err("Failed to save meal"))?;

    info!(
        id = %meal.id,
        meal_type = meal.meal_type.as_str(),
        calories = meal.total_calories,
        "Logged meal"
    );
    Ok(meal)
}

/// List meals, most recently logged first, optionally for one date
pub fn list_meals(store: &dyn RecordStore, date: Option<&str>) -> Result<ListMealsResponse, String> {
    let meals: Vec<MealLog> = store
        .list_meals()
        .map_err(store_err("Failed to list meals"))?
        .into_iter()
        .filter(|m| date.map_or(true, |d| m.date == d))
        .collect();

    Ok(ListMealsResponse {
        total: meals.len(),
        total_protein: meals.iter().map(|m| m.total_protein).sum(),
        total_calories: meals.iter().map(|m| m.total_calories).sum(),
        meals,
    })
}

pub fn get_meal(store: &dyn RecordStore, id: &str) -> Result<Option<MealLog>, String> {
    store.get_meal(id).map_err(store_err("Failed to get meal"))
}

pub fn delete_meal(store: &dyn RecordStore, id: &str) -> Result<DeleteResponse, String> {
    let deleted = store
        .delete_meal(id)
        .map_err(store_err("Failed to delete meal"))?;

    if !deleted {
        return Err(format!("Meal {} not found", id));
    }

    info!(id = %id, "Deleted meal");
    Ok(DeleteResponse {
        success: true,
        deleted_id: id.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, 16).unwrap()
    }

    fn item(name: &str, protein: f64, calories: f64) -> FoodItem {
        FoodItem {
            name: name.to_string(),
            quantity: "1 bowl".to_string(),
            protein,
            calories,
            carbs: None,
            fats: None,
        }
    }

    #[test]
    fn test_log_meal_rejects_bad_totals() {
        let store = MemoryStore::new();
        let items = || vec![item("Poha", 5.0, 250.0)];

        let err = log_meal(&store, None, "snack", items(), Some(-1.0), None, today()).unwrap_err();
        assert_eq!(err, "Meal totals must be non-negative");
        assert!(log_meal(&store, None, "snack", items(), None, Some(f64::NAN), today()).is_err());
        assert!(log_meal(&store, None, "snack", items(), None, Some(f64::INFINITY), today()).is_err());
        assert!(store.list_meals().unwrap().is_empty());

        let meal = log_meal(&store, None, "snack", items(), Some(0.0), Some(240.0), today()).unwrap();
        assert_eq!(meal.total_protein, 0.0);
        assert_eq!(meal.total_calories, 240.0);
    }

    #[test]
    fn test_log_meal_sums_totals() {
        let store = MemoryStore::new();
        let meal = log_meal(
            &store,
            None,
            "Lunch",
            vec![item("Dal", 8.0, 150.0), item("Rice", 4.0, 200.0)],
            None,
            None,
            today(),
        )
        .unwrap();

        assert_eq!(meal.date, "2025-10-16");
        assert_eq!(meal.meal_type, MealType::Lunch);
        assert_eq!(meal.total_protein, 12.0);
        assert_eq!(meal.total_calories, 350.0);
    }

    #[test]
    fn test_log_meal_accepts_estimate_totals() {
        let store = MemoryStore::new();
        let meal = log_meal(
            &store,
            Some("2025-10-15"),
            "breakfast",
            vec![item("Poha", 5.0, 250.0)],
            Some(6.0),
            Some(270.0),
            today(),
        )
        .unwrap();
        assert_eq!(meal.meal_type, MealType::Morning);
        assert_eq!(meal.total_protein, 6.0);
        assert_eq!(meal.total_calories, 270.0);
    }

    #[test]
    fn test_log_meal_validation() {
        let store = MemoryStore::new();
        assert!(log_meal(&store, None, "brunch", vec![item("x", 1.0, 1.0)], None, None, today()).is_err());
        assert!(log_meal(&store, None, "snack", vec![], None, None, today()).is_err());
        assert!(log_meal(&store, None, "snack", vec![item(" ", 1.0, 1.0)], None, None, today()).is_err());
        assert!(log_meal(&store, None, "snack", vec![item("x", -1.0, 1.0)], None, None, today()).is_err());
        assert_eq!(list_meals(&store, None).unwrap().total, 0);
    }

    #[test]
    fn test_list_meals_for_date() {
        let store = MemoryStore::new();
        log_meal(&store, Some("2025-10-15"), "dinner", vec![item("Roti", 6.0, 200.0)], None, None, today()).unwrap();
        let latest = log_meal(&store, None, "snack", vec![item("Chana", 7.0, 120.0)], None, None, today()).unwrap();

        let all = list_meals(&store, None).unwrap();
        assert_eq!(all.total, 2);
        assert_eq!(all.meals[0].id, latest.id);
        assert_eq!(all.total_calories, 320.0);

        let day = list_meals(&store, Some("2025-10-16")).unwrap();
        assert_eq!(day.total, 1);
        assert_eq!(day.total_protein, 7.0);

        delete_meal(&store, &latest.id).unwrap();
        assert!(get_meal(&store, &latest.id).unwrap().is_none());
    }
}
