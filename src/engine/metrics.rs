//! Derived health metrics
//!
//! Scalar results for BMI, weight change, daily calorie balance and
//! hydration. Every function has a defined result for empty or zero input.

use serde::{Deserialize, Serialize};

use super::buckets::{parse_day, round1};
use crate::models::{BodyMeasurement, MealLog, UserProfile, WorkoutLog};

/// Millilitres in one glass
pub const GLASS_ML: f64 = 250.0;

/// Visual state attached to a metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorTag {
    Neutral,
    Info,
    Good,
    Warning,
    Danger,
}

// ============================================================================
// BMI
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BmiCategory {
    Unknown,
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl BmiCategory {
    /// Category for an already rounded BMI value
    pub fn classify(value: f64) -> Self {
        if value < 18.5 {
            BmiCategory::Underweight
        } else if value < 25.0 {
            BmiCategory::Normal
        } else if value < 30.0 {
            BmiCategory::Overweight
        } else {
            BmiCategory::Obese
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BmiCategory::Unknown => "Unknown",
            BmiCategory::Underweight => "Underweight",
            BmiCategory::Normal => "Normal",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obese => "Obese",
        }
    }

    pub fn color(&self) -> ColorTag {
        match self {
            BmiCategory::Unknown => ColorTag::Neutral,
            BmiCategory::Underweight => ColorTag::Info,
            BmiCategory::Normal => ColorTag::Good,
            BmiCategory::Overweight => ColorTag::Warning,
            BmiCategory::Obese => ColorTag::Danger,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BmiResult {
    pub value: f64,
    pub category: BmiCategory,
    pub label: String,
    pub color: ColorTag,
}

/// BMI from kilograms and centimetres, rounded to one decimal.
///
/// Zero, negative or non-finite input gives value 0 with category Unknown.
pub fn bmi(weight_kg: f64, height_cm: f64) -> BmiResult {
    let valid = |v: f64| v.is_finite() && v > 0.0;
    if !valid(weight_kg) || !valid(height_cm) {
        return BmiResult {
            value: 0.0,
            category: BmiCategory::Unknown,
            label: BmiCategory::Unknown.label().to_string(),
            color: BmiCategory::Unknown.color(),
        };
    }

    let height_m = height_cm / 100.0;
    let value = round1(weight_kg / (height_m * height_m));
    let category = BmiCategory::classify(value);

    BmiResult {
        value,
        category,
        label: category.label().to_string(),
        color: category.color(),
    }
}

// ============================================================================
// Weight change
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightChange {
    /// 0 when there is no measurement
    pub latest: f64,
    /// Falls back to `latest` with fewer than two measurements
    pub previous: f64,
    pub delta: f64,
}

/// Latest weight and its change from the one before, by date
pub fn weight_change(measurements: &[BodyMeasurement]) -> WeightChange {
    let mut sorted: Vec<&BodyMeasurement> = measurements.iter().collect();
    sorted.sort_by_key(|m| parse_day(&m.date));

    let latest = sorted.last().map(|m| m.weight).unwrap_or(0.0);
    let previous = if sorted.len() > 1 {
        sorted[sorted.len() - 2].weight
    } else {
        latest
    };

    WeightChange {
        latest,
        previous,
        delta: latest - previous,
    }
}

// ============================================================================
// Calorie balance
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalorieBalance {
    pub consumed: f64,
    pub burned: f64,
    /// consumed - burned
    pub net: f64,
    pub target: f64,
    /// target - net, may be negative
    pub remaining: f64,
    pub protein: f64,
}

/// Calories eaten and burned on `date` against the profile target
pub fn calorie_balance(
    meals: &[MealLog],
    workouts: &[WorkoutLog],
    profile: &UserProfile,
    date: &str,
) -> CalorieBalance {
    let day_meals = meals.iter().filter(|m| m.date == date);
    let (consumed, protein) = day_meals.fold((0.0, 0.0), |(cal, pro), m| {
        (cal + m.total_calories, pro + m.total_protein)
    });

    let burned: f64 = workouts
        .iter()
        .filter(|w| w.date == date)
        .map(|w| w.calories_burned.unwrap_or(0.0))
        .sum();

    let net = consumed - burned;

    CalorieBalance {
        consumed,
        burned,
        net,
        target: profile.target_calories,
        remaining: profile.target_calories - net,
        protein,
    }
}

// ============================================================================
// Hydration
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hydration {
    pub glasses: u32,
    pub goal: u32,
    pub liters: f64,
    /// Two decimals, e.g. "1.75"
    pub liters_display: String,
    /// Capped at 100 for progress bars
    pub percent: f64,
    pub raw_percent: f64,
    pub goal_met: bool,
    pub color: ColorTag,
}

/// Volume and progress for a day's glasses. A zero goal counts as met.
pub fn hydration(glasses: u32, goal: u32) -> Hydration {
    let liters = f64::from(glasses) * GLASS_ML / 1000.0;
    let raw_percent = if goal == 0 {
        100.0
    } else {
        f64::from(glasses) / f64::from(goal) * 100.0
    };
    let goal_met = raw_percent >= 100.0;

    Hydration {
        glasses,
        goal,
        liters,
        liters_display: format!("{:.2}", liters),
        percent: raw_percent.min(100.0),
        raw_percent,
        goal_met,
        color: if goal_met { ColorTag::Good } else { ColorTag::Info },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FoodItem, MealType};

    #[test]
    fn test_bmi_reference_values() {
        let r = bmi(70.0, 175.0);
        assert_eq!(r.value, 22.9);
        assert_eq!(r.label, "Normal");

        let r = bmi(50.0, 175.0);
        assert_eq!(r.value, 16.3);
        assert_eq!(r.category, BmiCategory::Underweight);

        let r = bmi(85.0, 175.0);
        assert_eq!(r.value, 27.8);
        assert_eq!(r.category, BmiCategory::Overweight);

        let r = bmi(100.0, 175.0);
        assert_eq!(r.value, 32.7);
        assert_eq!(r.category, BmiCategory::Obese);
        assert_eq!(r.color, ColorTag::Danger);
    }

    #[test]
    fn test_bmi_unknown_for_zero() {
        for (w, h) in [(0.0, 175.0), (70.0, 0.0), (0.0, 0.0), (f64::NAN, 175.0)] {
            let r = bmi(w, h);
            assert_eq!(r.value, 0.0);
            assert_eq!(r.label, "Unknown");
            assert_eq!(r.color, ColorTag::Neutral);
        }
    }

    #[test]
    fn test_bmi_boundaries_are_lower_inclusive() {
        assert_eq!(BmiCategory::classify(18.4), BmiCategory::Underweight);
        assert_eq!(BmiCategory::classify(18.5), BmiCategory::Normal);
        assert_eq!(BmiCategory::classify(24.9), BmiCategory::Normal);
        assert_eq!(BmiCategory::classify(25.0), BmiCategory::Overweight);
        assert_eq!(BmiCategory::classify(30.0), BmiCategory::Obese);
    }

    #[test]
    fn test_bmi_classifies_rounded_value() {
        // 24.96 rounds to 25.0
        let height = 100.0;
        let r = bmi(24.96, height);
        assert_eq!(r.value, 25.0);
        assert_eq!(r.category, BmiCategory::Overweight);
    }

    #[test]
    fn test_weight_change() {
        let h = vec![
            BodyMeasurement::new("b", "2025-10-10", 68.0, 175.0),
            BodyMeasurement::new("a", "2025-10-01", 70.0, 175.0),
        ];
        let c = weight_change(&h);
        assert_eq!(c.latest, 68.0);
        assert_eq!(c.delta, -2.0);

        let single = weight_change(&h[..1]);
        assert_eq!(single.delta, 0.0);
        assert_eq!(single.latest, 68.0);
        assert_eq!(single.previous, 68.0);

        let none = weight_change(&[]);
        assert_eq!(none.latest, 0.0);
        assert_eq!(none.delta, 0.0);
    }

    fn meal(date: &str, calories: f64, protein: f64) -> MealLog {
        MealLog::from_items(
            "m",
            date,
            MealType::Lunch,
            vec![FoodItem {
                name: "Thali".into(),
                quantity: "1 plate".into(),
                protein,
                calories,
                carbs: None,
                fats: None,
            }],
        )
    }

    fn workout(date: &str, burned: Option<f64>) -> WorkoutLog {
        WorkoutLog {
            id: "w".into(),
            date: date.into(),
            exercises: vec![],
            calories_burned: burned,
            duration_minutes: None,
            notes: None,
        }
    }

    #[test]
    fn test_calorie_balance() {
        let today = "2025-10-16";
        let meals = vec![meal(today, 500.0, 20.0), meal(today, 300.0, 10.0), meal("2025-10-15", 900.0, 5.0)];
        let workouts = vec![workout(today, Some(200.0)), workout(today, None), workout("2025-10-15", Some(50.0))];

        let b = calorie_balance(&meals, &workouts, &UserProfile::default(), today);
        assert_eq!(b.consumed, 800.0);
        assert_eq!(b.burned, 200.0);
        assert_eq!(b.net, 600.0);
        assert_eq!(b.remaining, 1400.0);
        assert_eq!(b.protein, 30.0);
    }

    #[test]
    fn test_remaining_may_go_negative() {
        let today = "2025-10-16";
        let meals = vec![meal(today, 2500.0, 0.0)];
        let b = calorie_balance(&meals, &[], &UserProfile::default(), today);
        assert_eq!(b.remaining, -500.0);

        let empty = calorie_balance(&[], &[], &UserProfile::default(), today);
        assert_eq!(empty.net, 0.0);
        assert_eq!(empty.remaining, 2000.0);
    }

    #[test]
    fn test_hydration() {
        let h = hydration(7, 10);
        assert_eq!(h.liters, 1.75);
        assert_eq!(h.liters_display, "1.75");
        assert!((h.percent - 70.0).abs() < 1e-9);
        assert!(!h.goal_met);
        assert_eq!(h.color, ColorTag::Info);

        let h = hydration(12, 10);
        assert_eq!(h.percent, 100.0);
        assert!((h.raw_percent - 120.0).abs() < 1e-9);
        assert!(h.goal_met);
        assert_eq!(h.color, ColorTag::Good);

        let h = hydration(0, 10);
        assert_eq!(h.liters_display, "0.00");
        assert_eq!(h.percent, 0.0);
    }

    #[test]
    fn test_hydration_zero_goal() {
        let h = hydration(0, 0);
        assert!(h.goal_met);
        assert_eq!(h.percent, 100.0);
    }
}
