//! Meal line items and nutrition totals

use crate::errors::{MetricsError, MetricsResult};
use crate::health_metrics::round_to;
use serde::{Deserialize, Serialize};

/// Meal slot within a day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealType {
    pub const ALL: [MealType; 4] = [MealType::Breakfast, MealType::Lunch, MealType::Dinner, MealType::Snack];

    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snack => "snack",
        }
    }
}

/// Unit a food quantity is measured in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FoodUnit {
    G,
    Kg,
    Ml,
    L,
    Cup,
    Tbsp,
    Tsp,
    Piece,
    Slice,
    Serving,
}

impl FoodUnit {
    pub const ALL: [FoodUnit; 10] = [
        FoodUnit::G,
        FoodUnit::Kg,
        FoodUnit::Ml,
        FoodUnit::L,
        FoodUnit::Cup,
        FoodUnit::Tbsp,
        FoodUnit::Tsp,
        FoodUnit::Piece,
        FoodUnit::Slice,
        FoodUnit::Serving,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FoodUnit::G => "g",
            FoodUnit::Kg => "kg",
            FoodUnit::Ml => "ml",
            FoodUnit::L => "l",
            FoodUnit::Cup => "cup",
            FoodUnit::Tbsp => "tbsp",
            FoodUnit::Tsp => "tsp",
            FoodUnit::Piece => "piece",
            FoodUnit::Slice => "slice",
            FoodUnit::Serving => "serving",
        }
    }
}

impl_str_conversions! {
    MealType => "meal type",
    FoodUnit => "food unit",
}

/// One line of a meal; nutrient values are per unit of `unit`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodItem {
    pub name: String,
    pub quantity: f64,
    pub unit: FoodUnit,
    #[serde(default)]
    pub calories: f64,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub carbs: f64,
    #[serde(default)]
    pub fat: f64,
    #[serde(default)]
    pub fiber: f64,
    #[serde(default)]
    pub sugar: f64,
}

impl FoodItem {
    /// Check name, quantity and nutrient ranges
    pub fn validate(&self) -> MetricsResult<()> {
        if self.name.trim().is_empty() {
            return Err(MetricsError::invalid("food name cannot be empty"));
        }
        if !self.quantity.is_finite() || self.quantity <= 0.0 {
            return Err(MetricsError::invalid(format!(
                "quantity for '{}' must be greater than 0",
                self.name
            )));
        }
        let nutrients = [
            ("calories", self.calories),
            ("protein", self.protein),
            ("carbs", self.carbs),
            ("fat", self.fat),
            ("fiber", self.fiber),
            ("sugar", self.sugar),
        ];
        for (field, value) in nutrients {
            if !value.is_finite() || value < 0.0 {
                return Err(MetricsError::invalid(format!(
                    "{} for '{}' cannot be negative",
                    field, self.name
                )));
            }
        }
        Ok(())
    }
}

/// Aggregate nutrition for a meal
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MealTotals {
    pub total_calories: f64,
    pub total_protein: f64,
    pub total_carbs: f64,
    pub total_fat: f64,
    pub total_fiber: f64,
    pub total_sugar: f64,
}

/// Sum `nutrient × quantity` across foods, each total rounded to 2 decimals
pub fn compute_meal_totals(foods: &[FoodItem]) -> MealTotals {
    let raw = foods.iter().fold(MealTotals::default(), |acc, food| MealTotals {
        total_calories: acc.total_calories + food.calories * food.quantity,
        total_protein: acc.total_protein + food.protein * food.quantity,
        total_carbs: acc.total_carbs + food.carbs * food.quantity,
        total_fat: acc.total_fat + food.fat * food.quantity,
        total_fiber: acc.total_fiber + food.fiber * food.quantity,
        total_sugar: acc.total_sugar + food.sugar * food.quantity,
    });

    MealTotals {
        total_calories: round_to(raw.total_calories, 2),
        total_protein: round_to(raw.total_protein, 2),
        total_carbs: round_to(raw.total_carbs, 2),
        total_fat: round_to(raw.total_fat, 2),
        total_fiber: round_to(raw.total_fiber, 2),
        total_sugar: round_to(raw.total_sugar, 2),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn food(name: &str, calories: f64, quantity: f64) -> FoodItem {
        FoodItem {
            name: name.to_string(),
            quantity,
            unit: FoodUnit::Serving,
            calories,
            protein: 0.0,
            carbs: 0.0,
            fat: 0.0,
            fiber: 0.0,
            sugar: 0.0,
        }
    }

    #[test]
    fn test_totals_multiply_by_quantity() {
        let totals = compute_meal_totals(&[food("toast", 100.0, 2.0), food("jam", 50.0, 1.0)]);
        assert_eq!(totals.total_calories, 250.0);
        assert_eq!(totals.total_protein, 0.0);
    }

    #[test]
    fn test_each_total_rounded_independently() {
        let mut oats = food("oats", 3.333, 3.0);
        oats.protein = 0.1234;
        oats.fat = 0.125;
        let totals = compute_meal_totals(&[oats]);
        assert_eq!(totals.total_calories, 10.0);
        assert_eq!(totals.total_protein, 0.37);
        assert_eq!(totals.total_fat, 0.38);
    }

    #[test]
    fn test_empty_foods_yield_zero_totals() {
        assert_eq!(compute_meal_totals(&[]), MealTotals::default());
    }

    #[test]
    fn test_food_validation() {
        assert!(food("rice", 130.0, 1.5).validate().is_ok());
        assert!(food("rice", 130.0, 0.0).validate().is_err());
        assert!(food("  ", 130.0, 1.0).validate().is_err());
        assert!(food("rice", -1.0, 1.0).validate().is_err());
    }

    #[test]
    fn test_food_unit_catalogue() {
        assert_eq!(FoodUnit::ALL.len(), 10);
        assert_eq!("tbsp".parse::<FoodUnit>().unwrap(), FoodUnit::Tbsp);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Property: total calories match the rounded per-item sum
        #[test]
        fn prop_total_calories_match_sum(
            items in prop::collection::vec((0.0f64..900.0, 0.1f64..10.0), 1..12)
        ) {
            let foods: Vec<FoodItem> = items
                .iter()
                .map(|(calories, quantity)| food("item", *calories, *quantity))
                .collect();
            let expected: f64 = items.iter().map(|(c, q)| c * q).sum();
            let totals = compute_meal_totals(&foods);
            prop_assert!((totals.total_calories - expected).abs() <= 0.005 + 1e-9);
        }
    }
}
