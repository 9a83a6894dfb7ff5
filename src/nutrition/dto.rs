use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::model::{FoodItem, Meals, RoundedTotals};

#[derive(Debug, Default, Deserialize)]
pub struct LogFoodRequest {
    #[serde(default)]
    pub name: String,
    pub calories: Option<f64>,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fat: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct FoodSearchQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Serialize)]
pub struct LoggedFoodResponse {
    pub slot: String,
    pub food: FoodItem,
    pub totals: RoundedTotals,
}

#[derive(Debug, Serialize)]
pub struct NutritionSummary {
    pub meals: Meals,
    pub totals: RoundedTotals,
    pub slot_calories: BTreeMap<String, i64>,
    pub calorie_goal: u32,
    pub progress_percent: f64,
}
