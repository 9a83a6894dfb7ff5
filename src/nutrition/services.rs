use tracing::{debug, info};

use super::dto::{LogFoodRequest, NutritionSummary};
use super::foods::is_common;
use super::model::{aggregate, progress_percent, FoodItem, MealSlot, Meals};
use super::repo;
use crate::storage::KvStore;

pub const MISSING_NAME_OR_CALORIES: &str = "Please provide at least a name and calorie count.";

/// Validates user input into a food entry stamped with `id`.
pub fn build_food(req: LogFoodRequest, id: i64) -> Result<FoodItem, &'static str> {
    let name = req.name.trim();
    let Some(calories) = req.calories else {
        return Err(MISSING_NAME_OR_CALORIES);
    };
    if name.is_empty() {
        return Err(MISSING_NAME_OR_CALORIES);
    }

    let protein = req.protein.unwrap_or(0.0);
    let carbs = req.carbs.unwrap_or(0.0);
    let fat = req.fat.unwrap_or(0.0);
    if [calories, protein, carbs, fat]
        .iter()
        .any(|v| !v.is_finite() || *v < 0.0)
    {
        return Err("Nutrition values must be non-negative numbers.");
    }

    Ok(FoodItem {
        id,
        name: name.to_string(),
        calories,
        protein,
        carbs,
        fat,
    })
}

/// Appends `food` to `slot` and remembers it as a custom food when its
/// name is new. The id is bumped past every id the user already has.
/// Returns the stored food and the updated meals.
pub async fn log_food(
    store: &dyn KvStore,
    email: &str,
    slot: MealSlot,
    mut food: FoodItem,
) -> anyhow::Result<(FoodItem, Meals)> {
    let mut meals = repo::load_meals(store, email).await?;
    let mut custom = repo::load_custom_foods(store, email).await?;
    let max = meals.items().chain(&custom).map(|f| f.id).max().unwrap_or(0);
    food.id = food.id.max(max + 1);

    meals.push(slot, food.clone());
    repo::save_meals(store, email, &meals).await?;
    info!(%email, %slot, food = %food.name, "food logged");

    let known = is_common(&food.name)
        || custom.iter().any(|f| f.name.eq_ignore_ascii_case(&food.name));
    if !known {
        debug!(food = %food.name, "new custom food");
        custom.push(food.clone());
        repo::save_custom_foods(store, email, &custom).await?;
    }

    Ok((food, meals))
}

pub async fn summary(store: &dyn KvStore, email: &str, calorie_goal: u32) -> anyhow::Result<NutritionSummary> {
    let meals = repo::load_meals(store, email).await?;
    let totals = aggregate(&meals);
    let slot_calories = MealSlot::ALL
        .into_iter()
        .map(|slot| {
            let kcal: f64 = meals.slot(slot).iter().map(|f| f.calories).sum();
            (slot.to_string(), kcal.round() as i64)
        })
        .collect();

    Ok(NutritionSummary {
        totals: totals.rounded(),
        slot_calories,
        calorie_goal,
        progress_percent: progress_percent(totals.calories, calorie_goal),
        meals,
    })
}
