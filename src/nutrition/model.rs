use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodItem {
    pub id: i64,
    pub name: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealSlot {
    Breakfast,
    Lunch,
    Dinner,
    Snacks,
}

impl MealSlot {
    pub const ALL: [MealSlot; 4] = [
        MealSlot::Breakfast,
        MealSlot::Lunch,
        MealSlot::Dinner,
        MealSlot::Snacks,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MealSlot::Breakfast => "breakfast",
            MealSlot::Lunch => "lunch",
            MealSlot::Dinner => "dinner",
            MealSlot::Snacks => "snacks",
        }
    }
}

impl fmt::Display for MealSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MealSlot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MealSlot::ALL
            .into_iter()
            .find(|slot| slot.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown meal slot: {s}"))
    }
}

/// Logged food per slot. Slots only grow, by append.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Meals {
    pub breakfast: Vec<FoodItem>,
    pub lunch: Vec<FoodItem>,
    pub dinner: Vec<FoodItem>,
    pub snacks: Vec<FoodItem>,
}

impl Meals {
    pub fn slot(&self, slot: MealSlot) -> &[FoodItem] {
        match slot {
            MealSlot::Breakfast => &self.breakfast,
            MealSlot::Lunch => &self.lunch,
            MealSlot::Dinner => &self.dinner,
            MealSlot::Snacks => &self.snacks,
        }
    }

    pub fn push(&mut self, slot: MealSlot, food: FoodItem) {
        let items = match slot {
            MealSlot::Breakfast => &mut self.breakfast,
            MealSlot::Lunch => &mut self.lunch,
            MealSlot::Dinner => &mut self.dinner,
            MealSlot::Snacks => &mut self.snacks,
        };
        items.push(food);
    }

    pub fn items(&self) -> impl Iterator<Item = &FoodItem> {
        MealSlot::ALL.into_iter().flat_map(move |slot| self.slot(slot))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct NutritionTotals {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

/// Totals rounded to whole units for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RoundedTotals {
    pub calories: i64,
    pub protein: i64,
    pub carbs: i64,
    pub fat: i64,
}

impl NutritionTotals {
    pub fn rounded(&self) -> RoundedTotals {
        RoundedTotals {
            calories: self.calories.round() as i64,
            protein: self.protein.round() as i64,
            carbs: self.carbs.round() as i64,
            fat: self.fat.round() as i64,
        }
    }
}

/// Element-wise sum over every item of every slot.
pub fn aggregate(meals: &Meals) -> NutritionTotals {
    meals.items().fold(NutritionTotals::default(), |acc, f| NutritionTotals {
        calories: acc.calories + f.calories,
        protein: acc.protein + f.protein,
        carbs: acc.carbs + f.carbs,
        fat: acc.fat + f.fat,
    })
}

/// Share of the calorie goal reached, capped at 100.
pub fn progress_percent(calories: f64, goal: u32) -> f64 {
    if goal == 0 {
        return 100.0;
    }
    (calories / goal as f64 * 100.0).min(100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn food(name: &str, calories: f64, protein: f64, carbs: f64, fat: f64) -> FoodItem {
        FoodItem { id: 0, name: name.into(), calories, protein, carbs, fat }
    }

    #[test]
    fn empty_meals_total_zero() {
        assert_eq!(aggregate(&Meals::default()), NutritionTotals::default());
    }

    #[test]
    fn apple_and_banana_make_two_hundred() {
        let mut meals = Meals::default();
        meals.push(MealSlot::Breakfast, food("Apple", 95.0, 0.5, 25.0, 0.3));
        meals.push(MealSlot::Snacks, food("Banana", 105.0, 1.3, 27.0, 0.4));

        let totals = aggregate(&meals);
        assert_eq!(totals.calories, 200.0);
        assert!((totals.protein - 1.8).abs() < 1e-9);
        assert_eq!(totals.carbs, 52.0);
        assert_eq!(totals.rounded(), RoundedTotals { calories: 200, protein: 2, carbs: 52, fat: 1 });
    }

    #[test]
    fn totals_ignore_slot_and_order() {
        let items = [
            food("Oats", 150.0, 5.0, 27.0, 2.5),
            food("Egg", 78.0, 6.0, 0.6, 5.0),
            food("Salmon", 208.0, 20.0, 0.0, 13.0),
        ];
        let mut a = Meals::default();
        let mut b = Meals::default();
        for (i, f) in items.iter().enumerate() {
            a.push(MealSlot::ALL[i], f.clone());
            b.push(MealSlot::Dinner, items[items.len() - 1 - i].clone());
        }
        assert_eq!(aggregate(&a), aggregate(&b));
        assert_eq!(aggregate(&a).calories, items.iter().map(|f| f.calories).sum::<f64>());
    }

    #[test]
    fn progress_is_capped() {
        assert_eq!(progress_percent(1250.0, 2500), 50.0);
        assert_eq!(progress_percent(4000.0, 2500), 100.0);
        assert_eq!(progress_percent(0.0, 2500), 0.0);
    }

    #[test]
    fn slot_parsing() {
        assert_eq!("Lunch".parse::<MealSlot>(), Ok(MealSlot::Lunch));
        assert_eq!("snacks".parse::<MealSlot>(), Ok(MealSlot::Snacks));
        assert!("brunch".parse::<MealSlot>().is_err());
    }

    #[test]
    fn meals_serialize_all_slots() {
        let json = serde_json::to_value(Meals::default()).unwrap();
        for slot in MealSlot::ALL {
            assert_eq!(json[slot.as_str()], serde_json::json!([]));
        }
        let partial: Meals = serde_json::from_str(r#"{"lunch":[]}"#).unwrap();
        assert!(partial.breakfast.is_empty());
    }
}
