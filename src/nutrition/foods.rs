use std::collections::HashMap;

use lazy_static::lazy_static;

use super::model::FoodItem;

lazy_static! {
    /// Fixed reference list offered by search.
    pub static ref COMMON_FOODS: Vec<FoodItem> = [
        (1, "Apple", 95.0, 0.5, 25.0, 0.3),
        (2, "Banana", 105.0, 1.3, 27.0, 0.4),
        (3, "Chicken Breast (100g)", 165.0, 31.0, 0.0, 3.6),
        (4, "Brown Rice (1 cup cooked)", 215.0, 5.0, 45.0, 1.8),
        (5, "Broccoli (1 cup)", 55.0, 3.7, 11.0, 0.6),
        (6, "Salmon (100g)", 208.0, 20.0, 0.0, 13.0),
        (7, "Whole Egg", 78.0, 6.0, 0.6, 5.0),
        (8, "Almonds (28g)", 164.0, 6.0, 6.0, 14.0),
        (9, "Oats (1/2 cup dry)", 150.0, 5.0, 27.0, 2.5),
        (10, "Greek Yogurt (1 cup)", 100.0, 17.0, 6.0, 0.4),
    ]
    .into_iter()
    .map(|(id, name, calories, protein, carbs, fat)| FoodItem {
        id,
        name: name.to_string(),
        calories,
        protein,
        carbs,
        fat,
    })
    .collect();
}

/// Queries shorter than this return nothing.
pub const MIN_QUERY_LEN: usize = 2;

pub fn is_common(name: &str) -> bool {
    COMMON_FOODS.iter().any(|f| f.name.eq_ignore_ascii_case(name))
}

/// Reference foods followed by custom ones, one entry per lowercase name.
/// A later entry replaces an earlier one in place.
pub fn combined(custom: &[FoodItem]) -> Vec<FoodItem> {
    let mut order = Vec::new();
    let mut by_name: HashMap<String, FoodItem> = HashMap::new();
    for food in COMMON_FOODS.iter().chain(custom) {
        let key = food.name.to_lowercase();
        if by_name.insert(key.clone(), food.clone()).is_none() {
            order.push(key);
        }
    }
    order.into_iter().filter_map(|k| by_name.remove(&k)).collect()
}

pub fn search(query: &str, custom: &[FoodItem]) -> Vec<FoodItem> {
    if query.chars().count() < MIN_QUERY_LEN {
        return Vec::new();
    }
    let needle = query.to_lowercase();
    combined(custom)
        .into_iter()
        .filter(|f| f.name.to_lowercase().contains(&needle))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn custom(id: i64, name: &str, calories: f64) -> FoodItem {
        FoodItem { id, name: name.into(), calories, protein: 0.0, carbs: 0.0, fat: 0.0 }
    }

    #[test]
    fn reference_list_is_fixed() {
        assert_eq!(COMMON_FOODS.len(), 10);
        assert!(is_common("apple"));
        assert!(is_common("GREEK YOGURT (1 CUP)"));
        assert!(!is_common("Protein Shake"));
    }

    #[test]
    fn short_queries_return_nothing() {
        assert!(search("", &[]).is_empty());
        assert!(search("a", &[]).is_empty());
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let names: Vec<String> = search("AL", &[]).into_iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["Salmon (100g)", "Almonds (28g)"]);
    }

    #[test]
    fn custom_foods_join_and_override_by_name() {
        let mine = vec![custom(500, "Protein Shake", 120.0), custom(501, "banana", 90.0)];
        let list = combined(&mine);
        assert_eq!(list.len(), 11);
        // override keeps the reference position
        assert_eq!(list[1].id, 501);
        assert_eq!(list[1].calories, 90.0);
        assert_eq!(list.last().map(|f| f.id), Some(500));

        let hits = search("shake", &mine);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Protein Shake");
    }
}
