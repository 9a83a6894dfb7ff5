use anyhow::Context;

use super::model::{FoodItem, Meals};
use crate::storage::{keys, load_json_or_default, put_json, KvStore};

pub async fn load_meals(store: &dyn KvStore, email: &str) -> anyhow::Result<Meals> {
    load_json_or_default(store, &keys::meals(email))
        .await
        .with_context(|| format!("load meals {email}"))
}

pub async fn save_meals(store: &dyn KvStore, email: &str, meals: &Meals) -> anyhow::Result<()> {
    put_json(store, &keys::meals(email), meals)
        .await
        .with_context(|| format!("store meals {email}"))
}

pub async fn load_custom_foods(store: &dyn KvStore, email: &str) -> anyhow::Result<Vec<FoodItem>> {
    load_json_or_default(store, &keys::custom_foods(email))
        .await
        .with_context(|| format!("load custom foods {email}"))
}

pub async fn save_custom_foods(
    store: &dyn KvStore,
    email: &str,
    foods: &[FoodItem],
) -> anyhow::Result<()> {
    put_json(store, &keys::custom_foods(email), foods)
        .await
        .with_context(|| format!("store custom foods {email}"))
}
