use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{error, instrument, warn};

use super::dto::{FoodSearchQuery, LogFoodRequest, LoggedFoodResponse, NutritionSummary};
use super::model::{aggregate, FoodItem, MealSlot};
use super::{foods, repo, services};
use crate::{auth::jwt::AuthUser, clock, state::AppState};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/nutrition", get(get_summary))
        .route("/nutrition/foods", get(search_foods))
}

pub fn write_routes() -> Router<AppState> {
    Router::new().route("/nutrition/meals/:slot", post(log_food))
}

fn internal<E: std::fmt::Display>(e: E) -> (StatusCode, String) {
    error!(error = %e, "nutrition request failed");
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}

#[instrument(skip(state, user), fields(email = %user.email))]
pub async fn get_summary(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<NutritionSummary>, (StatusCode, String)> {
    let summary = services::summary(state.store.as_ref(), &user.email, state.config.calorie_goal)
        .await
        .map_err(internal)?;
    Ok(Json(summary))
}

#[instrument(skip(state, user), fields(email = %user.email))]
pub async fn search_foods(
    State(state): State<AppState>,
    user: AuthUser,
    Query(q): Query<FoodSearchQuery>,
) -> Result<Json<Vec<FoodItem>>, (StatusCode, String)> {
    let custom = repo::load_custom_foods(state.store.as_ref(), &user.email)
        .await
        .map_err(internal)?;
    Ok(Json(foods::search(q.q.trim(), &custom)))
}

#[instrument(skip(state, user, payload), fields(email = %user.email))]
pub async fn log_food(
    State(state): State<AppState>,
    user: AuthUser,
    Path(slot): Path<String>,
    Json(payload): Json<LogFoodRequest>,
) -> Result<(StatusCode, Json<LoggedFoodResponse>), (StatusCode, String)> {
    let slot: MealSlot = slot.parse().map_err(|e: String| {
        warn!(error = %e, "bad meal slot");
        (StatusCode::NOT_FOUND, e)
    })?;

    let food = services::build_food(payload, clock::now_millis()).map_err(|msg| {
        warn!(%msg, "food rejected");
        (StatusCode::BAD_REQUEST, msg.to_string())
    })?;

    let (food, meals) = {
        let _guard = state.write_lock.lock().await;
        services::log_food(state.store.as_ref(), &user.email, slot, food)
            .await
            .map_err(internal)?
    };

    Ok((
        StatusCode::CREATED,
        Json(LoggedFoodResponse {
            slot: slot.to_string(),
            food,
            totals: aggregate(&meals).rounded(),
        }),
    ))
}
