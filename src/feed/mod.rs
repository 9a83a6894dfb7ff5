mod dto;
pub mod handlers;
pub mod model;
mod seed;
pub mod store;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::feed_routes())
}
