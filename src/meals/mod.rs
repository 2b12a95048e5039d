mod dto;
pub mod handlers;
#[cfg(test)]
pub mod memory;
pub mod repo;
mod repo_types;
pub mod services;
pub mod streak;

use crate::state::AppState;
use axum::Router;

pub use repo::PgMealStore;
pub use services::MealService;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::meal_routes())
        .merge(handlers::stats_routes())
}
