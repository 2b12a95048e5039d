use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use crate::{error::AppError, state::AppState};

use super::dto::{
    BestSequence, CreateMealRequest, CreatedMealResponse, DietFilter, MealPage, MealResponse,
    Pagination, Total, UpdateMealRequest,
};

// --- public routers ---

pub fn meal_routes() -> Router<AppState> {
    Router::new()
        .route("/meals", post(create_meal))
        .route(
            "/meals/:id",
            get(get_meal).put(update_meal).delete(delete_meal),
        )
}

pub fn stats_routes() -> Router<AppState> {
    Router::new()
        .route("/users/:user_id/meals", get(list_meals))
        .route("/users/:user_id/meals/total", get(count_meals))
        .route("/users/:user_id/meals/diet", get(count_meals_by_diet))
        .route("/users/:user_id/meals/best-sequence", get(best_sequence))
}

// --- handlers ---

#[instrument(skip(state, body), fields(user_id = %body.user_id))]
pub async fn create_meal(
    State(state): State<AppState>,
    Json(body): Json<CreateMealRequest>,
) -> Result<(StatusCode, HeaderMap, Json<CreatedMealResponse>), AppError> {
    let id = state.meals.create(body.into()).await?;

    let mut headers = HeaderMap::new();
    if let Ok(location) = HeaderValue::from_str(&format!("/api/v1/meals/{id}")) {
        headers.insert(header::LOCATION, location);
    }

    Ok((StatusCode::CREATED, headers, Json(CreatedMealResponse { id })))
}

#[instrument(skip(state))]
pub async fn get_meal(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MealResponse>, AppError> {
    let meal = state.meals.find_unique(id).await?;
    Ok(Json(MealResponse { meal }))
}

#[instrument(skip(state, body), fields(user_id = %body.user_id))]
pub async fn update_meal(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateMealRequest>,
) -> Result<StatusCode, AppError> {
    state.meals.update(id, body.patch, body.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn delete_meal(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.meals.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn list_meals(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Query(p): Query<Pagination>,
) -> Result<Json<MealPage>, AppError> {
    let take = p.take.unwrap_or(state.config.default_page_size);
    let page = state.meals.find_many(user_id, p.page, take).await?;
    Ok(Json(page))
}

#[instrument(skip(state))]
pub async fn count_meals(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Total>, AppError> {
    Ok(Json(state.meals.count_total(user_id).await?))
}

#[instrument(skip(state))]
pub async fn count_meals_by_diet(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Query(filter): Query<DietFilter>,
) -> Result<Json<Total>, AppError> {
    Ok(Json(
        state.meals.count_by_diet(user_id, filter.is_on_diet).await?,
    ))
}

#[instrument(skip(state))]
pub async fn best_sequence(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<BestSequence>, AppError> {
    Ok(Json(state.meals.best_streak(user_id).await?))
}
