use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::meals::repo_types::{Meal, MealPatch, NewMeal};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMealRequest {
    pub name: String,
    pub description: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub is_on_diet: bool,
    pub user_id: Uuid,
}

impl From<CreateMealRequest> for NewMeal {
    fn from(r: CreateMealRequest) -> Self {
        Self {
            name: r.name,
            description: r.description,
            created_at: r.created_at,
            is_on_diet: r.is_on_diet,
            user_id: r.user_id,
        }
    }
}

/// Body of `PUT /meals/:id`. `user_id` is the acting user.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMealRequest {
    pub user_id: Uuid,
    #[serde(flatten)]
    pub patch: MealPatch,
}

#[derive(Debug, Serialize)]
pub struct CreatedMealResponse {
    pub id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct MealResponse {
    pub meal: Meal,
}

#[derive(Debug, Serialize)]
pub struct MealPage {
    pub meals: Vec<Meal>,
    pub page: u32,
    pub take: u32,
    pub total: i64,
}

#[derive(Debug, Serialize)]
pub struct Total {
    pub total: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BestSequence {
    pub best_sequence: u64,
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub page: u32,
    pub take: Option<u32>, // falls back to the configured page size
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DietFilter {
    #[serde(default)]
    pub is_on_diet: bool,
}
