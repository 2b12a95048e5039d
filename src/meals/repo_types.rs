use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Meal record in the `meal` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Meal {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub is_on_diet: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime, // logical meal time, supplied by the caller
    pub user_id: Uuid,
}

/// Fields needed to register a meal; the id is generated by the service.
#[derive(Debug, Clone)]
pub struct NewMeal {
    pub name: String,
    pub description: String,
    pub created_at: OffsetDateTime,
    pub is_on_diet: bool,
    pub user_id: Uuid,
}

impl NewMeal {
    pub fn into_meal(self, id: Uuid) -> Meal {
        Meal {
            id,
            name: self.name,
            description: self.description,
            is_on_diet: self.is_on_diet,
            created_at: self.created_at,
            user_id: self.user_id,
        }
    }
}

/// Partial update as sent by the owner. `None` leaves the stored value alone.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_on_diet: Option<bool>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
}

/// Fully merged column values written by an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MealChanges {
    pub name: String,
    pub description: String,
    pub is_on_diet: bool,
    pub created_at: OffsetDateTime,
}

impl MealChanges {
    /// Merge `patch` over `current`.
    ///
    /// Every field takes the new value when present. `is_on_diet` is the
    /// exception: only an explicit `false` replaces the stored flag.
    pub fn merge(current: &Meal, patch: MealPatch) -> Self {
        Self {
            name: patch.name.unwrap_or_else(|| current.name.clone()),
            description: patch
                .description
                .unwrap_or_else(|| current.description.clone()),
            is_on_diet: match patch.is_on_diet {
                Some(false) => false,
                _ => current.is_on_diet,
            },
            created_at: patch.created_at.unwrap_or(current.created_at),
        }
    }
}
