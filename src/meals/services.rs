use std::sync::Arc;

use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use crate::error::AppError;
use crate::meals::dto::{BestSequence, MealPage, Total};
use crate::meals::repo::MealStore;
use crate::meals::repo_types::{Meal, MealChanges, MealPatch, NewMeal};
use crate::meals::streak::best_streak_stream;
use crate::users::UserLookup;

/// Meal operations with existence and ownership rules applied.
#[derive(Clone)]
pub struct MealService {
    store: Arc<dyn MealStore>,
    users: Arc<dyn UserLookup>,
}

impl MealService {
    pub fn new(store: Arc<dyn MealStore>, users: Arc<dyn UserLookup>) -> Self {
        Self { store, users }
    }

    /// Register a meal for an existing user and return its new id.
    #[instrument(skip(self, meal), fields(user_id = %meal.user_id))]
    pub async fn create(&self, meal: NewMeal) -> Result<Uuid, AppError> {
        if !self.users.exists(meal.user_id).await? {
            warn!("meal for unknown user");
            return Err(AppError::not_found("User not found"));
        }

        let id = Uuid::new_v4();
        let meal = meal.into_meal(id);
        if !self.store.insert(&meal).await? {
            return Err(AppError::Conflict(format!("Meal {id} already exists")));
        }

        info!(meal_id = %id, "meal registered");
        Ok(id)
    }

    #[instrument(skip(self))]
    pub async fn find_unique(&self, id: Uuid) -> Result<Meal, AppError> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found("Meal not registered"))
    }

    /// One page of a user's meals plus the user's total.
    ///
    /// An empty page is reported as `NotFound`, including pages past the end.
    #[instrument(skip(self))]
    pub async fn find_many(&self, user_id: Uuid, page: u32, take: u32) -> Result<MealPage, AppError> {
        let Some(offset) = i64::from(page).checked_mul(i64::from(take)) else {
            debug!(page, take, "page offset out of range");
            return Err(AppError::not_found("No meals registered"));
        };
        let (total, meals) = tokio::try_join!(
            self.store.count_by_user(user_id, None),
            self.store.list_by_user(user_id, offset, i64::from(take)),
        )?;

        if meals.is_empty() {
            debug!(total, "empty page");
            return Err(AppError::not_found("No meals registered"));
        }

        Ok(MealPage {
            meals,
            page,
            take,
            total,
        })
    }

    #[instrument(skip(self))]
    pub async fn count_total(&self, user_id: Uuid) -> Result<Total, AppError> {
        let total = self.store.count_by_user(user_id, None).await?;
        Ok(Total { total })
    }

    #[instrument(skip(self))]
    pub async fn count_by_diet(&self, user_id: Uuid, is_on_diet: bool) -> Result<Total, AppError> {
        let total = self.store.count_by_user(user_id, Some(is_on_diet)).await?;
        Ok(Total { total })
    }

    /// Longest run of on-diet meals in chronological order.
    #[instrument(skip(self))]
    pub async fn best_streak(&self, user_id: Uuid) -> Result<BestSequence, AppError> {
        let best_sequence = best_streak_stream(self.store.stream_by_user(user_id))
            .await
            .map_err(|e| {
                error!(error = %format!("{e:#}"), "diet flag stream failed");
                AppError::from(e)
            })?;
        debug!(best_sequence, "best sequence computed");
        Ok(BestSequence { best_sequence })
    }

    /// Merge `patch` into the meal. Only the owner may update.
    #[instrument(skip(self, patch))]
    pub async fn update(&self, id: Uuid, patch: MealPatch, acting_user_id: Uuid) -> Result<(), AppError> {
        let current = self.find_unique(id).await?;

        if current.user_id != acting_user_id {
            warn!(owner = %current.user_id, "update by non-owner rejected");
            return Err(AppError::unauthorized(
                "You do not have permission to update this record",
            ));
        }

        let changes = MealChanges::merge(&current, patch);
        let touched = self.store.update(id, acting_user_id, &changes).await?;
        debug!(touched, "meal updated");
        Ok(())
    }

    /// Remove a meal by id. Ownership is not checked here.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        self.find_unique(id).await?;
        self.store.delete(id).await?;
        info!(meal_id = %id, "meal deleted");
        Ok(())
    }
}
