use anyhow::Context;
use async_trait::async_trait;
use futures_util::{stream::BoxStream, StreamExt, TryStreamExt};
use sqlx::PgPool;
use uuid::Uuid;

use crate::meals::repo_types::{Meal, MealChanges};

/// Persistence contract for meal records.
#[async_trait]
pub trait MealStore: Send + Sync {
    /// Insert a new record. Returns `false` when the id is already taken.
    async fn insert(&self, meal: &Meal) -> anyhow::Result<bool>;

    async fn get(&self, id: Uuid) -> anyhow::Result<Option<Meal>>;

    async fn list_by_user(&self, user_id: Uuid, offset: i64, limit: i64)
        -> anyhow::Result<Vec<Meal>>;

    /// Count a user's meals, optionally only those with the given diet flag.
    async fn count_by_user(&self, user_id: Uuid, is_on_diet: Option<bool>) -> anyhow::Result<i64>;

    /// Apply `changes` to the row matching both `id` and `user_id`.
    /// Returns the number of rows touched; zero is not an error.
    async fn update(&self, id: Uuid, user_id: Uuid, changes: &MealChanges) -> anyhow::Result<u64>;

    async fn delete(&self, id: Uuid) -> anyhow::Result<u64>;

    /// Diet flags of a user's meals, oldest `created_at` first, ties by id.
    /// The stream is read once; an error item ends it.
    fn stream_by_user(&self, user_id: Uuid) -> BoxStream<'_, anyhow::Result<bool>>;
}

#[derive(Clone)]
pub struct PgMealStore {
    db: PgPool,
}

impl PgMealStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MealStore for PgMealStore {
    async fn insert(&self, meal: &Meal) -> anyhow::Result<bool> {
        let res = sqlx::query(
            r#"
            INSERT INTO meal (id, name, description, is_on_diet, created_at, user_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(meal.id)
        .bind(&meal.name)
        .bind(&meal.description)
        .bind(meal.is_on_diet)
        .bind(meal.created_at)
        .bind(meal.user_id)
        .execute(&self.db)
        .await
        .context("insert meal")?;
        Ok(res.rows_affected() == 1)
    }

    async fn get(&self, id: Uuid) -> anyhow::Result<Option<Meal>> {
        let meal = sqlx::query_as::<_, Meal>(
            r#"
            SELECT id, name, description, is_on_diet, created_at, user_id
            FROM meal
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("get meal")?;
        Ok(meal)
    }

    async fn list_by_user(
        &self,
        user_id: Uuid,
        offset: i64,
        limit: i64,
    ) -> anyhow::Result<Vec<Meal>> {
        let rows = sqlx::query_as::<_, Meal>(
            r#"
            SELECT id, name, description, is_on_diet, created_at, user_id
            FROM meal
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.db)
        .await
        .context("list meals by user")?;
        Ok(rows)
    }

    async fn count_by_user(&self, user_id: Uuid, is_on_diet: Option<bool>) -> anyhow::Result<i64> {
        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(id)
            FROM meal
            WHERE user_id = $1
              AND ($2::BOOLEAN IS NULL OR is_on_diet = $2)
            "#,
        )
        .bind(user_id)
        .bind(is_on_diet)
        .fetch_one(&self.db)
        .await
        .context("count meals by user")?;
        Ok(total)
    }

    async fn update(&self, id: Uuid, user_id: Uuid, changes: &MealChanges) -> anyhow::Result<u64> {
        let res = sqlx::query(
            r#"
            UPDATE meal
               SET name = $3,
                   description = $4,
                   is_on_diet = $5,
                   created_at = $6
             WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(&changes.name)
        .bind(&changes.description)
        .bind(changes.is_on_diet)
        .bind(changes.created_at)
        .execute(&self.db)
        .await
        .context("update meal")?;
        Ok(res.rows_affected())
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<u64> {
        let res = sqlx::query("DELETE FROM meal WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await
            .context("delete meal")?;
        Ok(res.rows_affected())
    }

    fn stream_by_user(&self, user_id: Uuid) -> BoxStream<'_, anyhow::Result<bool>> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT is_on_diet
            FROM meal
            WHERE user_id = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(user_id)
        .fetch(&self.db)
        .map_err(|e| anyhow::Error::new(e).context("stream meals by user"))
        .boxed()
    }
}
