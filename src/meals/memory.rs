use std::sync::Mutex;

use async_trait::async_trait;
use futures_util::{stream::BoxStream, StreamExt};
use uuid::Uuid;

use super::repo::MealStore;
use super::repo_types::{Meal, MealChanges};

/// In-memory `MealStore` used by the service and router tests.
#[derive(Default)]
pub struct InMemoryMealStore {
    rows: Mutex<Vec<Meal>>,
    stream_failure_at: Option<usize>,
}

impl InMemoryMealStore {
    /// A store whose diet-flag stream yields an error after `n` items.
    pub fn failing_stream_after(n: usize) -> Self {
        Self {
            stream_failure_at: Some(n),
            ..Self::default()
        }
    }

    pub fn snapshot(&self, id: Uuid) -> Option<Meal> {
        self.rows.lock().unwrap().iter().find(|m| m.id == id).cloned()
    }

    pub fn row_count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait]
impl MealStore for InMemoryMealStore {
    async fn insert(&self, meal: &Meal) -> anyhow::Result<bool> {
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|m| m.id == meal.id) {
            return Ok(false);
        }
        rows.push(meal.clone());
        Ok(true)
    }

    async fn get(&self, id: Uuid) -> anyhow::Result<Option<Meal>> {
        Ok(self.snapshot(id))
    }

    async fn list_by_user(
        &self,
        user_id: Uuid,
        offset: i64,
        limit: i64,
    ) -> anyhow::Result<Vec<Meal>> {
        let mut meals: Vec<Meal> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.user_id == user_id)
            .cloned()
            .collect();
        meals.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(meals
            .into_iter()
            .skip(usize::try_from(offset)?)
            .take(usize::try_from(limit)?)
            .collect())
    }

    async fn count_by_user(&self, user_id: Uuid, is_on_diet: Option<bool>) -> anyhow::Result<i64> {
        let total = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.user_id == user_id)
            .filter(|m| is_on_diet.map_or(true, |flag| m.is_on_diet == flag))
            .count();
        Ok(i64::try_from(total)?)
    }

    async fn update(&self, id: Uuid, user_id: Uuid, changes: &MealChanges) -> anyhow::Result<u64> {
        let mut rows = self.rows.lock().unwrap();
        let mut touched = 0;
        for meal in rows.iter_mut().filter(|m| m.id == id && m.user_id == user_id) {
            meal.name.clone_from(&changes.name);
            meal.description.clone_from(&changes.description);
            meal.is_on_diet = changes.is_on_diet;
            meal.created_at = changes.created_at;
            touched += 1;
        }
        Ok(touched)
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<u64> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|m| m.id != id);
        Ok((before - rows.len()) as u64)
    }

    fn stream_by_user(&self, user_id: Uuid) -> BoxStream<'_, anyhow::Result<bool>> {
        let mut meals: Vec<Meal> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.user_id == user_id)
            .cloned()
            .collect();
        meals.sort_by(|a, b| (a.created_at, a.id).cmp(&(b.created_at, b.id)));

        let mut items: Vec<anyhow::Result<bool>> = meals.iter().map(|m| Ok(m.is_on_diet)).collect();
        if let Some(at) = self.stream_failure_at {
            items.insert(at.min(items.len()), Err(anyhow::anyhow!("connection reset by peer")));
        }
        futures_util::stream::iter(items).boxed()
    }
}
