use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

/// Existence check for the owner of a new meal.
#[async_trait]
pub trait UserLookup: Send + Sync {
    async fn exists(&self, user_id: Uuid) -> anyhow::Result<bool>;
}

#[derive(Clone)]
pub struct PgUserLookup {
    db: PgPool,
}

impl PgUserLookup {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserLookup for PgUserLookup {
    async fn exists(&self, user_id: Uuid) -> anyhow::Result<bool> {
        let found = sqlx::query_scalar::<_, bool>(
            r#"SELECT EXISTS (SELECT 1 FROM users WHERE id = $1)"#,
        )
        .bind(user_id)
        .fetch_one(&self.db)
        .await
        .context("lookup user")?;
        Ok(found)
    }
}

/// Fixed set of user ids, for tests.
#[cfg(test)]
#[derive(Debug, Default, Clone)]
pub struct KnownUsers(pub std::collections::HashSet<Uuid>);

#[cfg(test)]
impl KnownUsers {
    pub fn with(ids: impl IntoIterator<Item = Uuid>) -> Self {
        Self(ids.into_iter().collect())
    }
}

#[cfg(test)]
#[async_trait]
impl UserLookup for KnownUsers {
    async fn exists(&self, user_id: Uuid) -> anyhow::Result<bool> {
        Ok(self.0.contains(&user_id))
    }
}
