// src/db/activity_repo.rs

use sqlx::{Executor, PgPool, Postgres};

use crate::{
    common::error::AppError,
    models::activity::{ActivityEntry, ActivityQuery, NewActivity},
};

#[derive(Clone)]
pub struct ActivityRepository {
    pool: PgPool,
}

impl ActivityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn insert<'e, E>(&self, executor: E, entry: &NewActivity) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            INSERT INTO activity_log (user_id, action, entity_type, entity_id, description)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(entry.user_id)
        .bind(entry.action)
        .bind(entry.entity_type)
        .bind(entry.entity_id)
        .bind(&entry.description)
        .execute(executor)
        .await?;
        Ok(())
    }

    pub async fn recent(&self, query: &ActivityQuery) -> Result<Vec<ActivityEntry>, AppError> {
        let entries = sqlx::query_as::<_, ActivityEntry>(
            r#"
            SELECT a.*, u.full_name AS user_name
            FROM activity_log a
            LEFT JOIN users u ON u.id = a.user_id
            WHERE ($1::uuid IS NULL OR a.user_id = $1)
              AND ($2::activity_entity IS NULL OR a.entity_type = $2)
              AND ($3::uuid IS NULL OR a.entity_id = $3)
            ORDER BY a.created_at DESC
            LIMIT $4
            "#,
        )
        .bind(query.user_id)
        .bind(query.entity_type)
        .bind(query.entity_id)
        .bind(query.limit())
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }
}
