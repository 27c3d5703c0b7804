// src/db/category_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::{error::AppError, pagination::PageRequest},
    models::category::{
        Category, CategoryQuery, CategorySummary, CreateCategoryPayload, DEFAULT_CATEGORY_COLOR,
        UpdateCategoryPayload,
    },
};

const SUMMARY_SELECT: &str = r#"
    SELECT c.*,
           (SELECT COUNT(*) FROM products p WHERE p.category_id = c.id) AS products_count
    FROM categories c
"#;

#[derive(Clone)]
pub struct CategoryRepository {
    pool: PgPool,
}

impl CategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Reads
    // ---

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Category>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let category = sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(category)
    }

    pub async fn find_summary(&self, id: Uuid) -> Result<Option<CategorySummary>, AppError> {
        let summary = sqlx::query_as::<_, CategorySummary>(&format!("{} WHERE c.id = $1", SUMMARY_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(summary)
    }

    pub async fn list(
        &self,
        query: &CategoryQuery,
        page: PageRequest,
    ) -> Result<(Vec<CategorySummary>, i64), AppError> {
        let search = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty());
        let include_inactive = query.include_inactive.unwrap_or(false);

        const FILTER: &str = r#"
            WHERE ($1::text IS NULL
                   OR c.name ILIKE '%' || $1 || '%'
                   OR c.description ILIKE '%' || $1 || '%')
              AND ($2 = TRUE OR c.is_active)
        "#;

        let rows = sqlx::query_as::<_, CategorySummary>(&format!(
            "{} {} ORDER BY c.sort_order ASC, c.name ASC LIMIT $3 OFFSET $4",
            SUMMARY_SELECT, FILTER
        ))
        .bind(search)
        .bind(include_inactive)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM categories c {}", FILTER))
            .bind(search)
            .bind(include_inactive)
            .fetch_one(&self.pool)
            .await?;

        Ok((rows, total))
    }

    /// True when `category_id` is `candidate_parent` itself or one of its ancestors.
    pub async fn is_ancestor_or_self(
        &self,
        category_id: Uuid,
        candidate_parent: Uuid,
    ) -> Result<bool, AppError> {
        let found: bool = sqlx::query_scalar(
            r#"
            WITH RECURSIVE chain AS (
                SELECT id, parent_id FROM categories WHERE id = $1
                UNION ALL
                SELECT c.id, c.parent_id
                FROM categories c
                JOIN chain ON c.id = chain.parent_id
            )
            SELECT EXISTS (SELECT 1 FROM chain WHERE id = $2)
            "#,
        )
        .bind(candidate_parent)
        .bind(category_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(found)
    }

    // ---
    // Writes
    // ---

    pub async fn create(&self, input: &CreateCategoryPayload) -> Result<Category, AppError> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (name, description, parent_id, icon, color, sort_order)
            VALUES ($1, $2, $3, $4, COALESCE($5, $6), COALESCE($7, 0))
            RETURNING *
            "#,
        )
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.parent_id)
        .bind(&input.icon)
        .bind(&input.color)
        .bind(DEFAULT_CATEGORY_COLOR)
        .bind(input.sort_order)
        .fetch_one(&self.pool)
        .await?;
        Ok(category)
    }

    pub async fn update(
        &self,
        id: Uuid,
        input: &UpdateCategoryPayload,
    ) -> Result<Option<Category>, AppError> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            UPDATE categories SET
                name        = COALESCE($2, name),
                description = COALESCE($3, description),
                parent_id   = COALESCE($4, parent_id),
                icon        = COALESCE($5, icon),
                color       = COALESCE($6, color),
                sort_order  = COALESCE($7, sort_order),
                is_active   = COALESCE($8, is_active),
                updated_at  = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.parent_id)
        .bind(&input.icon)
        .bind(&input.color)
        .bind(input.sort_order)
        .bind(input.is_active)
        .fetch_optional(&self.pool)
        .await?;
        Ok(category)
    }

    /// Moves every product of `from` to `to` (or to no category). Returns the count moved.
    pub async fn reassign_products<'e, E>(
        &self,
        executor: E,
        from: Uuid,
        to: Option<Uuid>,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            "UPDATE products SET category_id = $2, updated_at = NOW() WHERE category_id = $1",
        )
        .bind(from)
        .bind(to)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    /// Child categories lose their parent through the FK.
    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
