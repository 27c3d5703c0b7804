// src/db/product_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::{error::AppError, pagination::PageRequest},
    models::product::{CreateProductPayload, Product, ProductQuery, UpdateProductPayload},
};

#[derive(Clone)]
pub struct ProductRepository {
    pool: PgPool,
}

impl ProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Reads
    // ---

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(product)
    }

    pub async fn list(
        &self,
        query: &ProductQuery,
        page: PageRequest,
    ) -> Result<(Vec<Product>, i64), AppError> {
        let search = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty());
        let low_stock = query.low_stock.unwrap_or(false);
        let include_inactive = query.include_inactive.unwrap_or(false);

        const FILTER: &str = r#"
            WHERE ($1::text IS NULL
                   OR name ILIKE '%' || $1 || '%'
                   OR brand ILIKE '%' || $1 || '%'
                   OR barcode = $1)
              AND ($2 = FALSE OR quantity <= min_quantity)
              AND ($3 = TRUE OR is_active)
              AND ($4::uuid IS NULL OR category_id = $4)
        "#;

        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT * FROM products {} ORDER BY name ASC LIMIT $5 OFFSET $6",
            FILTER
        ))
        .bind(search)
        .bind(low_stock)
        .bind(include_inactive)
        .bind(query.category_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM products {}", FILTER))
            .bind(search)
            .bind(low_stock)
            .bind(include_inactive)
            .bind(query.category_id)
            .fetch_one(&self.pool)
            .await?;

        Ok((products, total))
    }

    // ---
    // Writes
    // ---

    pub async fn create(&self, input: &CreateProductPayload) -> Result<Product, AppError> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (
                name, description, barcode, sku, brand, model,
                cash_price, installment_price, cost_price,
                quantity, min_quantity, warranty_months, category_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, COALESCE($11, 5), $12, $13)
            RETURNING *
            "#,
        )
        .bind(&input.name)
        .bind(&input.description)
        .bind(&input.barcode)
        .bind(&input.sku)
        .bind(&input.brand)
        .bind(&input.model)
        .bind(input.cash_price)
        .bind(input.installment_price)
        .bind(input.cost_price)
        .bind(input.quantity)
        .bind(input.min_quantity)
        .bind(input.warranty_months)
        .bind(input.category_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(product)
    }

    pub async fn update(
        &self,
        id: Uuid,
        input: &UpdateProductPayload,
    ) -> Result<Option<Product>, AppError> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            UPDATE products SET
                name              = COALESCE($2, name),
                description       = COALESCE($3, description),
                barcode           = COALESCE($4, barcode),
                sku               = COALESCE($5, sku),
                brand             = COALESCE($6, brand),
                model             = COALESCE($7, model),
                cash_price        = COALESCE($8, cash_price),
                installment_price = COALESCE($9, installment_price),
                cost_price        = COALESCE($10, cost_price),
                quantity          = COALESCE($11, quantity),
                min_quantity      = COALESCE($12, min_quantity),
                warranty_months   = COALESCE($13, warranty_months),
                is_active         = COALESCE($14, is_active),
                category_id       = COALESCE($15, category_id),
                updated_at        = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.description)
        .bind(&input.barcode)
        .bind(&input.sku)
        .bind(&input.brand)
        .bind(&input.model)
        .bind(input.cash_price)
        .bind(input.installment_price)
        .bind(input.cost_price)
        .bind(input.quantity)
        .bind(input.min_quantity)
        .bind(input.warranty_months)
        .bind(input.is_active)
        .bind(input.category_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(product)
    }

    /// Invoice items keep their snapshot; the FK sets their reference to NULL.
    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // ---
    // Stock (transactional)
    // ---

    /// Conditional decrement: succeeds only when enough stock is on hand.
    /// `None` means the product is missing or short; the caller tells them apart.
    pub async fn decrement_stock<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        quantity: i32,
    ) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product = sqlx::query_as::<_, Product>(
            r#"
            UPDATE products
            SET quantity = quantity - $2, updated_at = NOW()
            WHERE id = $1 AND quantity >= $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(quantity)
        .fetch_optional(executor)
        .await?;
        Ok(product)
    }

    /// Gives stock back. A product deleted in the meantime is skipped.
    pub async fn restock<'e, E>(&self, executor: E, id: Uuid, quantity: i32) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            "UPDATE products SET quantity = quantity + $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(quantity)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }
}
