// src/db/search_repo.rs

use sqlx::PgPool;

use crate::{
    common::error::AppError,
    models::{
        customer::Customer,
        invoice::InvoiceSummary,
        product::Product,
        search::SEARCH_LIMIT,
    },
};

#[derive(Clone)]
pub struct SearchRepository {
    pool: PgPool,
}

impl SearchRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn products(&self, term: &str) -> Result<Vec<Product>, AppError> {
        let rows = sqlx::query_as::<_, Product>(
            r#"
            SELECT * FROM products
            WHERE is_active
              AND (name ILIKE '%' || $1 || '%' OR barcode ILIKE '%' || $1 || '%')
            ORDER BY name ASC
            LIMIT $2
            "#,
        )
        .bind(term)
        .bind(SEARCH_LIMIT)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn customers(&self, term: &str) -> Result<Vec<Customer>, AppError> {
        let rows = sqlx::query_as::<_, Customer>(
            r#"
            SELECT * FROM customers
            WHERE is_active
              AND (full_name ILIKE '%' || $1 || '%' OR phone LIKE '%' || $1 || '%')
            ORDER BY full_name ASC
            LIMIT $2
            "#,
        )
        .bind(term)
        .bind(SEARCH_LIMIT)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn invoices(&self, term: &str) -> Result<Vec<InvoiceSummary>, AppError> {
        let rows = sqlx::query_as::<_, InvoiceSummary>(
            r#"
            SELECT i.*,
                   c.full_name AS customer_name,
                   c.phone     AS customer_phone,
                   u.full_name AS user_name
            FROM invoices i
            LEFT JOIN customers c ON c.id = i.customer_id
            LEFT JOIN users u ON u.id = i.user_id
            WHERE i.invoice_number ILIKE '%' || $1 || '%'
            ORDER BY i.created_at DESC
            LIMIT $2
            "#,
        )
        .bind(term)
        .bind(SEARCH_LIMIT)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
