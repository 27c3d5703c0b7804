// src/db/payment_repo.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::{
        error::{AppError, conflict_on_unique},
        pagination::PageRequest,
    },
    models::payment::{Payment, PaymentMethod, PaymentView},
};

const VIEW_SELECT: &str = r#"
    SELECT p.*,
           i.invoice_number,
           c.full_name AS customer_name,
           s.installment_number,
           u.full_name AS user_name
    FROM payments p
    JOIN invoices i ON i.id = p.invoice_id
    LEFT JOIN customers c ON c.id = i.customer_id
    LEFT JOIN installments s ON s.id = p.installment_id
    LEFT JOIN users u ON u.id = p.user_id
"#;

#[derive(Debug, Clone)]
pub struct NewPayment<'a> {
    pub invoice_id: Uuid,
    pub installment_id: Option<Uuid>,
    pub amount: Decimal,
    pub payment_method: PaymentMethod,
    pub receipt_number: &'a str,
    pub user_id: Option<Uuid>,
    pub notes: Option<&'a str>,
}

#[derive(Clone)]
pub struct PaymentRepository {
    pool: PgPool,
}

impl PaymentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert<'e, E>(&self, executor: E, new: &NewPayment<'_>) -> Result<Payment, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Payment>(
            r#"
            INSERT INTO payments (
                invoice_id, installment_id, amount, payment_method,
                receipt_number, user_id, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(new.invoice_id)
        .bind(new.installment_id)
        .bind(new.amount)
        .bind(new.payment_method)
        .bind(new.receipt_number)
        .bind(new.user_id)
        .bind(new.notes)
        .fetch_one(executor)
        .await
        .map_err(|e| conflict_on_unique(e, format!("Receipt number {} already exists", new.receipt_number)))
    }

    pub async fn sum_for_invoice<'e, E>(&self, executor: E, invoice_id: Uuid) -> Result<Decimal, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let total = sqlx::query_scalar(
            "SELECT COALESCE(SUM(amount), 0) FROM payments WHERE invoice_id = $1",
        )
        .bind(invoice_id)
        .fetch_one(executor)
        .await?;
        Ok(total)
    }

    pub async fn find_view(&self, id: Uuid) -> Result<Option<PaymentView>, AppError> {
        let view = sqlx::query_as::<_, PaymentView>(&format!("{} WHERE p.id = $1", VIEW_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(view)
    }

    pub async fn list_for_invoice(&self, invoice_id: Uuid) -> Result<Vec<PaymentView>, AppError> {
        let rows = sqlx::query_as::<_, PaymentView>(&format!(
            "{} WHERE p.invoice_id = $1 ORDER BY p.payment_date ASC",
            VIEW_SELECT
        ))
        .bind(invoice_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Payments with `start <= payment_date < end`, newest first.
    pub async fn list_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        page: Option<PageRequest>,
    ) -> Result<Vec<PaymentView>, AppError> {
        let (limit, offset) = page.map(|p| (p.limit(), p.offset())).unwrap_or((i64::MAX, 0));
        let rows = sqlx::query_as::<_, PaymentView>(&format!(
            r#"{}
            WHERE p.payment_date >= $1 AND p.payment_date < $2
            ORDER BY p.payment_date DESC
            LIMIT $3 OFFSET $4
            "#,
            VIEW_SELECT
        ))
        .bind(start)
        .bind(end)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Row count and amount over the whole range.
    pub async fn totals_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<(i64, Decimal), AppError> {
        let row: (i64, Decimal) = sqlx::query_as(
            r#"
            SELECT COUNT(*), COALESCE(SUM(amount), 0)
            FROM payments
            WHERE payment_date >= $1 AND payment_date < $2
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }
}
