// src/db/report_repo.rs

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    models::report::{DailyTotal, OverdueCustomerRow, ProfitRow, SalesTotals},
};

#[derive(Clone)]
pub struct ReportRepository {
    pool: PgPool,
}

impl ReportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Per-product profit over non-cancelled invoices. Cost is the product's
    /// current cost price times quantity sold; unknown costs count as zero.
    pub async fn profit_by_product(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<ProfitRow>, AppError> {
        let rows = sqlx::query_as::<_, ProfitRow>(
            r#"
            SELECT product_id, product_name, quantity, revenue, cost, revenue - cost AS profit
            FROM (
                SELECT ii.product_id,
                       ii.product_name,
                       SUM(ii.quantity)::BIGINT AS quantity,
                       SUM(ii.total_price) AS revenue,
                       SUM(COALESCE(p.cost_price, 0) * ii.quantity) AS cost
                FROM invoice_items ii
                JOIN invoices i ON i.id = ii.invoice_id
                LEFT JOIN products p ON p.id = ii.product_id
                WHERE i.status <> 'cancelled'
                  AND i.created_at >= $1 AND i.created_at < $2
                GROUP BY ii.product_id, ii.product_name
            ) per_product
            ORDER BY profit DESC, product_name ASC
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn sales_totals(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<SalesTotals, AppError> {
        let totals = sqlx::query_as::<_, SalesTotals>(
            r#"
            SELECT COUNT(*) AS invoice_count,
                   COALESCE(SUM(total_amount), 0) AS total,
                   COALESCE(SUM(total_amount) FILTER (WHERE invoice_type = 'cash'), 0) AS cash_total,
                   COALESCE(SUM(total_amount) FILTER (WHERE invoice_type = 'installment'), 0) AS installment_total
            FROM invoices
            WHERE status <> 'cancelled'
              AND created_at >= $1 AND created_at < $2
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await?;
        Ok(totals)
    }

    pub async fn sales_daily(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<DailyTotal>, AppError> {
        let rows = sqlx::query_as::<_, DailyTotal>(
            r#"
            SELECT (created_at AT TIME ZONE 'UTC')::date AS date,
                   COUNT(*) AS count,
                   SUM(total_amount) AS total
            FROM invoices
            WHERE status <> 'cancelled'
              AND created_at >= $1 AND created_at < $2
            GROUP BY 1
            ORDER BY 1
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn collections_daily(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<DailyTotal>, AppError> {
        let rows = sqlx::query_as::<_, DailyTotal>(
            r#"
            SELECT (payment_date AT TIME ZONE 'UTC')::date AS date,
                   COUNT(*) AS count,
                   SUM(amount) AS total
            FROM payments
            WHERE payment_date >= $1 AND payment_date < $2
            GROUP BY 1
            ORDER BY 1
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn overdue_by_customer(&self, today: NaiveDate) -> Result<Vec<OverdueCustomerRow>, AppError> {
        let rows = sqlx::query_as::<_, OverdueCustomerRow>(
            r#"
            SELECT i.customer_id,
                   c.full_name AS customer_name,
                   c.phone     AS customer_phone,
                   COUNT(*)    AS overdue_count,
                   SUM(COALESCE(NULLIF(s.remaining_amount, 0), s.amount)) AS overdue_amount,
                   MIN(s.due_date) AS oldest_due_date
            FROM installments s
            JOIN invoices i ON i.id = s.invoice_id
            LEFT JOIN customers c ON c.id = i.customer_id
            WHERE s.due_date < $1
              AND s.status IN ('pending', 'partial', 'overdue')
              AND i.status <> 'cancelled'
            GROUP BY i.customer_id, c.full_name, c.phone
            ORDER BY overdue_amount DESC, oldest_due_date ASC
            "#,
        )
        .bind(today)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
