// src/db/dashboard_repo.rs

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::{common::error::AppError, models::dashboard::DashboardCounters};

#[derive(Clone)]
pub struct DashboardRepository {
    pool: PgPool,
}

impl DashboardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Today's sales and collections plus catalog-wide counts, in one query.
    pub async fn counters(
        &self,
        day_start: DateTime<Utc>,
        day_end: DateTime<Utc>,
    ) -> Result<DashboardCounters, AppError> {
        let counters = sqlx::query_as::<_, DashboardCounters>(
            r#"
            WITH today_sales AS (
                SELECT invoice_type, total_amount
                FROM invoices
                WHERE status <> 'cancelled'
                  AND created_at >= $1 AND created_at < $2
            )
            SELECT
                (SELECT COUNT(*) FROM today_sales WHERE invoice_type = 'cash') AS today_cash_count,
                (SELECT COALESCE(SUM(total_amount), 0) FROM today_sales
                  WHERE invoice_type = 'cash') AS today_cash_total,
                (SELECT COUNT(*) FROM today_sales WHERE invoice_type = 'installment') AS today_installment_count,
                (SELECT COALESCE(SUM(total_amount), 0) FROM today_sales
                  WHERE invoice_type = 'installment') AS today_installment_total,
                (SELECT COALESCE(SUM(amount), 0) FROM payments
                  WHERE payment_date >= $1 AND payment_date < $2) AS today_payments_total,
                (SELECT COUNT(*) FROM products WHERE is_active) AS products_total,
                (SELECT COUNT(*) FROM products
                  WHERE is_active AND quantity <= min_quantity) AS low_stock_products,
                (SELECT COUNT(*) FROM customers WHERE is_active) AS customers_total,
                (SELECT COUNT(*) FROM invoices) AS invoices_total,
                (SELECT COUNT(*) FROM invoices WHERE status = 'active') AS active_invoices
            "#,
        )
        .bind(day_start)
        .bind(day_end)
        .fetch_one(&self.pool)
        .await?;
        Ok(counters)
    }
}
