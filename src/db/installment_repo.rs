// src/db/installment_repo.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::{error::AppError, pagination::PageRequest},
    models::installment::{
        Installment, InstallmentQuery, InstallmentStats, InstallmentStatus, InstallmentView,
    },
};

const VIEW_SELECT: &str = r#"
    SELECT s.*,
           i.invoice_number,
           i.customer_id,
           c.full_name AS customer_name,
           c.phone     AS customer_phone
    FROM installments s
    JOIN invoices i ON i.id = s.invoice_id
    LEFT JOIN customers c ON c.id = i.customer_id
"#;

// Amount reported for an entry: what is still owed, or the scheduled amount when nothing is.
const OWED_AMOUNT: &str = "COALESCE(NULLIF(s.remaining_amount, 0), s.amount)";

#[derive(Clone)]
pub struct InstallmentRepository {
    pool: PgPool,
}

impl InstallmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Writes (transactional)
    // ---

    pub async fn insert<'e, E>(
        &self,
        executor: E,
        invoice_id: Uuid,
        installment_number: i32,
        amount: Decimal,
        due_date: NaiveDate,
        status: InstallmentStatus,
        paid_date: Option<NaiveDate>,
    ) -> Result<Installment, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let installment = sqlx::query_as::<_, Installment>(
            r#"
            INSERT INTO installments (
                invoice_id, installment_number, amount, paid_amount,
                remaining_amount, due_date, paid_date, status
            )
            VALUES ($1, $2, $3, 0, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(invoice_id)
        .bind(installment_number)
        .bind(amount)
        .bind(due_date)
        .bind(paid_date)
        .bind(status)
        .fetch_one(executor)
        .await?;
        Ok(installment)
    }

    pub async fn find_invoice_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Uuid>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let invoice_id = sqlx::query_scalar("SELECT invoice_id FROM installments WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(invoice_id)
    }

    /// Row lock; take the owning invoice's lock first.
    pub async fn lock<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Installment>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let installment =
            sqlx::query_as::<_, Installment>("SELECT * FROM installments WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(executor)
                .await?;
        Ok(installment)
    }

    pub async fn save_payment_state<'e, E>(
        &self,
        executor: E,
        installment: &Installment,
    ) -> Result<Installment, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let saved = sqlx::query_as::<_, Installment>(
            r#"
            UPDATE installments
            SET paid_amount = $2, remaining_amount = $3, status = $4, paid_date = $5, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(installment.id)
        .bind(installment.paid_amount)
        .bind(installment.remaining_amount)
        .bind(installment.status)
        .bind(installment.paid_date)
        .fetch_one(executor)
        .await?;
        Ok(saved)
    }

    /// Reclassifies past-due unpaid entries. Idempotent.
    pub async fn mark_overdue<'e, E>(&self, executor: E, today: NaiveDate) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            UPDATE installments s
            SET status = 'overdue', updated_at = NOW()
            FROM invoices i
            WHERE i.id = s.invoice_id
              AND i.status <> 'cancelled'
              AND s.status IN ('pending', 'partial')
              AND s.due_date < $1
            "#,
        )
        .bind(today)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    // ---
    // Reads
    // ---

    pub async fn list_for_invoice<'e, E>(&self, executor: E, invoice_id: Uuid) -> Result<Vec<Installment>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, Installment>(
            "SELECT * FROM installments WHERE invoice_id = $1 ORDER BY installment_number",
        )
        .bind(invoice_id)
        .fetch_all(executor)
        .await?;
        Ok(rows)
    }

    pub async fn find_view(&self, id: Uuid) -> Result<Option<InstallmentView>, AppError> {
        let view = sqlx::query_as::<_, InstallmentView>(&format!("{} WHERE s.id = $1", VIEW_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(view)
    }

    pub async fn list(
        &self,
        query: &InstallmentQuery,
        page: PageRequest,
    ) -> Result<(Vec<InstallmentView>, i64), AppError> {
        const FILTER: &str = r#"
            WHERE ($1::installment_status IS NULL OR s.status = $1)
              AND ($2::uuid IS NULL OR s.invoice_id = $2)
        "#;

        let rows = sqlx::query_as::<_, InstallmentView>(&format!(
            "{} {} ORDER BY s.due_date ASC, s.installment_number ASC LIMIT $3 OFFSET $4",
            VIEW_SELECT, FILTER
        ))
        .bind(query.status)
        .bind(query.invoice_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM installments s {}", FILTER))
            .bind(query.status)
            .bind(query.invoice_id)
            .fetch_one(&self.pool)
            .await?;

        Ok((rows, total))
    }

    pub async fn due_on(&self, day: NaiveDate) -> Result<Vec<InstallmentView>, AppError> {
        let rows = sqlx::query_as::<_, InstallmentView>(&format!(
            r#"{}
            WHERE s.due_date = $1
              AND s.status IN ('pending', 'partial')
              AND i.status <> 'cancelled'
            ORDER BY c.full_name ASC NULLS LAST, s.installment_number ASC
            "#,
            VIEW_SELECT
        ))
        .bind(day)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn overdue_as_of(&self, today: NaiveDate) -> Result<Vec<InstallmentView>, AppError> {
        let rows = sqlx::query_as::<_, InstallmentView>(&format!(
            r#"{}
            WHERE s.due_date < $1
              AND s.status IN ('pending', 'partial', 'overdue')
              AND i.status <> 'cancelled'
            ORDER BY s.due_date ASC, s.installment_number ASC
            "#,
            VIEW_SELECT
        ))
        .bind(today)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Unpaid entries due in `[from, to]`.
    pub async fn unpaid_between(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<InstallmentView>, AppError> {
        let rows = sqlx::query_as::<_, InstallmentView>(&format!(
            r#"{}
            WHERE s.due_date BETWEEN $1 AND $2
              AND s.status <> 'paid'
              AND i.status <> 'cancelled'
            ORDER BY s.due_date ASC, s.installment_number ASC
            "#,
            VIEW_SELECT
        ))
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn stats(&self, today: NaiveDate) -> Result<InstallmentStats, AppError> {
        let stats = sqlx::query_as::<_, InstallmentStats>(&format!(
            r#"
            SELECT
                COUNT(*) FILTER (WHERE s.due_date < $1
                                   AND s.status IN ('pending', 'partial', 'overdue')) AS overdue_count,
                COALESCE(SUM({owed}) FILTER (WHERE s.due_date < $1
                                   AND s.status IN ('pending', 'partial', 'overdue')), 0) AS overdue_amount,
                COUNT(*) FILTER (WHERE s.due_date = $1
                                   AND s.status IN ('pending', 'partial')) AS due_today_count,
                COALESCE(SUM({owed}) FILTER (WHERE s.due_date = $1
                                   AND s.status IN ('pending', 'partial')), 0) AS due_today_amount
            FROM installments s
            JOIN invoices i ON i.id = s.invoice_id
            WHERE i.status <> 'cancelled'
            "#,
            owed = OWED_AMOUNT
        ))
        .bind(today)
        .fetch_one(&self.pool)
        .await?;
        Ok(stats)
    }
}
