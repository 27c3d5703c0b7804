// src/db/invoice_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::{
        error::{AppError, conflict_on_unique},
        pagination::PageRequest,
    },
    models::invoice::{Invoice, InvoiceItem, InvoiceQuery, InvoiceStatus, InvoiceSummary, SaleType},
};

const SUMMARY_SELECT: &str = r#"
    SELECT i.*,
           c.full_name AS customer_name,
           c.phone     AS customer_phone,
           u.full_name AS user_name
    FROM invoices i
    LEFT JOIN customers c ON c.id = i.customer_id
    LEFT JOIN users u ON u.id = i.user_id
"#;

/// Column values of a new invoice row.
#[derive(Debug, Clone)]
pub struct NewInvoice<'a> {
    pub invoice_number: &'a str,
    pub customer_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub invoice_type: SaleType,
    pub total_amount: Decimal,
    pub down_payment: Decimal,
    pub paid_amount: Decimal,
    pub remaining_amount: Decimal,
    pub monthly_installment: Option<Decimal>,
    pub installment_months: Option<i32>,
    pub status: InvoiceStatus,
    pub notes: Option<&'a str>,
}

#[derive(Clone)]
pub struct InvoiceRepository {
    pool: PgPool,
}

impl InvoiceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Reads
    // ---

    pub async fn find_summary(&self, id: Uuid) -> Result<Option<InvoiceSummary>, AppError> {
        let summary = sqlx::query_as::<_, InvoiceSummary>(&format!("{} WHERE i.id = $1", SUMMARY_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(summary)
    }

    pub async fn list(
        &self,
        query: &InvoiceQuery,
        page: PageRequest,
    ) -> Result<(Vec<InvoiceSummary>, i64), AppError> {
        let search = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty());

        const FILTER: &str = r#"
            WHERE ($1::invoice_type IS NULL OR i.invoice_type = $1)
              AND ($2::invoice_status IS NULL OR i.status = $2)
              AND ($3::uuid IS NULL OR i.customer_id = $3)
              AND ($4::text IS NULL
                   OR i.invoice_number ILIKE '%' || $4 || '%'
                   OR c.full_name ILIKE '%' || $4 || '%')
        "#;

        let rows = sqlx::query_as::<_, InvoiceSummary>(&format!(
            "{} {} ORDER BY i.created_at DESC LIMIT $5 OFFSET $6",
            SUMMARY_SELECT, FILTER
        ))
        .bind(query.invoice_type)
        .bind(query.status)
        .bind(query.customer_id)
        .bind(search)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM invoices i LEFT JOIN customers c ON c.id = i.customer_id {}",
            FILTER
        ))
        .bind(query.invoice_type)
        .bind(query.status)
        .bind(query.customer_id)
        .bind(search)
        .fetch_one(&self.pool)
        .await?;

        Ok((rows, total))
    }

    pub async fn list_items<'e, E>(&self, executor: E, invoice_id: Uuid) -> Result<Vec<InvoiceItem>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let items = sqlx::query_as::<_, InvoiceItem>(
            "SELECT * FROM invoice_items WHERE invoice_id = $1 ORDER BY created_at, id",
        )
        .bind(invoice_id)
        .fetch_all(executor)
        .await?;
        Ok(items)
    }

    // ---
    // Writes (transactional)
    // ---

    /// Row lock held until the surrounding transaction ends.
    pub async fn lock<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Invoice>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let invoice = sqlx::query_as::<_, Invoice>("SELECT * FROM invoices WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(invoice)
    }

    pub async fn insert<'e, E>(&self, executor: E, new: &NewInvoice<'_>) -> Result<Invoice, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Invoice>(
            r#"
            INSERT INTO invoices (
                invoice_number, customer_id, user_id, invoice_type,
                total_amount, down_payment, paid_amount, remaining_amount,
                monthly_installment, installment_months, status, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(new.invoice_number)
        .bind(new.customer_id)
        .bind(new.user_id)
        .bind(new.invoice_type)
        .bind(new.total_amount)
        .bind(new.down_payment)
        .bind(new.paid_amount)
        .bind(new.remaining_amount)
        .bind(new.monthly_installment)
        .bind(new.installment_months)
        .bind(new.status)
        .bind(new.notes)
        .fetch_one(executor)
        .await
        .map_err(|e| conflict_on_unique(e, format!("Invoice number {} already exists", new.invoice_number)))
    }

    pub async fn insert_item<'e, E>(
        &self,
        executor: E,
        invoice_id: Uuid,
        product_id: Uuid,
        product_name: &str,
        quantity: i32,
        unit_price: Decimal,
    ) -> Result<InvoiceItem, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let item = sqlx::query_as::<_, InvoiceItem>(
            r#"
            INSERT INTO invoice_items (invoice_id, product_id, product_name, quantity, unit_price, total_price)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(invoice_id)
        .bind(product_id)
        .bind(product_name)
        .bind(quantity)
        .bind(unit_price)
        .bind(unit_price * Decimal::from(quantity))
        .fetch_one(executor)
        .await?;
        Ok(item)
    }

    /// Persists the running totals and status computed in memory.
    pub async fn save_amounts<'e, E>(&self, executor: E, invoice: &Invoice) -> Result<Invoice, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let saved = sqlx::query_as::<_, Invoice>(
            r#"
            UPDATE invoices
            SET paid_amount = $2, remaining_amount = $3, status = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(invoice.id)
        .bind(invoice.paid_amount)
        .bind(invoice.remaining_amount)
        .bind(invoice.status)
        .fetch_one(executor)
        .await?;
        Ok(saved)
    }

    pub async fn set_status<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        status: InvoiceStatus,
    ) -> Result<Invoice, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let saved = sqlx::query_as::<_, Invoice>(
            "UPDATE invoices SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_one(executor)
        .await?;
        Ok(saved)
    }
}
