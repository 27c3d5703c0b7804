// src/db/customer_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::{
        error::{AppError, conflict_on_unique},
        pagination::PageRequest,
    },
    models::customer::{CreateCustomerPayload, Customer, UpdateCustomerPayload},
};

#[derive(Clone)]
pub struct CustomerRepository {
    pool: PgPool,
}

impl CustomerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Customer>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let customer = sqlx::query_as::<_, Customer>("SELECT * FROM customers WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(customer)
    }

    pub async fn search(
        &self,
        search: Option<&str>,
        page: PageRequest,
    ) -> Result<(Vec<Customer>, i64), AppError> {
        const FILTER: &str = r#"
            WHERE $1::text IS NULL
               OR full_name ILIKE '%' || $1 || '%'
               OR phone LIKE '%' || $1 || '%'
               OR national_id = $1
        "#;

        let customers = sqlx::query_as::<_, Customer>(&format!(
            "SELECT * FROM customers {} ORDER BY full_name ASC LIMIT $2 OFFSET $3",
            FILTER
        ))
        .bind(search)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM customers {}", FILTER))
            .bind(search)
            .fetch_one(&self.pool)
            .await?;

        Ok((customers, total))
    }

    /// Outstanding balance and count of the customer's active invoices.
    pub async fn balance(&self, id: Uuid) -> Result<(Decimal, i64), AppError> {
        let row: (Decimal, i64) = sqlx::query_as(
            r#"
            SELECT COALESCE(SUM(remaining_amount), 0), COUNT(*)
            FROM invoices
            WHERE customer_id = $1 AND status = 'active'
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn count_invoices(&self, id: Uuid) -> Result<i64, AppError> {
        let total = sqlx::query_scalar("SELECT COUNT(*) FROM invoices WHERE customer_id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }

    pub async fn create(&self, input: &CreateCustomerPayload) -> Result<Customer, AppError> {
        sqlx::query_as::<_, Customer>(
            r#"
            INSERT INTO customers (
                full_name, phone, phone2, national_id, address, city,
                guarantor_name, guarantor_phone, credit_limit, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, COALESCE($9, 0), $10)
            RETURNING *
            "#,
        )
        .bind(&input.full_name)
        .bind(&input.phone)
        .bind(&input.phone2)
        .bind(&input.national_id)
        .bind(&input.address)
        .bind(&input.city)
        .bind(&input.guarantor_name)
        .bind(&input.guarantor_phone)
        .bind(input.credit_limit)
        .bind(&input.notes)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, format!("A customer with phone '{}' already exists", input.phone)))
    }

    pub async fn update(
        &self,
        id: Uuid,
        input: &UpdateCustomerPayload,
    ) -> Result<Option<Customer>, AppError> {
        sqlx::query_as::<_, Customer>(
            r#"
            UPDATE customers SET
                full_name       = COALESCE($2, full_name),
                phone           = COALESCE($3, phone),
                phone2          = COALESCE($4, phone2),
                national_id     = COALESCE($5, national_id),
                address         = COALESCE($6, address),
                city            = COALESCE($7, city),
                guarantor_name  = COALESCE($8, guarantor_name),
                guarantor_phone = COALESCE($9, guarantor_phone),
                credit_limit    = COALESCE($10, credit_limit),
                notes           = COALESCE($11, notes),
                is_active       = COALESCE($12, is_active),
                updated_at      = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&input.full_name)
        .bind(&input.phone)
        .bind(&input.phone2)
        .bind(&input.national_id)
        .bind(&input.address)
        .bind(&input.city)
        .bind(&input.guarantor_name)
        .bind(&input.guarantor_phone)
        .bind(input.credit_limit)
        .bind(&input.notes)
        .bind(input.is_active)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "Another customer already uses this phone"))
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
