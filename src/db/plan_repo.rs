// src/db/plan_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::installment_plan::{CreatePlanPayload, InstallmentPlan, UpdatePlanPayload},
};

#[derive(Clone)]
pub struct PlanRepository {
    pool: PgPool,
}

impl PlanRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<InstallmentPlan>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let plan = sqlx::query_as::<_, InstallmentPlan>("SELECT * FROM installment_plans WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(plan)
    }

    pub async fn list(&self, include_inactive: bool) -> Result<Vec<InstallmentPlan>, AppError> {
        let plans = sqlx::query_as::<_, InstallmentPlan>(
            r#"
            SELECT * FROM installment_plans
            WHERE $1 = TRUE OR is_active
            ORDER BY sort_order ASC, months ASC
            "#,
        )
        .bind(include_inactive)
        .fetch_all(&self.pool)
        .await?;
        Ok(plans)
    }

    pub async fn create(&self, input: &CreatePlanPayload) -> Result<InstallmentPlan, AppError> {
        let plan = sqlx::query_as::<_, InstallmentPlan>(
            r#"
            INSERT INTO installment_plans (name, months, interest_rate, min_down_payment, sort_order)
            VALUES ($1, $2, COALESCE($3, 0), COALESCE($4, 0), COALESCE($5, 0))
            RETURNING *
            "#,
        )
        .bind(&input.name)
        .bind(input.months)
        .bind(input.interest_rate)
        .bind(input.min_down_payment)
        .bind(input.sort_order)
        .fetch_one(&self.pool)
        .await?;
        Ok(plan)
    }

    pub async fn update(
        &self,
        id: Uuid,
        input: &UpdatePlanPayload,
    ) -> Result<Option<InstallmentPlan>, AppError> {
        let plan = sqlx::query_as::<_, InstallmentPlan>(
            r#"
            UPDATE installment_plans SET
                name             = COALESCE($2, name),
                months           = COALESCE($3, months),
                interest_rate    = COALESCE($4, interest_rate),
                min_down_payment = COALESCE($5, min_down_payment),
                sort_order       = COALESCE($6, sort_order),
                is_active        = COALESCE($7, is_active),
                updated_at       = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&input.name)
        .bind(input.months)
        .bind(input.interest_rate)
        .bind(input.min_down_payment)
        .bind(input.sort_order)
        .bind(input.is_active)
        .fetch_optional(&self.pool)
        .await?;
        Ok(plan)
    }

    /// Invoices keep their own months and amounts, so a plan can go at any time.
    pub async fn delete(&self, id: Uuid) -> Result<Option<InstallmentPlan>, AppError> {
        let plan = sqlx::query_as::<_, InstallmentPlan>(
            "DELETE FROM installment_plans WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(plan)
    }
}
