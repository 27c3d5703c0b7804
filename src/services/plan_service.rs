// src/services/plan_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::PlanRepository,
    models::{
        activity::{ActivityAction, ActivityEntity, NewActivity},
        auth::User,
        installment_plan::{CreatePlanPayload, InstallmentPlan, PlanQuery, UpdatePlanPayload},
    },
    services::activity_service::ActivityService,
};

#[derive(Clone)]
pub struct PlanService {
    plan_repo: PlanRepository,
    activity: ActivityService,
}

impl PlanService {
    pub fn new(plan_repo: PlanRepository, activity: ActivityService) -> Self {
        Self { plan_repo, activity }
    }

    pub async fn list_plans(&self, query: &PlanQuery) -> Result<Vec<InstallmentPlan>, AppError> {
        self.plan_repo.list(query.include_inactive.unwrap_or(false)).await
    }

    pub async fn get_plan(&self, id: Uuid) -> Result<InstallmentPlan, AppError> {
        self.plan_repo
            .find_by_id(self.plan_repo.pool(), id)
            .await?
            .ok_or_else(|| AppError::not_found("Installment plan"))
    }

    pub async fn create_plan(
        &self,
        actor: &User,
        input: &CreatePlanPayload,
    ) -> Result<InstallmentPlan, AppError> {
        let plan = self.plan_repo.create(input).await?;
        tracing::info!(plan_id = %plan.id, months = plan.months, "Installment plan created");

        self.activity
            .record(NewActivity::by(
                actor,
                ActivityAction::Create,
                ActivityEntity::InstallmentPlan,
                plan.id,
                format!("Created installment plan: {}", plan.name),
            ))
            .await;
        Ok(plan)
    }

    pub async fn update_plan(
        &self,
        actor: &User,
        id: Uuid,
        input: &UpdatePlanPayload,
    ) -> Result<InstallmentPlan, AppError> {
        let plan = self
            .plan_repo
            .update(id, input)
            .await?
            .ok_or_else(|| AppError::not_found("Installment plan"))?;

        self.activity
            .record(NewActivity::by(
                actor,
                ActivityAction::Update,
                ActivityEntity::InstallmentPlan,
                plan.id,
                format!("Updated installment plan: {}", plan.name),
            ))
            .await;
        Ok(plan)
    }

    pub async fn delete_plan(&self, actor: &User, id: Uuid) -> Result<(), AppError> {
        let plan = self
            .plan_repo
            .delete(id)
            .await?
            .ok_or_else(|| AppError::not_found("Installment plan"))?;
        tracing::info!(plan_id = %id, "Installment plan deleted");

        self.activity
            .record(NewActivity::by(
                actor,
                ActivityAction::Delete,
                ActivityEntity::InstallmentPlan,
                id,
                format!("Deleted installment plan: {}", plan.name),
            ))
            .await;
        Ok(())
    }
}
