// src/services/dashboard_service.rs

use chrono::NaiveDate;

use crate::{
    common::error::AppError,
    db::DashboardRepository,
    models::{dashboard::DashboardStats, report::Period},
    services::ledger_service::LedgerService,
};

#[derive(Clone)]
pub struct DashboardService {
    repo: DashboardRepository,
    ledger_service: LedgerService,
}

impl DashboardService {
    pub fn new(repo: DashboardRepository, ledger_service: LedgerService) -> Self {
        Self { repo, ledger_service }
    }

    pub async fn get_stats(&self, today: NaiveDate) -> Result<DashboardStats, AppError> {
        // get_stats sweeps overdue installments before counting
        let installments = self.ledger_service.get_stats(today).await?;
        let (day_start, day_end) = Period { from: today, to: today }.bounds();
        let counters = self.repo.counters(day_start, day_end).await?;

        Ok(DashboardStats::assemble(today, counters, installments))
    }
}
