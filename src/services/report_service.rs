// src/services/report_service.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::{
    common::{
        error::AppError,
        pagination::{Page, PageRequest},
    },
    db::ReportRepository,
    models::report::{
        CollectionsReport, OverdueReport, Period, ProfitReport, ProfitTotals, SalesReport,
    },
    services::ledger_service::LedgerService,
};

#[derive(Clone)]
pub struct ReportService {
    report_repo: ReportRepository,
    ledger_service: LedgerService,
}

impl ReportService {
    pub fn new(report_repo: ReportRepository, ledger_service: LedgerService) -> Self {
        Self {
            report_repo,
            ledger_service,
        }
    }

    /// Totals cover every product in the period, not just the returned page.
    pub async fn profits(&self, period: Period, page: PageRequest) -> Result<ProfitReport, AppError> {
        let (start, end) = period.bounds();
        let rows = self.report_repo.profit_by_product(start, end).await?;
        let totals = ProfitTotals::sum(&rows);

        Ok(ProfitReport {
            period,
            totals,
            page: Page::from_vec(rows, page),
        })
    }

    pub async fn sales(&self, period: Period) -> Result<SalesReport, AppError> {
        let (start, end) = period.bounds();
        let totals = self.report_repo.sales_totals(start, end).await?;
        let daily = self.report_repo.sales_daily(start, end).await?;

        Ok(SalesReport {
            period,
            invoice_count: totals.invoice_count,
            total: totals.total,
            cash_total: totals.cash_total,
            installment_total: totals.installment_total,
            daily,
        })
    }

    pub async fn collections(&self, period: Period) -> Result<CollectionsReport, AppError> {
        let (start, end) = period.bounds();
        let daily = self.report_repo.collections_daily(start, end).await?;
        let payment_count = daily.iter().map(|d| d.count).sum();
        let total = daily.iter().map(|d| d.total).sum();

        Ok(CollectionsReport {
            period,
            payment_count,
            total,
            daily,
        })
    }

    pub async fn overdue(&self, today: NaiveDate, page: PageRequest) -> Result<OverdueReport, AppError> {
        self.ledger_service.sweep_overdue(today).await?;
        let rows = self.report_repo.overdue_by_customer(today).await?;
        let total_count = rows.iter().map(|r| r.overdue_count).sum();
        let total_amount: Decimal = rows.iter().map(|r| r.overdue_amount).sum();

        Ok(OverdueReport {
            as_of: today,
            total_count,
            total_amount,
            page: Page::from_vec(rows, page),
        })
    }
}
