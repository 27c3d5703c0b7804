// src/models/report.rs

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::common::{error::AppError, pagination::Page};

/// Inclusive date range of a report. Dates are UTC calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct Period {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl Period {
    /// Missing bounds default to the first of `today`'s month and `today`.
    pub fn resolve(
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Result<Self, AppError> {
        let from = from.unwrap_or_else(|| today.with_day(1).unwrap_or(today));
        let to = to.unwrap_or(today);
        if from > to {
            return Err(AppError::InvalidInput(format!(
                "'from' ({}) must not be after 'to' ({})",
                from, to
            )));
        }
        Ok(Self { from, to })
    }

    /// Half-open timestamp bounds `[from 00:00, to + 1 day 00:00)`.
    pub fn bounds(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        let start = self.from.and_time(NaiveTime::MIN).and_utc();
        let end = self
            .to
            .checked_add_days(Days::new(1))
            .unwrap_or(self.to)
            .and_time(NaiveTime::MIN)
            .and_utc();
        (start, end)
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ReportQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

// --- Profit ---

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfitRow {
    pub product_id: Option<Uuid>,
    pub product_name: String,
    pub quantity: i64,
    pub revenue: Decimal,
    pub cost: Decimal,
    pub profit: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfitTotals {
    pub quantity: i64,
    pub revenue: Decimal,
    pub cost: Decimal,
    pub profit: Decimal,
}

impl ProfitTotals {
    pub fn sum(rows: &[ProfitRow]) -> Self {
        rows.iter().fold(Self::default(), |mut acc, row| {
            acc.quantity += row.quantity;
            acc.revenue += row.revenue;
            acc.cost += row.cost;
            acc.profit += row.profit;
            acc
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfitReport {
    pub period: Period,
    pub totals: ProfitTotals,
    #[serde(flatten)]
    pub page: Page<ProfitRow>,
}

// --- Sales & collections ---

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DailyTotal {
    pub date: NaiveDate,
    pub count: i64,
    pub total: Decimal,
}

#[derive(Debug, Clone, Default, FromRow)]
pub struct SalesTotals {
    pub invoice_count: i64,
    pub total: Decimal,
    pub cash_total: Decimal,
    pub installment_total: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SalesReport {
    pub period: Period,
    pub invoice_count: i64,
    pub total: Decimal,
    pub cash_total: Decimal,
    pub installment_total: Decimal,
    pub daily: Vec<DailyTotal>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CollectionsReport {
    pub period: Period,
    pub payment_count: i64,
    pub total: Decimal,
    pub daily: Vec<DailyTotal>,
}

// --- Overdue by customer ---

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OverdueCustomerRow {
    pub customer_id: Option<Uuid>,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub overdue_count: i64,
    pub overdue_amount: Decimal,
    pub oldest_due_date: NaiveDate,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverdueReport {
    pub as_of: NaiveDate,
    pub total_count: i64,
    pub total_amount: Decimal,
    #[serde(flatten)]
    pub page: Page<OverdueCustomerRow>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn period_defaults_to_month_to_date() {
        let period = Period::resolve(None, None, date(2026, 3, 17)).unwrap();
        assert_eq!(period, Period { from: date(2026, 3, 1), to: date(2026, 3, 17) });
    }

    #[test]
    fn inverted_period_is_rejected() {
        let result = Period::resolve(Some(date(2026, 3, 10)), Some(date(2026, 3, 1)), date(2026, 3, 17));
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn bounds_cover_the_last_day() {
        let period = Period { from: date(2026, 12, 1), to: date(2026, 12, 31) };
        let (start, end) = period.bounds();
        assert_eq!(start.date_naive(), date(2026, 12, 1));
        assert_eq!(end.date_naive(), date(2027, 1, 1));
    }

    #[test]
    fn profit_totals_add_up() {
        let rows = vec![
            ProfitRow {
                product_id: None,
                product_name: "TV".into(),
                quantity: 2,
                revenue: dec!(2400),
                cost: dec!(1800),
                profit: dec!(600),
            },
            ProfitRow {
                product_id: None,
                product_name: "Fan".into(),
                quantity: 5,
                revenue: dec!(250),
                cost: dec!(150),
                profit: dec!(100),
            },
        ];
        let totals = ProfitTotals::sum(&rows);
        assert_eq!(totals.quantity, 7);
        assert_eq!(totals.revenue, dec!(2650));
        assert_eq!(totals.profit, dec!(700));
    }
}
