// src/models/dashboard.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::models::installment::InstallmentStats;

// Raw counters read in one round trip
#[derive(Debug, Clone, Default, FromRow)]
pub struct DashboardCounters {
    pub today_cash_count: i64,
    pub today_cash_total: Decimal,
    pub today_installment_count: i64,
    pub today_installment_total: Decimal,
    pub today_payments_total: Decimal,
    pub products_total: i64,
    pub low_stock_products: i64,
    pub customers_total: i64,
    pub invoices_total: i64,
    pub active_invoices: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub date: NaiveDate,
    pub today_cash_count: i64,
    pub today_cash_total: Decimal,
    pub today_installment_count: i64,
    pub today_installment_total: Decimal,
    pub today_sales_total: Decimal,
    pub today_payments_total: Decimal,
    pub products_total: i64,
    pub low_stock_products: i64,
    pub customers_total: i64,
    pub invoices_total: i64,
    pub active_invoices: i64,
    pub installments: InstallmentStats,
}

impl DashboardStats {
    pub fn assemble(date: NaiveDate, c: DashboardCounters, installments: InstallmentStats) -> Self {
        Self {
            date,
            today_sales_total: c.today_cash_total + c.today_installment_total,
            today_cash_count: c.today_cash_count,
            today_cash_total: c.today_cash_total,
            today_installment_count: c.today_installment_count,
            today_installment_total: c.today_installment_total,
            today_payments_total: c.today_payments_total,
            products_total: c.products_total,
            low_stock_products: c.low_stock_products,
            customers_total: c.customers_total,
            invoices_total: c.invoices_total,
            active_invoices: c.active_invoices,
            installments,
        }
    }
}
