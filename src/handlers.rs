use chrono::{NaiveDate, Utc};

pub mod activity;
pub mod auth;
pub mod categories;
pub mod customers;
pub mod dashboard;
pub mod installment_plans;
pub mod installments;
pub mod invoices;
pub mod payments;
pub mod products;
pub mod reports;
pub mod search;
pub mod settings;

/// Ledger dates are UTC calendar days.
pub(crate) fn today() -> NaiveDate {
    Utc::now().date_naive()
}

// GET /api/health
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "Health",
    responses((status = 200, description = "Service is up", body = String))
)]
pub async fn health() -> &'static str {
    "OK"
}
