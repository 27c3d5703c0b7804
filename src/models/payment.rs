// src/models/payment.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::common::pagination::Page;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "payment_method", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    #[default]
    Cash,
    Card,
    Transfer,
}

impl PaymentMethod {
    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Cash",
            PaymentMethod::Card => "Card",
            PaymentMethod::Transfer => "Bank transfer",
        }
    }
}

// Append-only receipt of money received
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: Uuid,
    pub invoice_id: Uuid,
    pub installment_id: Option<Uuid>,
    pub amount: Decimal,
    pub payment_method: PaymentMethod,
    #[schema(example = "RCP-20260315-0007")]
    pub receipt_number: String,
    pub payment_date: DateTime<Utc>,
    pub user_id: Option<Uuid>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Payment with the context a receipt or a listing needs.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentView {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub payment: Payment,
    pub invoice_number: String,
    pub customer_name: Option<String>,
    pub installment_number: Option<i32>,
    pub user_name: Option<String>,
}

/// Payments in a date range: one page plus the total over the whole range.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentList {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub total_amount: Decimal,
    #[serde(flatten)]
    pub page: Page<PaymentView>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TodayPayments {
    pub date: NaiveDate,
    pub count: usize,
    pub total_amount: Decimal,
    pub payments: Vec<PaymentView>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PaymentQuery {
    /// Defaults to the first day of the current month.
    pub from: Option<NaiveDate>,
    /// Defaults to today.
    pub to: Option<NaiveDate>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}
