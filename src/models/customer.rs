// src/models/customer.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::models::product::validate_money;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: Uuid,
    #[schema(example = "Omar Khalil")]
    pub full_name: String,
    #[schema(example = "0999123456")]
    pub phone: String,
    pub phone2: Option<String>,
    pub national_id: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub guarantor_name: Option<String>,
    pub guarantor_phone: Option<String>,
    pub credit_limit: Decimal,
    pub notes: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Customer plus the outstanding balance of their active invoices.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDetail {
    #[serde(flatten)]
    pub customer: Customer,
    pub balance: Decimal,
    pub active_invoices: i64,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomerPayload {
    #[validate(length(min = 1, max = 200, message = "Full name is required."))]
    pub full_name: String,
    #[validate(length(min = 3, max = 30, message = "Phone is required."))]
    pub phone: String,
    pub phone2: Option<String>,
    pub national_id: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub guarantor_name: Option<String>,
    pub guarantor_phone: Option<String>,
    #[validate(custom(function = "validate_money"))]
    pub credit_limit: Option<Decimal>,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCustomerPayload {
    #[validate(length(min = 1, max = 200, message = "Full name cannot be empty."))]
    pub full_name: Option<String>,
    #[validate(length(min = 3, max = 30, message = "Phone cannot be empty."))]
    pub phone: Option<String>,
    pub phone2: Option<String>,
    pub national_id: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub guarantor_name: Option<String>,
    pub guarantor_phone: Option<String>,
    #[validate(custom(function = "validate_money"))]
    pub credit_limit: Option<Decimal>,
    pub notes: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct CustomerQuery {
    /// Matches name, phone or national id.
    pub search: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}
