// src/models/invoice.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{
    common::error::AppError,
    models::{
        installment::Installment,
        payment::{PaymentMethod, PaymentView},
        product::validate_money,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "invoice_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SaleType {
    Cash,
    Installment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "invoice_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Active,
    Completed,
    Cancelled,
    // Legacy states still accepted from older data
    Pending,
    Paid,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: Uuid,
    #[schema(example = "INV-20260315-0001")]
    pub invoice_number: String,
    pub customer_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub invoice_type: SaleType,
    pub total_amount: Decimal,
    pub down_payment: Decimal,
    pub paid_amount: Decimal,
    pub remaining_amount: Decimal,
    pub monthly_installment: Option<Decimal>,
    pub installment_months: Option<i32>,
    pub status: InvoiceStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Invoice {
    pub fn is_settled(&self) -> bool {
        matches!(self.status, InvoiceStatus::Completed | InvoiceStatus::Paid)
    }

    pub fn ensure_accepts_payments(&self) -> Result<(), AppError> {
        if self.status == InvoiceStatus::Cancelled {
            return Err(AppError::InvoiceCancelled);
        }
        Ok(())
    }

    pub fn ensure_cancellable(&self) -> Result<(), AppError> {
        if self.status == InvoiceStatus::Cancelled {
            return Err(AppError::AlreadyCancelled);
        }
        Ok(())
    }

    /// Recomputes the running totals from the sum of every payment recorded
    /// against the invoice. Completion is one-way: a completed invoice stays completed.
    pub fn settle_from_payments(&mut self, total_paid: Decimal) {
        self.paid_amount = total_paid;
        self.remaining_amount = (self.total_amount - total_paid).max(Decimal::ZERO);
        if self.remaining_amount <= Decimal::ZERO && self.status != InvoiceStatus::Cancelled {
            self.status = InvoiceStatus::Completed;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceItem {
    pub id: Uuid,
    pub invoice_id: Uuid,
    pub product_id: Option<Uuid>,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub total_price: Decimal,
    pub created_at: DateTime<Utc>,
}

/// List row: the invoice with its customer's display fields.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceSummary {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub invoice: Invoice,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub user_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDetail {
    #[serde(flatten)]
    pub summary: InvoiceSummary,
    pub items: Vec<InvoiceItem>,
    pub installments: Vec<Installment>,
    pub payments: Vec<PaymentView>,
}

// ---
// Payloads
// ---

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceLinePayload {
    pub product_id: Uuid,
    #[validate(range(min = 1, message = "Quantity must be at least 1."))]
    pub quantity: i32,
    /// Overrides the product's default price for this sale type.
    #[validate(custom(function = "validate_money"))]
    pub unit_price: Option<Decimal>,
}

/// Term used when neither the request nor a plan names one.
pub const DEFAULT_INSTALLMENT_MONTHS: u32 = 12;

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_sale_terms"))]
pub struct CreateInvoicePayload {
    pub invoice_type: SaleType,
    pub customer_id: Option<Uuid>,

    #[validate(length(min = 1, message = "At least one item is required."), nested)]
    pub items: Vec<InvoiceLinePayload>,

    #[serde(default)]
    pub payment_method: PaymentMethod,

    #[validate(custom(function = "validate_money"))]
    #[serde(default)]
    pub down_payment: Decimal,

    #[validate(range(min = 1, max = 120, message = "Installment months must be between 1 and 120."))]
    pub installment_months: Option<u32>,

    /// Installment plan whose term and minimum down payment apply.
    pub plan_id: Option<Uuid>,

    pub notes: Option<String>,
}

fn validate_sale_terms(payload: &CreateInvoicePayload) -> Result<(), ValidationError> {
    if payload.invoice_type == SaleType::Installment && payload.customer_id.is_none() {
        let mut err = ValidationError::new("customer_required");
        err.message = Some("Installment sales require a customer.".into());
        return Err(err);
    }
    if payload.invoice_type == SaleType::Cash && !payload.down_payment.is_zero() {
        let mut err = ValidationError::new("down_payment_not_allowed");
        err.message = Some("Cash sales do not take a down payment.".into());
        return Err(err);
    }
    if payload.invoice_type == SaleType::Cash && payload.plan_id.is_some() {
        let mut err = ValidationError::new("plan_not_allowed");
        err.message = Some("Cash sales do not use an installment plan.".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct InvoiceQuery {
    pub invoice_type: Option<SaleType>,
    pub status: Option<InvoiceStatus>,
    pub customer_id: Option<Uuid>,
    /// Matches invoice number or customer name.
    pub search: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn invoice(total: Decimal, status: InvoiceStatus) -> Invoice {
        Invoice {
            id: Uuid::new_v4(),
            invoice_number: "INV-20260101-0001".into(),
            customer_id: Some(Uuid::new_v4()),
            user_id: None,
            invoice_type: SaleType::Installment,
            total_amount: total,
            down_payment: Decimal::ZERO,
            paid_amount: Decimal::ZERO,
            remaining_amount: total,
            monthly_installment: None,
            installment_months: None,
            status,
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn partial_settlement_keeps_invoice_active() {
        let mut inv = invoice(dec!(1200), InvoiceStatus::Active);
        inv.settle_from_payments(dec!(700));
        assert_eq!(inv.paid_amount, dec!(700));
        assert_eq!(inv.remaining_amount, dec!(500));
        assert_eq!(inv.paid_amount + inv.remaining_amount, inv.total_amount);
        assert_eq!(inv.status, InvoiceStatus::Active);
    }

    #[test]
    fn full_settlement_completes_invoice() {
        let mut inv = invoice(dec!(1200), InvoiceStatus::Active);
        inv.settle_from_payments(dec!(1200));
        assert_eq!(inv.remaining_amount, Decimal::ZERO);
        assert_eq!(inv.status, InvoiceStatus::Completed);
        assert!(inv.is_settled());
    }

    #[test]
    fn cancelled_invoice_rejects_payments_and_second_cancel() {
        let inv = invoice(dec!(100), InvoiceStatus::Cancelled);
        assert!(matches!(inv.ensure_accepts_payments(), Err(AppError::InvoiceCancelled)));
        assert!(matches!(inv.ensure_cancellable(), Err(AppError::AlreadyCancelled)));
    }

    #[test]
    fn settlement_never_revives_cancelled_invoice() {
        let mut inv = invoice(dec!(100), InvoiceStatus::Cancelled);
        inv.settle_from_payments(dec!(100));
        assert_eq!(inv.status, InvoiceStatus::Cancelled);
    }

    #[test]
    fn installment_sale_without_customer_is_invalid() {
        let payload = CreateInvoicePayload {
            invoice_type: SaleType::Installment,
            customer_id: None,
            items: vec![InvoiceLinePayload {
                product_id: Uuid::new_v4(),
                quantity: 1,
                unit_price: None,
            }],
            payment_method: PaymentMethod::Cash,
            down_payment: Decimal::ZERO,
            installment_months: Some(12),
            plan_id: None,
            notes: None,
        };
        assert!(payload.validate().is_err());
    }

    #[test]
    fn empty_item_list_is_invalid() {
        let payload = CreateInvoicePayload {
            invoice_type: SaleType::Cash,
            customer_id: None,
            items: vec![],
            payment_method: PaymentMethod::Card,
            down_payment: Decimal::ZERO,
            installment_months: Some(12),
            plan_id: None,
            notes: None,
        };
        let errors = payload.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("items"));
    }

    fn line(unit_price: Option<Decimal>) -> InvoiceLinePayload {
        InvoiceLinePayload {
            product_id: Uuid::new_v4(),
            quantity: 1,
            unit_price,
        }
    }

    #[test]
    fn cash_sale_with_plan_is_invalid() {
        let payload = CreateInvoicePayload {
            invoice_type: SaleType::Cash,
            customer_id: None,
            items: vec![line(None)],
            payment_method: PaymentMethod::Cash,
            down_payment: Decimal::ZERO,
            installment_months: None,
            plan_id: Some(Uuid::new_v4()),
            notes: None,
        };
        assert!(payload.validate().is_err());
    }

    #[test]
    fn sub_cent_prices_and_down_payments_are_invalid() {
        let payload = CreateInvoicePayload {
            invoice_type: SaleType::Installment,
            customer_id: Some(Uuid::new_v4()),
            items: vec![line(Some(dec!(10.005)))],
            payment_method: PaymentMethod::Cash,
            down_payment: dec!(50.001),
            installment_months: None,
            plan_id: None,
            notes: None,
        };
        let errors = payload.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("down_payment"));
        assert!(errors.errors().contains_key("items"));
    }

    #[test]
    fn months_are_optional_in_json() {
        let payload: CreateInvoicePayload = serde_json::from_value(serde_json::json!({
            "invoiceType": "installment",
            "customerId": Uuid::new_v4(),
            "items": [{ "productId": Uuid::new_v4(), "quantity": 2 }]
        }))
        .unwrap();
        assert_eq!(payload.installment_months, None);
        assert_eq!(payload.plan_id, None);
        assert!(payload.validate().is_ok());
    }
}
