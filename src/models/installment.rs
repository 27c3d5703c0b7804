// src/models/installment.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    models::{
        invoice::Invoice,
        payment::{Payment, PaymentMethod},
        product::{has_money_scale, validate_money},
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "installment_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum InstallmentStatus {
    Pending,
    Partial,
    Paid,
    Overdue,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Installment {
    pub id: Uuid,
    pub invoice_id: Uuid,
    pub installment_number: i32,
    pub amount: Decimal,
    pub paid_amount: Decimal,
    pub remaining_amount: Decimal,
    pub due_date: NaiveDate,
    pub paid_date: Option<NaiveDate>,
    pub status: InstallmentStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Installment {
    pub fn is_settled(&self) -> bool {
        self.status == InstallmentStatus::Paid || self.remaining_amount <= Decimal::ZERO
    }

    /// Applies one payment. Settlement is monotonic: a paid installment never
    /// accepts another payment and never becomes unpaid again.
    pub fn apply_payment(&mut self, amount: Decimal, today: NaiveDate) -> Result<(), AppError> {
        if self.is_settled() {
            return Err(AppError::AlreadySettled);
        }
        if amount <= Decimal::ZERO {
            return Err(AppError::InvalidPaymentAmount(
                "amount must be greater than zero".into(),
            ));
        }
        if !has_money_scale(&amount) {
            return Err(AppError::InvalidPaymentAmount(format!(
                "amount {} has more than two decimal places",
                amount
            )));
        }
        if amount > self.remaining_amount {
            return Err(AppError::InvalidPaymentAmount(format!(
                "amount {} exceeds the remaining {}",
                amount, self.remaining_amount
            )));
        }

        self.paid_amount += amount;
        self.remaining_amount = (self.amount - self.paid_amount).max(Decimal::ZERO);

        if self.remaining_amount <= Decimal::ZERO {
            self.status = InstallmentStatus::Paid;
            self.paid_date = Some(today);
        } else {
            self.status = InstallmentStatus::Partial;
        }
        Ok(())
    }

    pub fn days_overdue(&self, today: NaiveDate) -> i64 {
        days_overdue(self.status, self.due_date, today)
    }
}

pub fn days_overdue(status: InstallmentStatus, due_date: NaiveDate, today: NaiveDate) -> i64 {
    if status != InstallmentStatus::Paid && due_date < today {
        (today - due_date).num_days()
    } else {
        0
    }
}

/// Read projection used by every installment listing.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InstallmentView {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub installment: Installment,
    pub invoice_number: String,
    pub customer_id: Option<Uuid>,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    #[sqlx(skip)]
    pub days_overdue: i64,
}

impl InstallmentView {
    pub fn with_days_overdue(mut self, today: NaiveDate) -> Self {
        self.days_overdue = self.installment.days_overdue(today);
        self
    }
}

#[derive(Debug, Clone, Default, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InstallmentStats {
    pub overdue_count: i64,
    pub overdue_amount: Decimal,
    pub due_today_count: i64,
    pub due_today_amount: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub count: usize,
    pub total: Decimal,
    pub installments: Vec<InstallmentView>,
}

/// Result of applying one payment: all three records after the commit.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentOutcome {
    pub payment: Payment,
    pub installment: Installment,
    pub invoice: Invoice,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PayInstallmentPayload {
    #[validate(custom(function = "validate_money"))]
    pub amount: Decimal,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct InstallmentQuery {
    pub status: Option<InstallmentStatus>,
    pub invoice_id: Option<Uuid>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CalendarQuery {
    pub year: i32,
    pub month: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn installment(amount: Decimal) -> Installment {
        Installment {
            id: Uuid::new_v4(),
            invoice_id: Uuid::new_v4(),
            installment_number: 1,
            amount,
            paid_amount: Decimal::ZERO,
            remaining_amount: amount,
            due_date: date(2026, 2, 15),
            paid_date: None,
            status: InstallmentStatus::Pending,
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn partial_then_full_payment() {
        let mut inst = installment(dec!(91.66));

        inst.apply_payment(dec!(50.00), date(2026, 2, 10)).unwrap();
        assert_eq!(inst.status, InstallmentStatus::Partial);
        assert_eq!(inst.remaining_amount, dec!(41.66));
        assert!(inst.paid_date.is_none());

        inst.apply_payment(dec!(41.66), date(2026, 2, 14)).unwrap();
        assert_eq!(inst.status, InstallmentStatus::Paid);
        assert_eq!(inst.remaining_amount, Decimal::ZERO);
        assert_eq!(inst.paid_date, Some(date(2026, 2, 14)));
    }

    #[test]
    fn paid_installment_rejects_further_payment() {
        let mut inst = installment(dec!(100));
        inst.apply_payment(dec!(100), date(2026, 2, 1)).unwrap();

        let err = inst.apply_payment(dec!(1), date(2026, 2, 2)).unwrap_err();
        assert!(matches!(err, AppError::AlreadySettled));
        assert_eq!(inst.paid_amount, dec!(100));
        assert_eq!(inst.status, InstallmentStatus::Paid);
    }

    #[test]
    fn overpayment_and_non_positive_amounts_are_rejected() {
        let mut inst = installment(dec!(100));
        assert!(matches!(
            inst.apply_payment(dec!(100.01), date(2026, 2, 1)),
            Err(AppError::InvalidPaymentAmount(_))
        ));
        assert!(matches!(
            inst.apply_payment(Decimal::ZERO, date(2026, 2, 1)),
            Err(AppError::InvalidPaymentAmount(_))
        ));
        assert!(matches!(
            inst.apply_payment(dec!(-5), date(2026, 2, 1)),
            Err(AppError::InvalidPaymentAmount(_))
        ));
        assert_eq!(inst.remaining_amount, dec!(100));
        assert_eq!(inst.status, InstallmentStatus::Pending);
    }

    #[test]
    fn sub_cent_amount_is_rejected_without_touching_balances() {
        let mut inst = installment(dec!(100.00));
        assert!(matches!(
            inst.apply_payment(dec!(99.999), date(2026, 2, 1)),
            Err(AppError::InvalidPaymentAmount(_))
        ));
        assert_eq!(inst.paid_amount, Decimal::ZERO);
        assert_eq!(inst.remaining_amount, dec!(100.00));
        assert_eq!(inst.status, InstallmentStatus::Pending);
    }

    #[test]
    fn pay_payload_with_three_decimals_fails_validation() {
        let payload = PayInstallmentPayload {
            amount: dec!(99.999),
            payment_method: PaymentMethod::Cash,
            notes: None,
        };
        let errors = payload.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("amount"));

        let payload = PayInstallmentPayload { amount: dec!(99.99), ..payload };
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn partial_payment_on_overdue_entry_becomes_partial() {
        let mut inst = installment(dec!(100));
        inst.status = InstallmentStatus::Overdue;
        inst.apply_payment(dec!(40), date(2026, 3, 1)).unwrap();
        assert_eq!(inst.status, InstallmentStatus::Partial);
    }

    #[test]
    fn remaining_always_equals_amount_minus_paid() {
        let mut inst = installment(dec!(250));
        for part in [dec!(10), dec!(90.5), dec!(0.5), dec!(149)] {
            inst.apply_payment(part, date(2026, 2, 1)).unwrap();
            assert_eq!(inst.remaining_amount, (inst.amount - inst.paid_amount).max(Decimal::ZERO));
            assert_eq!(inst.status == InstallmentStatus::Paid, inst.remaining_amount <= Decimal::ZERO);
        }
        assert_eq!(inst.status, InstallmentStatus::Paid);
    }

    #[test]
    fn days_overdue_counts_only_unpaid_past_due() {
        let inst = installment(dec!(10));
        assert_eq!(inst.days_overdue(date(2026, 2, 15)), 0);
        assert_eq!(inst.days_overdue(date(2026, 2, 20)), 5);
        assert_eq!(days_overdue(InstallmentStatus::Paid, date(2026, 1, 1), date(2026, 2, 1)), 0);
    }
}
