// src/services/schedule.rs

//! Installment schedule generation. Pure: no I/O, no logging.

use chrono::{Months, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::{
    common::error::AppError,
    models::{installment::InstallmentStatus, invoice::InvoiceStatus},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledInstallment {
    pub installment_number: i32,
    pub amount: Decimal,
    pub due_date: NaiveDate,
    pub status: InstallmentStatus,
    pub paid_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    pub total: Decimal,
    pub down_payment: Decimal,
    pub financed: Decimal,
    pub monthly_installment: Decimal,
    pub months: u32,
    pub installments: Vec<ScheduledInstallment>,
}

impl Schedule {
    /// Status the owning invoice starts in.
    pub fn invoice_status(&self) -> InvoiceStatus {
        if self.financed.is_zero() {
            InvoiceStatus::Completed
        } else {
            InvoiceStatus::Active
        }
    }
}

/// Due date of installment `number` (1-based): the invoice date plus `number`
/// calendar months. Month-end dates clamp to the last day of the target month.
pub fn due_date(invoice_date: NaiveDate, number: u32) -> Result<NaiveDate, AppError> {
    invoice_date
        .checked_add_months(Months::new(number))
        .ok_or_else(|| AppError::InvalidSchedule("due date out of range".into()))
}

/// Splits `total - down_payment` into `months` installments. The first
/// `months - 1` are the financed amount divided evenly and truncated to cents;
/// the last absorbs the remainder so the amounts sum to the financed amount exactly.
pub fn generate_schedule(
    total: Decimal,
    down_payment: Decimal,
    months: u32,
    invoice_date: NaiveDate,
) -> Result<Schedule, AppError> {
    if months < 1 {
        return Err(AppError::InvalidSchedule(
            "at least one installment is required".into(),
        ));
    }
    if total <= Decimal::ZERO {
        return Err(AppError::InvalidSchedule("total must be greater than zero".into()));
    }
    if down_payment < Decimal::ZERO {
        return Err(AppError::InvalidSchedule("down payment cannot be negative".into()));
    }
    if down_payment > total {
        return Err(AppError::InvalidSchedule(format!(
            "down payment {} exceeds the total {}",
            down_payment, total
        )));
    }

    let financed = total - down_payment;
    let base = (financed / Decimal::from(months))
        .round_dp_with_strategy(2, RoundingStrategy::ToZero);

    let mut installments = Vec::with_capacity(months as usize);
    let mut allocated = Decimal::ZERO;

    for number in 1..=months {
        let amount = if number == months { financed - allocated } else { base };
        allocated += amount;

        let due = due_date(invoice_date, number)?;
        let born_settled = amount.is_zero();

        installments.push(ScheduledInstallment {
            installment_number: number as i32,
            amount,
            due_date: due,
            status: if born_settled {
                InstallmentStatus::Paid
            } else {
                InstallmentStatus::Pending
            },
            paid_date: born_settled.then_some(invoice_date),
        });
    }

    let monthly_installment = installments
        .first()
        .map(|i| i.amount)
        .unwrap_or(Decimal::ZERO);

    Ok(Schedule {
        total,
        down_payment,
        financed,
        monthly_installment,
        months,
        installments,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn twelve_month_split_absorbs_remainder_in_last() {
        let schedule = generate_schedule(dec!(1200), dec!(100), 12, date(2026, 1, 15)).unwrap();

        assert_eq!(schedule.financed, dec!(1100));
        assert_eq!(schedule.installments.len(), 12);
        for inst in &schedule.installments[..11] {
            assert_eq!(inst.amount, dec!(91.66));
        }
        assert_eq!(schedule.installments[11].amount, dec!(91.74));
        assert_eq!(schedule.monthly_installment, dec!(91.66));
        assert_eq!(schedule.installments[0].due_date, date(2026, 2, 15));
        assert_eq!(schedule.installments[11].due_date, date(2027, 1, 15));
        assert_eq!(schedule.invoice_status(), InvoiceStatus::Active);
    }

    #[test]
    fn amounts_always_sum_to_financed() {
        let cases = [
            (dec!(1000), dec!(0), 3),
            (dec!(999.99), dec!(0.01), 7),
            (dec!(0.05), dec!(0), 12),
            (dec!(15000), dec!(2500.50), 24),
            (dec!(1), dec!(0), 1),
        ];
        for (total, down, months) in cases {
            let schedule = generate_schedule(total, down, months, date(2026, 5, 31)).unwrap();
            let sum: Decimal = schedule.installments.iter().map(|i| i.amount).sum();
            assert_eq!(sum, total - down, "total={} down={} months={}", total, down, months);
            assert!(schedule.installments.iter().all(|i| i.amount >= Decimal::ZERO));
        }
    }

    #[test]
    fn month_end_dates_clamp() {
        let schedule = generate_schedule(dec!(300), dec!(0), 3, date(2026, 1, 31)).unwrap();
        let dues: Vec<_> = schedule.installments.iter().map(|i| i.due_date).collect();
        assert_eq!(dues, vec![date(2026, 2, 28), date(2026, 3, 31), date(2026, 4, 30)]);
    }

    #[test]
    fn leap_year_february_clamps_to_29th() {
        assert_eq!(due_date(date(2027, 11, 30), 3).unwrap(), date(2028, 2, 29));
    }

    #[test]
    fn year_boundary_rolls_over() {
        let schedule = generate_schedule(dec!(400), dec!(0), 4, date(2026, 11, 10)).unwrap();
        assert_eq!(schedule.installments[1].due_date, date(2027, 1, 10));
        assert_eq!(schedule.installments[3].due_date, date(2027, 3, 10));
    }

    #[test]
    fn fully_paid_up_front_creates_settled_zero_installments() {
        let schedule = generate_schedule(dec!(500), dec!(500), 2, date(2026, 6, 1)).unwrap();
        assert_eq!(schedule.financed, Decimal::ZERO);
        assert!(schedule.installments.iter().all(|i| {
            i.amount.is_zero()
                && i.status == InstallmentStatus::Paid
                && i.paid_date == Some(date(2026, 6, 1))
        }));
        assert_eq!(schedule.invoice_status(), InvoiceStatus::Completed);
    }

    #[test]
    fn invalid_inputs_are_rejected() {
        let d = date(2026, 1, 1);
        assert!(matches!(generate_schedule(dec!(100), dec!(0), 0, d), Err(AppError::InvalidSchedule(_))));
        assert!(matches!(generate_schedule(dec!(0), dec!(0), 3, d), Err(AppError::InvalidSchedule(_))));
        assert!(matches!(generate_schedule(dec!(100), dec!(101), 3, d), Err(AppError::InvalidSchedule(_))));
        assert!(matches!(generate_schedule(dec!(100), dec!(-1), 3, d), Err(AppError::InvalidSchedule(_))));
    }
}
