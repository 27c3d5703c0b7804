// src/services/ledger_service.rs

use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use sqlx::PgPool;
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        pagination::{Page, PageRequest},
    },
    db::{
        CounterRepository, DocumentKind, InstallmentRepository, InvoiceRepository, NewPayment,
        PaymentRepository,
    },
    models::{
        auth::User,
        installment::{
            CalendarDay, Installment, InstallmentQuery, InstallmentStats, InstallmentView, PayInstallmentPayload,
            PaymentOutcome,
        },
    },
};

/// Groups installments by due date, ascending. The amount per entry is what is
/// still owed, or the scheduled amount when nothing is.
pub fn group_by_day(views: Vec<InstallmentView>) -> Vec<CalendarDay> {
    let mut days: BTreeMap<NaiveDate, Vec<InstallmentView>> = BTreeMap::new();
    for view in views {
        days.entry(view.installment.due_date).or_default().push(view);
    }

    days.into_iter()
        .map(|(date, installments)| CalendarDay {
            date,
            count: installments.len(),
            total: installments.iter().map(|v| owed_amount(&v.installment)).sum(),
            installments,
        })
        .collect()
}

fn owed_amount(installment: &Installment) -> Decimal {
    if installment.remaining_amount.is_zero() {
        installment.amount
    } else {
        installment.remaining_amount
    }
}

/// First and last day of a calendar month.
pub fn month_bounds(year: i32, month: u32) -> Result<(NaiveDate, NaiveDate), AppError> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| AppError::InvalidInput(format!("invalid month {}-{}", year, month)))?;
    let last = first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .ok_or_else(|| AppError::InvalidInput(format!("invalid month {}-{}", year, month)))?;
    Ok((first, last))
}

#[derive(Clone)]
pub struct LedgerService {
    pool: PgPool,
    invoice_repo: InvoiceRepository,
    installment_repo: InstallmentRepository,
    payment_repo: PaymentRepository,
    counter_repo: CounterRepository,
}

impl LedgerService {
    pub fn new(
        pool: PgPool,
        invoice_repo: InvoiceRepository,
        installment_repo: InstallmentRepository,
        payment_repo: PaymentRepository,
        counter_repo: CounterRepository,
    ) -> Self {
        Self {
            pool,
            invoice_repo,
            installment_repo,
            payment_repo,
            counter_repo,
        }
    }

    // --- PAYMENT APPLICATION ---
    /// Records one payment against an installment and propagates it to the
    /// invoice. Locks invoice then installment; everything commits together.
    pub async fn apply_payment(
        &self,
        installment_id: Uuid,
        input: &PayInstallmentPayload,
        user: &User,
        today: NaiveDate,
    ) -> Result<PaymentOutcome, AppError> {
        let mut tx = self.pool.begin().await?;

        // 1. Locks: invoice first, then installment
        let invoice_id = self
            .installment_repo
            .find_invoice_id(&mut *tx, installment_id)
            .await?
            .ok_or_else(|| AppError::not_found("Installment"))?;

        let mut invoice = self
            .invoice_repo
            .lock(&mut *tx, invoice_id)
            .await?
            .ok_or_else(|| AppError::not_found("Invoice"))?;
        invoice.ensure_accepts_payments()?;

        let mut installment = self
            .installment_repo
            .lock(&mut *tx, installment_id)
            .await?
            .ok_or_else(|| AppError::not_found("Installment"))?;

        // 2. Validate and apply in memory
        installment.apply_payment(input.amount, today)?;

        // 3-4. Receipt
        let receipt_number = self
            .counter_repo
            .next_number(&mut *tx, DocumentKind::Receipt, today)
            .await?;

        let payment = self
            .payment_repo
            .insert(
                &mut *tx,
                &NewPayment {
                    invoice_id,
                    installment_id: Some(installment_id),
                    amount: input.amount,
                    payment_method: input.payment_method,
                    receipt_number: &receipt_number,
                    user_id: Some(user.id),
                    notes: input.notes.as_deref(),
                },
            )
            .await?;

        // 5. Installment
        let installment = self
            .installment_repo
            .save_payment_state(&mut *tx, &installment)
            .await?;

        // 6. Invoice totals from the sum of all its payments
        let total_paid = self.payment_repo.sum_for_invoice(&mut *tx, invoice_id).await?;
        invoice.settle_from_payments(total_paid);
        let invoice = self.invoice_repo.save_amounts(&mut *tx, &invoice).await?;

        tx.commit().await?;

        tracing::info!(
            receipt_number = %payment.receipt_number,
            installment_id = %installment.id,
            invoice_id = %invoice.id,
            amount = %payment.amount,
            installment_status = ?installment.status,
            invoice_status = ?invoice.status,
            "Payment recorded"
        );

        Ok(PaymentOutcome {
            payment,
            installment,
            invoice,
        })
    }

    // --- OVERDUE SWEEP ---
    pub async fn sweep_overdue(&self, today: NaiveDate) -> Result<u64, AppError> {
        let updated = self.installment_repo.mark_overdue(&self.pool, today).await?;
        if updated > 0 {
            tracing::info!(updated, %today, "Installments marked overdue");
        }
        Ok(updated)
    }

    // --- QUERIES ---
    pub async fn get_overdue(&self, today: NaiveDate) -> Result<Vec<InstallmentView>, AppError> {
        self.sweep_overdue(today).await?;
        let rows = self.installment_repo.overdue_as_of(today).await?;
        Ok(rows.into_iter().map(|v| v.with_days_overdue(today)).collect())
    }

    pub async fn get_today(&self, today: NaiveDate) -> Result<Vec<InstallmentView>, AppError> {
        let rows = self.installment_repo.due_on(today).await?;
        Ok(rows.into_iter().map(|v| v.with_days_overdue(today)).collect())
    }

    pub async fn get_stats(&self, today: NaiveDate) -> Result<InstallmentStats, AppError> {
        self.sweep_overdue(today).await?;
        self.installment_repo.stats(today).await
    }

    pub async fn list_installments(
        &self,
        query: &InstallmentQuery,
        page: PageRequest,
        today: NaiveDate,
    ) -> Result<Page<InstallmentView>, AppError> {
        let (rows, total) = self.installment_repo.list(query, page).await?;
        Ok(Page::new(rows, total as u64, page).map(|v| v.with_days_overdue(today)))
    }

    pub async fn get_installment(&self, id: Uuid, today: NaiveDate) -> Result<InstallmentView, AppError> {
        self.installment_repo
            .find_view(id)
            .await?
            .map(|v| v.with_days_overdue(today))
            .ok_or_else(|| AppError::not_found("Installment"))
    }

    /// Unpaid installments due in the given month, grouped by day.
    pub async fn calendar(
        &self,
        year: i32,
        month: u32,
        today: NaiveDate,
    ) -> Result<Vec<CalendarDay>, AppError> {
        let (first, last) = month_bounds(year, month)?;
        let rows = self.installment_repo.unpaid_between(first, last).await?;
        let rows = rows.into_iter().map(|v| v.with_days_overdue(today)).collect();
        Ok(group_by_day(rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::installment::InstallmentStatus;
    use chrono::{Datelike, Utc};
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn view(due: NaiveDate, amount: Decimal, remaining: Decimal) -> InstallmentView {
        InstallmentView {
            installment: Installment {
                id: Uuid::new_v4(),
                invoice_id: Uuid::new_v4(),
                installment_number: 1,
                amount,
                paid_amount: amount - remaining,
                remaining_amount: remaining,
                due_date: due,
                paid_date: None,
                status: InstallmentStatus::Pending,
                notes: None,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
            invoice_number: "INV-20260101-0001".into(),
            customer_id: None,
            customer_name: Some("Omar".into()),
            customer_phone: None,
            days_overdue: 0,
        }
    }

    #[test]
    fn calendar_groups_by_day_in_order() {
        let days = group_by_day(vec![
            view(date(2026, 3, 20), dec!(100), dec!(100)),
            view(date(2026, 3, 5), dec!(50), dec!(20)),
            view(date(2026, 3, 20), dec!(70), dec!(70)),
        ]);
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, date(2026, 3, 5));
        assert_eq!(days[0].total, dec!(20));
        assert_eq!(days[1].count, 2);
        assert_eq!(days[1].total, dec!(170));
    }

    #[test]
    fn month_bounds_handle_february_and_december() {
        assert_eq!(month_bounds(2028, 2).unwrap(), (date(2028, 2, 1), date(2028, 2, 29)));
        assert_eq!(month_bounds(2026, 12).unwrap(), (date(2026, 12, 1), date(2026, 12, 31)));
        assert!(month_bounds(2026, 13).is_err());
    }

    #[test]
    fn days_overdue_is_filled_in_views() {
        let v = view(date(2026, 3, 1), dec!(10), dec!(10)).with_days_overdue(date(2026, 3, 11));
        assert_eq!(v.days_overdue, 10);
        assert_eq!(v.installment.due_date.month(), 3);
    }
}
