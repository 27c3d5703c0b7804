// src/services/payment_service.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        pagination::{Page, PageRequest},
    },
    db::PaymentRepository,
    models::{
        payment::{PaymentList, PaymentView, TodayPayments},
        report::Period,
    },
};

#[derive(Clone)]
pub struct PaymentService {
    payment_repo: PaymentRepository,
}

impl PaymentService {
    pub fn new(payment_repo: PaymentRepository) -> Self {
        Self { payment_repo }
    }

    pub async fn list_payments(&self, period: Period, page: PageRequest) -> Result<PaymentList, AppError> {
        let (start, end) = period.bounds();
        let rows = self.payment_repo.list_between(start, end, Some(page)).await?;
        let (count, total_amount) = self.payment_repo.totals_between(start, end).await?;

        Ok(PaymentList {
            from: period.from,
            to: period.to,
            total_amount,
            page: Page::new(rows, count as u64, page),
        })
    }

    pub async fn today_payments(&self, today: NaiveDate) -> Result<TodayPayments, AppError> {
        let (start, end) = Period { from: today, to: today }.bounds();
        let payments = self.payment_repo.list_between(start, end, None).await?;
        let total_amount: Decimal = payments.iter().map(|p| p.payment.amount).sum();

        Ok(TodayPayments {
            date: today,
            count: payments.len(),
            total_amount,
            payments,
        })
    }

    pub async fn get_payment(&self, id: Uuid) -> Result<PaymentView, AppError> {
        self.payment_repo
            .find_view(id)
            .await?
            .ok_or_else(|| AppError::not_found("Payment"))
    }
}
