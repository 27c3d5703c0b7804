// src/services/invoice_service.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        pagination::{Page, PageRequest},
    },
    db::{
        ActivityRepository, CounterRepository, CustomerRepository, DocumentKind,
        InstallmentRepository, InvoiceRepository, NewInvoice, NewPayment, PaymentRepository,
        PlanRepository, ProductRepository,
    },
    models::{
        activity::{ActivityAction, ActivityEntity, NewActivity},
        auth::User,
        invoice::{
            CreateInvoicePayload, DEFAULT_INSTALLMENT_MONTHS, Invoice, InvoiceDetail,
            InvoiceLinePayload, InvoiceQuery, InvoiceStatus, InvoiceSummary, SaleType,
        },
        product::Product,
    },
    services::schedule::generate_schedule,
};

const CASH_PAYMENT_NOTE: &str = "Full cash payment";
const DOWN_PAYMENT_NOTE: &str = "Down payment";

// A sale line after stock was taken and the price fixed
struct PricedLine {
    product: Product,
    quantity: i32,
    unit_price: Decimal,
}

// What a cancellation put back on the shelf
#[derive(Debug, Default, PartialEq, Eq)]
struct RestockTally {
    lines: u64,
    units: i64,
    skipped: u64,
}

impl RestockTally {
    // `matched` is the row count of the stock update; zero means the product is gone
    fn record(&mut self, matched: u64, quantity: i32) {
        if matched == 0 {
            self.skipped += 1;
        } else {
            self.lines += 1;
            self.units += i64::from(quantity);
        }
    }
}

#[derive(Clone)]
pub struct InvoiceService {
    pool: PgPool,
    invoice_repo: InvoiceRepository,
    installment_repo: InstallmentRepository,
    payment_repo: PaymentRepository,
    product_repo: ProductRepository,
    customer_repo: CustomerRepository,
    counter_repo: CounterRepository,
    plan_repo: PlanRepository,
    activity_repo: ActivityRepository,
}

impl InvoiceService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        pool: PgPool,
        invoice_repo: InvoiceRepository,
        installment_repo: InstallmentRepository,
        payment_repo: PaymentRepository,
        product_repo: ProductRepository,
        customer_repo: CustomerRepository,
        counter_repo: CounterRepository,
        plan_repo: PlanRepository,
        activity_repo: ActivityRepository,
    ) -> Self {
        Self {
            pool,
            invoice_repo,
            installment_repo,
            payment_repo,
            product_repo,
            customer_repo,
            counter_repo,
            plan_repo,
            activity_repo,
        }
    }

    // --- CREATE INVOICE ---
    pub async fn create_invoice(
        &self,
        input: &CreateInvoicePayload,
        user: &User,
        today: NaiveDate,
    ) -> Result<InvoiceDetail, AppError> {
        let mut tx = self.pool.begin().await?;

        if let Some(customer_id) = input.customer_id {
            self.customer_repo
                .find_by_id(&mut *tx, customer_id)
                .await?
                .ok_or_else(|| AppError::not_found("Customer"))?;
        }

        // 1. Stock, in product-id order so concurrent sales lock rows consistently
        let mut lines: Vec<&InvoiceLinePayload> = input.items.iter().collect();
        lines.sort_by_key(|line| line.product_id);

        let mut priced = Vec::with_capacity(lines.len());
        for line in lines {
            let product = self.take_stock(&mut tx, line.product_id, line.quantity).await?;
            if !product.is_active {
                return Err(AppError::InvalidInput(format!(
                    "Product '{}' is not available for sale",
                    product.name
                )));
            }
            let unit_price = line
                .unit_price
                .unwrap_or_else(|| product.price_for(input.invoice_type));
            priced.push(PricedLine {
                product,
                quantity: line.quantity,
                unit_price,
            });
        }

        let total: Decimal = priced
            .iter()
            .map(|l| l.unit_price * Decimal::from(l.quantity))
            .sum();

        // 2. Header, numbered from the atomic daily counter
        let invoice_number = self
            .counter_repo
            .next_number(&mut *tx, DocumentKind::Invoice, today)
            .await?;

        let invoice = match input.invoice_type {
            SaleType::Cash => {
                let invoice = self
                    .invoice_repo
                    .insert(
                        &mut *tx,
                        &NewInvoice {
                            invoice_number: &invoice_number,
                            customer_id: input.customer_id,
                            user_id: Some(user.id),
                            invoice_type: SaleType::Cash,
                            total_amount: total,
                            down_payment: Decimal::ZERO,
                            paid_amount: total,
                            remaining_amount: Decimal::ZERO,
                            monthly_installment: None,
                            installment_months: None,
                            status: InvoiceStatus::Completed,
                            notes: input.notes.as_deref(),
                        },
                    )
                    .await?;

                self.insert_items(&mut tx, invoice.id, &priced).await?;

                if total > Decimal::ZERO {
                    self.record_untied_payment(&mut tx, &invoice, total, input, user, today, CASH_PAYMENT_NOTE)
                        .await?;
                }
                invoice
            }
            SaleType::Installment => {
                let months = match input.plan_id {
                    Some(plan_id) => {
                        let plan = self
                            .plan_repo
                            .find_by_id(&mut *tx, plan_id)
                            .await?
                            .ok_or_else(|| AppError::not_found("Installment plan"))?;
                        plan.terms_for(input.installment_months, total, input.down_payment)?
                    }
                    None => input.installment_months.unwrap_or(DEFAULT_INSTALLMENT_MONTHS),
                };

                let schedule = generate_schedule(total, input.down_payment, months, today)?;

                let invoice = self
                    .invoice_repo
                    .insert(
                        &mut *tx,
                        &NewInvoice {
                            invoice_number: &invoice_number,
                            customer_id: input.customer_id,
                            user_id: Some(user.id),
                            invoice_type: SaleType::Installment,
                            total_amount: total,
                            down_payment: schedule.down_payment,
                            paid_amount: schedule.down_payment,
                            remaining_amount: schedule.financed,
                            monthly_installment: Some(schedule.monthly_installment),
                            installment_months: Some(schedule.months as i32),
                            status: schedule.invoice_status(),
                            notes: input.notes.as_deref(),
                        },
                    )
                    .await?;

                self.insert_items(&mut tx, invoice.id, &priced).await?;

                for entry in &schedule.installments {
                    self.installment_repo
                        .insert(
                            &mut *tx,
                            invoice.id,
                            entry.installment_number,
                            entry.amount,
                            entry.due_date,
                            entry.status,
                            entry.paid_date,
                        )
                        .await?;
                }

                if schedule.down_payment > Decimal::ZERO {
                    self.record_untied_payment(
                        &mut tx,
                        &invoice,
                        schedule.down_payment,
                        input,
                        user,
                        today,
                        DOWN_PAYMENT_NOTE,
                    )
                    .await?;
                }
                invoice
            }
        };

        self.activity_repo
            .insert(
                &mut *tx,
                &NewActivity::by(
                    user,
                    ActivityAction::Create,
                    ActivityEntity::Invoice,
                    invoice.id,
                    format!("Created invoice {} for {}", invoice.invoice_number, invoice.total_amount),
                ),
            )
            .await?;

        tx.commit().await?;

        tracing::info!(
            invoice_id = %invoice.id,
            invoice_number = %invoice.invoice_number,
            sale_type = ?invoice.invoice_type,
            total = %invoice.total_amount,
            "Invoice created"
        );

        self.get_invoice(invoice.id).await
    }

    /// Conditional stock decrement; tells a missing product from a short one.
    async fn take_stock(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        product_id: Uuid,
        quantity: i32,
    ) -> Result<Product, AppError> {
        if let Some(product) = self
            .product_repo
            .decrement_stock(&mut **tx, product_id, quantity)
            .await?
        {
            return Ok(product);
        }

        match self.product_repo.find_by_id(&mut **tx, product_id).await? {
            None => Err(AppError::not_found(format!("Product {}", product_id))),
            Some(product) => Err(AppError::InsufficientStock {
                product: product.name,
                requested: quantity,
                available: product.quantity,
            }),
        }
    }

    async fn insert_items(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        invoice_id: Uuid,
        lines: &[PricedLine],
    ) -> Result<(), AppError> {
        for line in lines {
            self.invoice_repo
                .insert_item(
                    &mut **tx,
                    invoice_id,
                    line.product.id,
                    &line.product.name,
                    line.quantity,
                    line.unit_price,
                )
                .await?;
        }
        Ok(())
    }

    /// Payment not tied to any installment (cash sale or down payment).
    async fn record_untied_payment(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        invoice: &Invoice,
        amount: Decimal,
        input: &CreateInvoicePayload,
        user: &User,
        today: NaiveDate,
        note: &str,
    ) -> Result<(), AppError> {
        let receipt_number = self
            .counter_repo
            .next_number(&mut **tx, DocumentKind::Receipt, today)
            .await?;

        self.payment_repo
            .insert(
                &mut **tx,
                &NewPayment {
                    invoice_id: invoice.id,
                    installment_id: None,
                    amount,
                    payment_method: input.payment_method,
                    receipt_number: &receipt_number,
                    user_id: Some(user.id),
                    notes: Some(note),
                },
            )
            .await?;
        Ok(())
    }

    // --- CANCEL ---
    /// Marks the invoice cancelled and puts every referenced product back in
    /// stock. Payments and installments stay as they are.
    pub async fn cancel_invoice(&self, id: Uuid, user: &User) -> Result<Invoice, AppError> {
        let mut tx = self.pool.begin().await?;

        let invoice = self
            .invoice_repo
            .lock(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::not_found("Invoice"))?;
        invoice.ensure_cancellable()?;

        let mut items = self.invoice_repo.list_items(&mut *tx, id).await?;
        items.sort_by_key(|item| item.product_id);

        let mut tally = RestockTally::default();
        for item in &items {
            let matched = match item.product_id {
                Some(product_id) => {
                    self.product_repo
                        .restock(&mut *tx, product_id, item.quantity)
                        .await?
                }
                None => 0,
            };
            tally.record(matched, item.quantity);
        }

        let cancelled = self
            .invoice_repo
            .set_status(&mut *tx, id, InvoiceStatus::Cancelled)
            .await?;

        self.activity_repo
            .insert(
                &mut *tx,
                &NewActivity::by(
                    user,
                    ActivityAction::Cancel,
                    ActivityEntity::Invoice,
                    id,
                    format!("Cancelled invoice {}", cancelled.invoice_number),
                ),
            )
            .await?;

        tx.commit().await?;

        tracing::info!(
            invoice_id = %id,
            invoice_number = %cancelled.invoice_number,
            cancelled_by = %user.id,
            restocked_lines = tally.lines,
            restocked_units = tally.units,
            skipped_lines = tally.skipped,
            "Invoice cancelled"
        );
        Ok(cancelled)
    }

    // --- QUERIES ---
    pub async fn list_invoices(
        &self,
        query: &InvoiceQuery,
        page: PageRequest,
    ) -> Result<Page<InvoiceSummary>, AppError> {
        let (rows, total) = self.invoice_repo.list(query, page).await?;
        Ok(Page::new(rows, total as u64, page))
    }

    pub async fn get_invoice(&self, id: Uuid) -> Result<InvoiceDetail, AppError> {
        let summary = self
            .invoice_repo
            .find_summary(id)
            .await?
            .ok_or_else(|| AppError::not_found("Invoice"))?;

        let items = self.invoice_repo.list_items(&self.pool, id).await?;
        let installments = self.installment_repo.list_for_invoice(&self.pool, id).await?;
        let payments = self.payment_repo.list_for_invoice(id).await?;

        Ok(InvoiceDetail {
            summary,
            items,
            installments,
            payments,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn restock_tally_counts_units_and_skips_missing_products() {
        let mut tally = RestockTally::default();
        tally.record(1, 3);
        tally.record(1, 2);
        tally.record(0, 4);

        assert_eq!(
            tally,
            RestockTally {
                lines: 2,
                units: 5,
                skipped: 1,
            }
        );
    }
}
