// Ledger behavior against a real Postgres. Each test gets a fresh database
// with ./migrations applied (DATABASE_URL must point at a server).

use std::collections::HashSet;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sqlx::PgPool;
use uuid::Uuid;

use installment_ledger::{
    common::{error::AppError, pagination::PageRequest},
    config::{AppState, Config},
    db::{CounterRepository, DocumentKind, UserRepository},
    models::{
        activity::{ActivityAction, ActivityEntity, ActivityQuery},
        auth::{User, UserRole},
        category::{CategoryQuery, CreateCategoryPayload, UpdateCategoryPayload},
        customer::{CreateCustomerPayload, Customer},
        installment::{InstallmentStatus, PayInstallmentPayload},
        installment_plan::CreatePlanPayload,
        invoice::{CreateInvoicePayload, InvoiceDetail, InvoiceLinePayload, InvoiceStatus, SaleType},
        payment::PaymentMethod,
        product::{CreateProductPayload, Product, ProductQuery, UpdateProductPayload},
        search::SearchQuery,
    },
};

fn sale_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, 15).unwrap()
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

struct Shop {
    state: AppState,
    clerk: User,
}

async fn shop(pool: PgPool) -> Shop {
    let config = Config::from_lookup(|key| match key {
        "DATABASE_URL" => Some("postgres://unused".to_string()),
        "JWT_SECRET" => Some("ledger-tests".to_string()),
        _ => None,
    })
    .unwrap();

    let clerk = UserRepository::new(pool.clone())
        .create_user("clerk@shop.test", "Counter Clerk", "not-a-real-hash", UserRole::Admin)
        .await
        .unwrap();

    Shop {
        state: AppState::new(config, pool),
        clerk,
    }
}

impl Shop {
    async fn product(&self, name: &str, cash: Decimal, installment: Option<Decimal>, stock: i32) -> Product {
        self.state
            .product_service
            .create_product(
                &self.clerk,
                &CreateProductPayload {
                    name: name.to_string(),
                    category_id: None,
                    description: None,
                    barcode: None,
                    sku: None,
                    brand: None,
                    model: None,
                    cash_price: cash,
                    installment_price: installment,
                    cost_price: None,
                    quantity: stock,
                    min_quantity: None,
                    warranty_months: 0,
                },
            )
            .await
            .unwrap()
    }

    async fn customer(&self, phone: &str) -> Customer {
        self.state
            .customer_service
            .create_customer(&CreateCustomerPayload {
                full_name: "Omar Khalil".into(),
                phone: phone.into(),
                phone2: None,
                national_id: None,
                address: None,
                city: None,
                guarantor_name: None,
                guarantor_phone: None,
                credit_limit: None,
                notes: None,
            })
            .await
            .unwrap()
    }

    async fn stock_of(&self, id: Uuid) -> i32 {
        self.state.product_service.get_product(id).await.unwrap().quantity
    }

    async fn sell(&self, payload: &CreateInvoicePayload) -> Result<InvoiceDetail, AppError> {
        self.state
            .invoice_service
            .create_invoice(payload, &self.clerk, sale_day())
            .await
    }
}

fn cash_sale(product_id: Uuid, quantity: i32) -> CreateInvoicePayload {
    CreateInvoicePayload {
        invoice_type: SaleType::Cash,
        customer_id: None,
        items: vec![InvoiceLinePayload {
            product_id,
            quantity,
            unit_price: None,
        }],
        payment_method: PaymentMethod::Cash,
        down_payment: Decimal::ZERO,
        installment_months: None,
        plan_id: None,
        notes: None,
    }
}

fn installment_sale(product_id: Uuid, customer_id: Uuid, months: Option<u32>) -> CreateInvoicePayload {
    CreateInvoicePayload {
        invoice_type: SaleType::Installment,
        customer_id: Some(customer_id),
        installment_months: months,
        ..cash_sale(product_id, 1)
    }
}

fn pay(amount: Decimal) -> PayInstallmentPayload {
    PayInstallmentPayload {
        amount,
        payment_method: PaymentMethod::Cash,
        notes: None,
    }
}

#[sqlx::test]
async fn first_payment_on_twelve_month_sale_moves_invoice_totals(pool: PgPool) {
    let shop = shop(pool).await;
    let tv = shop.product("TV", dec!(1000), Some(dec!(1200)), 10).await;
    let customer = shop.customer("0999000001").await;

    let detail = shop
        .sell(&installment_sale(tv.id, customer.id, Some(12)))
        .await
        .unwrap();
    assert_eq!(detail.summary.invoice.total_amount, dec!(1200));
    assert_eq!(detail.installments.len(), 12);
    assert!(detail.installments.iter().all(|i| i.amount == dec!(100)));
    assert_eq!(shop.stock_of(tv.id).await, 9);

    let first = &detail.installments[0];
    let outcome = shop
        .state
        .ledger_service
        .apply_payment(first.id, &pay(dec!(100)), &shop.clerk, sale_day())
        .await
        .unwrap();

    assert_eq!(outcome.installment.status, InstallmentStatus::Paid);
    assert_eq!(outcome.invoice.paid_amount, dec!(100));
    assert_eq!(outcome.invoice.remaining_amount, dec!(1100));
    assert_eq!(outcome.invoice.status, InvoiceStatus::Active);
}

#[sqlx::test]
async fn overdue_sweep_is_idempotent_and_moves_rows_out_of_due_today(pool: PgPool) {
    let shop = shop(pool).await;
    let fridge = shop.product("Fridge", dec!(600), None, 5).await;
    let customer = shop.customer("0999000002").await;
    shop.sell(&installment_sale(fridge.id, customer.id, Some(6)))
        .await
        .unwrap();

    let ledger = &shop.state.ledger_service;
    let due = day(2026, 2, 15);
    let next_day = day(2026, 2, 16);

    assert_eq!(ledger.get_today(due).await.unwrap().len(), 1);

    assert_eq!(ledger.sweep_overdue(next_day).await.unwrap(), 1);
    assert_eq!(ledger.sweep_overdue(next_day).await.unwrap(), 0);

    assert!(ledger.get_today(due).await.unwrap().is_empty());

    let overdue = ledger.get_overdue(next_day).await.unwrap();
    assert_eq!(overdue.len(), 1);
    assert_eq!(overdue[0].installment.status, InstallmentStatus::Overdue);
    assert_eq!(overdue[0].days_overdue, 1);
}

#[sqlx::test]
async fn cancel_restocks_once_and_rejects_a_second_cancel(pool: PgPool) {
    let shop = shop(pool).await;
    let phone = shop.product("Phone", dec!(250), None, 13).await;

    let detail = shop.sell(&cash_sale(phone.id, 3)).await.unwrap();
    assert_eq!(shop.stock_of(phone.id).await, 10);

    let invoice_id = detail.summary.invoice.id;
    let cancelled = shop
        .state
        .invoice_service
        .cancel_invoice(invoice_id, &shop.clerk)
        .await
        .unwrap();
    assert_eq!(cancelled.status, InvoiceStatus::Cancelled);
    assert_eq!(shop.stock_of(phone.id).await, 13);

    let again = shop
        .state
        .invoice_service
        .cancel_invoice(invoice_id, &shop.clerk)
        .await;
    assert!(matches!(again, Err(AppError::AlreadyCancelled)));
    assert_eq!(shop.stock_of(phone.id).await, 13);
}

#[sqlx::test]
async fn short_stock_rejects_the_whole_sale(pool: PgPool) {
    let shop = shop(pool).await;
    let washer = shop.product("Washer", dec!(400), None, 2).await;

    let err = shop.sell(&cash_sale(washer.id, 3)).await.unwrap_err();
    match err {
        AppError::InsufficientStock {
            requested,
            available,
            ..
        } => {
            assert_eq!(requested, 3);
            assert_eq!(available, 2);
        }
        other => panic!("expected InsufficientStock, got {other:?}"),
    }
    assert_eq!(shop.stock_of(washer.id).await, 2);

    let invoices = shop
        .state
        .invoice_service
        .list_invoices(&Default::default(), PageRequest::new(None, None))
        .await
        .unwrap();
    assert_eq!(invoices.total, 0);
}

#[sqlx::test]
async fn concurrent_receipt_numbers_are_distinct(pool: PgPool) {
    let mut tasks = tokio::task::JoinSet::new();
    for _ in 0..8 {
        let pool = pool.clone();
        tasks.spawn(async move {
            CounterRepository
                .next_number(&pool, DocumentKind::Receipt, sale_day())
                .await
                .unwrap()
        });
    }

    let mut numbers = HashSet::new();
    while let Some(number) = tasks.join_next().await {
        numbers.insert(number.unwrap());
    }
    assert_eq!(numbers.len(), 8);
    assert!(numbers.contains("RCP-20260115-0001"));
    assert!(numbers.contains("RCP-20260115-0008"));
}

#[sqlx::test]
async fn plan_sets_term_and_enforces_minimum_down_payment(pool: PgPool) {
    let shop = shop(pool).await;
    let laptop = shop.product("Laptop", dec!(1000), None, 5).await;
    let customer = shop.customer("0999000003").await;

    let plan = shop
        .state
        .plan_service
        .create_plan(
            &shop.clerk,
            &CreatePlanPayload {
                name: "Six months".into(),
                months: 6,
                interest_rate: Some(dec!(10)),
                min_down_payment: Some(dec!(20)),
                sort_order: None,
            },
        )
        .await
        .unwrap();

    let mut sale = installment_sale(laptop.id, customer.id, None);
    sale.plan_id = Some(plan.id);
    sale.down_payment = dec!(100);
    assert!(matches!(shop.sell(&sale).await, Err(AppError::InvalidInput(_))));
    assert_eq!(shop.stock_of(laptop.id).await, 5);

    sale.down_payment = dec!(200);
    let detail = shop.sell(&sale).await.unwrap();
    assert_eq!(detail.summary.invoice.installment_months, Some(6));
    assert_eq!(detail.installments.len(), 6);
    assert_eq!(detail.summary.invoice.remaining_amount, dec!(800));
}

#[sqlx::test]
async fn deleting_a_category_moves_its_products(pool: PgPool) {
    let shop = shop(pool).await;
    let categories = &shop.state.category_service;
    let new_category = |name: &str| CreateCategoryPayload {
        name: name.into(),
        description: None,
        parent_id: None,
        icon: None,
        color: None,
        sort_order: None,
    };

    let tvs = categories.create_category(&shop.clerk, &new_category("TVs")).await.unwrap();
    let screens = categories.create_category(&shop.clerk, &new_category("Screens")).await.unwrap();
    assert_eq!(tvs.color, "#1e88e5");

    let tv = shop.product("TV", dec!(900), None, 1).await;
    shop.state
        .product_service
        .update_product(
            &shop.clerk,
            tv.id,
            &UpdateProductPayload {
                category_id: Some(tvs.id),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let moved = categories
        .delete_category(&shop.clerk, tvs.id, Some(screens.id))
        .await
        .unwrap();
    assert_eq!(moved, 1);
    assert_eq!(
        shop.state.product_service.get_product(tv.id).await.unwrap().category_id,
        Some(screens.id)
    );

    let listed = shop
        .state
        .product_service
        .list_products(
            &ProductQuery {
                category_id: Some(screens.id),
                ..Default::default()
            },
            PageRequest::new(None, None),
        )
        .await
        .unwrap();
    assert_eq!(listed.total, 1);

    let remaining = categories
        .list_categories(&CategoryQuery::default(), PageRequest::new(None, None))
        .await
        .unwrap();
    assert_eq!(remaining.total, 1);
    assert_eq!(remaining.items[0].products_count, 1);
}

#[sqlx::test]
async fn category_cannot_become_its_own_ancestor(pool: PgPool) {
    let shop = shop(pool).await;
    let categories = &shop.state.category_service;
    let parent = categories
        .create_category(
            &shop.clerk,
            &CreateCategoryPayload {
                name: "Appliances".into(),
                description: None,
                parent_id: None,
                icon: None,
                color: None,
                sort_order: None,
            },
        )
        .await
        .unwrap();
    let child = categories
        .create_category(
            &shop.clerk,
            &CreateCategoryPayload {
                name: "Kitchen".into(),
                description: None,
                parent_id: Some(parent.id),
                icon: None,
                color: None,
                sort_order: None,
            },
        )
        .await
        .unwrap();

    let result = categories
        .update_category(
            &shop.clerk,
            parent.id,
            &UpdateCategoryPayload {
                parent_id: Some(child.id),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(result, Err(AppError::InvalidInput(_))));
}

#[sqlx::test]
async fn sales_and_cancellations_land_in_the_activity_log(pool: PgPool) {
    let shop = shop(pool).await;
    let kettle = shop.product("Kettle", dec!(30), None, 4).await;
    let detail = shop.sell(&cash_sale(kettle.id, 1)).await.unwrap();
    let invoice_id = detail.summary.invoice.id;
    shop.state
        .invoice_service
        .cancel_invoice(invoice_id, &shop.clerk)
        .await
        .unwrap();

    let entries = shop
        .state
        .activity_service
        .recent(&ActivityQuery {
            entity_type: Some(ActivityEntity::Invoice),
            entity_id: Some(invoice_id),
            ..Default::default()
        })
        .await
        .unwrap();
    let actions: Vec<ActivityAction> = entries.iter().map(|e| e.action).collect();
    assert_eq!(actions.len(), 2);
    assert!(actions.contains(&ActivityAction::Create));
    assert!(actions.contains(&ActivityAction::Cancel));
    assert!(entries.iter().all(|e| e.user_name.as_deref() == Some("Counter Clerk")));

    let product_entries = shop
        .state
        .activity_service
        .recent(&ActivityQuery {
            entity_type: Some(ActivityEntity::Product),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(product_entries.len(), 1);
    assert_eq!(product_entries[0].entity_id, Some(kettle.id));
}

#[sqlx::test]
async fn search_spans_products_customers_and_invoices(pool: PgPool) {
    let shop = shop(pool).await;
    let blender = shop.product("Blender Pro", dec!(80), None, 3).await;
    shop.customer("0944555666").await;
    let detail = shop.sell(&cash_sale(blender.id, 1)).await.unwrap();

    let search = &shop.state.search_service;
    let hits = search
        .search(&SearchQuery { q: Some("blend".into()) })
        .await
        .unwrap();
    assert_eq!(hits.products.len(), 1);
    assert!(hits.customers.is_empty());

    let hits = search
        .search(&SearchQuery { q: Some("4455".into()) })
        .await
        .unwrap();
    assert_eq!(hits.customers.len(), 1);

    let hits = search
        .search(&SearchQuery {
            q: Some(detail.summary.invoice.invoice_number.clone()),
        })
        .await
        .unwrap();
    assert_eq!(hits.invoices.len(), 1);

    assert!(matches!(
        search.search(&SearchQuery { q: Some("b".into()) }).await,
        Err(AppError::InvalidInput(_))
    ));
}
