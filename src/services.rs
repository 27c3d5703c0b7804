pub mod activity_service;
pub mod auth;
pub mod category_service;
pub mod customer_service;
pub mod dashboard_service;
pub mod document_service;
pub mod invoice_service;
pub mod ledger_service;
pub mod payment_service;
pub mod plan_service;
pub mod product_service;
pub mod report_service;
pub mod schedule;
pub mod search_service;
