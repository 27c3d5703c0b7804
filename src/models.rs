pub mod activity;
pub mod auth;
pub mod category;
pub mod customer;
pub mod dashboard;
pub mod installment;
pub mod installment_plan;
pub mod invoice;
pub mod payment;
pub mod product;
pub mod report;
pub mod search;
pub mod settings;
