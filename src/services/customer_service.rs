// src/services/customer_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        pagination::{Page, PageRequest},
    },
    db::CustomerRepository,
    models::customer::{
        CreateCustomerPayload, Customer, CustomerDetail, CustomerQuery, UpdateCustomerPayload,
    },
};

#[derive(Clone)]
pub struct CustomerService {
    pool: PgPool,
    customer_repo: CustomerRepository,
}

impl CustomerService {
    pub fn new(pool: PgPool, customer_repo: CustomerRepository) -> Self {
        Self { pool, customer_repo }
    }

    pub async fn create_customer(&self, input: &CreateCustomerPayload) -> Result<Customer, AppError> {
        let customer = self.customer_repo.create(input).await?;
        tracing::info!(customer_id = %customer.id, "Customer created");
        Ok(customer)
    }

    pub async fn list_customers(
        &self,
        query: &CustomerQuery,
        page: PageRequest,
    ) -> Result<Page<Customer>, AppError> {
        let search = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty());
        let (rows, total) = self.customer_repo.search(search, page).await?;
        Ok(Page::new(rows, total as u64, page))
    }

    pub async fn get_customer(&self, id: Uuid) -> Result<CustomerDetail, AppError> {
        let customer = self
            .customer_repo
            .find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::not_found("Customer"))?;
        let (balance, active_invoices) = self.customer_repo.balance(id).await?;

        Ok(CustomerDetail {
            customer,
            balance,
            active_invoices,
        })
    }

    pub async fn update_customer(&self, id: Uuid, input: &UpdateCustomerPayload) -> Result<Customer, AppError> {
        self.customer_repo
            .update(id, input)
            .await?
            .ok_or_else(|| AppError::not_found("Customer"))
    }

    /// Customers with invoice history cannot be deleted; deactivate them instead.
    pub async fn delete_customer(&self, id: Uuid) -> Result<(), AppError> {
        if self.customer_repo.count_invoices(id).await? > 0 {
            return Err(AppError::Conflict(
                "Customer has invoices and cannot be deleted".into(),
            ));
        }
        if !self.customer_repo.delete(id).await? {
            return Err(AppError::not_found("Customer"));
        }
        tracing::info!(customer_id = %id, "Customer deleted");
        Ok(())
    }
}
