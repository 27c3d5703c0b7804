// src/services/product_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        pagination::{Page, PageRequest},
    },
    db::{CategoryRepository, ProductRepository},
    models::{
        activity::{ActivityAction, ActivityEntity, NewActivity},
        auth::User,
        product::{CreateProductPayload, Product, ProductQuery, UpdateProductPayload},
    },
    services::activity_service::ActivityService,
};

#[derive(Clone)]
pub struct ProductService {
    pool: PgPool,
    product_repo: ProductRepository,
    category_repo: CategoryRepository,
    activity: ActivityService,
}

impl ProductService {
    pub fn new(
        pool: PgPool,
        product_repo: ProductRepository,
        category_repo: CategoryRepository,
        activity: ActivityService,
    ) -> Self {
        Self {
            pool,
            product_repo,
            category_repo,
            activity,
        }
    }

    async fn ensure_category(&self, category_id: Option<Uuid>) -> Result<(), AppError> {
        if let Some(id) = category_id {
            self.category_repo
                .find_by_id(&self.pool, id)
                .await?
                .ok_or_else(|| AppError::not_found("Category"))?;
        }
        Ok(())
    }

    pub async fn create_product(
        &self,
        actor: &User,
        input: &CreateProductPayload,
    ) -> Result<Product, AppError> {
        self.ensure_category(input.category_id).await?;

        let product = self.product_repo.create(input).await?;
        tracing::info!(product_id = %product.id, name = %product.name, "Product created");

        self.activity
            .record(NewActivity::by(
                actor,
                ActivityAction::Create,
                ActivityEntity::Product,
                product.id,
                format!("Created product: {}", product.name),
            ))
            .await;
        Ok(product)
    }

    pub async fn list_products(
        &self,
        query: &ProductQuery,
        page: PageRequest,
    ) -> Result<Page<Product>, AppError> {
        let (rows, total) = self.product_repo.list(query, page).await?;
        Ok(Page::new(rows, total as u64, page))
    }

    pub async fn get_product(&self, id: Uuid) -> Result<Product, AppError> {
        self.product_repo
            .find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::not_found("Product"))
    }

    pub async fn update_product(
        &self,
        actor: &User,
        id: Uuid,
        input: &UpdateProductPayload,
    ) -> Result<Product, AppError> {
        self.ensure_category(input.category_id).await?;

        let product = self
            .product_repo
            .update(id, input)
            .await?
            .ok_or_else(|| AppError::not_found("Product"))?;

        self.activity
            .record(NewActivity::by(
                actor,
                ActivityAction::Update,
                ActivityEntity::Product,
                product.id,
                format!("Updated product: {}", product.name),
            ))
            .await;
        Ok(product)
    }

    pub async fn delete_product(&self, actor: &User, id: Uuid) -> Result<(), AppError> {
        let product = self.get_product(id).await?;
        if !self.product_repo.delete(id).await? {
            return Err(AppError::not_found("Product"));
        }
        tracing::info!(product_id = %id, "Product deleted");

        self.activity
            .record(NewActivity::by(
                actor,
                ActivityAction::Delete,
                ActivityEntity::Product,
                id,
                format!("Deleted product: {}", product.name),
            ))
            .await;
        Ok(())
    }
}
