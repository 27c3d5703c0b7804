// src/services/category_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        pagination::{Page, PageRequest},
    },
    db::CategoryRepository,
    models::{
        activity::{ActivityAction, ActivityEntity, NewActivity},
        auth::User,
        category::{
            Category, CategoryQuery, CategorySummary, CreateCategoryPayload, UpdateCategoryPayload,
        },
    },
    services::activity_service::ActivityService,
};

#[derive(Clone)]
pub struct CategoryService {
    pool: PgPool,
    category_repo: CategoryRepository,
    activity: ActivityService,
}

impl CategoryService {
    pub fn new(pool: PgPool, category_repo: CategoryRepository, activity: ActivityService) -> Self {
        Self {
            pool,
            category_repo,
            activity,
        }
    }

    async fn require(&self, id: Uuid, what: &str) -> Result<Category, AppError> {
        self.category_repo
            .find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::not_found(what))
    }

    pub async fn create_category(
        &self,
        actor: &User,
        input: &CreateCategoryPayload,
    ) -> Result<Category, AppError> {
        if let Some(parent_id) = input.parent_id {
            self.require(parent_id, "Parent category").await?;
        }

        let category = self.category_repo.create(input).await?;
        tracing::info!(category_id = %category.id, name = %category.name, "Category created");

        self.activity
            .record(NewActivity::by(
                actor,
                ActivityAction::Create,
                ActivityEntity::Category,
                category.id,
                format!("Created category: {}", category.name),
            ))
            .await;
        Ok(category)
    }

    pub async fn list_categories(
        &self,
        query: &CategoryQuery,
        page: PageRequest,
    ) -> Result<Page<CategorySummary>, AppError> {
        let (rows, total) = self.category_repo.list(query, page).await?;
        Ok(Page::new(rows, total as u64, page))
    }

    pub async fn get_category(&self, id: Uuid) -> Result<CategorySummary, AppError> {
        self.category_repo
            .find_summary(id)
            .await?
            .ok_or_else(|| AppError::not_found("Category"))
    }

    pub async fn update_category(
        &self,
        actor: &User,
        id: Uuid,
        input: &UpdateCategoryPayload,
    ) -> Result<Category, AppError> {
        if let Some(parent_id) = input.parent_id {
            self.require(parent_id, "Parent category").await?;
            // The new parent must not sit below this category
            if self.category_repo.is_ancestor_or_self(id, parent_id).await? {
                return Err(AppError::InvalidInput(
                    "A category cannot be placed under itself or one of its subcategories".into(),
                ));
            }
        }

        let category = self
            .category_repo
            .update(id, input)
            .await?
            .ok_or_else(|| AppError::not_found("Category"))?;

        self.activity
            .record(NewActivity::by(
                actor,
                ActivityAction::Update,
                ActivityEntity::Category,
                category.id,
                format!("Updated category: {}", category.name),
            ))
            .await;
        Ok(category)
    }

    /// Deletes the category after moving its products to `move_to`, or leaving
    /// them uncategorized. Returns the number of products moved.
    pub async fn delete_category(
        &self,
        actor: &User,
        id: Uuid,
        move_to: Option<Uuid>,
    ) -> Result<u64, AppError> {
        if move_to == Some(id) {
            return Err(AppError::InvalidInput(
                "Products cannot be moved to the category being deleted".into(),
            ));
        }

        let mut tx = self.pool.begin().await?;

        let category = self
            .category_repo
            .find_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::not_found("Category"))?;
        if let Some(target) = move_to {
            self.category_repo
                .find_by_id(&mut *tx, target)
                .await?
                .ok_or_else(|| AppError::not_found("Target category"))?;
        }

        let moved = self.category_repo.reassign_products(&mut *tx, id, move_to).await?;
        self.category_repo.delete(&mut *tx, id).await?;
        tx.commit().await?;

        tracing::info!(category_id = %id, moved_products = moved, "Category deleted");

        self.activity
            .record(NewActivity::by(
                actor,
                ActivityAction::Delete,
                ActivityEntity::Category,
                id,
                format!("Deleted category: {}", category.name),
            ))
            .await;
        Ok(moved)
    }
}
