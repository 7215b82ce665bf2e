//! Category repository.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::category::{self, ActiveModel, Entity as CategoryEntity};
use crate::domain::{Category, NewCategory};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Category>>;

    async fn find_by_ids(&self, ids: Vec<Uuid>) -> AppResult<Vec<Category>>;

    async fn find_by_slug(&self, slug: &str) -> AppResult<Option<Category>>;

    /// All categories ordered by name
    async fn list(&self) -> AppResult<Vec<Category>>;

    /// Insert a category; a taken slug is a Conflict.
    async fn create(&self, category: NewCategory) -> AppResult<Category>;
}

pub struct CategoryStore {
    db: Arc<DatabaseConnection>,
}

impl CategoryStore {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CategoryRepository for CategoryStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Category>> {
        let result = CategoryEntity::find_by_id(id).one(self.db.as_ref()).await?;
        Ok(result.map(Category::from))
    }

    async fn find_by_ids(&self, ids: Vec<Uuid>) -> AppResult<Vec<Category>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = CategoryEntity::find()
            .filter(category::Column::Id.is_in(ids))
            .all(self.db.as_ref())
            .await?;

        Ok(models.into_iter().map(Category::from).collect())
    }

    async fn find_by_slug(&self, slug: &str) -> AppResult<Option<Category>> {
        let result = CategoryEntity::find()
            .filter(category::Column::Slug.eq(slug))
            .one(self.db.as_ref())
            .await?;

        Ok(result.map(Category::from))
    }

    async fn list(&self) -> AppResult<Vec<Category>> {
        let models = CategoryEntity::find()
            .order_by_asc(category::Column::Name)
            .all(self.db.as_ref())
            .await?;

        Ok(models.into_iter().map(Category::from).collect())
    }

    async fn create(&self, new_category: NewCategory) -> AppResult<Category> {
        if self.find_by_slug(&new_category.slug).await?.is_some() {
            return Err(AppError::conflict("Category already exists"));
        }

        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(new_category.name),
            slug: Set(new_category.slug),
            created_at: Set(Utc::now()),
        };

        // A concurrent insert of the same slug still lands on the unique index.
        let model = active_model.insert(self.db.as_ref()).await.map_err(|e| match AppError::from(e) {
            AppError::Conflict(_) => AppError::conflict("Category already exists"),
            other => other,
        })?;

        Ok(Category::from(model))
    }
}
