//! Category service.

use std::sync::Arc;

use async_trait::async_trait;

use super::views::post_responses;
use crate::domain::{
    authorize, Action, Actor, CategoryDetail, CategoryResponse, CategoryWithCount, NewCategory,
    PostFilter, Resource, ResourceKind,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

#[async_trait]
pub trait CategoryService: Send + Sync {
    /// All categories by name, each with its published post count
    async fn list_categories(&self) -> AppResult<Vec<CategoryWithCount>>;

    /// Create a category; the slug is derived from the name.
    async fn create_category(&self, actor: &Actor, name: String) -> AppResult<CategoryResponse>;

    /// A category with the posts the actor may see
    async fn get_by_slug(&self, actor: &Actor, slug: String) -> AppResult<CategoryDetail>;
}

pub struct CategoryManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> CategoryManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> CategoryService for CategoryManager<U> {
    async fn list_categories(&self) -> AppResult<Vec<CategoryWithCount>> {
        let categories = self.uow.categories();
        let posts = self.uow.posts();
        let (categories, counts) =
            tokio::try_join!(categories.list(), posts.count_published_by_category())?;

        Ok(categories
            .into_iter()
            .map(|category| CategoryWithCount {
                post_count: counts.get(&category.id).copied().unwrap_or(0),
                category: category.into(),
            })
            .collect())
    }

    async fn create_category(&self, actor: &Actor, name: String) -> AppResult<CategoryResponse> {
        authorize(actor, Action::Create, &Resource::unowned(ResourceKind::Category))?;

        let new_category = NewCategory::from_name(&name);
        if new_category.slug.is_empty() {
            return Err(AppError::validation("Category name is required"));
        }

        let category = self.uow.categories().create(new_category).await?;
        tracing::info!(category_id = %category.id, slug = %category.slug, "Category created");
        Ok(category.into())
    }

    async fn get_by_slug(&self, actor: &Actor, slug: String) -> AppResult<CategoryDetail> {
        let category = self
            .uow
            .categories()
            .find_by_slug(slug.trim())
            .await?
            .ok_or_not_found()?;

        let filter = PostFilter {
            category_id: Some(category.id),
            ..PostFilter::visible_to(actor.post_visibility())
        };
        let posts = self.uow.posts().list_all(filter).await?;
        let posts = post_responses(self.uow.as_ref(), posts, true).await?;

        Ok(CategoryDetail {
            category: category.into(),
            posts,
        })
    }
}
