//! Post repository.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::extension::postgres::PgFunc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use super::entities::post::{self, ActiveModel, Entity as PostEntity};
use super::query::{build_page, count_grouped, fetch_page};
use crate::domain::{NewPost, Post, PostChanges, PostFilter, PostVisibility};
use crate::errors::{AppError, AppResult};
use crate::types::{Page, PageRequest};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Post>>;

    async fn find_by_ids(&self, ids: Vec<Uuid>) -> AppResult<Vec<Post>>;

    async fn create(&self, post: NewPost) -> AppResult<Post>;

    /// Apply a partial update; absent fields keep their stored value.
    async fn update(&self, id: Uuid, changes: PostChanges) -> AppResult<Post>;

    /// Paginated list narrowed by visibility, search, tag, author and category
    async fn list(&self, filter: PostFilter, page: PageRequest) -> AppResult<Page<Post>>;

    /// Every post matching the filter, newest first
    async fn list_all(&self, filter: PostFilter) -> AppResult<Vec<Post>>;

    /// Most recent published posts
    async fn recent_published(&self, limit: u64) -> AppResult<Vec<Post>>;

    /// Most recent posts by one author, regardless of visibility
    async fn recent_by_author(&self, author_id: Uuid, limit: u64) -> AppResult<Vec<Post>>;

    /// Number of posts per author
    async fn count_by_authors(&self, author_ids: Vec<Uuid>) -> AppResult<HashMap<Uuid, u64>>;

    /// Number of published posts per category
    async fn count_published_by_category(&self) -> AppResult<HashMap<Uuid, u64>>;
}

pub struct PostStore {
    db: Arc<DatabaseConnection>,
}

impl PostStore {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

/// Row filter for the given visibility.
pub fn visibility_condition(visibility: PostVisibility) -> Condition {
    match visibility {
        PostVisibility::PublishedOnly => Condition::all().add(post::Column::Published.eq(true)),
        PostVisibility::PublishedOrAuthoredBy(author_id) => Condition::any()
            .add(post::Column::Published.eq(true))
            .add(post::Column::AuthorId.eq(author_id)),
        PostVisibility::All => Condition::all(),
    }
}

/// Everything in the filter except the free-text search.
pub fn filter_condition(filter: &PostFilter) -> Condition {
    let mut condition = Condition::all().add(visibility_condition(filter.visibility));

    if let Some(tag) = &filter.tag {
        condition = condition.add(
            Expr::val(tag.clone()).eq(PgFunc::any(Expr::col((PostEntity, post::Column::Tags)))),
        );
    }
    if let Some(author_id) = filter.author_id {
        condition = condition.add(post::Column::AuthorId.eq(author_id));
    }
    if let Some(category_id) = filter.category_id {
        condition = condition.add(post::Column::CategoryId.eq(category_id));
    }

    condition
}

#[async_trait]
impl PostRepository for PostStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Post>> {
        let result = PostEntity::find_by_id(id).one(self.db.as_ref()).await?;
        Ok(result.map(Post::from))
    }

    async fn find_by_ids(&self, ids: Vec<Uuid>) -> AppResult<Vec<Post>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = PostEntity::find()
            .filter(post::Column::Id.is_in(ids))
            .all(self.db.as_ref())
            .await?;

        Ok(models.into_iter().map(Post::from).collect())
    }

    async fn create(&self, new_post: NewPost) -> AppResult<Post> {
        let now = Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            title: Set(new_post.title),
            content: Set(new_post.content),
            excerpt: Set(new_post.excerpt),
            tags: Set(new_post.tags),
            image: Set(new_post.image),
            published: Set(new_post.published),
            category_id: Set(new_post.category_id),
            author_id: Set(new_post.author_id),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(self.db.as_ref()).await?;
        Ok(Post::from(model))
    }

    async fn update(&self, id: Uuid, changes: PostChanges) -> AppResult<Post> {
        let existing = PostEntity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .ok_or(AppError::NotFound)?;
        if changes.is_empty() {
            return Ok(Post::from(existing));
        }

        let mut active: ActiveModel = existing.into();
        if let Some(title) = changes.title {
            active.title = Set(title);
        }
        if let Some(content) = changes.content {
            active.content = Set(content);
        }
        if let Some(excerpt) = changes.excerpt {
            active.excerpt = Set(Some(excerpt));
        }
        if let Some(tags) = changes.tags {
            active.tags = Set(tags);
        }
        if let Some(image) = changes.image {
            active.image = Set(Some(image));
        }
        if let Some(published) = changes.published {
            active.published = Set(published);
        }
        if let Some(category_id) = changes.category_id {
            active.category_id = Set(Some(category_id));
        }
        active.updated_at = Set(Utc::now());

        let model = active.update(self.db.as_ref()).await?;
        Ok(Post::from(model))
    }

    async fn list(&self, filter: PostFilter, page: PageRequest) -> AppResult<Page<Post>> {
        let plan = build_page::<PostEntity>(page, filter.search.as_deref(), filter_condition(&filter));
        Ok(fetch_page(self.db.as_ref(), &plan).await?.map(Post::from))
    }

    async fn list_all(&self, filter: PostFilter) -> AppResult<Vec<Post>> {
        let models = PostEntity::find()
            .filter(filter_condition(&filter))
            .order_by_desc(post::Column::CreatedAt)
            .all(self.db.as_ref())
            .await?;

        Ok(models.into_iter().map(Post::from).collect())
    }

    async fn recent_published(&self, limit: u64) -> AppResult<Vec<Post>> {
        let models = PostEntity::find()
            .filter(post::Column::Published.eq(true))
            .order_by_desc(post::Column::CreatedAt)
            .limit(limit)
            .all(self.db.as_ref())
            .await?;

        Ok(models.into_iter().map(Post::from).collect())
    }

    async fn recent_by_author(&self, author_id: Uuid, limit: u64) -> AppResult<Vec<Post>> {
        let models = PostEntity::find()
            .filter(post::Column::AuthorId.eq(author_id))
            .order_by_desc(post::Column::CreatedAt)
            .limit(limit)
            .all(self.db.as_ref())
            .await?;

        Ok(models.into_iter().map(Post::from).collect())
    }

    async fn count_by_authors(&self, author_ids: Vec<Uuid>) -> AppResult<HashMap<Uuid, u64>> {
        if author_ids.is_empty() {
            return Ok(HashMap::new());
        }
        count_grouped::<PostEntity, _>(
            self.db.as_ref(),
            post::Column::AuthorId,
            post::Column::AuthorId.is_in(author_ids),
        )
        .await
    }

    async fn count_published_by_category(&self) -> AppResult<HashMap<Uuid, u64>> {
        count_grouped::<PostEntity, _>(
            self.db.as_ref(),
            post::Column::CategoryId,
            post::Column::Published.eq(true),
        )
        .await
    }
}
