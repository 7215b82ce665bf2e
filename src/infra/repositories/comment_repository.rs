//! Comment repository.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use super::entities::comment::{self, ActiveModel, Entity as CommentEntity};
use super::query::{build_page, count_grouped, fetch_page};
use crate::domain::{Comment, CommentChanges, CommentFilter, CommentVisibility, NewComment};
use crate::errors::{AppError, AppResult};
use crate::types::{Page, PageRequest};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Comment>>;

    async fn create(&self, comment: NewComment) -> AppResult<Comment>;

    async fn update(&self, id: Uuid, changes: CommentChanges) -> AppResult<Comment>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;

    async fn list(&self, filter: CommentFilter, page: PageRequest) -> AppResult<Page<Comment>>;

    /// Every comment matching the filter, newest first
    async fn list_all(&self, filter: CommentFilter) -> AppResult<Vec<Comment>>;

    async fn recent_by_author(&self, author_id: Uuid, limit: u64) -> AppResult<Vec<Comment>>;

    /// Comment count per post; `approved_only` restricts to approved comments
    async fn count_by_posts(
        &self,
        post_ids: Vec<Uuid>,
        approved_only: bool,
    ) -> AppResult<HashMap<Uuid, u64>>;

    async fn count_by_authors(&self, author_ids: Vec<Uuid>) -> AppResult<HashMap<Uuid, u64>>;
}

pub struct CommentStore {
    db: Arc<DatabaseConnection>,
}

impl CommentStore {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

pub fn visibility_condition(visibility: CommentVisibility) -> Condition {
    match visibility {
        CommentVisibility::ApprovedOnly => {
            Condition::all().add(comment::Column::Approved.eq(true))
        }
        CommentVisibility::ApprovedOrAuthoredBy(author_id) => Condition::any()
            .add(comment::Column::Approved.eq(true))
            .add(comment::Column::AuthorId.eq(author_id)),
        CommentVisibility::All => Condition::all(),
    }
}

pub fn filter_condition(filter: &CommentFilter) -> Condition {
    let mut condition = Condition::all().add(visibility_condition(filter.visibility));

    if let Some(post_id) = filter.post_id {
        condition = condition.add(comment::Column::PostId.eq(post_id));
    }
    if let Some(author_id) = filter.author_id {
        condition = condition.add(comment::Column::AuthorId.eq(author_id));
    }
    if let Some(approved) = filter.approved {
        condition = condition.add(comment::Column::Approved.eq(approved));
    }

    condition
}

#[async_trait]
impl CommentRepository for CommentStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Comment>> {
        let result = CommentEntity::find_by_id(id).one(self.db.as_ref()).await?;
        Ok(result.map(Comment::from))
    }

    async fn create(&self, new_comment: NewComment) -> AppResult<Comment> {
        let now = Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            content: Set(new_comment.content),
            post_id: Set(new_comment.post_id),
            author_id: Set(new_comment.author_id),
            approved: Set(new_comment.approved),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(self.db.as_ref()).await?;
        Ok(Comment::from(model))
    }

    async fn update(&self, id: Uuid, changes: CommentChanges) -> AppResult<Comment> {
        let existing = CommentEntity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: ActiveModel = existing.into();
        if let Some(content) = changes.content {
            active.content = Set(content);
        }
        if let Some(approved) = changes.approved {
            active.approved = Set(approved);
        }
        active.updated_at = Set(Utc::now());

        let model = active.update(self.db.as_ref()).await?;
        Ok(Comment::from(model))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = CommentEntity::delete_by_id(id).exec(self.db.as_ref()).await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }

    async fn list(&self, filter: CommentFilter, page: PageRequest) -> AppResult<Page<Comment>> {
        let plan = build_page::<CommentEntity>(page, None, filter_condition(&filter));
        Ok(fetch_page(self.db.as_ref(), &plan).await?.map(Comment::from))
    }

    async fn list_all(&self, filter: CommentFilter) -> AppResult<Vec<Comment>> {
        let models = CommentEntity::find()
            .filter(filter_condition(&filter))
            .order_by_desc(comment::Column::CreatedAt)
            .all(self.db.as_ref())
            .await?;

        Ok(models.into_iter().map(Comment::from).collect())
    }

    async fn recent_by_author(&self, author_id: Uuid, limit: u64) -> AppResult<Vec<Comment>> {
        let models = CommentEntity::find()
            .filter(comment::Column::AuthorId.eq(author_id))
            .order_by_desc(comment::Column::CreatedAt)
            .limit(limit)
            .all(self.db.as_ref())
            .await?;

        Ok(models.into_iter().map(Comment::from).collect())
    }

    async fn count_by_posts(
        &self,
        post_ids: Vec<Uuid>,
        approved_only: bool,
    ) -> AppResult<HashMap<Uuid, u64>> {
        if post_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let mut condition = Condition::all().add(comment::Column::PostId.is_in(post_ids));
        if approved_only {
            condition = condition.add(comment::Column::Approved.eq(true));
        }
        count_grouped::<CommentEntity, _>(self.db.as_ref(), comment::Column::PostId, condition).await
    }

    async fn count_by_authors(&self, author_ids: Vec<Uuid>) -> AppResult<HashMap<Uuid, u64>> {
        if author_ids.is_empty() {
            return Ok(HashMap::new());
        }
        count_grouped::<CommentEntity, _>(
            self.db.as_ref(),
            comment::Column::AuthorId,
            comment::Column::AuthorId.is_in(author_ids),
        )
        .await
    }
}
