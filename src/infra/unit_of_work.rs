//! Unit of Work pattern implementation.
//!
//! Centralizes repository access and owns the multi-row deletions that must
//! happen atomically: removing a user with everything they wrote, and
//! removing a post together with its comments.

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{
    AccessMode, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    IsolationLevel, QueryFilter, TransactionTrait,
};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::repositories::entities::{comment, post, user};
use super::repositories::{
    CategoryRepository, CategoryStore, CommentRepository, CommentStore, PostRepository, PostStore,
    UserRepository, UserStore,
};
use crate::domain::{Post, User};
use crate::errors::{AppError, AppResult};

/// Outcome of a cascading user deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CascadeReport {
    pub deleted_user: Uuid,
    pub posts_deleted: u64,
    /// Comments written by the user plus comments left by others on the user's posts
    pub comments_deleted: u64,
}

/// Unit of Work trait for dependency injection.
///
/// Not mockable directly because of the generic transaction methods; tests
/// implement it over mockall repositories instead.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    fn users(&self) -> Arc<dyn UserRepository>;

    fn posts(&self) -> Arc<dyn PostRepository>;

    fn comments(&self) -> Arc<dyn CommentRepository>;

    fn categories(&self) -> Arc<dyn CategoryRepository>;

    /// Delete a user, their comments, the comments on their posts and their
    /// posts, in one read-committed transaction.
    async fn delete_user_cascade(&self, user_id: Uuid) -> AppResult<CascadeReport>;

    /// Delete a post and its comments atomically. Returns the deleted post.
    async fn delete_post_with_comments(&self, post_id: Uuid) -> AppResult<Post>;

    /// Execute a closure within a read-committed transaction.
    ///
    /// Committed on success, rolled back on error.
    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send;
}

/// Repository operations bound to one open transaction.
pub struct TransactionContext<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TransactionContext<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    pub async fn find_user(&self, id: Uuid) -> AppResult<Option<User>> {
        let result = user::Entity::find_by_id(id).one(self.txn).await?;
        Ok(result.map(User::from))
    }

    pub async fn find_post(&self, id: Uuid) -> AppResult<Option<Post>> {
        let result = post::Entity::find_by_id(id).one(self.txn).await?;
        Ok(result.map(Post::from))
    }

    pub async fn posts_by_author(&self, author_id: Uuid) -> AppResult<Vec<Post>> {
        let models = post::Entity::find()
            .filter(post::Column::AuthorId.eq(author_id))
            .all(self.txn)
            .await?;

        Ok(models.into_iter().map(Post::from).collect())
    }

    pub async fn delete_comments_by_author(&self, author_id: Uuid) -> AppResult<u64> {
        let result = comment::Entity::delete_many()
            .filter(comment::Column::AuthorId.eq(author_id))
            .exec(self.txn)
            .await?;
        Ok(result.rows_affected)
    }

    pub async fn delete_comments_on_posts(&self, post_ids: Vec<Uuid>) -> AppResult<u64> {
        if post_ids.is_empty() {
            return Ok(0);
        }
        let result = comment::Entity::delete_many()
            .filter(comment::Column::PostId.is_in(post_ids))
            .exec(self.txn)
            .await?;
        Ok(result.rows_affected)
    }

    pub async fn delete_posts(&self, post_ids: Vec<Uuid>) -> AppResult<u64> {
        if post_ids.is_empty() {
            return Ok(0);
        }
        let result = post::Entity::delete_many()
            .filter(post::Column::Id.is_in(post_ids))
            .exec(self.txn)
            .await?;
        Ok(result.rows_affected)
    }

    pub async fn delete_user(&self, id: Uuid) -> AppResult<()> {
        let result = user::Entity::delete_by_id(id).exec(self.txn).await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    /// Comments first, then posts, then the user, so no foreign key is ever
    /// left dangling.
    pub async fn delete_user_cascade(&self, user_id: Uuid) -> AppResult<CascadeReport> {
        self.find_user(user_id).await?.ok_or(AppError::NotFound)?;

        let own_comments = self.delete_comments_by_author(user_id).await?;

        let post_ids: Vec<Uuid> = self
            .posts_by_author(user_id)
            .await?
            .into_iter()
            .map(|p| p.id)
            .collect();

        let comments_on_posts = self.delete_comments_on_posts(post_ids.clone()).await?;
        let posts_deleted = self.delete_posts(post_ids).await?;
        self.delete_user(user_id).await?;

        Ok(CascadeReport {
            deleted_user: user_id,
            posts_deleted,
            comments_deleted: own_comments + comments_on_posts,
        })
    }

    pub async fn delete_post_with_comments(&self, post_id: Uuid) -> AppResult<Post> {
        let post = self.find_post(post_id).await?.ok_or(AppError::NotFound)?;

        self.delete_comments_on_posts(vec![post_id]).await?;
        if self.delete_posts(vec![post_id]).await? == 0 {
            return Err(AppError::NotFound);
        }

        Ok(post)
    }
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    db: Arc<DatabaseConnection>,
    user_repo: Arc<UserStore>,
    post_repo: Arc<PostStore>,
    comment_repo: Arc<CommentStore>,
    category_repo: Arc<CategoryStore>,
}

impl Persistence {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            user_repo: Arc::new(UserStore::new(db.clone())),
            post_repo: Arc::new(PostStore::new(db.clone())),
            comment_repo: Arc::new(CommentStore::new(db.clone())),
            category_repo: Arc::new(CategoryStore::new(db.clone())),
            db,
        }
    }

    async fn execute_transaction<F, T>(&self, isolation: IsolationLevel, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        let txn = self
            .db
            .begin_with_config(Some(isolation), Some(AccessMode::ReadWrite))
            .await?;

        match f(TransactionContext::new(&txn)).await {
            Ok(result) => {
                txn.commit().await?;
                Ok(result)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    fn posts(&self) -> Arc<dyn PostRepository> {
        self.post_repo.clone()
    }

    fn comments(&self) -> Arc<dyn CommentRepository> {
        self.comment_repo.clone()
    }

    fn categories(&self) -> Arc<dyn CategoryRepository> {
        self.category_repo.clone()
    }

    async fn delete_user_cascade(&self, user_id: Uuid) -> AppResult<CascadeReport> {
        self.transaction(|ctx| Box::pin(async move { ctx.delete_user_cascade(user_id).await }))
            .await
    }

    async fn delete_post_with_comments(&self, post_id: Uuid) -> AppResult<Post> {
        self.transaction(|ctx| {
            Box::pin(async move { ctx.delete_post_with_comments(post_id).await })
        })
        .await
    }

    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        self.execute_transaction(IsolationLevel::ReadCommitted, f).await
    }
}
