//! Comment service.
//!
//! Comments written by admins are approved immediately; everyone else's wait
//! in the moderation queue until an admin approves them.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use super::views::{comment_response, comment_responses};
use crate::config::DEFAULT_COMMENT_PAGE_SIZE;
use crate::domain::{
    authorize, Action, Actor, Comment, CommentChanges, CommentFilter, CommentResponse, NewComment,
    Post, Resource, ResourceKind,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::types::{ListQuery, Page};

/// Partial comment update
#[derive(Debug, Clone, Default)]
pub struct CommentUpdate {
    pub content: Option<String>,
    /// Honoured for admins only
    pub approved: Option<bool>,
}

#[async_trait]
pub trait CommentService: Send + Sync {
    async fn create_comment(
        &self,
        actor: &Actor,
        post_id: Uuid,
        content: String,
    ) -> AppResult<CommentResponse>;

    /// Comments on one post that the actor may see
    async fn list_for_post(
        &self,
        actor: &Actor,
        post_id: Uuid,
        query: ListQuery,
    ) -> AppResult<Page<CommentResponse>>;

    async fn update_comment(
        &self,
        actor: &Actor,
        id: Uuid,
        update: CommentUpdate,
    ) -> AppResult<CommentResponse>;

    async fn delete_comment(&self, actor: &Actor, id: Uuid) -> AppResult<()>;

    /// Moderation queue: unapproved comments, admin only
    async fn pending_comments(
        &self,
        actor: &Actor,
        query: ListQuery,
    ) -> AppResult<Page<CommentResponse>>;

    async fn my_comments(&self, actor: &Actor, query: ListQuery)
        -> AppResult<Page<CommentResponse>>;
}

pub struct CommentManager<U: UnitOfWork> {
    uow: Arc<U>,
}

fn validate_content(content: &str) -> AppResult<String> {
    let content = content.trim();
    if content.is_empty() {
        return Err(AppError::validation("Comment content is required"));
    }
    Ok(content.to_string())
}

impl<U: UnitOfWork> CommentManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    /// Load a post the actor is allowed to read.
    async fn readable_post(&self, actor: &Actor, post_id: Uuid) -> AppResult<Post> {
        let post = self.uow.posts().find_by_id(post_id).await?.ok_or_not_found()?;
        authorize(actor, Action::Read, &post.as_resource())?;
        Ok(post)
    }

    async fn load(&self, id: Uuid) -> AppResult<Comment> {
        self.uow.comments().find_by_id(id).await?.ok_or_not_found()
    }

    async fn page_of(
        &self,
        filter: CommentFilter,
        query: &ListQuery,
        with_post: bool,
    ) -> AppResult<Page<CommentResponse>> {
        let page = self
            .uow
            .comments()
            .list(filter, query.page_request(DEFAULT_COMMENT_PAGE_SIZE))
            .await?;

        let request = page.request;
        let total = page.total;
        let items = comment_responses(self.uow.as_ref(), page.items, with_post).await?;
        Ok(Page::new(items, total, request))
    }
}

#[async_trait]
impl<U: UnitOfWork> CommentService for CommentManager<U> {
    async fn create_comment(
        &self,
        actor: &Actor,
        post_id: Uuid,
        content: String,
    ) -> AppResult<CommentResponse> {
        authorize(actor, Action::Create, &Resource::unowned(ResourceKind::Comment))?;
        let author_id = actor.require_id()?;
        let content = validate_content(&content)?;
        self.readable_post(actor, post_id).await?;

        let comment = self
            .uow
            .comments()
            .create(NewComment {
                content,
                post_id,
                author_id,
                approved: actor.is_admin(),
            })
            .await?;

        tracing::info!(
            comment_id = %comment.id,
            post_id = %post_id,
            approved = comment.approved,
            "Comment created"
        );
        comment_response(self.uow.as_ref(), comment).await
    }

    async fn list_for_post(
        &self,
        actor: &Actor,
        post_id: Uuid,
        query: ListQuery,
    ) -> AppResult<Page<CommentResponse>> {
        self.readable_post(actor, post_id).await?;
        let filter = CommentFilter::for_post(post_id, actor.comment_visibility());
        self.page_of(filter, &query, false).await
    }

    async fn update_comment(
        &self,
        actor: &Actor,
        id: Uuid,
        update: CommentUpdate,
    ) -> AppResult<CommentResponse> {
        let existing = self.load(id).await?;
        authorize(actor, Action::Update, &existing.as_resource())?;

        let changes = CommentChanges {
            content: update.content.as_deref().map(validate_content).transpose()?,
            approved: update.approved.filter(|_| actor.is_admin()),
        };
        if update.approved.is_some() && changes.approved.is_none() {
            tracing::debug!(comment_id = %id, "Ignoring approval change from non-admin");
        }

        let comment = self.uow.comments().update(id, changes).await?;
        comment_response(self.uow.as_ref(), comment).await
    }

    async fn delete_comment(&self, actor: &Actor, id: Uuid) -> AppResult<()> {
        let existing = self.load(id).await?;
        authorize(actor, Action::Delete, &existing.as_resource())?;

        self.uow.comments().delete(id).await?;
        tracing::info!(comment_id = %id, actor_id = ?actor.id(), "Comment deleted");
        Ok(())
    }

    async fn pending_comments(
        &self,
        actor: &Actor,
        query: ListQuery,
    ) -> AppResult<Page<CommentResponse>> {
        authorize(actor, Action::ListAdmin, &Resource::unowned(ResourceKind::Moderation))?;
        self.page_of(CommentFilter::pending(), &query, true).await
    }

    async fn my_comments(
        &self,
        actor: &Actor,
        query: ListQuery,
    ) -> AppResult<Page<CommentResponse>> {
        let author_id = actor.require_id()?;
        self.page_of(CommentFilter::by_author(author_id), &query, true).await
    }
}
