//! Post service.
//!
//! Visibility follows the access policy: published posts are public, drafts
//! are visible to their author and to admins. Reading or modifying a post the
//! actor cannot see answers `NotFound`.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use super::views::{comment_responses, post_response, post_responses};
use crate::config::{DEFAULT_PAGE_SIZE, FEATURED_POSTS_LIMIT, MIN_CONTENT_LENGTH, MIN_TITLE_LENGTH};
use crate::domain::{
    authorize, Action, Actor, CommentFilter, NewPost, Post, PostChanges, PostDetail, PostFilter,
    PostResponse, Resource, ResourceKind, TagsInput,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{ImageStore, ImageUpload, UnitOfWork};
use crate::types::{ListQuery, Page};

/// Input for a new post
#[derive(Debug, Clone, Default)]
pub struct PostDraft {
    pub title: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub tags: TagsInput,
    pub category_id: Option<Uuid>,
    pub image: Option<ImageUpload>,
}

/// Partial post update; `None` leaves the field untouched
#[derive(Debug, Clone, Default)]
pub struct PostUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub tags: Option<TagsInput>,
    pub category_id: Option<Uuid>,
    pub published: Option<bool>,
    pub image: Option<ImageUpload>,
}

#[async_trait]
pub trait PostService: Send + Sync {
    async fn create_post(&self, actor: &Actor, draft: PostDraft) -> AppResult<PostResponse>;

    /// Visible posts, newest first, with approved-comment counts
    async fn list_posts(&self, actor: &Actor, query: ListQuery) -> AppResult<Page<PostResponse>>;

    async fn featured_posts(&self) -> AppResult<Vec<PostResponse>>;

    /// Posts written by the actor, drafts included
    async fn my_posts(&self, actor: &Actor, query: ListQuery) -> AppResult<Page<PostResponse>>;

    async fn get_post(&self, actor: &Actor, id: Uuid) -> AppResult<PostDetail>;

    async fn update_post(&self, actor: &Actor, id: Uuid, update: PostUpdate)
        -> AppResult<PostResponse>;

    /// Delete a post together with its comments and stored image
    async fn delete_post(&self, actor: &Actor, id: Uuid) -> AppResult<()>;
}

pub struct PostManager<U: UnitOfWork> {
    uow: Arc<U>,
    images: Arc<dyn ImageStore>,
}

fn validate_title(title: &str) -> AppResult<String> {
    let title = title.trim();
    if (title.chars().count() as u64) < MIN_TITLE_LENGTH {
        return Err(AppError::validation(format!(
            "Title must be at least {} characters long",
            MIN_TITLE_LENGTH
        )));
    }
    Ok(title.to_string())
}

fn validate_content(content: &str) -> AppResult<String> {
    let content = content.trim();
    if (content.chars().count() as u64) < MIN_CONTENT_LENGTH {
        return Err(AppError::validation(format!(
            "Content must be at least {} characters long",
            MIN_CONTENT_LENGTH
        )));
    }
    Ok(content.to_string())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl<U: UnitOfWork> PostManager<U> {
    pub fn new(uow: Arc<U>, images: Arc<dyn ImageStore>) -> Self {
        Self { uow, images }
    }

    async fn ensure_category(&self, category_id: Option<Uuid>) -> AppResult<()> {
        if let Some(id) = category_id {
            if self.uow.categories().find_by_id(id).await?.is_none() {
                return Err(AppError::validation("Category does not exist"));
            }
        }
        Ok(())
    }

    async fn store_image(&self, upload: Option<ImageUpload>) -> AppResult<Option<String>> {
        match upload {
            Some(upload) => {
                upload.validate()?;
                Ok(Some(self.images.store(upload).await?))
            }
            None => Ok(None),
        }
    }

    /// Best-effort removal; a leftover file never fails the request.
    async fn discard_image(&self, url: Option<&str>) {
        if let Some(url) = url {
            if let Err(e) = self.images.delete(url).await {
                tracing::warn!(url, error = %e, "Failed to remove post image");
            }
        }
    }

    async fn load(&self, id: Uuid) -> AppResult<Post> {
        self.uow.posts().find_by_id(id).await?.ok_or_not_found()
    }
}

#[async_trait]
impl<U: UnitOfWork> PostService for PostManager<U> {
    async fn create_post(&self, actor: &Actor, draft: PostDraft) -> AppResult<PostResponse> {
        authorize(actor, Action::Create, &Resource::unowned(ResourceKind::Post))?;
        let author_id = actor.require_id()?;

        let title = validate_title(&draft.title)?;
        let content = validate_content(&draft.content)?;
        let tags = draft.tags.normalize()?;
        self.ensure_category(draft.category_id).await?;

        let image = self.store_image(draft.image).await?;
        let created = self
            .uow
            .posts()
            .create(NewPost {
                title,
                content,
                excerpt: non_blank(draft.excerpt),
                tags,
                image: image.clone(),
                published: actor.is_admin(),
                category_id: draft.category_id,
                author_id,
            })
            .await;

        let post = match created {
            Ok(post) => post,
            Err(e) => {
                self.discard_image(image.as_deref()).await;
                return Err(e);
            }
        };

        tracing::info!(post_id = %post.id, author_id = %author_id, "Post created");
        post_response(self.uow.as_ref(), post).await
    }

    async fn list_posts(&self, actor: &Actor, query: ListQuery) -> AppResult<Page<PostResponse>> {
        let filter = PostFilter {
            search: query.search_term(),
            tag: query.tag(),
            ..PostFilter::visible_to(actor.post_visibility())
        };
        let page = self
            .uow
            .posts()
            .list(filter, query.page_request(DEFAULT_PAGE_SIZE))
            .await?;

        let request = page.request;
        let total = page.total;
        let items = post_responses(self.uow.as_ref(), page.items, true).await?;
        Ok(Page::new(items, total, request))
    }

    async fn featured_posts(&self) -> AppResult<Vec<PostResponse>> {
        let posts = self.uow.posts().recent_published(FEATURED_POSTS_LIMIT).await?;
        post_responses(self.uow.as_ref(), posts, true).await
    }

    async fn my_posts(&self, actor: &Actor, query: ListQuery) -> AppResult<Page<PostResponse>> {
        authorize(actor, Action::Create, &Resource::unowned(ResourceKind::Post))?;
        let author_id = actor.require_id()?;

        let filter = PostFilter {
            search: query.search_term(),
            tag: query.tag(),
            author_id: Some(author_id),
            ..PostFilter::visible_to(actor.post_visibility())
        };
        let page = self
            .uow
            .posts()
            .list(filter, query.page_request(DEFAULT_PAGE_SIZE))
            .await?;

        let request = page.request;
        let total = page.total;
        let items = post_responses(self.uow.as_ref(), page.items, true).await?;
        Ok(Page::new(items, total, request))
    }

    async fn get_post(&self, actor: &Actor, id: Uuid) -> AppResult<PostDetail> {
        let post = self.load(id).await?;
        authorize(actor, Action::Read, &post.as_resource())?;

        let comments = self
            .uow
            .comments()
            .list_all(CommentFilter::for_post(id, actor.comment_visibility()))
            .await?;

        let (post, comments) = tokio::try_join!(
            post_response(self.uow.as_ref(), post),
            comment_responses(self.uow.as_ref(), comments, false),
        )?;
        Ok(PostDetail { post, comments })
    }

    async fn update_post(
        &self,
        actor: &Actor,
        id: Uuid,
        update: PostUpdate,
    ) -> AppResult<PostResponse> {
        let existing = self.load(id).await?;
        authorize(actor, Action::Update, &existing.as_resource())?;

        let mut changes = PostChanges {
            title: update.title.as_deref().map(validate_title).transpose()?,
            content: update.content.as_deref().map(validate_content).transpose()?,
            excerpt: update.excerpt.map(|e| e.trim().to_string()),
            tags: update.tags.map(TagsInput::normalize).transpose()?,
            category_id: update.category_id,
            published: update.published,
            image: None,
        };
        self.ensure_category(changes.category_id).await?;

        changes.image = self.store_image(update.image).await?;
        let new_image = changes.image.clone();

        let post = match self.uow.posts().update(id, changes).await {
            Ok(post) => post,
            Err(e) => {
                self.discard_image(new_image.as_deref()).await;
                return Err(e);
            }
        };

        if new_image.is_some() && existing.image != new_image {
            self.discard_image(existing.image.as_deref()).await;
        }

        tracing::info!(post_id = %id, "Post updated");
        post_response(self.uow.as_ref(), post).await
    }

    async fn delete_post(&self, actor: &Actor, id: Uuid) -> AppResult<()> {
        let existing = self.load(id).await?;
        authorize(actor, Action::Delete, &existing.as_resource())?;

        let deleted = self.uow.delete_post_with_comments(id).await?;
        self.discard_image(deleted.image.as_deref()).await;

        tracing::info!(post_id = %id, actor_id = ?actor.id(), "Post deleted");
        Ok(())
    }
}
