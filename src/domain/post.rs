//! Post domain entity and response shapes.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::access::{PostVisibility, Resource};
use super::category::CategorySummary;
use super::comment::CommentResponse;
use super::user::AuthorSummary;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub tags: Vec<String>,
    pub image: Option<String>,
    pub published: bool,
    pub category_id: Option<Uuid>,
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Describe this post to the access policy.
    pub fn as_resource(&self) -> Resource {
        Resource::post(self.author_id, self.published)
    }
}

/// Data needed to persist a new post
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub tags: Vec<String>,
    pub image: Option<String>,
    pub published: bool,
    pub category_id: Option<Uuid>,
    pub author_id: Uuid,
}

/// Partial update; `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub tags: Option<Vec<String>>,
    pub image: Option<String>,
    pub published: Option<bool>,
    pub category_id: Option<Uuid>,
}

impl PostChanges {
    pub fn is_empty(&self) -> bool {
        *self == PostChanges::default()
    }
}

/// Filters for post list queries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostFilter {
    pub visibility: PostVisibility,
    pub search: Option<String>,
    pub tag: Option<String>,
    pub author_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
}

impl PostFilter {
    pub fn visible_to(visibility: PostVisibility) -> Self {
        Self {
            visibility,
            search: None,
            tag: None,
            author_id: None,
            category_id: None,
        }
    }
}

/// Minimal post reference embedded in comment payloads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct PostReference {
    pub id: Uuid,
    pub title: String,
}

impl From<&Post> for PostReference {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id,
            title: post.title.clone(),
        }
    }
}

/// Post payload returned by the API
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: Uuid,
    #[schema(example = "Getting started with Rust")]
    pub title: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub tags: Vec<String>,
    pub image: Option<String>,
    pub published: bool,
    pub category_id: Option<Uuid>,
    pub author_id: Uuid,
    pub author: Option<AuthorSummary>,
    pub category: Option<CategorySummary>,
    /// Number of approved comments, present on list payloads
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment_count: Option<u64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Post> for PostResponse {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            title: post.title,
            content: post.content,
            excerpt: post.excerpt,
            tags: post.tags,
            image: post.image,
            published: post.published,
            category_id: post.category_id,
            author_id: post.author_id,
            author: None,
            category: None,
            comment_count: None,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

/// Single post with its visible comments
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostDetail {
    #[serde(flatten)]
    pub post: PostResponse,
    pub comments: Vec<CommentResponse>,
}
