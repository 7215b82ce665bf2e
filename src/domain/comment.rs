//! Comment domain entity and response shapes.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::access::{CommentVisibility, Resource};
use super::post::PostReference;
use super::user::AuthorSummary;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: Uuid,
    pub content: String,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub approved: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    pub fn as_resource(&self) -> Resource {
        Resource::comment(self.author_id, self.approved)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub content: String,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub approved: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentChanges {
    pub content: Option<String>,
    pub approved: Option<bool>,
}

/// Filters for comment list queries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentFilter {
    pub visibility: CommentVisibility,
    pub post_id: Option<Uuid>,
    pub author_id: Option<Uuid>,
    pub approved: Option<bool>,
}

impl CommentFilter {
    pub fn for_post(post_id: Uuid, visibility: CommentVisibility) -> Self {
        Self {
            visibility,
            post_id: Some(post_id),
            author_id: None,
            approved: None,
        }
    }

    pub fn by_author(author_id: Uuid) -> Self {
        Self {
            visibility: CommentVisibility::All,
            post_id: None,
            author_id: Some(author_id),
            approved: None,
        }
    }

    pub fn pending() -> Self {
        Self {
            visibility: CommentVisibility::All,
            post_id: None,
            author_id: None,
            approved: Some(false),
        }
    }
}

/// Comment payload returned by the API
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: Uuid,
    pub content: String,
    pub approved: bool,
    pub post_id: Uuid,
    pub author_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<AuthorSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post: Option<PostReference>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Comment> for CommentResponse {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            content: comment.content,
            approved: comment.approved,
            post_id: comment.post_id,
            author_id: comment.author_id,
            author: None,
            post: None,
            created_at: comment.created_at,
            updated_at: comment.updated_at,
        }
    }
}
