//! Comment handlers.

use axum::{
    extract::State,
    response::Json,
    routing::{get, post, put},
    Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::{CurrentUser, MaybeUser, Path, Query, ValidatedJson};
use crate::api::AppState;
use crate::domain::CommentResponse;
use crate::errors::AppResult;
use crate::services::CommentUpdate;
use crate::types::{Created, ListQuery, MessageResponse, Page, PaginationMeta};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    #[validate(length(min = 1, message = "Comment cannot be empty"))]
    #[schema(example = "Great article!")]
    pub content: String,
    pub post_id: Uuid,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateCommentRequest {
    #[validate(length(min = 1, message = "Comment cannot be empty"))]
    pub content: Option<String>,
    /// Applied only when the caller is an admin
    pub approved: Option<bool>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CommentListResponse {
    pub comments: Vec<CommentResponse>,
    pub pagination: PaginationMeta,
}

impl From<Page<CommentResponse>> for CommentListResponse {
    fn from(page: Page<CommentResponse>) -> Self {
        let pagination = page.meta();
        Self {
            comments: page.items,
            pagination,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CommentEnvelope {
    pub comment: CommentResponse,
}

pub fn comment_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_comment))
        .route("/mine", get(my_comments))
        .route("/admin/pending", get(pending_comments))
        .route("/post/:post_id", get(post_comments))
        .route("/:id", put(update_comment).delete(delete_comment))
}

/// Visible comments on a post
#[utoipa::path(
    get,
    path = "/api/comments/post/{post_id}",
    tag = "Comments",
    params(("post_id" = Uuid, Path, description = "Post ID"), ListQuery),
    responses(
        (status = 200, description = "Page of comments", body = CommentListResponse),
        (status = 404, description = "Post not found")
    )
)]
pub async fn post_comments(
    State(state): State<AppState>,
    MaybeUser(actor): MaybeUser,
    Path(post_id): Path<Uuid>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<CommentListResponse>> {
    let page = state
        .comment_service
        .list_for_post(&actor, post_id, query)
        .await?;
    Ok(Json(page.into()))
}

/// Comment on a post
#[utoipa::path(
    post,
    path = "/api/comments",
    tag = "Comments",
    request_body = CreateCommentRequest,
    responses(
        (status = 201, description = "Comment created", body = CommentEnvelope),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Post not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_comment(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    ValidatedJson(payload): ValidatedJson<CreateCommentRequest>,
) -> AppResult<Created<CommentEnvelope>> {
    let comment = state
        .comment_service
        .create_comment(&actor, payload.post_id, payload.content)
        .await?;
    Ok(Created(CommentEnvelope { comment }))
}

/// Edit a comment; admins may also change approval
#[utoipa::path(
    put,
    path = "/api/comments/{id}",
    tag = "Comments",
    params(("id" = Uuid, Path, description = "Comment ID")),
    request_body = UpdateCommentRequest,
    responses(
        (status = 200, description = "Comment updated", body = CommentEnvelope),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Comment not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_comment(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateCommentRequest>,
) -> AppResult<Json<CommentEnvelope>> {
    let update = CommentUpdate {
        content: payload.content,
        approved: payload.approved,
    };
    let comment = state.comment_service.update_comment(&actor, id, update).await?;
    Ok(Json(CommentEnvelope { comment }))
}

#[utoipa::path(
    delete,
    path = "/api/comments/{id}",
    tag = "Comments",
    params(("id" = Uuid, Path, description = "Comment ID")),
    responses(
        (status = 200, description = "Comment deleted", body = MessageResponse),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Comment not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_comment(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    state.comment_service.delete_comment(&actor, id).await?;
    Ok(Json(MessageResponse::new("Comment deleted successfully")))
}

/// Moderation queue
#[utoipa::path(
    get,
    path = "/api/comments/admin/pending",
    tag = "Comments",
    params(ListQuery),
    responses(
        (status = 200, description = "Unapproved comments", body = CommentListResponse),
        (status = 403, description = "Admin only")
    ),
    security(("bearer_auth" = []))
)]
pub async fn pending_comments(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<CommentListResponse>> {
    let page = state.comment_service.pending_comments(&actor, query).await?;
    Ok(Json(page.into()))
}

/// Comments written by the caller
#[utoipa::path(
    get,
    path = "/api/comments/mine",
    tag = "Comments",
    params(ListQuery),
    responses(
        (status = 200, description = "Own comments", body = CommentListResponse),
        (status = 401, description = "Not authenticated")
    ),
    security(("bearer_auth" = []))
)]
pub async fn my_comments(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<CommentListResponse>> {
    let page = state.comment_service.my_comments(&actor, query).await?;
    Ok(Json(page.into()))
}
