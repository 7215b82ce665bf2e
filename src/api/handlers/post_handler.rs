//! Post handlers.

use axum::{
    extract::State,
    response::Json,
    routing::get,
    Router,
};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::api::extractors::{CurrentUser, MaybeUser, Path, PostForm, Query};
use crate::api::AppState;
use crate::domain::{PostDetail, PostResponse};
use crate::errors::AppResult;
use crate::types::{Created, ListQuery, MessageResponse, Page, PaginationMeta};

#[derive(Debug, Serialize, ToSchema)]
pub struct PostListResponse {
    pub posts: Vec<PostResponse>,
    pub pagination: PaginationMeta,
}

impl From<Page<PostResponse>> for PostListResponse {
    fn from(page: Page<PostResponse>) -> Self {
        let pagination = page.meta();
        Self {
            posts: page.items,
            pagination,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FeaturedPostsResponse {
    pub posts: Vec<PostResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PostEnvelope {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub post: PostResponse,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PostDetailResponse {
    pub post: PostDetail,
}

pub fn post_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_posts).post(create_post))
        .route("/featured/posts", get(featured_posts))
        .route("/user/my-posts", get(my_posts))
        .route("/:id", get(get_post).put(update_post).delete(delete_post))
}

/// List visible posts
#[utoipa::path(
    get,
    path = "/api/posts",
    tag = "Posts",
    params(ListQuery),
    responses(
        (status = 200, description = "Page of posts", body = PostListResponse),
        (status = 401, description = "Invalid token")
    )
)]
pub async fn list_posts(
    State(state): State<AppState>,
    MaybeUser(actor): MaybeUser,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<PostListResponse>> {
    let page = state.post_service.list_posts(&actor, query).await?;
    Ok(Json(page.into()))
}

/// Three most recent published posts
#[utoipa::path(
    get,
    path = "/api/posts/featured/posts",
    tag = "Posts",
    responses((status = 200, description = "Featured posts", body = FeaturedPostsResponse))
)]
pub async fn featured_posts(
    State(state): State<AppState>,
) -> AppResult<Json<FeaturedPostsResponse>> {
    let posts = state.post_service.featured_posts().await?;
    Ok(Json(FeaturedPostsResponse { posts }))
}

/// Posts written by the caller, drafts included
#[utoipa::path(
    get,
    path = "/api/posts/user/my-posts",
    tag = "Posts",
    params(ListQuery),
    responses(
        (status = 200, description = "Page of own posts", body = PostListResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Readers cannot author posts")
    ),
    security(("bearer_auth" = []))
)]
pub async fn my_posts(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<PostListResponse>> {
    let page = state.post_service.my_posts(&actor, query).await?;
    Ok(Json(page.into()))
}

/// A single post with its visible comments
#[utoipa::path(
    get,
    path = "/api/posts/{id}",
    tag = "Posts",
    params(("id" = Uuid, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Post found", body = PostDetailResponse),
        (status = 404, description = "Post not found")
    )
)]
pub async fn get_post(
    State(state): State<AppState>,
    MaybeUser(actor): MaybeUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<PostDetailResponse>> {
    let post = state.post_service.get_post(&actor, id).await?;
    Ok(Json(PostDetailResponse { post }))
}

/// Create a post (JSON or multipart with a `postsImage` file)
#[utoipa::path(
    post,
    path = "/api/posts",
    tag = "Posts",
    request_body = PostPayload,
    responses(
        (status = 201, description = "Post created", body = PostEnvelope),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Readers cannot author posts")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_post(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    form: PostForm,
) -> AppResult<Created<PostEnvelope>> {
    let draft = form.into_draft()?;
    let post = state.post_service.create_post(&actor, draft).await?;
    Ok(Created(PostEnvelope {
        message: None,
        post,
    }))
}

/// Partially update a post
#[utoipa::path(
    put,
    path = "/api/posts/{id}",
    tag = "Posts",
    params(("id" = Uuid, Path, description = "Post ID")),
    request_body = PostPayload,
    responses(
        (status = 200, description = "Post updated", body = PostEnvelope),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Post not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_post(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
    form: PostForm,
) -> AppResult<Json<PostEnvelope>> {
    let post = state
        .post_service
        .update_post(&actor, id, form.into_update())
        .await?;

    Ok(Json(PostEnvelope {
        message: Some("Post updated successfully".to_string()),
        post,
    }))
}

/// Delete a post and its comments
#[utoipa::path(
    delete,
    path = "/api/posts/{id}",
    tag = "Posts",
    params(("id" = Uuid, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Post deleted", body = MessageResponse),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Post not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_post(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    state.post_service.delete_post(&actor, id).await?;
    Ok(Json(MessageResponse::new("Post deleted successfully")))
}
