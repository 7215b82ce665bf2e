//! User administration handlers (admin only).

use axum::{
    extract::State,
    response::Json,
    routing::{get, patch},
    Router,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::{CurrentUser, Path, Query, ValidatedJson};
use crate::api::AppState;
use crate::domain::{UserDetail, UserResponse, UserSummary};
use crate::errors::AppResult;
use crate::services::UserStatsReport;
use crate::types::{ListQuery, Page, PaginationMeta};

#[derive(Debug, Serialize, ToSchema)]
pub struct UserListResponse {
    pub users: Vec<UserSummary>,
    pub pagination: PaginationMeta,
}

impl From<Page<UserSummary>> for UserListResponse {
    fn from(page: Page<UserSummary>) -> Self {
        let pagination = page.meta();
        Self {
            users: page.items,
            pagination,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Name or email fragment, at least 2 characters
    pub query: Option<String>,
    /// Maximum results (default 10)
    pub limit: Option<u64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserSearchResponse {
    pub users: Vec<UserResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserDetailResponse {
    pub user: UserDetail,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateRoleRequest {
    #[validate(length(min = 1, message = "Role is required"))]
    #[schema(example = "AUTHOR")]
    pub role: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RoleUpdatedResponse {
    pub message: String,
    pub user: UserResponse,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeletionDetails {
    pub user: String,
    pub posts_deleted: u64,
    pub comments_deleted: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserDeletedResponse {
    pub message: String,
    pub details: DeletionDetails,
}

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users))
        .route("/stats", get(user_stats))
        .route("/search", get(search_users))
        .route("/:id", get(get_user).delete(delete_user))
        .route("/:id/role", patch(update_role))
}

/// List users with activity counts
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    params(ListQuery),
    responses(
        (status = 200, description = "Page of users", body = UserListResponse),
        (status = 403, description = "Admin only")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_users(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<UserListResponse>> {
    let page = state.user_service.list_users(&actor, query).await?;
    Ok(Json(page.into()))
}

/// Platform statistics
#[utoipa::path(
    get,
    path = "/api/users/stats",
    tag = "Users",
    responses(
        (status = 200, description = "Totals and ratios", body = UserStatsReport),
        (status = 403, description = "Admin only")
    ),
    security(("bearer_auth" = []))
)]
pub async fn user_stats(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
) -> AppResult<Json<UserStatsReport>> {
    Ok(Json(state.user_service.stats(&actor).await?))
}

/// Search users by name or email
#[utoipa::path(
    get,
    path = "/api/users/search",
    tag = "Users",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching users by name", body = UserSearchResponse),
        (status = 400, description = "Query too short"),
        (status = 403, description = "Admin only")
    ),
    security(("bearer_auth" = []))
)]
pub async fn search_users(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Query(params): Query<SearchQuery>,
) -> AppResult<Json<UserSearchResponse>> {
    let users = state
        .user_service
        .search_users(&actor, params.query.unwrap_or_default(), params.limit)
        .await?;
    Ok(Json(UserSearchResponse { users }))
}

/// User with recent activity
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User found", body = UserDetailResponse),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_user(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<UserDetailResponse>> {
    let user = state.user_service.get_user_detail(&actor, id).await?;
    Ok(Json(UserDetailResponse { user }))
}

/// Change a user's role
#[utoipa::path(
    patch,
    path = "/api/users/{id}/role",
    tag = "Users",
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = UpdateRoleRequest,
    responses(
        (status = 200, description = "Role updated", body = RoleUpdatedResponse),
        (status = 400, description = "Invalid role or own account"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_role(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateRoleRequest>,
) -> AppResult<Json<RoleUpdatedResponse>> {
    let user = state.user_service.update_role(&actor, id, payload.role).await?;
    Ok(Json(RoleUpdatedResponse {
        message: format!("User role updated successfully to {}", user.role),
        user: user.into(),
    }))
}

/// Delete a user with their posts and comments
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deleted", body = UserDeletedResponse),
        (status = 400, description = "Own account"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_user(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<UserDeletedResponse>> {
    let (user, report) = state.user_service.delete_user(&actor, id).await?;
    Ok(Json(UserDeletedResponse {
        message: format!(r#"User "{}" ({}) deleted successfully"#, user.name, user.email),
        details: DeletionDetails {
            user: user.email,
            posts_deleted: report.posts_deleted,
            comments_deleted: report.comments_deleted,
        },
    }))
}
