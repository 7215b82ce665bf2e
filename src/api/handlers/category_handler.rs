//! Category handlers.

use axum::{
    extract::State,
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::{CurrentUser, MaybeUser, Path, ValidatedJson};
use crate::api::AppState;
use crate::domain::{CategoryDetail, CategoryResponse, CategoryWithCount};
use crate::errors::AppResult;
use crate::types::Created;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCategoryRequest {
    #[validate(length(min = 1, message = "Category name required"))]
    #[schema(example = "Web Development")]
    pub name: String,
}

pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route("/:slug", get(get_category))
}

/// All categories with their published post counts
#[utoipa::path(
    get,
    path = "/api/categories",
    tag = "Categories",
    responses((status = 200, description = "Categories by name", body = [CategoryWithCount]))
)]
pub async fn list_categories(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<CategoryWithCount>>> {
    Ok(Json(state.category_service.list_categories().await?))
}

#[utoipa::path(
    post,
    path = "/api/categories",
    tag = "Categories",
    request_body = CreateCategoryRequest,
    responses(
        (status = 201, description = "Category created", body = CategoryResponse),
        (status = 403, description = "Admin only"),
        (status = 409, description = "Category already exists")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_category(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    ValidatedJson(payload): ValidatedJson<CreateCategoryRequest>,
) -> AppResult<Created<CategoryResponse>> {
    let category = state
        .category_service
        .create_category(&actor, payload.name)
        .await?;
    Ok(Created(category))
}

/// A category and the posts the caller may see
#[utoipa::path(
    get,
    path = "/api/categories/{slug}",
    tag = "Categories",
    params(("slug" = String, Path, description = "Category slug")),
    responses(
        (status = 200, description = "Category found", body = CategoryDetail),
        (status = 404, description = "Category not found")
    )
)]
pub async fn get_category(
    State(state): State<AppState>,
    MaybeUser(actor): MaybeUser,
    Path(slug): Path<String>,
) -> AppResult<Json<CategoryDetail>> {
    Ok(Json(state.category_service.get_by_slug(&actor, slug).await?))
}
