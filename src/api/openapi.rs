//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::extractors::PostPayload;
use crate::api::handlers::{
    auth_handler, category_handler, comment_handler, health_handler, post_handler, user_handler,
};
use crate::domain::{
    AuthorSummary, CategoryDetail, CategoryResponse, CategorySummary, CategoryWithCount,
    CommentResponse, PostDetail, PostReference, PostResponse, RoleDistribution, UserAnalytics,
    UserCommentEntry, UserDetail, UserPostEntry, UserResponse, UserRole, UserStats, UserSummary,
};
use crate::infra::CascadeReport;
use crate::services::{AuthSession, UserStatsReport};
use crate::types::{MessageResponse, PaginationMeta};

/// OpenAPI documentation for the blog API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Blog API",
        version = "0.1.0",
        description = "Multi-role blog backend: posts, comments, categories and user administration",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:5000", description = "Local development server")
    ),
    paths(
        auth_handler::register,
        auth_handler::login,
        auth_handler::profile,
        post_handler::list_posts,
        post_handler::featured_posts,
        post_handler::my_posts,
        post_handler::get_post,
        post_handler::create_post,
        post_handler::update_post,
        post_handler::delete_post,
        comment_handler::post_comments,
        comment_handler::create_comment,
        comment_handler::update_comment,
        comment_handler::delete_comment,
        comment_handler::pending_comments,
        comment_handler::my_comments,
        category_handler::list_categories,
        category_handler::create_category,
        category_handler::get_category,
        user_handler::list_users,
        user_handler::user_stats,
        user_handler::search_users,
        user_handler::get_user,
        user_handler::update_role,
        user_handler::delete_user,
        health_handler::health,
    ),
    components(
        schemas(
            // Domain types
            UserRole,
            UserResponse,
            UserSummary,
            UserDetail,
            UserPostEntry,
            UserCommentEntry,
            UserStats,
            UserAnalytics,
            RoleDistribution,
            AuthorSummary,
            PostResponse,
            PostDetail,
            PostReference,
            CommentResponse,
            CategoryResponse,
            CategorySummary,
            CategoryWithCount,
            CategoryDetail,
            CascadeReport,
            PaginationMeta,
            MessageResponse,
            // Auth
            auth_handler::RegisterRequest,
            auth_handler::LoginRequest,
            auth_handler::ProfileResponse,
            AuthSession,
            // Posts
            PostPayload,
            post_handler::PostListResponse,
            post_handler::FeaturedPostsResponse,
            post_handler::PostEnvelope,
            post_handler::PostDetailResponse,
            // Comments
            comment_handler::CreateCommentRequest,
            comment_handler::UpdateCommentRequest,
            comment_handler::CommentListResponse,
            comment_handler::CommentEnvelope,
            // Categories
            category_handler::CreateCategoryRequest,
            // Users
            UserStatsReport,
            user_handler::UserListResponse,
            user_handler::UserSearchResponse,
            user_handler::UserDetailResponse,
            user_handler::UpdateRoleRequest,
            user_handler::RoleUpdatedResponse,
            user_handler::DeletionDetails,
            user_handler::UserDeletedResponse,
            // Health
            health_handler::HealthResponse,
            health_handler::HealthError,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration, login and profile"),
        (name = "Posts", description = "Blog posts"),
        (name = "Comments", description = "Comments and moderation"),
        (name = "Categories", description = "Post categories"),
        (name = "Users", description = "User administration (admin only)"),
        (name = "Health", description = "Service health")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT token obtained from /api/auth/login"))
                        .build(),
                ),
            );
        }
    }
}
