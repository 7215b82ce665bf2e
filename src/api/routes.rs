//! Application route configuration.

use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware,
    routing::get,
    Router,
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::handlers::{
    auth_routes, category_routes, comment_routes, health, post_routes, user_routes,
};
use super::middleware::auth_middleware;
use super::openapi::ApiDoc;
use super::AppState;
use crate::config::{Config, API_PREFIX, MAX_REQUEST_BODY_BYTES, UPLOAD_ROUTE};
use crate::errors::AppError;

/// Create the application router with all routes configured
pub fn create_router(state: AppState, config: &Config) -> Router {
    let api = Router::new()
        .nest("/auth", auth_routes())
        .nest("/posts", post_routes())
        .nest("/comments", comment_routes())
        .nest("/categories", category_routes())
        .nest("/users", user_routes())
        // Resolves the actor for everything above; health stays outside.
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .route("/health", get(health));

    Router::new()
        .nest(API_PREFIX, api)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest_service(UPLOAD_ROUTE, ServeDir::new(&config.upload_dir))
        .fallback(route_not_found)
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
        .layer(cors_layer(&config.frontend_url))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS restricted to the configured frontend origin.
fn cors_layer(frontend_url: &str) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .allow_credentials(true);

    match frontend_url.parse::<HeaderValue>() {
        Ok(origin) => cors.allow_origin(origin),
        Err(_) => {
            tracing::warn!(frontend_url, "Invalid FRONTEND_URL, cross-origin requests disabled");
            cors
        }
    }
}

async fn route_not_found() -> AppError {
    AppError::NotFound
}
