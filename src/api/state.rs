//! Application state - Dependency injection container.
//!
//! Provides handlers with the service traits and the database handle used by
//! the health check.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::Database;
use crate::services::{
    AuthService, CategoryService, CommentService, PostService, ServiceContainer, Services,
    UserService,
};

/// Application state containing all services (DI container).
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthService>,
    pub user_service: Arc<dyn UserService>,
    pub post_service: Arc<dyn PostService>,
    pub comment_service: Arc<dyn CommentService>,
    pub category_service: Arc<dyn CategoryService>,
    /// Database connection
    pub database: Arc<Database>,
}

impl AppState {
    /// Wire the concrete services over the given database.
    pub fn from_config(database: Arc<Database>, config: Config) -> Self {
        let container = Services::from_connection(database.get_connection(), config);
        Self::new(&container, database)
    }

    /// Build state from any service container (tests pass mocks here).
    pub fn new(services: &dyn ServiceContainer, database: Arc<Database>) -> Self {
        Self {
            auth_service: services.auth(),
            user_service: services.users(),
            post_service: services.posts(),
            comment_service: services.comments(),
            category_service: services.categories(),
            database,
        }
    }
}
