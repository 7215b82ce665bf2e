//! Service container - centralized access to every application service.
//!
//! Handlers depend on the service traits only; this is the single place
//! where concrete managers are wired to the persistence layer.

use std::sync::Arc;

use super::{
    AuthService, Authenticator, CategoryManager, CategoryService, CommentManager, CommentService,
    PostManager, PostService, UserManager, UserService,
};
use crate::config::Config;
use crate::infra::{ImageStore, LocalImageStore, Persistence};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Service container trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    fn auth(&self) -> Arc<dyn AuthService>;

    fn users(&self) -> Arc<dyn UserService>;

    fn posts(&self) -> Arc<dyn PostService>;

    fn comments(&self) -> Arc<dyn CommentService>;

    fn categories(&self) -> Arc<dyn CategoryService>;
}

/// Concrete implementation of ServiceContainer
#[derive(Clone)]
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    user_service: Arc<dyn UserService>,
    post_service: Arc<dyn PostService>,
    comment_service: Arc<dyn CommentService>,
    category_service: Arc<dyn CategoryService>,
}

impl Services {
    /// Assemble a container from already-built services (tests inject mocks here).
    pub fn new(
        auth_service: Arc<dyn AuthService>,
        user_service: Arc<dyn UserService>,
        post_service: Arc<dyn PostService>,
        comment_service: Arc<dyn CommentService>,
        category_service: Arc<dyn CategoryService>,
    ) -> Self {
        Self {
            auth_service,
            user_service,
            post_service,
            comment_service,
            category_service,
        }
    }

    /// Wire every service over one shared unit of work and the local image store.
    pub fn from_connection(db: Arc<sea_orm::DatabaseConnection>, config: Config) -> Self {
        let images: Arc<dyn ImageStore> = Arc::new(LocalImageStore::from_config(&config));
        let uow = Arc::new(Persistence::new(db));

        Self {
            auth_service: Arc::new(Authenticator::new(uow.clone(), config)),
            user_service: Arc::new(UserManager::new(uow.clone())),
            post_service: Arc::new(PostManager::new(uow.clone(), images)),
            comment_service: Arc::new(CommentManager::new(uow.clone())),
            category_service: Arc::new(CategoryManager::new(uow)),
        }
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn users(&self) -> Arc<dyn UserService> {
        self.user_service.clone()
    }

    fn posts(&self) -> Arc<dyn PostService> {
        self.post_service.clone()
    }

    fn comments(&self) -> Arc<dyn CommentService> {
        self.comment_service.clone()
    }

    fn categories(&self) -> Arc<dyn CategoryService> {
        self.category_service.clone()
    }
}
