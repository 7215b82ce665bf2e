//! Shared fixtures for the service and API tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use blog_api::domain::{Actor, Category, Comment, Post, User, UserRole};
use blog_api::errors::{AppError, AppResult};
use blog_api::infra::{
    CascadeReport, CategoryRepository, CommentRepository, MockCategoryRepository,
    MockCommentRepository, MockPostRepository, MockUserRepository, PostRepository,
    TransactionContext, UnitOfWork, UserRepository,
};

/// One mock per repository; set expectations, then hand them to [`TestUnitOfWork`].
#[derive(Default)]
pub struct Repos {
    pub users: MockUserRepository,
    pub posts: MockPostRepository,
    pub comments: MockCommentRepository,
    pub categories: MockCategoryRepository,
}

impl Repos {
    /// Relation lookups used when building payloads answer with nothing.
    pub fn with_empty_lookups(mut self) -> Self {
        self.users.expect_find_by_ids().returning(|_| Ok(Vec::new()));
        self.posts.expect_find_by_ids().returning(|_| Ok(Vec::new()));
        self.categories
            .expect_find_by_ids()
            .returning(|_| Ok(Vec::new()));
        self.comments
            .expect_count_by_posts()
            .returning(|_, _| Ok(HashMap::new()));
        self
    }
}

/// Unit of work over mockall repositories.
///
/// The cascading deletions answer with canned results; generic transactions
/// are not supported.
pub struct TestUnitOfWork {
    users: Arc<MockUserRepository>,
    posts: Arc<MockPostRepository>,
    comments: Arc<MockCommentRepository>,
    categories: Arc<MockCategoryRepository>,
    pub cascade: Option<CascadeReport>,
    pub deleted_post: Option<Post>,
}

impl TestUnitOfWork {
    pub fn new(repos: Repos) -> Self {
        Self {
            users: Arc::new(repos.users),
            posts: Arc::new(repos.posts),
            comments: Arc::new(repos.comments),
            categories: Arc::new(repos.categories),
            cascade: None,
            deleted_post: None,
        }
    }

    pub fn with_cascade(mut self, report: CascadeReport) -> Self {
        self.cascade = Some(report);
        self
    }

    pub fn with_deleted_post(mut self, post: Post) -> Self {
        self.deleted_post = Some(post);
        self
    }
}

#[async_trait]
impl UnitOfWork for TestUnitOfWork {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    fn posts(&self) -> Arc<dyn PostRepository> {
        self.posts.clone()
    }

    fn comments(&self) -> Arc<dyn CommentRepository> {
        self.comments.clone()
    }

    fn categories(&self) -> Arc<dyn CategoryRepository> {
        self.categories.clone()
    }

    async fn delete_user_cascade(&self, _user_id: Uuid) -> AppResult<CascadeReport> {
        self.cascade.clone().ok_or(AppError::NotFound)
    }

    async fn delete_post_with_comments(&self, _post_id: Uuid) -> AppResult<Post> {
        self.deleted_post.clone().ok_or(AppError::NotFound)
    }

    async fn transaction<F, T>(&self, _f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        Err(AppError::internal("Transactions not supported in test mock"))
    }
}

pub fn user(role: UserRole) -> User {
    let id = Uuid::new_v4();
    User {
        id,
        email: format!("{}@example.com", id.simple()),
        password_hash: "hashed".to_string(),
        name: format!("{} user", role),
        role,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn actor_of(user: &User) -> Actor {
    Actor::from(user)
}

pub fn reader() -> Actor {
    Actor::authenticated(Uuid::new_v4(), UserRole::Reader)
}

pub fn author() -> Actor {
    Actor::authenticated(Uuid::new_v4(), UserRole::Author)
}

pub fn admin() -> Actor {
    Actor::authenticated(Uuid::new_v4(), UserRole::Admin)
}

pub fn post(author_id: Uuid, published: bool) -> Post {
    Post {
        id: Uuid::new_v4(),
        title: "Ownership in practice".to_string(),
        content: "Borrowing rules explained with examples.".to_string(),
        excerpt: None,
        tags: vec!["rust".to_string()],
        image: None,
        published,
        category_id: None,
        author_id,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn comment(author_id: Uuid, post_id: Uuid, approved: bool) -> Comment {
    Comment {
        id: Uuid::new_v4(),
        content: "Thanks for writing this up".to_string(),
        post_id,
        author_id,
        approved,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn category(name: &str) -> Category {
    Category {
        id: Uuid::new_v4(),
        name: name.to_string(),
        slug: blog_api::domain::slugify(name),
        created_at: Utc::now(),
    }
}
