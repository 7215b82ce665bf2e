//! Infrastructure layer - External systems integration
//!
//! Database connection and migrations, repositories, the unit of work and
//! post image storage.

pub mod db;
pub mod repositories;
pub mod storage;
pub mod unit_of_work;

pub use db::{Database, Migrator};
pub use repositories::{
    CategoryRepository, CategoryStore, CommentRepository, CommentStore, PostRepository, PostStore,
    UserRepository, UserStore,
};
pub use storage::{ImageStore, ImageUpload, LocalImageStore};
pub use unit_of_work::{CascadeReport, Persistence, TransactionContext, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{
    MockCategoryRepository, MockCommentRepository, MockPostRepository, MockUserRepository,
};
#[cfg(any(test, feature = "test-utils"))]
pub use storage::MockImageStore;
