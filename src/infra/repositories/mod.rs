//! Repository layer - Data access abstraction
//!
//! One trait per aggregate, a `*Store` implementation over sea-orm, and a
//! mockall mock behind the `test-utils` feature.

mod category_repository;
mod comment_repository;
pub mod entities;
mod post_repository;
pub mod query;
mod user_repository;

pub use category_repository::{CategoryRepository, CategoryStore};
pub use comment_repository::{CommentRepository, CommentStore};
pub use post_repository::{PostRepository, PostStore};
pub use user_repository::{UserRepository, UserStore};

#[cfg(any(test, feature = "test-utils"))]
pub use category_repository::MockCategoryRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use comment_repository::MockCommentRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use post_repository::MockPostRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
