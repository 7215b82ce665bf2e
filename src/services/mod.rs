//! Application services layer - Use cases and business logic.
//!
//! Services consult the access policy, validate input and orchestrate the
//! repositories through the Unit of Work. Handlers only see the traits.

mod auth_service;
mod category_service;
mod comment_service;
pub mod container;
mod post_service;
mod user_service;
mod views;

pub use container::{ServiceContainer, Services};

pub use auth_service::{
    issue_token, verify_token, AuthService, AuthSession, Authenticator, Claims, Registration,
};
pub use category_service::{CategoryManager, CategoryService};
pub use comment_service::{CommentManager, CommentService, CommentUpdate};
pub use post_service::{PostDraft, PostManager, PostService, PostUpdate};
pub use user_service::{UserManager, UserService, UserStatsReport};

#[cfg(any(test, feature = "test-utils"))]
pub use container::MockServiceContainer;
