//! Domain layer - Core business entities and logic
//!
//! Entities, value objects and the access policy. Nothing here touches the
//! database or HTTP.

pub mod access;
pub mod category;
pub mod comment;
pub mod password;
pub mod post;
pub mod tags;
pub mod user;

pub use access::{
    authorize, decide, Action, Actor, CommentVisibility, Decision, DenyReason, PostVisibility,
    Resource, ResourceKind,
};
pub use category::{
    slugify, Category, CategoryDetail, CategoryResponse, CategorySummary, CategoryWithCount,
    NewCategory,
};
pub use comment::{Comment, CommentChanges, CommentFilter, CommentResponse, NewComment};
pub use password::Password;
pub use post::{NewPost, Post, PostChanges, PostDetail, PostFilter, PostReference, PostResponse};
pub use tags::TagsInput;
pub use user::{
    AuthorSummary, NewUser, PlatformTotals, RoleDistribution, User, UserAnalytics,
    UserCommentEntry, UserDetail, UserFilter, UserPostEntry, UserResponse, UserRole, UserStats,
    UserSummary,
};
