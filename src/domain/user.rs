//! User domain entity and related types.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{ROLE_ADMIN, ROLE_AUTHOR, ROLE_READER, VALID_ROLES};
use crate::errors::AppError;

/// User roles enumeration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    #[default]
    Reader,
    Author,
    Admin,
}

impl UserRole {
    /// All roles, in privilege order
    pub const ALL: [UserRole; 3] = [UserRole::Reader, UserRole::Author, UserRole::Admin];

    /// Check if this role has admin privileges
    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }

    /// Check if this role may write posts
    pub fn can_author(&self) -> bool {
        matches!(self, UserRole::Author | UserRole::Admin)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Reader => ROLE_READER,
            UserRole::Author => ROLE_AUTHOR,
            UserRole::Admin => ROLE_ADMIN,
        }
    }
}

/// Strict parsing: anything outside the three known roles is rejected.
impl FromStr for UserRole {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ROLE_READER => Ok(UserRole::Reader),
            ROLE_AUTHOR => Ok(UserRole::Author),
            ROLE_ADMIN => Ok(UserRole::Admin),
            _ => Err(AppError::validation(format!(
                "Invalid role. Valid roles: {}",
                VALID_ROLES.join(", ")
            ))),
        }
    }
}

impl From<UserRole> for String {
    fn from(role: UserRole) -> Self {
        role.as_str().to_string()
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Check if user has admin role
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Data needed to persist a new user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub role: UserRole,
}

/// Filters for the administrative user list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilter {
    pub search: Option<String>,
    pub role: Option<UserRole>,
}

/// User response (safe to return to client)
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    /// Unique user identifier
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    /// User email address
    #[schema(example = "reader@blog.com")]
    pub email: String,
    /// User display name
    #[schema(example = "Jane Reader")]
    pub name: String,
    /// User role
    pub role: UserRole,
    /// Account creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            role: user.role,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Author reference embedded in post and comment payloads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct AuthorSummary {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl AuthorSummary {
    /// Summary with email, used on post payloads
    pub fn with_email(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: Some(user.email.clone()),
        }
    }

    /// Summary without email, used on comment payloads
    pub fn public(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: None,
        }
    }
}

/// User list entry with activity counts
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    #[serde(flatten)]
    pub user: UserResponse,
    pub post_count: u64,
    pub comment_count: u64,
}

/// Recent post entry in a user detail view
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserPostEntry {
    pub id: Uuid,
    pub title: String,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub comment_count: u64,
}

/// Recent comment entry in a user detail view
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserCommentEntry {
    pub id: Uuid,
    pub content: String,
    pub approved: bool,
    pub created_at: DateTime<Utc>,
    pub post: super::PostReference,
}

/// Administrative view of a single user
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDetail {
    #[serde(flatten)]
    pub user: UserResponse,
    pub posts: Vec<UserPostEntry>,
    pub comments: Vec<UserCommentEntry>,
    pub post_count: u64,
    pub comment_count: u64,
}

/// Number of users per role
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub struct RoleDistribution {
    pub reader: u64,
    pub author: u64,
    pub admin: u64,
}

impl RoleDistribution {
    pub fn record(&mut self, role: UserRole, count: u64) {
        match role {
            UserRole::Reader => self.reader += count,
            UserRole::Author => self.author += count,
            UserRole::Admin => self.admin += count,
        }
    }
}

/// Raw platform totals gathered by the user repository
#[derive(Debug, Clone, Default)]
pub struct PlatformTotals {
    pub users: u64,
    pub posts: u64,
    pub comments: u64,
    pub role_distribution: RoleDistribution,
    pub recent_registrations: u64,
    pub recent_users: Vec<User>,
}

/// Aggregated platform statistics
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub total_users: u64,
    pub total_posts: u64,
    pub total_comments: u64,
    pub role_distribution: RoleDistribution,
    pub recent_registrations: u64,
    pub recent_users: Vec<UserResponse>,
}

/// Derived ratios, rounded to two decimals
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserAnalytics {
    pub posts_per_user: f64,
    pub comments_per_user: f64,
    pub comments_per_post: f64,
}

impl UserAnalytics {
    pub fn from_totals(totals: &PlatformTotals) -> Self {
        Self {
            posts_per_user: ratio(totals.posts, totals.users),
            comments_per_user: ratio(totals.comments, totals.users),
            comments_per_post: ratio(totals.comments, totals.posts),
        }
    }
}

fn ratio(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    (numerator as f64 / denominator as f64 * 100.0).round() / 100.0
}
