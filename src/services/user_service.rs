//! User administration service.
//!
//! Every operation here is admin-only; the policy also forbids an admin from
//! changing their own role or deleting their own account.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::views::comment_responses;
use crate::config::{
    DEFAULT_PAGE_SIZE, MIN_USER_SEARCH_LENGTH, STATS_RECENT_REGISTRATION_DAYS,
    STATS_RECENT_USERS_LIMIT, USER_DETAIL_RECENT_LIMIT,
};
use crate::domain::{
    authorize, Action, Actor, Resource, ResourceKind, User, UserAnalytics, UserCommentEntry,
    UserDetail, UserFilter, UserPostEntry, UserResponse, UserRole, UserStats, UserSummary,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{CascadeReport, UnitOfWork};
use crate::types::{ListQuery, Page, PageRequest};

/// Statistics payload: raw totals plus derived ratios
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserStatsReport {
    pub stats: UserStats,
    pub analytics: UserAnalytics,
}

#[async_trait]
pub trait UserService: Send + Sync {
    /// Paginated user list with post and comment counts
    async fn list_users(&self, actor: &Actor, query: ListQuery) -> AppResult<Page<UserSummary>>;

    async fn stats(&self, actor: &Actor) -> AppResult<UserStatsReport>;

    /// Name/email search; the term must be at least two characters
    async fn search_users(
        &self,
        actor: &Actor,
        term: String,
        limit: Option<u64>,
    ) -> AppResult<Vec<UserResponse>>;

    async fn get_user_detail(&self, actor: &Actor, id: Uuid) -> AppResult<UserDetail>;

    async fn update_role(&self, actor: &Actor, id: Uuid, role: String) -> AppResult<User>;

    /// Remove a user together with their posts and all affected comments
    async fn delete_user(&self, actor: &Actor, id: Uuid) -> AppResult<(User, CascadeReport)>;
}

pub struct UserManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> UserManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn load_target(&self, id: Uuid) -> AppResult<User> {
        self.uow.users().find_by_id(id).await?.ok_or_not_found()
    }
}

fn require_admin(actor: &Actor) -> AppResult<()> {
    authorize(actor, Action::ListAdmin, &Resource::unowned(ResourceKind::User))
}

#[async_trait]
impl<U: UnitOfWork> UserService for UserManager<U> {
    async fn list_users(&self, actor: &Actor, query: ListQuery) -> AppResult<Page<UserSummary>> {
        require_admin(actor)?;

        // Unknown role values are ignored rather than rejected.
        let filter = UserFilter {
            search: query.search_term(),
            role: query.role().and_then(|r| r.parse::<UserRole>().ok()),
        };
        let page = self
            .uow
            .users()
            .list(filter, query.page_request(DEFAULT_PAGE_SIZE))
            .await?;

        let ids: Vec<Uuid> = page.items.iter().map(|u| u.id).collect();
        let posts = self.uow.posts();
        let comments = self.uow.comments();
        let (post_counts, comment_counts) = tokio::try_join!(
            posts.count_by_authors(ids.clone()),
            comments.count_by_authors(ids),
        )?;

        Ok(page.map(|user| UserSummary {
            post_count: post_counts.get(&user.id).copied().unwrap_or(0),
            comment_count: comment_counts.get(&user.id).copied().unwrap_or(0),
            user: user.into(),
        }))
    }

    async fn stats(&self, actor: &Actor) -> AppResult<UserStatsReport> {
        require_admin(actor)?;

        let since = Utc::now() - Duration::days(STATS_RECENT_REGISTRATION_DAYS);
        let totals = self
            .uow
            .users()
            .platform_totals(since, STATS_RECENT_USERS_LIMIT)
            .await?;
        let analytics = UserAnalytics::from_totals(&totals);

        Ok(UserStatsReport {
            stats: UserStats {
                total_users: totals.users,
                total_posts: totals.posts,
                total_comments: totals.comments,
                role_distribution: totals.role_distribution,
                recent_registrations: totals.recent_registrations,
                recent_users: totals.recent_users.into_iter().map(Into::into).collect(),
            },
            analytics,
        })
    }

    async fn search_users(
        &self,
        actor: &Actor,
        term: String,
        limit: Option<u64>,
    ) -> AppResult<Vec<UserResponse>> {
        require_admin(actor)?;

        let term = term.trim().to_string();
        if term.chars().count() < MIN_USER_SEARCH_LENGTH {
            return Err(AppError::validation(format!(
                "Search query must be at least {} characters long",
                MIN_USER_SEARCH_LENGTH
            )));
        }

        let limit = PageRequest::new(1, limit.unwrap_or(DEFAULT_PAGE_SIZE)).limit();
        let users = self.uow.users().search(term, limit).await?;
        Ok(users.into_iter().map(Into::into).collect())
    }

    async fn get_user_detail(&self, actor: &Actor, id: Uuid) -> AppResult<UserDetail> {
        require_admin(actor)?;
        let user = self.load_target(id).await?;

        let posts = self.uow.posts();
        let comments = self.uow.comments();
        let (recent_posts, recent_comments, post_totals, comment_totals) = tokio::try_join!(
            posts.recent_by_author(id, USER_DETAIL_RECENT_LIMIT),
            comments.recent_by_author(id, USER_DETAIL_RECENT_LIMIT),
            posts.count_by_authors(vec![id]),
            comments.count_by_authors(vec![id]),
        )?;

        let post_ids: Vec<Uuid> = recent_posts.iter().map(|p| p.id).collect();
        let per_post: HashMap<Uuid, u64> = if post_ids.is_empty() {
            HashMap::new()
        } else {
            comments.count_by_posts(post_ids, false).await?
        };

        let posts = recent_posts
            .into_iter()
            .map(|post| UserPostEntry {
                comment_count: per_post.get(&post.id).copied().unwrap_or(0),
                id: post.id,
                title: post.title,
                published: post.published,
                created_at: post.created_at,
            })
            .collect();

        let comments = comment_responses(self.uow.as_ref(), recent_comments, true)
            .await?
            .into_iter()
            .filter_map(|c| {
                c.post.map(|post| UserCommentEntry {
                    id: c.id,
                    content: c.content,
                    approved: c.approved,
                    created_at: c.created_at,
                    post,
                })
            })
            .collect();

        Ok(UserDetail {
            post_count: post_totals.get(&id).copied().unwrap_or(0),
            comment_count: comment_totals.get(&id).copied().unwrap_or(0),
            user: user.into(),
            posts,
            comments,
        })
    }

    async fn update_role(&self, actor: &Actor, id: Uuid, role: String) -> AppResult<User> {
        require_admin(actor)?;
        let role = role.trim().parse::<UserRole>()?;
        let target = self.load_target(id).await?;
        authorize(actor, Action::Update, &Resource::user(target.id))?;

        let updated = self.uow.users().update_role(id, role).await?;
        tracing::info!(
            admin_id = ?actor.id(),
            user_id = %id,
            from = %target.role,
            to = %updated.role,
            "User role changed"
        );
        Ok(updated)
    }

    async fn delete_user(&self, actor: &Actor, id: Uuid) -> AppResult<(User, CascadeReport)> {
        require_admin(actor)?;
        let target = self.load_target(id).await?;
        authorize(actor, Action::Delete, &Resource::user(target.id))?;

        let report = self.uow.delete_user_cascade(id).await?;
        tracing::info!(
            admin_id = ?actor.id(),
            user_id = %id,
            email = %target.email,
            posts_deleted = report.posts_deleted,
            comments_deleted = report.comments_deleted,
            "User deleted"
        );
        Ok((target, report))
    }
}
