//! User repository.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, Order};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, FromQueryResult,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use super::entities::comment::Entity as CommentEntity;
use super::entities::post::Entity as PostEntity;
use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use super::query::{build_page, fetch_page};
use crate::domain::{NewUser, PlatformTotals, RoleDistribution, User, UserFilter, UserRole};
use crate::errors::{AppError, AppResult};
use crate::types::{Page, PageRequest};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    async fn find_by_ids(&self, ids: Vec<Uuid>) -> AppResult<Vec<User>>;

    async fn create(&self, user: NewUser) -> AppResult<User>;

    async fn update_role(&self, id: Uuid, role: UserRole) -> AppResult<User>;

    /// Paginated list, newest first
    async fn list(&self, filter: UserFilter, page: PageRequest) -> AppResult<Page<User>>;

    /// Name/email search ordered by name
    async fn search(&self, term: String, limit: u64) -> AppResult<Vec<User>>;

    /// Platform-wide totals for the statistics view
    async fn platform_totals(
        &self,
        registered_since: DateTime<Utc>,
        recent_limit: u64,
    ) -> AppResult<PlatformTotals>;
}

pub struct UserStore {
    db: Arc<DatabaseConnection>,
}

impl UserStore {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[derive(Debug, FromQueryResult)]
struct RoleCount {
    role: String,
    count: i64,
}

fn filter_condition(filter: &UserFilter) -> Condition {
    let mut condition = Condition::all();
    if let Some(role) = filter.role {
        condition = condition.add(user::Column::Role.eq(role.as_str()));
    }
    condition
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let result = UserEntity::find_by_id(id).one(self.db.as_ref()).await?;
        Ok(result.map(User::from))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(self.db.as_ref())
            .await?;

        Ok(result.map(User::from))
    }

    async fn find_by_ids(&self, ids: Vec<Uuid>) -> AppResult<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = UserEntity::find()
            .filter(user::Column::Id.is_in(ids))
            .all(self.db.as_ref())
            .await?;

        Ok(models.into_iter().map(User::from).collect())
    }

    async fn create(&self, new_user: NewUser) -> AppResult<User> {
        let now = Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(new_user.email),
            password_hash: Set(new_user.password_hash),
            name: Set(new_user.name),
            role: Set(new_user.role.into()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(self.db.as_ref()).await?;
        Ok(User::from(model))
    }

    async fn update_role(&self, id: Uuid, role: UserRole) -> AppResult<User> {
        let existing = UserEntity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: ActiveModel = existing.into();
        active.role = Set(role.into());
        active.updated_at = Set(Utc::now());

        let model = active.update(self.db.as_ref()).await?;
        Ok(User::from(model))
    }

    async fn list(&self, filter: UserFilter, page: PageRequest) -> AppResult<Page<User>> {
        let plan = build_page::<UserEntity>(page, filter.search.as_deref(), filter_condition(&filter));
        Ok(fetch_page(self.db.as_ref(), &plan).await?.map(User::from))
    }

    async fn search(&self, term: String, limit: u64) -> AppResult<Vec<User>> {
        let plan = build_page::<UserEntity>(PageRequest::new(1, limit), Some(&term), Condition::all())
            .ordered_by(user::Column::Name, Order::Asc);
        let models = plan.select().all(self.db.as_ref()).await?;

        Ok(models.into_iter().map(User::from).collect())
    }

    async fn platform_totals(
        &self,
        registered_since: DateTime<Utc>,
        recent_limit: u64,
    ) -> AppResult<PlatformTotals> {
        let role_counts = UserEntity::find()
            .select_only()
            .column(user::Column::Role)
            .column_as(Expr::col((UserEntity, user::Column::Id)).count(), "count")
            .group_by(user::Column::Role)
            .into_model::<RoleCount>()
            .all(self.db.as_ref());
        let recent_users = UserEntity::find()
            .order_by_desc(user::Column::CreatedAt)
            .limit(recent_limit)
            .all(self.db.as_ref());
        let recent_registrations = UserEntity::find()
            .filter(user::Column::CreatedAt.gte(registered_since))
            .count(self.db.as_ref());

        let (role_counts, recent_users, recent_registrations, posts, comments) = tokio::try_join!(
            role_counts,
            recent_users,
            recent_registrations,
            PostEntity::find().count(self.db.as_ref()),
            CommentEntity::find().count(self.db.as_ref()),
        )?;

        let mut role_distribution = RoleDistribution::default();
        let mut users = 0;
        for row in role_counts {
            let count = u64::try_from(row.count).unwrap_or(0);
            users += count;
            match row.role.parse::<UserRole>() {
                Ok(role) => role_distribution.record(role, count),
                Err(_) => tracing::warn!(role = %row.role, "Unknown stored role in statistics"),
            }
        }

        Ok(PlatformTotals {
            users,
            posts,
            comments,
            role_distribution,
            recent_registrations,
            recent_users: recent_users.into_iter().map(User::from).collect(),
        })
    }
}
