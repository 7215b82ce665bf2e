//! List query construction shared by every paginated repository.
//!
//! [`build_page`] turns a page window, an optional search term and a
//! pre-built filter into a [`FetchPlan`]; [`fetch_page`] runs the page query
//! and the count query concurrently against the same condition.

use std::collections::HashMap;

use sea_orm::sea_query::{Expr, Func, IntoCondition, Order};
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, EntityTrait, FromQueryResult, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Select,
};
use uuid::Uuid;

use super::entities::{comment, post, user};
use crate::errors::AppResult;
use crate::types::{Page, PageRequest};

/// An entity that can be listed through the shared builder.
pub trait Listable: EntityTrait {
    /// Columns matched by the free-text search, OR-combined
    fn search_columns() -> Vec<Self::Column>;

    /// Column used for the default newest-first ordering
    fn created_column() -> Self::Column;

    /// Tie-breaker so equal timestamps page deterministically
    fn id_column() -> Self::Column;
}

impl Listable for post::Entity {
    fn search_columns() -> Vec<post::Column> {
        vec![post::Column::Title, post::Column::Content]
    }

    fn created_column() -> post::Column {
        post::Column::CreatedAt
    }

    fn id_column() -> post::Column {
        post::Column::Id
    }
}

impl Listable for user::Entity {
    fn search_columns() -> Vec<user::Column> {
        vec![user::Column::Name, user::Column::Email]
    }

    fn created_column() -> user::Column {
        user::Column::CreatedAt
    }

    fn id_column() -> user::Column {
        user::Column::Id
    }
}

impl Listable for comment::Entity {
    fn search_columns() -> Vec<comment::Column> {
        vec![comment::Column::Content]
    }

    fn created_column() -> comment::Column {
        comment::Column::CreatedAt
    }

    fn id_column() -> comment::Column {
        comment::Column::Id
    }
}

/// Bounded, deterministic description of one list query.
#[derive(Debug, Clone)]
pub struct FetchPlan<E: EntityTrait> {
    pub condition: Condition,
    pub request: PageRequest,
    pub order: Vec<(E::Column, Order)>,
}

impl<E: Listable> FetchPlan<E> {
    /// Replace the default ordering, keeping the id tie-breaker.
    pub fn ordered_by(mut self, column: E::Column, order: Order) -> Self {
        self.order = vec![(column, order), (E::id_column(), Order::Asc)];
        self
    }

    pub fn offset(&self) -> u64 {
        self.request.offset()
    }

    pub fn limit(&self) -> u64 {
        self.request.limit()
    }

    /// Unpaged select carrying only the filter, used for counting.
    pub fn filtered(&self) -> Select<E> {
        E::find().filter(self.condition.clone())
    }

    /// Select for the requested page.
    pub fn select(&self) -> Select<E> {
        let mut select = self
            .filtered()
            .offset(self.offset())
            .limit(self.limit());
        for (column, order) in &self.order {
            select = select.order_by(*column, order.clone());
        }
        select
    }
}

/// Build a fetch plan: `filter AND (search over the entity's text columns)`,
/// newest first.
pub fn build_page<E: Listable>(
    request: PageRequest,
    search: Option<&str>,
    filter: Condition,
) -> FetchPlan<E> {
    let mut condition = Condition::all().add(filter);
    if let Some(term) = search.map(str::trim).filter(|t| !t.is_empty()) {
        condition = condition.add(search_condition::<E>(term));
    }

    FetchPlan {
        condition,
        request,
        order: vec![
            (E::created_column(), Order::Desc),
            (E::id_column(), Order::Desc),
        ],
    }
}

/// Case-insensitive substring match over every search column.
pub fn search_condition<E: Listable>(term: &str) -> Condition {
    let pattern = format!("%{}%", escape_like(&term.to_lowercase()));
    E::search_columns()
        .into_iter()
        .fold(Condition::any(), |any, column| {
            any.add(
                Expr::expr(Func::lower(Expr::col((E::default(), column))))
                    .like(pattern.clone()),
            )
        })
}

fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Run the page query and the count query concurrently.
///
/// The two statements are not in one transaction, so a concurrent write can
/// make `total` disagree with the returned rows by a few items.
pub async fn fetch_page<E, C>(db: &C, plan: &FetchPlan<E>) -> AppResult<Page<E::Model>>
where
    E: Listable,
    E::Model: Sync,
    C: ConnectionTrait,
{
    let (items, total) = tokio::try_join!(plan.select().all(db), plan.filtered().count(db))?;
    Ok(Page::new(items, total, plan.request))
}

#[derive(Debug, FromQueryResult)]
struct CountRow {
    key: Uuid,
    count: i64,
}

/// `SELECT key, COUNT(*) ... WHERE condition GROUP BY key` as a map.
pub async fn count_grouped<E, C>(
    db: &C,
    key: E::Column,
    condition: impl IntoCondition,
) -> AppResult<HashMap<Uuid, u64>>
where
    E: EntityTrait,
    C: ConnectionTrait,
{
    let rows = E::find()
        .select_only()
        .column_as(key, "key")
        .column_as(Expr::col((E::default(), key)).count(), "count")
        .filter(condition.into_condition())
        .filter(key.is_not_null())
        .group_by(key)
        .into_model::<CountRow>()
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|row| (row.key, u64::try_from(row.count).unwrap_or(0)))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DbBackend, QueryTrait};

    fn sql<E: Listable>(plan: &FetchPlan<E>) -> String {
        plan.select().build(DbBackend::Postgres).to_string()
    }

    #[test]
    fn test_plan_applies_window_and_newest_first() {
        let plan = build_page::<post::Entity>(PageRequest::new(3, 10), None, Condition::all());
        let sql = sql(&plan);

        assert!(sql.contains("LIMIT 10"), "{sql}");
        assert!(sql.contains("OFFSET 20"), "{sql}");
        assert!(sql.contains(r#"ORDER BY "posts"."created_at" DESC"#), "{sql}");
    }

    #[test]
    fn test_huge_page_offset_fits_bigint() {
        let plan = build_page::<post::Entity>(PageRequest::new(u64::MAX, 10), None, Condition::all());
        let sql = sql(&plan);

        assert!(i64::try_from(plan.offset()).is_ok());
        assert!(sql.contains("OFFSET 9223372036854775800"), "{sql}");
    }

    #[test]
    fn test_search_is_case_insensitive_over_all_columns() {
        let plan = build_page::<post::Entity>(PageRequest::default(), Some("  RuSt "), Condition::all());
        let sql = sql(&plan);

        assert!(sql.contains(r#"LOWER("posts"."title") LIKE '%rust%'"#), "{sql}");
        assert!(sql.contains(r#"LOWER("posts"."content") LIKE '%rust%'"#), "{sql}");
        assert!(sql.contains(" OR "), "{sql}");
    }

    #[test]
    fn test_search_is_and_combined_with_filter() {
        let filter = Condition::all().add(post::Column::Published.eq(true));
        let plan = build_page::<post::Entity>(PageRequest::default(), Some("axum"), filter);
        let sql = sql(&plan);

        assert!(sql.contains(r#""posts"."published" = TRUE"#), "{sql}");
        assert!(sql.contains(" AND "), "{sql}");
    }

    #[test]
    fn test_blank_search_adds_nothing() {
        let plan = build_page::<user::Entity>(PageRequest::default(), Some("   "), Condition::all());
        assert!(!sql(&plan).contains("LIKE"));
    }

    #[test]
    fn test_like_wildcards_are_escaped() {
        assert_eq!(escape_like("50%_off"), r"50\%\_off");
    }

    #[test]
    fn test_custom_ordering() {
        let plan = build_page::<user::Entity>(PageRequest::default(), Some("jo"), Condition::all())
            .ordered_by(user::Column::Name, Order::Asc);
        let sql = sql(&plan);

        assert!(sql.contains(r#"ORDER BY "users"."name" ASC"#), "{sql}");
        assert!(sql.contains(r#"LOWER("users"."email") LIKE '%jo%'"#), "{sql}");
    }
}
