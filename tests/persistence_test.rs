//! Persistence tests against sea-orm's mock database.

use std::sync::Arc;

use chrono::Utc;
use sea_orm::{
    DatabaseBackend, DatabaseConnection, DbErr, MockDatabase, MockExecResult, Transaction,
};
use uuid::Uuid;

use blog_api::domain::NewCategory;
use blog_api::errors::{AppError, AppResult};
use blog_api::infra::repositories::entities::{category, post, user};
use blog_api::infra::{CascadeReport, CategoryRepository, CategoryStore, Persistence, UnitOfWork};

fn user_model(id: Uuid) -> user::Model {
    user::Model {
        id,
        email: "author@blog.com".to_string(),
        password_hash: "hashed".to_string(),
        name: "John Author".to_string(),
        role: "AUTHOR".to_string(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn post_model(author_id: Uuid) -> post::Model {
    post::Model {
        id: Uuid::new_v4(),
        title: "Welcome to Our Blog".to_string(),
        content: "This is the first post on our platform.".to_string(),
        excerpt: None,
        tags: vec!["welcome".to_string()],
        image: Some("http://localhost/uploads/cover.png".to_string()),
        published: true,
        category_id: None,
        author_id,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn affected(rows: u64) -> MockExecResult {
    MockExecResult {
        last_insert_id: 0,
        rows_affected: rows,
    }
}

/// Run the user cascade and hand back the recorded transaction log.
async fn cascade(
    db: DatabaseConnection,
    user_id: Uuid,
) -> (AppResult<CascadeReport>, Vec<Transaction>) {
    let db = Arc::new(db);
    let result = Persistence::new(db.clone())
        .delete_user_cascade(user_id)
        .await;

    let Ok(db) = Arc::try_unwrap(db) else {
        panic!("connection is still shared");
    };
    (result, db.into_transaction_log())
}

fn statements(log: &[Transaction]) -> Vec<String> {
    log.iter()
        .flat_map(|txn| txn.statements().iter().map(|stmt| stmt.sql.clone()))
        .collect()
}

fn position(sql: &[String], needle: impl Fn(&str) -> bool) -> usize {
    sql.iter()
        .position(|s| needle(s))
        .unwrap_or_else(|| panic!("statement not found in {:?}", sql))
}

#[tokio::test]
async fn test_user_cascade_counts_both_comment_sets() {
    let user_id = Uuid::new_v4();

    // Own comment, one comment by someone else on the user's post, the post, the user.
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![user_model(user_id)]])
        .append_query_results([vec![post_model(user_id)]])
        .append_exec_results([affected(1), affected(1), affected(1), affected(1)])
        .into_connection();

    let (result, _) = cascade(db, user_id).await;
    let report = result.unwrap();

    assert_eq!(report.deleted_user, user_id);
    assert_eq!(report.posts_deleted, 1);
    assert_eq!(report.comments_deleted, 2);
}

#[tokio::test]
async fn test_user_cascade_deletes_children_first_in_one_transaction() {
    let user_id = Uuid::new_v4();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![user_model(user_id)]])
        .append_query_results([vec![post_model(user_id)]])
        .append_exec_results([affected(2), affected(1), affected(1), affected(1)])
        .into_connection();

    let (result, log) = cascade(db, user_id).await;
    assert!(result.is_ok());
    assert_eq!(log.len(), 1, "{:?}", log);

    let sql = statements(&log);
    assert_eq!(sql.first().map(String::as_str), Some("BEGIN"));
    assert_eq!(sql.last().map(String::as_str), Some("COMMIT"));

    let own_comments = position(&sql, |s| {
        s.starts_with(r#"DELETE FROM "comments""#) && s.contains(r#""author_id""#)
    });
    let comments_on_posts = position(&sql, |s| {
        s.starts_with(r#"DELETE FROM "comments""#) && s.contains(r#""post_id""#)
    });
    let posts = position(&sql, |s| s.starts_with(r#"DELETE FROM "posts""#));
    let user = position(&sql, |s| s.starts_with(r#"DELETE FROM "users""#));

    assert!(own_comments < comments_on_posts, "{:?}", sql);
    assert!(comments_on_posts < posts, "{:?}", sql);
    assert!(posts < user, "{:?}", sql);
}

#[tokio::test]
async fn test_user_cascade_rolls_back_when_a_step_fails() {
    let user_id = Uuid::new_v4();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![user_model(user_id)]])
        .append_query_results([vec![post_model(user_id)]])
        .append_exec_results([affected(1)])
        .append_exec_errors([DbErr::Custom("connection reset".to_string())])
        .into_connection();

    let (result, log) = cascade(db, user_id).await;
    assert!(result.is_err());

    let sql = statements(&log);
    assert_eq!(sql.first().map(String::as_str), Some("BEGIN"));
    assert_eq!(sql.last().map(String::as_str), Some("ROLLBACK"));
    assert!(!sql.iter().any(|s| s == "COMMIT"), "{:?}", sql);
    assert!(!sql.iter().any(|s| s.starts_with(r#"DELETE FROM "posts""#)), "{:?}", sql);
    assert!(!sql.iter().any(|s| s.starts_with(r#"DELETE FROM "users""#)), "{:?}", sql);
}

#[tokio::test]
async fn test_user_cascade_for_missing_user() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<user::Model>::new()])
        .into_connection();

    let (result, _) = cascade(db, Uuid::new_v4()).await;

    assert!(matches!(result, Err(AppError::NotFound)));
}

#[tokio::test]
async fn test_post_deletion_returns_removed_post() {
    let existing = post_model(Uuid::new_v4());
    let post_id = existing.id;

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![existing]])
        .append_exec_results([affected(3), affected(1)])
        .into_connection();

    let deleted = Persistence::new(Arc::new(db))
        .delete_post_with_comments(post_id)
        .await
        .unwrap();

    assert_eq!(deleted.id, post_id);
    assert!(deleted.image.is_some());
}

#[tokio::test]
async fn test_existing_slug_conflicts() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![category::Model {
            id: Uuid::new_v4(),
            name: "Technology".to_string(),
            slug: "technology".to_string(),
            created_at: Utc::now(),
        }]])
        .into_connection();

    let result = CategoryStore::new(Arc::new(db))
        .create(NewCategory::from_name("Technology"))
        .await;

    assert!(matches!(result, Err(AppError::Conflict(msg)) if msg == "Category already exists"));
}
