//! Comment service tests.

mod common;

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use blog_api::domain::{
    Actor, Comment, CommentChanges, CommentFilter, CommentVisibility, NewComment, UserRole,
};
use blog_api::errors::AppError;
use blog_api::services::{CommentManager, CommentService, CommentUpdate};
use blog_api::types::{ListQuery, Page, PageRequest};

use common::{actor_of, comment, post, reader, user, Repos, TestUnitOfWork};

fn manager(uow: TestUnitOfWork) -> CommentManager<TestUnitOfWork> {
    CommentManager::new(Arc::new(uow))
}

fn persisted(new_comment: NewComment) -> Comment {
    Comment {
        id: Uuid::new_v4(),
        content: new_comment.content,
        post_id: new_comment.post_id,
        author_id: new_comment.author_id,
        approved: new_comment.approved,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

#[tokio::test]
async fn test_comment_on_hidden_post_is_not_found() {
    let draft = post(Uuid::new_v4(), false);
    let post_id = draft.id;

    let mut repos = Repos::default();
    repos
        .posts
        .expect_find_by_id()
        .returning(move |_| Ok(Some(draft.clone())));
    repos.comments.expect_create().never();

    let result = manager(TestUnitOfWork::new(repos))
        .create_comment(&reader(), post_id, "Nice".to_string())
        .await;

    assert!(matches!(result, Err(AppError::NotFound)));
}

#[tokio::test]
async fn test_anonymous_cannot_comment() {
    let result = manager(TestUnitOfWork::new(Repos::default()))
        .create_comment(&Actor::Anonymous, Uuid::new_v4(), "Nice".to_string())
        .await;

    assert!(matches!(result, Err(AppError::Unauthorized)));
}

#[tokio::test]
async fn test_blank_comment_is_rejected() {
    let result = manager(TestUnitOfWork::new(Repos::default()))
        .create_comment(&reader(), Uuid::new_v4(), "   ".to_string())
        .await;

    match result {
        Err(AppError::Validation(msg)) => assert_eq!(msg, "Comment content is required"),
        other => panic!("unexpected result: {:?}", other),
    }
}

async fn create_as(role: UserRole) -> bool {
    let commenter = user(role);
    let target = post(Uuid::new_v4(), true);
    let post_id = target.id;

    let mut repos = Repos::default().with_empty_lookups();
    let found = target.clone();
    repos
        .posts
        .expect_find_by_id()
        .returning(move |_| Ok(Some(found.clone())));
    repos
        .comments
        .expect_create()
        .withf(|new_comment: &NewComment| new_comment.content == "Great read")
        .times(1)
        .returning(|new_comment| Ok(persisted(new_comment)));

    let created = manager(TestUnitOfWork::new(repos))
        .create_comment(&actor_of(&commenter), post_id, "  Great read ".to_string())
        .await
        .unwrap();

    assert_eq!(created.post_id, post_id);
    assert_eq!(created.author_id, commenter.id);
    created.approved
}

#[tokio::test]
async fn test_reader_comment_awaits_moderation() {
    assert!(!create_as(UserRole::Reader).await);
}

#[tokio::test]
async fn test_admin_comment_is_approved() {
    assert!(create_as(UserRole::Admin).await);
}

#[tokio::test]
async fn test_non_admin_cannot_approve() {
    let writer = user(UserRole::Reader);
    let existing = comment(writer.id, Uuid::new_v4(), false);
    let id = existing.id;

    let mut repos = Repos::default().with_empty_lookups();
    let found = existing.clone();
    repos
        .comments
        .expect_find_by_id()
        .returning(move |_| Ok(Some(found.clone())));
    repos
        .comments
        .expect_update()
        .withf(|_, changes: &CommentChanges| {
            changes.approved.is_none() && changes.content.as_deref() == Some("Edited")
        })
        .times(1)
        .returning(move |_, changes| {
            let mut updated = existing.clone();
            updated.content = changes.content.unwrap_or_default();
            Ok(updated)
        });

    let updated = manager(TestUnitOfWork::new(repos))
        .update_comment(
            &actor_of(&writer),
            id,
            CommentUpdate {
                content: Some("Edited".to_string()),
                approved: Some(true),
            },
        )
        .await
        .unwrap();

    assert!(!updated.approved);
    assert_eq!(updated.content, "Edited");
}

#[tokio::test]
async fn test_admin_approves_comment() {
    let admin = user(UserRole::Admin);
    let existing = comment(Uuid::new_v4(), Uuid::new_v4(), false);
    let id = existing.id;

    let mut repos = Repos::default().with_empty_lookups();
    let found = existing.clone();
    repos
        .comments
        .expect_find_by_id()
        .returning(move |_| Ok(Some(found.clone())));
    repos
        .comments
        .expect_update()
        .withf(|_, changes: &CommentChanges| changes.approved == Some(true))
        .returning(move |_, _| {
            let mut updated = existing.clone();
            updated.approved = true;
            Ok(updated)
        });

    let updated = manager(TestUnitOfWork::new(repos))
        .update_comment(
            &actor_of(&admin),
            id,
            CommentUpdate {
                approved: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert!(updated.approved);
}

#[tokio::test]
async fn test_pending_queue_is_admin_only() {
    let mut repos = Repos::default();
    repos.comments.expect_list().never();

    let result = manager(TestUnitOfWork::new(repos))
        .pending_comments(&reader(), ListQuery::default())
        .await;

    assert!(matches!(result, Err(AppError::Forbidden)));
}

#[tokio::test]
async fn test_post_comments_include_own_pending() {
    let viewer = user(UserRole::Reader);
    let viewer_id = viewer.id;
    let target = post(Uuid::new_v4(), true);
    let post_id = target.id;
    let own_pending = comment(viewer_id, post_id, false);

    let mut repos = Repos::default().with_empty_lookups();
    repos
        .posts
        .expect_find_by_id()
        .returning(move |_| Ok(Some(target.clone())));
    repos
        .comments
        .expect_list()
        .withf(move |filter: &CommentFilter, page: &PageRequest| {
            filter.post_id == Some(post_id)
                && filter.visibility == CommentVisibility::ApprovedOrAuthoredBy(viewer_id)
                && page.limit() == 20
        })
        .times(1)
        .returning(move |_, page| Ok(Page::new(vec![own_pending.clone()], 1, page)));

    let page = manager(TestUnitOfWork::new(repos))
        .list_for_post(&actor_of(&viewer), post_id, ListQuery::default())
        .await
        .unwrap();

    assert_eq!(page.items.len(), 1);
    assert!(!page.items[0].approved);
}

#[tokio::test]
async fn test_owner_deletes_comment() {
    let writer = user(UserRole::Reader);
    let existing = comment(writer.id, Uuid::new_v4(), true);
    let id = existing.id;

    let mut repos = Repos::default();
    repos
        .comments
        .expect_find_by_id()
        .returning(move |_| Ok(Some(existing.clone())));
    repos
        .comments
        .expect_delete()
        .times(1)
        .returning(|_| Ok(()));

    manager(TestUnitOfWork::new(repos))
        .delete_comment(&actor_of(&writer), id)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_other_reader_cannot_delete_comment() {
    let existing = comment(Uuid::new_v4(), Uuid::new_v4(), true);
    let id = existing.id;

    let mut repos = Repos::default();
    repos
        .comments
        .expect_find_by_id()
        .returning(move |_| Ok(Some(existing.clone())));
    repos.comments.expect_delete().never();

    let result = manager(TestUnitOfWork::new(repos))
        .delete_comment(&reader(), id)
        .await;

    assert!(matches!(result, Err(AppError::Forbidden)));
}
