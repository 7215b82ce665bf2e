//! Post service tests.

mod common;

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use mockall::predicate::eq;
use uuid::Uuid;

use blog_api::domain::{
    Actor, NewPost, Post, PostChanges, PostFilter, PostVisibility, TagsInput, UserRole,
};
use blog_api::errors::AppError;
use blog_api::infra::{ImageStore, ImageUpload, MockImageStore};
use blog_api::services::{PostDraft, PostManager, PostService, PostUpdate};
use blog_api::types::{ListQuery, Page, PageRequest};

use common::{actor_of, author, post, user, Repos, TestUnitOfWork};

const STORED_URL: &str = "http://localhost/uploads/new.png";

fn manager(uow: TestUnitOfWork, images: MockImageStore) -> PostManager<TestUnitOfWork> {
    let images: Arc<dyn ImageStore> = Arc::new(images);
    PostManager::new(Arc::new(uow), images)
}

fn persisted(new_post: NewPost) -> Post {
    Post {
        id: Uuid::new_v4(),
        title: new_post.title,
        content: new_post.content,
        excerpt: new_post.excerpt,
        tags: new_post.tags,
        image: new_post.image,
        published: new_post.published,
        category_id: new_post.category_id,
        author_id: new_post.author_id,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn draft() -> PostDraft {
    PostDraft {
        title: "  Async Rust  ".to_string(),
        content: "Futures do nothing unless polled.".to_string(),
        tags: TagsInput::Text("rust, axum, rust".to_string()),
        ..Default::default()
    }
}

fn png() -> ImageUpload {
    ImageUpload {
        bytes: vec![0x89, 0x50, 0x4e, 0x47],
        content_type: "image/png".to_string(),
        file_name: Some("cover.png".to_string()),
    }
}

#[tokio::test]
async fn test_anonymous_cannot_read_draft() {
    let hidden = post(Uuid::new_v4(), false);
    let id = hidden.id;

    let mut repos = Repos::default();
    repos
        .posts
        .expect_find_by_id()
        .with(eq(id))
        .returning(move |_| Ok(Some(hidden.clone())));
    repos.comments.expect_list_all().never();

    let result = manager(TestUnitOfWork::new(repos), MockImageStore::new())
        .get_post(&Actor::Anonymous, id)
        .await;

    assert!(matches!(result, Err(AppError::NotFound)));
}

#[tokio::test]
async fn test_reader_cannot_create_post() {
    let reader = user(UserRole::Reader);
    let mut repos = Repos::default();
    repos.posts.expect_create().never();

    let result = manager(TestUnitOfWork::new(repos), MockImageStore::new())
        .create_post(&actor_of(&reader), draft())
        .await;

    assert!(matches!(result, Err(AppError::Forbidden)));
}

#[tokio::test]
async fn test_author_post_starts_unpublished() {
    let writer = user(UserRole::Author);
    let embedded = writer.clone();

    let mut repos = Repos::default();
    repos
        .posts
        .expect_create()
        .withf(|new_post: &NewPost| {
            !new_post.published
                && new_post.title == "Async Rust"
                && new_post.tags == vec!["rust".to_string(), "axum".to_string()]
        })
        .times(1)
        .returning(|new_post| Ok(persisted(new_post)));
    repos
        .users
        .expect_find_by_ids()
        .returning(move |_| Ok(vec![embedded.clone()]));

    let created = manager(TestUnitOfWork::new(repos), MockImageStore::new())
        .create_post(&actor_of(&writer), draft())
        .await
        .unwrap();

    assert!(!created.published);
    assert_eq!(created.author_id, writer.id);
    let embedded_author = created.author.expect("author is embedded");
    assert_eq!(embedded_author.name, writer.name);
    assert_eq!(embedded_author.email.as_deref(), Some(writer.email.as_str()));
}

#[tokio::test]
async fn test_admin_post_is_published_immediately() {
    let admin = user(UserRole::Admin);
    let embedded = admin.clone();

    let mut repos = Repos::default();
    repos
        .posts
        .expect_create()
        .withf(|new_post: &NewPost| new_post.published)
        .returning(|new_post| Ok(persisted(new_post)));
    repos
        .users
        .expect_find_by_ids()
        .returning(move |_| Ok(vec![embedded.clone()]));

    let created = manager(TestUnitOfWork::new(repos), MockImageStore::new())
        .create_post(&actor_of(&admin), draft())
        .await
        .unwrap();

    assert!(created.published);
}

#[tokio::test]
async fn test_failed_create_removes_uploaded_image() {
    let writer = user(UserRole::Author);

    let mut repos = Repos::default();
    repos
        .posts
        .expect_create()
        .returning(|_| Err(AppError::internal("insert failed")));

    let mut images = MockImageStore::new();
    images
        .expect_store()
        .times(1)
        .returning(|_| Ok(STORED_URL.to_string()));
    images
        .expect_delete()
        .withf(|url| url.to_string() == STORED_URL)
        .times(1)
        .returning(|_| Ok(()));

    let result = manager(TestUnitOfWork::new(repos), images)
        .create_post(
            &actor_of(&writer),
            PostDraft {
                image: Some(png()),
                ..draft()
            },
        )
        .await;

    assert!(matches!(result, Err(AppError::Internal(_))));
}

#[tokio::test]
async fn test_unknown_category_is_rejected_before_upload() {
    let writer = user(UserRole::Author);

    let mut repos = Repos::default();
    repos.categories.expect_find_by_id().returning(|_| Ok(None));
    repos.posts.expect_create().never();

    let mut images = MockImageStore::new();
    images.expect_store().never();

    let result = manager(TestUnitOfWork::new(repos), images)
        .create_post(
            &actor_of(&writer),
            PostDraft {
                category_id: Some(Uuid::new_v4()),
                image: Some(png()),
                ..draft()
            },
        )
        .await;

    match result {
        Err(AppError::Validation(msg)) => assert_eq!(msg, "Category does not exist"),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[tokio::test]
async fn test_other_author_cannot_update_published_post() {
    let published = post(Uuid::new_v4(), true);
    let id = published.id;

    let mut repos = Repos::default();
    repos
        .posts
        .expect_find_by_id()
        .returning(move |_| Ok(Some(published.clone())));
    repos.posts.expect_update().never();

    let result = manager(TestUnitOfWork::new(repos), MockImageStore::new())
        .update_post(
            &author(),
            id,
            PostUpdate {
                title: Some("Hijacked".to_string()),
                ..Default::default()
            },
        )
        .await;

    assert!(matches!(result, Err(AppError::Forbidden)));
}

#[tokio::test]
async fn test_replacing_image_removes_previous_file() {
    let writer = user(UserRole::Author);
    let embedded = writer.clone();
    let old_url = "http://localhost/uploads/old.png".to_string();

    let mut existing = post(writer.id, false);
    existing.image = Some(old_url.clone());
    let id = existing.id;

    let mut repos = Repos::default();
    let found = existing.clone();
    repos
        .posts
        .expect_find_by_id()
        .returning(move |_| Ok(Some(found.clone())));
    repos
        .posts
        .expect_update()
        .withf(|_, changes: &PostChanges| changes.image.as_deref() == Some(STORED_URL))
        .times(1)
        .returning(move |_, changes| {
            let mut updated = existing.clone();
            updated.image = changes.image;
            Ok(updated)
        });
    repos
        .users
        .expect_find_by_ids()
        .returning(move |_| Ok(vec![embedded.clone()]));

    let mut images = MockImageStore::new();
    images
        .expect_store()
        .returning(|_| Ok(STORED_URL.to_string()));
    images
        .expect_delete()
        .withf(move |url| url.to_string() == old_url)
        .times(1)
        .returning(|_| Ok(()));

    let updated = manager(TestUnitOfWork::new(repos), images)
        .update_post(
            &actor_of(&writer),
            id,
            PostUpdate {
                image: Some(png()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.image.as_deref(), Some(STORED_URL));
}

#[tokio::test]
async fn test_delete_post_removes_image() {
    let writer = user(UserRole::Author);
    let mut existing = post(writer.id, true);
    existing.image = Some(STORED_URL.to_string());
    let id = existing.id;

    let mut repos = Repos::default();
    let found = existing.clone();
    repos
        .posts
        .expect_find_by_id()
        .returning(move |_| Ok(Some(found.clone())));

    let mut images = MockImageStore::new();
    images
        .expect_delete()
        .withf(|url| url.to_string() == STORED_URL)
        .times(1)
        .returning(|_| Ok(()));

    let uow = TestUnitOfWork::new(repos).with_deleted_post(existing);
    manager(uow, images)
        .delete_post(&actor_of(&writer), id)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_anonymous_list_sees_published_only() {
    let listed = post(Uuid::new_v4(), true);
    let listed_id = listed.id;

    let mut repos = Repos::default();
    repos
        .posts
        .expect_list()
        .withf(|filter: &PostFilter, page: &PageRequest| {
            filter.visibility == PostVisibility::PublishedOnly
                && filter.tag.as_deref() == Some("rust")
                && page.page() == 2
        })
        .times(1)
        .returning(move |_, page| Ok(Page::new(vec![listed.clone()], 11, page)));
    repos.users.expect_find_by_ids().returning(|_| Ok(Vec::new()));
    repos
        .comments
        .expect_count_by_posts()
        .withf(|_, approved_only: &bool| *approved_only)
        .returning(move |_, _| Ok(HashMap::from([(listed_id, 4)])));

    let query = ListQuery {
        page: Some("2".to_string()),
        tag: Some(" rust ".to_string()),
        ..Default::default()
    };
    let page = manager(TestUnitOfWork::new(repos), MockImageStore::new())
        .list_posts(&Actor::Anonymous, query)
        .await
        .unwrap();

    assert_eq!(page.items[0].comment_count, Some(4));
    let meta = page.meta();
    assert_eq!(meta.current_page, 2);
    assert_eq!(meta.total_pages, 2);
}
