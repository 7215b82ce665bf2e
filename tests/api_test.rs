//! HTTP tests for the router.
//!
//! The real services run over mockall repositories, so each test states
//! exactly which rows the request is allowed to touch.

mod common;

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::Utc;
use sea_orm::{DatabaseBackend, MockDatabase};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use blog_api::api::create_router;
use blog_api::domain::{NewUser, PostFilter, PostVisibility, User, UserRole};
use blog_api::infra::{Database, ImageStore, MockImageStore};
use blog_api::services::{
    issue_token, Authenticator, CategoryManager, CommentManager, PostManager, Services,
    UserManager,
};
use blog_api::types::{Page, PageRequest};
use blog_api::{AppState, Config};

use common::{post, user, Repos, TestUnitOfWork};

fn app(repos: Repos) -> Router {
    let config = Config::for_tests();
    let uow = Arc::new(TestUnitOfWork::new(repos));
    let images: Arc<dyn ImageStore> = Arc::new(MockImageStore::new());

    let services = Services::new(
        Arc::new(Authenticator::new(uow.clone(), config.clone())),
        Arc::new(UserManager::new(uow.clone())),
        Arc::new(PostManager::new(uow.clone(), images)),
        Arc::new(CommentManager::new(uow.clone())),
        Arc::new(CategoryManager::new(uow)),
    );
    let database = Database::from_connection(
        MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
    );

    create_router(AppState::new(&services, Arc::new(database)), &config)
}

fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

#[tokio::test]
async fn test_unknown_route_returns_error_body() {
    let (status, body) = send(
        app(Repos::default()),
        request(Method::GET, "/does-not-exist", None, None),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NOT_FOUND");
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_malformed_id_returns_error_body() {
    let mut repos = Repos::default();
    repos.posts.expect_find_by_id().never();

    let (status, body) = send(
        app(repos),
        request(Method::GET, "/api/posts/not-a-uuid", None, None),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BAD_REQUEST");
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_invalid_token_is_rejected_on_public_route() {
    let mut repos = Repos::default();
    repos.posts.expect_list().never();

    let (status, body) = send(
        app(repos),
        request(Method::GET, "/api/posts", Some("not-a-jwt"), None),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid or expired token");
}

#[tokio::test]
async fn test_malformed_authorization_header() {
    let app = app(Repos::default());
    let request = Request::builder()
        .uri("/api/posts")
        .header(header::AUTHORIZATION, "Basic abc")
        .body(Body::empty())
        .unwrap();

    let (status, _) = send(app, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_profile_requires_authentication() {
    let (status, body) = send(
        app(Repos::default()),
        request(Method::GET, "/api/auth/profile", None, None),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_profile_with_valid_token() {
    let me = user(UserRole::Author);
    let token = issue_token(&me, &Config::for_tests()).unwrap();

    let mut repos = Repos::default();
    let found = me.clone();
    repos
        .users
        .expect_find_by_id()
        .returning(move |_| Ok(Some(found.clone())));

    let (status, body) = send(
        app(repos),
        request(Method::GET, "/api/auth/profile", Some(&token), None),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["email"], me.email.as_str());
    assert_eq!(body["user"]["role"], "AUTHOR");
    assert!(body["user"].get("password_hash").is_none());
    assert!(body["user"].get("passwordHash").is_none());
}

#[tokio::test]
async fn test_token_for_deleted_user_is_rejected() {
    let gone = user(UserRole::Reader);
    let token = issue_token(&gone, &Config::for_tests()).unwrap();

    let mut repos = Repos::default();
    repos.users.expect_find_by_id().returning(|_| Ok(None));

    let (status, _) = send(
        app(repos),
        request(Method::GET, "/api/comments/mine", Some(&token), None),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_validates_email() {
    let mut repos = Repos::default();
    repos.users.expect_create().never();

    let (status, body) = send(
        app(repos),
        request(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({ "email": "not-an-email", "password": "secret1", "name": "Jo" })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid email format");
}

#[tokio::test]
async fn test_register_accepts_requested_role() {
    let mut repos = Repos::default();
    repos.users.expect_find_by_email().returning(|_| Ok(None));
    repos
        .users
        .expect_create()
        .withf(|new_user: &NewUser| {
            new_user.role == UserRole::Admin && new_user.email == "boss@blog.com"
        })
        .times(1)
        .returning(|new_user| {
            Ok(User {
                id: Uuid::new_v4(),
                email: new_user.email,
                password_hash: new_user.password_hash,
                name: new_user.name,
                role: new_user.role,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            })
        });

    let (status, body) = send(
        app(repos),
        request(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({
                "email": "Boss@Blog.com",
                "password": "secret1",
                "name": "Boss",
                "role": "ADMIN"
            })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["role"], "ADMIN");
    assert!(body["token"].is_string());
}

#[tokio::test]
async fn test_register_rejects_unknown_role() {
    let mut repos = Repos::default();
    repos.users.expect_create().never();

    let (status, body) = send(
        app(repos),
        request(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({
                "email": "boss@blog.com",
                "password": "secret1",
                "name": "Boss",
                "role": "OWNER"
            })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_post_list_shape() {
    let listed = post(Uuid::new_v4(), true);

    let mut repos = Repos::default().with_empty_lookups();
    repos
        .posts
        .expect_list()
        .withf(|filter: &PostFilter, page: &PageRequest| {
            filter.visibility == PostVisibility::PublishedOnly
                && page.page() == 2
                && page.limit() == 5
        })
        .returning(move |_, page| Ok(Page::new(vec![listed.clone()], 6, page)));

    let (status, body) = send(
        app(repos),
        request(Method::GET, "/api/posts?page=2&limit=5", None, None),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["posts"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["posts"][0]["commentCount"], 0);
    assert_eq!(
        body["pagination"],
        json!({
            "currentPage": 2,
            "totalPages": 2,
            "total": 6,
            "limit": 5,
            "hasNext": false,
            "hasPrev": true
        })
    );
}

#[tokio::test]
async fn test_reader_cannot_list_users() {
    let reader = user(UserRole::Reader);
    let token = issue_token(&reader, &Config::for_tests()).unwrap();

    let mut repos = Repos::default();
    let found = reader.clone();
    repos
        .users
        .expect_find_by_id()
        .returning(move |_| Ok(Some(found.clone())));
    repos.users.expect_list().never();

    let (status, body) = send(
        app(repos),
        request(Method::GET, "/api/users", Some(&token), None),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "FORBIDDEN");
}

#[tokio::test]
async fn test_health_reports_unreachable_database() {
    let (status, body) = send(
        app(Repos::default()),
        request(Method::GET, "/api/health", None, None),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Database not reachable");
}
