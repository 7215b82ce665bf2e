//! Seed command - Demo accounts, categories, posts and comments.
//!
//! Safe to run repeatedly: accounts are matched by email, categories by slug
//! and posts by author and title. Comments are only added to posts created in
//! the same run.

use uuid::Uuid;

use crate::config::Config;
use crate::domain::{
    slugify, Category, NewCategory, NewComment, NewPost, NewUser, Password, PostFilter,
    PostVisibility, User, UserRole,
};
use crate::errors::{AppError, AppResult};
use crate::infra::{Database, Persistence, UnitOfWork};

struct SeedUser {
    email: &'static str,
    password: &'static str,
    name: &'static str,
    role: UserRole,
}

const USERS: [SeedUser; 3] = [
    SeedUser {
        email: "admin@blog.com",
        password: "admin123",
        name: "Admin User",
        role: UserRole::Admin,
    },
    SeedUser {
        email: "author@blog.com",
        password: "author123",
        name: "John Author",
        role: UserRole::Author,
    },
    SeedUser {
        email: "reader@blog.com",
        password: "reader123",
        name: "Jane Reader",
        role: UserRole::Reader,
    },
];

const CATEGORIES: [&str; 3] = ["Announcements", "Web Development", "Technology"];

const WELCOME_CONTENT: &str = "This is the first post on our blogging platform. \
We're excited to share knowledge and insights with our readers.\n\n\
## Features:\n- Role-based access control\n- Moderated comments\n- Categories and tags\n\n\
Stay tuned for more updates!";

const TRENDS_CONTENT: &str = "Web development continues to evolve at a rapid pace. \
In this post, we'll explore the trends shaping the future of the web.\n\n\
### Key Trends:\n1. **Serverless Architecture**\n2. **JAMstack**\n3. **WebAssembly**\n4. **AI Integration**";

/// Execute the seed command
pub async fn execute(config: Config) -> AppResult<()> {
    tracing::info!("Seeding database...");

    let db = Database::connect(&config)
        .await
        .map_err(|e| AppError::internal(format!("Database connection failed: {}", e)))?;
    let uow = Persistence::new(db.get_connection());

    let mut users = Vec::with_capacity(USERS.len());
    for seed in &USERS {
        users.push(ensure_user(&uow, seed).await?);
    }
    let (admin, author, reader) = (&users[0], &users[1], &users[2]);

    let mut categories = Vec::with_capacity(CATEGORIES.len());
    for name in CATEGORIES {
        categories.push(ensure_category(&uow, name).await?);
    }

    let welcome = NewPost {
        title: "Welcome to Our Blog".to_string(),
        content: WELCOME_CONTENT.to_string(),
        excerpt: Some("Welcome to our new blogging platform".to_string()),
        tags: vec![
            "welcome".to_string(),
            "introduction".to_string(),
            "blogging".to_string(),
        ],
        image: None,
        published: true,
        category_id: Some(categories[0].id),
        author_id: author.id,
    };
    if let Some(post_id) = ensure_post(&uow, welcome).await? {
        add_comment(
            &uow,
            post_id,
            reader.id,
            "Great first post! Looking forward to reading more content.",
        )
        .await?;
    }

    let trends = NewPost {
        title: "The Future of Web Development".to_string(),
        content: TRENDS_CONTENT.to_string(),
        excerpt: Some("Exploring the latest trends in web development".to_string()),
        tags: vec![
            "web-development".to_string(),
            "trends".to_string(),
            "technology".to_string(),
        ],
        image: None,
        published: true,
        category_id: Some(categories[1].id),
        author_id: admin.id,
    };
    if let Some(post_id) = ensure_post(&uow, trends).await? {
        add_comment(
            &uow,
            post_id,
            author.id,
            "Very insightful article about web development trends.",
        )
        .await?;
    }

    tracing::info!("Database seeded successfully");
    for seed in &USERS {
        println!("{} credentials: {} / {}", seed.role, seed.email, seed.password);
    }

    Ok(())
}

async fn ensure_user(uow: &Persistence, seed: &SeedUser) -> AppResult<User> {
    if let Some(user) = uow.users().find_by_email(seed.email).await? {
        tracing::debug!(email = seed.email, "User already present");
        return Ok(user);
    }

    let user = uow
        .users()
        .create(NewUser {
            email: seed.email.to_string(),
            password_hash: Password::new(seed.password)?.into_string(),
            name: seed.name.to_string(),
            role: seed.role,
        })
        .await?;
    tracing::info!(email = seed.email, role = %seed.role, "Created user");
    Ok(user)
}

async fn ensure_category(uow: &Persistence, name: &str) -> AppResult<Category> {
    if let Some(category) = uow.categories().find_by_slug(&slugify(name)).await? {
        return Ok(category);
    }
    let category = uow.categories().create(NewCategory::from_name(name)).await?;
    tracing::info!(slug = %category.slug, "Created category");
    Ok(category)
}

/// Create the post unless the author already has one with the same title.
async fn ensure_post(uow: &Persistence, post: NewPost) -> AppResult<Option<Uuid>> {
    let existing = uow
        .posts()
        .list_all(PostFilter {
            author_id: Some(post.author_id),
            ..PostFilter::visible_to(PostVisibility::All)
        })
        .await?;
    if existing.iter().any(|p| p.title == post.title) {
        tracing::debug!(title = %post.title, "Post already present");
        return Ok(None);
    }

    let created = uow.posts().create(post).await?;
    tracing::info!(post_id = %created.id, title = %created.title, "Created post");
    Ok(Some(created.id))
}

async fn add_comment(
    uow: &Persistence,
    post_id: Uuid,
    author_id: Uuid,
    content: &str,
) -> AppResult<()> {
    uow.comments()
        .create(NewComment {
            content: content.to_string(),
            post_id,
            author_id,
            approved: true,
        })
        .await?;
    Ok(())
}
