//! Assembly of API payloads from domain rows.
//!
//! Related rows are loaded in one batch per relation, never per item.

use std::collections::HashMap;

use uuid::Uuid;

use crate::domain::{
    AuthorSummary, CategorySummary, Comment, CommentResponse, Post, PostReference, PostResponse,
};
use crate::errors::AppResult;
use crate::infra::UnitOfWork;

fn unique_ids(ids: impl Iterator<Item = Uuid>) -> Vec<Uuid> {
    let mut seen = Vec::new();
    for id in ids {
        if !seen.contains(&id) {
            seen.push(id);
        }
    }
    seen
}

/// Embed author (with email) and category; add approved-comment counts when
/// `with_counts` is set.
pub(crate) async fn post_responses<U: UnitOfWork>(
    uow: &U,
    posts: Vec<Post>,
    with_counts: bool,
) -> AppResult<Vec<PostResponse>> {
    if posts.is_empty() {
        return Ok(Vec::new());
    }

    let author_ids = unique_ids(posts.iter().map(|p| p.author_id));
    let category_ids = unique_ids(posts.iter().filter_map(|p| p.category_id));
    let post_ids: Vec<Uuid> = posts.iter().map(|p| p.id).collect();

    let users = uow.users();
    let categories = uow.categories();
    let comments = uow.comments();
    let (authors, categories, counts) = tokio::try_join!(
        users.find_by_ids(author_ids),
        async {
            if category_ids.is_empty() {
                Ok(Vec::new())
            } else {
                categories.find_by_ids(category_ids).await
            }
        },
        async {
            if with_counts {
                comments.count_by_posts(post_ids, true).await
            } else {
                Ok(HashMap::new())
            }
        },
    )?;

    let authors: HashMap<Uuid, AuthorSummary> = authors
        .iter()
        .map(|u| (u.id, AuthorSummary::with_email(u)))
        .collect();
    let categories: HashMap<Uuid, CategorySummary> = categories
        .iter()
        .map(|c| (c.id, CategorySummary::from(c)))
        .collect();

    Ok(posts
        .into_iter()
        .map(|post| {
            let author = authors.get(&post.author_id).cloned();
            let category = post.category_id.and_then(|id| categories.get(&id).cloned());
            let comment_count = with_counts.then(|| counts.get(&post.id).copied().unwrap_or(0));
            PostResponse {
                author,
                category,
                comment_count,
                ..PostResponse::from(post)
            }
        })
        .collect())
}

pub(crate) async fn post_response<U: UnitOfWork>(uow: &U, post: Post) -> AppResult<PostResponse> {
    let mut responses = post_responses(uow, vec![post.clone()], false).await?;
    Ok(responses.pop().unwrap_or_else(|| PostResponse::from(post)))
}

/// Embed the author `{id, name}` and, when `with_post` is set, the post
/// `{id, title}`.
pub(crate) async fn comment_responses<U: UnitOfWork>(
    uow: &U,
    comments: Vec<Comment>,
    with_post: bool,
) -> AppResult<Vec<CommentResponse>> {
    if comments.is_empty() {
        return Ok(Vec::new());
    }

    let author_ids = unique_ids(comments.iter().map(|c| c.author_id));
    let post_ids = unique_ids(comments.iter().map(|c| c.post_id));

    let users = uow.users();
    let posts = uow.posts();
    let (authors, posts) = tokio::try_join!(users.find_by_ids(author_ids), async {
        if with_post {
            posts.find_by_ids(post_ids).await
        } else {
            Ok(Vec::new())
        }
    })?;

    let authors: HashMap<Uuid, AuthorSummary> = authors
        .iter()
        .map(|u| (u.id, AuthorSummary::public(u)))
        .collect();
    let posts: HashMap<Uuid, PostReference> = posts
        .iter()
        .map(|p| (p.id, PostReference::from(p)))
        .collect();

    Ok(comments
        .into_iter()
        .map(|comment| {
            let author = authors.get(&comment.author_id).cloned();
            let post = posts.get(&comment.post_id).cloned();
            CommentResponse {
                author,
                post,
                ..CommentResponse::from(comment)
            }
        })
        .collect())
}

pub(crate) async fn comment_response<U: UnitOfWork>(
    uow: &U,
    comment: Comment,
) -> AppResult<CommentResponse> {
    let mut responses = comment_responses(uow, vec![comment.clone()], true).await?;
    Ok(responses.pop().unwrap_or_else(|| CommentResponse::from(comment)))
}
