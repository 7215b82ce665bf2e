//! Post body extractor accepting JSON or multipart form data.
//!
//! Multipart bodies carry the optional image in the `postsImage` field; the
//! remaining fields mirror the JSON body. Repeated `tags` fields form a list,
//! a single one is treated like the JSON string form.

use axum::{
    async_trait,
    extract::{FromRequest, Multipart, Request},
    http::header::CONTENT_TYPE,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::POST_IMAGE_FIELD;
use crate::domain::TagsInput;
use crate::errors::AppError;
use crate::infra::ImageUpload;
use crate::services::{PostDraft, PostUpdate};

/// Post fields as sent by clients; every field is optional at this stage.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostPayload {
    #[schema(example = "Getting started with Rust")]
    pub title: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    /// A list, a JSON-encoded list or a comma-separated string
    #[schema(value_type = Option<Vec<String>>)]
    pub tags: Option<TagsInput>,
    pub category_id: Option<Uuid>,
    pub published: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct PostForm {
    pub payload: PostPayload,
    pub image: Option<ImageUpload>,
}

impl PostForm {
    /// Input for creation; title and content are mandatory.
    pub fn into_draft(self) -> Result<PostDraft, AppError> {
        let (Some(title), Some(content)) = (self.payload.title, self.payload.content) else {
            return Err(AppError::validation("Title and content are required"));
        };

        Ok(PostDraft {
            title,
            content,
            excerpt: self.payload.excerpt,
            tags: self.payload.tags.unwrap_or_default(),
            category_id: self.payload.category_id,
            image: self.image,
        })
    }

    pub fn into_update(self) -> PostUpdate {
        PostUpdate {
            title: self.payload.title,
            content: self.payload.content,
            excerpt: self.payload.excerpt,
            tags: self.payload.tags,
            category_id: self.payload.category_id,
            published: self.payload.published,
            image: self.image,
        }
    }
}

fn is_multipart(req: &Request) -> bool {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.starts_with("multipart/form-data"))
        .unwrap_or(false)
}

fn parse_bool(field: &str, value: &str) -> Result<bool, AppError> {
    match value.trim() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(AppError::validation(format!("{} must be true or false", field))),
    }
}

fn parse_category(value: &str) -> Result<Option<Uuid>, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    Uuid::parse_str(value)
        .map(Some)
        .map_err(|_| AppError::validation("Invalid category id"))
}

async fn read_multipart(mut multipart: Multipart) -> Result<PostForm, AppError> {
    let mut form = PostForm::default();
    let mut tags: Vec<String> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();

        if name == POST_IMAGE_FIELD {
            let content_type = field.content_type().unwrap_or_default().to_string();
            let file_name = field.file_name().map(str::to_string);
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            if !bytes.is_empty() {
                form.image = Some(ImageUpload {
                    bytes: bytes.to_vec(),
                    content_type,
                    file_name,
                });
            }
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        match name.as_str() {
            "title" => form.payload.title = Some(value),
            "content" => form.payload.content = Some(value),
            "excerpt" => form.payload.excerpt = Some(value),
            "tags" | "tags[]" => tags.push(value),
            "categoryId" => form.payload.category_id = parse_category(&value)?,
            "published" => form.payload.published = Some(parse_bool("published", &value)?),
            _ => tracing::debug!(field = %name, "Ignoring unknown form field"),
        }
    }

    form.payload.tags = match tags.len() {
        0 => None,
        1 => tags.pop().map(TagsInput::Text),
        _ => Some(TagsInput::List(tags)),
    };

    Ok(form)
}

#[async_trait]
impl<S> FromRequest<S> for PostForm
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if is_multipart(&req) {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            return read_multipart(multipart).await;
        }

        let Json(payload) = Json::<PostPayload>::from_request(req, state)
            .await
            .map_err(|e| AppError::validation(e.body_text()))?;

        Ok(PostForm {
            payload,
            image: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_requires_title_and_content() {
        let form = PostForm {
            payload: PostPayload {
                title: Some("Hello".to_string()),
                ..Default::default()
            },
            image: None,
        };
        let err = form.into_draft().unwrap_err();
        assert_eq!(err.to_string(), "Title and content are required");
    }

    #[test]
    fn test_form_values() {
        assert!(parse_bool("published", "true").unwrap());
        assert!(!parse_bool("published", "0").unwrap());
        assert!(parse_bool("published", "yes").is_err());
        assert_eq!(parse_category("  ").unwrap(), None);
        assert!(parse_category("nope").is_err());
    }

    #[test]
    fn test_json_tags_accept_string_or_list() {
        let payload: PostPayload =
            serde_json::from_str(r#"{"title":"t","tags":"a, b"}"#).unwrap();
        assert_eq!(payload.tags, Some(TagsInput::Text("a, b".to_string())));

        let payload: PostPayload = serde_json::from_str(r#"{"tags":["a","b"]}"#).unwrap();
        assert_eq!(
            payload.tags,
            Some(TagsInput::List(vec!["a".to_string(), "b".to_string()]))
        );
    }
}
