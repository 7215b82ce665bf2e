//! Tag input normalization.
//!
//! Clients send tags as a JSON list, a JSON-encoded list inside a string, or
//! a comma-separated string. All of them end up as a trimmed, de-duplicated
//! list in first-seen order.

use serde::Deserialize;
use utoipa::ToSchema;

use crate::errors::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum TagsInput {
    List(Vec<String>),
    Text(String),
}

impl Default for TagsInput {
    fn default() -> Self {
        TagsInput::List(Vec::new())
    }
}

impl TagsInput {
    /// Normalize into a clean tag list.
    ///
    /// # Errors
    /// Validation error for a string that looks like a JSON array but does
    /// not parse as a list of strings.
    pub fn normalize(self) -> AppResult<Vec<String>> {
        let raw = match self {
            TagsInput::List(items) => items,
            TagsInput::Text(text) => parse_text(&text)?,
        };
        Ok(clean(raw))
    }
}

fn parse_text(text: &str) -> AppResult<Vec<String>> {
    let trimmed = text.trim();
    if trimmed.starts_with('[') {
        return serde_json::from_str::<Vec<String>>(trimmed)
            .map_err(|_| AppError::validation("Malformed tags"));
    }
    Ok(trimmed.split(',').map(str::to_string).collect())
}

/// Trim, drop empties and duplicates, keep first occurrence order.
pub fn clean(raw: Vec<String>) -> Vec<String> {
    let mut tags: Vec<String> = Vec::with_capacity(raw.len());
    for tag in raw {
        let tag = tag.trim();
        if !tag.is_empty() && !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
        }
    }
    tags
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> TagsInput {
        TagsInput::Text(s.to_string())
    }

    #[test]
    fn test_comma_separated_string() {
        assert_eq!(
            text(" rust, web ,,axum ").normalize().unwrap(),
            vec!["rust", "web", "axum"]
        );
    }

    #[test]
    fn test_json_array_string() {
        assert_eq!(
            text(r#"["rust", " web "]"#).normalize().unwrap(),
            vec!["rust", "web"]
        );
    }

    #[test]
    fn test_list_input() {
        let input = TagsInput::List(vec!["a".into(), "b".into(), "a".into(), " ".into()]);
        assert_eq!(input.normalize().unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_malformed_json_is_rejected() {
        assert!(matches!(
            text("[\"rust\", ").normalize(),
            Err(AppError::Validation(_))
        ));
        assert!(text("[1, 2]").normalize().is_err());
    }

    #[test]
    fn test_empty_inputs() {
        assert!(text("").normalize().unwrap().is_empty());
        assert!(TagsInput::default().normalize().unwrap().is_empty());
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let once = text("b, a, b").normalize().unwrap();
        let twice = TagsInput::List(once.clone()).normalize().unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_deserializes_both_shapes() {
        let list: TagsInput = serde_json::from_str(r#"["x","y"]"#).unwrap();
        assert_eq!(list, TagsInput::List(vec!["x".into(), "y".into()]));
        let text: TagsInput = serde_json::from_str(r#""x,y""#).unwrap();
        assert_eq!(text, TagsInput::Text("x,y".into()));
    }
}
