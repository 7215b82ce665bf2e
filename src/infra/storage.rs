//! Post image storage.
//!
//! Services only see the [`ImageStore`] contract: `store` returns a public
//! URL, `delete` takes that URL back. [`LocalImageStore`] keeps files under
//! the configured upload directory, which the router serves statically.

use std::path::PathBuf;

use async_trait::async_trait;
use uuid::Uuid;

use crate::config::{Config, ALLOWED_IMAGE_TYPES, MAX_IMAGE_SIZE_BYTES};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// An uploaded image as received from a multipart form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub bytes: Vec<u8>,
    pub content_type: String,
    pub file_name: Option<String>,
}

impl ImageUpload {
    /// Reject oversized payloads and anything that is not an accepted image type.
    pub fn validate(&self) -> AppResult<()> {
        if self.bytes.is_empty() {
            return Err(AppError::validation("Image file is empty"));
        }
        if self.bytes.len() > MAX_IMAGE_SIZE_BYTES {
            return Err(AppError::validation(format!(
                "Image must be at most {} MB",
                MAX_IMAGE_SIZE_BYTES / (1024 * 1024)
            )));
        }
        if !ALLOWED_IMAGE_TYPES.contains(&self.content_type.as_str()) {
            return Err(AppError::validation(format!(
                "Unsupported image type. Allowed: {}",
                ALLOWED_IMAGE_TYPES.join(", ")
            )));
        }
        Ok(())
    }

    fn extension(&self) -> &'static str {
        match self.content_type.as_str() {
            "image/png" => "png",
            "image/gif" => "gif",
            "image/webp" => "webp",
            _ => "jpg",
        }
    }
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Persist the image and return its public URL.
    async fn store(&self, upload: ImageUpload) -> AppResult<String>;

    /// Remove a previously stored image by URL.
    async fn delete(&self, url: &str) -> AppResult<()>;
}

/// Filesystem-backed image store.
pub struct LocalImageStore {
    root: PathBuf,
    public_url: String,
}

impl LocalImageStore {
    pub fn new(root: impl Into<PathBuf>, public_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_url: public_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.upload_dir.clone(), config.upload_public_url.clone())
    }

    /// Map a public URL back to a file inside the upload directory.
    fn path_for(&self, url: &str) -> AppResult<PathBuf> {
        let file_name = url
            .strip_prefix(&self.public_url)
            .map(|rest| rest.trim_start_matches('/'))
            .filter(|name| is_plain_file_name(name))
            .ok_or_else(|| AppError::BadRequest(format!("Not a stored image URL: {}", url)))?;

        Ok(self.root.join(file_name))
    }
}

fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty() && !name.contains(['/', '\\']) && name != "." && name != ".."
}

#[async_trait]
impl ImageStore for LocalImageStore {
    async fn store(&self, upload: ImageUpload) -> AppResult<String> {
        upload.validate()?;

        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| AppError::internal(format!("Cannot create upload directory: {}", e)))?;

        let file_name = format!("{}.{}", Uuid::new_v4(), upload.extension());
        tokio::fs::write(self.root.join(&file_name), &upload.bytes)
            .await
            .map_err(|e| AppError::internal(format!("Cannot write image: {}", e)))?;

        tracing::debug!(file = %file_name, size = upload.bytes.len(), "Stored post image");
        Ok(format!("{}/{}", self.public_url, file_name))
    }

    async fn delete(&self, url: &str) -> AppResult<()> {
        let path = self.path_for(url)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::internal(format!("Cannot delete image: {}", e))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(content_type: &str, size: usize) -> ImageUpload {
        ImageUpload {
            bytes: vec![0u8; size],
            content_type: content_type.to_string(),
            file_name: Some("photo".to_string()),
        }
    }

    #[test]
    fn test_validate_accepts_allowed_types() {
        for content_type in ALLOWED_IMAGE_TYPES {
            assert!(upload(content_type, 10).validate().is_ok());
        }
    }

    #[test]
    fn test_validate_rejects_other_types_and_oversize() {
        assert!(upload("application/pdf", 10).validate().is_err());
        assert!(upload("image/png", MAX_IMAGE_SIZE_BYTES + 1).validate().is_err());
        assert!(upload("image/png", 0).validate().is_err());
    }

    #[test]
    fn test_path_for_rejects_foreign_urls() {
        let store = LocalImageStore::new("/tmp/uploads", "http://localhost:5000/uploads/");
        assert!(store.path_for("http://evil.example/x.png").is_err());
        assert!(store
            .path_for("http://localhost:5000/uploads/../etc/passwd")
            .is_err());
        assert_eq!(
            store.path_for("http://localhost:5000/uploads/a.png").unwrap(),
            PathBuf::from("/tmp/uploads/a.png")
        );
    }

    #[tokio::test]
    async fn test_store_then_delete() {
        let root = std::env::temp_dir().join(format!("blog-api-store-{}", Uuid::new_v4()));
        let store = LocalImageStore::new(&root, "http://localhost/uploads");

        let url = store.store(upload("image/webp", 16)).await.unwrap();
        assert!(url.starts_with("http://localhost/uploads/"));
        assert!(url.ends_with(".webp"));

        let path = store.path_for(&url).unwrap();
        assert!(path.exists());

        store.delete(&url).await.unwrap();
        assert!(!path.exists());
        // Deleting twice is harmless.
        store.delete(&url).await.unwrap();

        let _ = std::fs::remove_dir_all(root);
    }
}
