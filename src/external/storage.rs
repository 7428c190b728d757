//! Object storage - upload e cancellazione dei file caricati

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::core::config::StorageConfig;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to upload object '{key}': {reason}")]
    Upload { key: String, reason: String },

    #[error("failed to delete object '{key}': {reason}")]
    Delete { key: String, reason: String },

    #[error("invalid object key '{0}'")]
    InvalidKey(String),

    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Oggetto salvato nello storage
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub key: String,
    pub url: String,
    pub size: usize,
}

#[async_trait]
pub trait ObjectStorage: Send + Sync {
    async fn put(&self, key: &str, data: Vec<u8>, content_type: &str) -> Result<StoredObject, StorageError>;

    /// Cancellare una chiave inesistente non è un errore
    async fn delete(&self, key: &str) -> Result<(), StorageError>;

    fn public_url(&self, key: &str) -> String;
}

/// Genera una chiave univoca `prefix/<uuid>.<ext>` preservando l'estensione originale
pub fn object_key(prefix: &str, file_name: &str, content_type: &str) -> String {
    let ext = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .filter(|e| !e.is_empty() && e.len() <= 5 && e.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or_else(|| extension_for(content_type).to_string());
    format!("{}/{}.{}", prefix.trim_matches('/'), Uuid::new_v4(), ext)
}

fn extension_for(content_type: &str) -> &'static str {
    match content_type {
        "image/jpeg" => "jpg",
        "image/png" => "png",
        "image/gif" => "gif",
        "image/webp" => "webp",
        "image/svg+xml" => "svg",
        "application/pdf" => "pdf",
        "application/msword" => "doc",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => "docx",
        _ => "bin",
    }
}

fn validate_key(key: &str) -> Result<(), StorageError> {
    let path = Path::new(key);
    let safe = !key.is_empty()
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
    if safe {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}

/// Bucket S3 o compatibile (MinIO, R2, ...)
pub struct S3Storage {
    client: aws_sdk_s3::Client,
    bucket: String,
    public_base: String,
}

impl S3Storage {
    pub async fn new(config: &StorageConfig, bucket: String) -> Self {
        let shared = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_sdk_s3::config::Region::new(config.s3_region.clone()))
            .load()
            .await;

        let mut builder = aws_sdk_s3::config::Builder::from(&shared);
        if let Some(endpoint) = &config.s3_endpoint {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }
        let client = aws_sdk_s3::Client::from_conf(builder.build());

        let public_base = match (&config.public_url, &config.s3_endpoint) {
            (Some(url), _) => url.trim_end_matches('/').to_string(),
            (None, Some(endpoint)) => format!("{}/{}", endpoint.trim_end_matches('/'), bucket),
            (None, None) => format!("https://{}.s3.{}.amazonaws.com", bucket, config.s3_region),
        };

        info!("S3 storage ready for bucket {}", bucket);
        Self {
            client,
            bucket,
            public_base,
        }
    }
}

#[async_trait]
impl ObjectStorage for S3Storage {
    #[instrument(skip(self, data), fields(bucket = %self.bucket, size = data.len()))]
    async fn put(&self, key: &str, data: Vec<u8>, content_type: &str) -> Result<StoredObject, StorageError> {
        validate_key(key)?;
        let size = data.len();
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(|e| StorageError::Upload {
                key: key.to_string(),
                reason: e.to_string(),
            })?;

        debug!("Object uploaded");
        Ok(StoredObject {
            key: key.to_string(),
            url: self.public_url(key),
            size,
        })
    }

    #[instrument(skip(self), fields(bucket = %self.bucket))]
    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| StorageError::Delete {
                key: key.to_string(),
                reason: e.to_string(),
            })?;
        debug!("Object deleted");
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_base, key)
    }
}

/// Storage su filesystem, usato quando S3 non è configurato
pub struct LocalStorage {
    root: PathBuf,
    base_url: String,
}

impl LocalStorage {
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl ObjectStorage for LocalStorage {
    #[instrument(skip(self, data), fields(size = data.len()))]
    async fn put(&self, key: &str, data: Vec<u8>, _content_type: &str) -> Result<StoredObject, StorageError> {
        validate_key(key)?;
        let path = self.root.join(key);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let size = data.len();
        tokio::fs::write(&path, data).await?;
        debug!("Object written to {}", path.display());
        Ok(StoredObject {
            key: key.to_string(),
            url: self.public_url(key),
            size,
        })
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        match tokio::fs::remove_file(self.root.join(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Delete {
                key: key.to_string(),
                reason: e.to_string(),
            }),
        }
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_key_keeps_extension() {
        let key = object_key("blogs", "Campus Photo.JPG", "image/jpeg");
        assert!(key.starts_with("blogs/"));
        assert!(key.ends_with(".jpg"));
    }

    #[test]
    fn test_object_key_falls_back_to_content_type() {
        let key = object_key("/resumes/", "cv", "application/pdf");
        assert!(key.starts_with("resumes/"));
        assert!(key.ends_with(".pdf"));
    }

    #[test]
    fn test_path_traversal_keys_are_rejected() {
        assert!(validate_key("../etc/passwd").is_err());
        assert!(validate_key("/abs/key.png").is_err());
        assert!(validate_key("").is_err());
        assert!(validate_key("images/a.png").is_ok());
    }

    #[tokio::test]
    async fn test_local_storage_put_and_delete() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path(), "http://localhost/uploads/");

        let stored = storage
            .put("images/logo.png", vec![1, 2, 3], "image/png")
            .await
            .unwrap();
        assert_eq!(stored.url, "http://localhost/uploads/images/logo.png");
        assert_eq!(stored.size, 3);
        assert!(dir.path().join("images/logo.png").exists());

        storage.delete("images/logo.png").await.unwrap();
        assert!(!dir.path().join("images/logo.png").exists());
        // seconda cancellazione: nessun errore
        storage.delete("images/logo.png").await.unwrap();
    }
}
