//! Filesystem-backed object store
//!
//! Objects live under `<root>/<bucket>/<path>` and are served read-only by the
//! HTTP layer under the configured public prefix.

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

use crate::domain::{DomainError, ObjectStore, StoredObject};

pub struct LocalObjectStore {
    root: PathBuf,
    public_base: String,
}

impl LocalObjectStore {
    pub fn new(root: impl Into<PathBuf>, public_base: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base: public_base.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn object_path(&self, bucket: &str, path: &str) -> Result<PathBuf, DomainError> {
        validate_segment(bucket)?;
        validate_segment(path)?;
        Ok(self.root.join(bucket).join(path))
    }
}

/// Reject anything that could escape the bucket directory.
fn validate_segment(segment: &str) -> Result<(), DomainError> {
    let ok = !segment.is_empty()
        && segment != "."
        && segment != ".."
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if ok {
        Ok(())
    } else {
        Err(DomainError::validation(format!(
            "invalid storage path segment '{}'",
            segment
        )))
    }
}

/// Content-addressed object name: short digest prefix plus a sanitized file name.
fn object_name(file_name: &str, bytes: &[u8]) -> String {
    let digest = hex::encode(Sha256::digest(bytes));
    let sanitized: String = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    let sanitized = sanitized.trim_matches('.');
    if sanitized.is_empty() {
        digest[..16].to_string()
    } else {
        format!("{}-{}", &digest[..16], sanitized)
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn put(
        &self,
        bucket: &str,
        file_name: &str,
        content_type: &str,
        bytes: &[u8],
    ) -> Result<StoredObject, DomainError> {
        let name = object_name(file_name, bytes);
        let target = self.object_path(bucket, &name)?;

        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| DomainError::Storage(e.to_string()))?;
        }
        tokio::fs::write(&target, bytes)
            .await
            .map_err(|e| DomainError::Storage(e.to_string()))?;

        tracing::info!("Stored object {}/{} ({} bytes)", bucket, name, bytes.len());

        Ok(StoredObject {
            bucket: bucket.to_string(),
            public_url: self.public_url(bucket, &name),
            path: name,
            content_type: content_type.to_string(),
            size: bytes.len(),
        })
    }

    async fn delete(&self, bucket: &str, path: &str) -> Result<(), DomainError> {
        let target = self.object_path(bucket, path)?;
        match tokio::fs::remove_file(&target).await {
            Ok(()) => {
                tracing::info!("Deleted object {}/{}", bucket, path);
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(DomainError::Storage(e.to_string())),
        }
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        format!(
            "{}/{}/{}",
            self.public_base,
            urlencoding::encode(bucket),
            urlencoding::encode(path)
        )
    }
}
