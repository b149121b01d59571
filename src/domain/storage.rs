//! Object storage contract used for images and audio narration.

use async_trait::async_trait;
use serde::Serialize;

use super::DomainError;

/// A file that has been written to the store.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StoredObject {
    pub bucket: String,
    pub path: String,
    pub public_url: String,
    pub content_type: String,
    pub size: usize,
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `bytes` under `bucket`, deriving the object path from `file_name`.
    async fn put(
        &self,
        bucket: &str,
        file_name: &str,
        content_type: &str,
        bytes: &[u8],
    ) -> Result<StoredObject, DomainError>;

    /// Remove an object. Removing a missing object is not an error.
    async fn delete(&self, bucket: &str, path: &str) -> Result<(), DomainError>;

    fn public_url(&self, bucket: &str, path: &str) -> String;
}
