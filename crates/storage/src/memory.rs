//! In-memory backend for tests and local demos.

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::error::StorageError;
use crate::StorageBackend;

#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    images: BTreeMap<String, Vec<u8>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an image, replacing any previous one with the same name.
    pub fn with_image(mut self, file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.images.insert(file_name.into(), bytes.into());
        self
    }
}

#[async_trait]
impl StorageBackend for MemoryBackend {
    async fn list_profiles(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.images.keys().cloned().collect())
    }

    async fn download(&self, file_name: &str) -> Result<Vec<u8>, StorageError> {
        self.images
            .get(file_name)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(file_name.to_string()))
    }
}
