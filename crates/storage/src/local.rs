//! Profile images stored as files in a local directory.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::StorageError;
use crate::{is_image_file, StorageBackend};

/// Reads profile images from a flat directory.
#[derive(Debug, Clone)]
pub struct LocalDirBackend {
    base_path: PathBuf,
}

impl LocalDirBackend {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }
}

#[async_trait]
impl StorageBackend for LocalDirBackend {
    async fn list_profiles(&self) -> Result<Vec<String>, StorageError> {
        let mut entries = tokio::fs::read_dir(&self.base_path).await?;
        let mut names = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            let Ok(name) = entry.file_name().into_string() else {
                tracing::warn!(path = %entry.path().display(), "Skipping non UTF-8 file name");
                continue;
            };
            if is_image_file(&name) {
                names.push(name);
            }
        }

        names.sort();
        Ok(names)
    }

    async fn download(&self, file_name: &str) -> Result<Vec<u8>, StorageError> {
        // Only bare file names are served.
        if file_name.contains(['/', '\\']) || file_name == ".." {
            return Err(StorageError::NotFound(file_name.to_string()));
        }

        match tokio::fs::read(self.base_path.join(file_name)).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(file_name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}
