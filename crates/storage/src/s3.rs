//! Profile images stored in an S3 (or S3-compatible) bucket.

use async_trait::async_trait;
use aws_sdk_s3::Client;

use crate::error::StorageError;
use crate::{is_image_file, StorageBackend};

/// Reads profile images from `s3://{bucket}/{prefix}{file_name}`.
#[derive(Debug, Clone)]
pub struct S3Backend {
    client: Client,
    bucket: String,
    prefix: String,
}

impl S3Backend {
    pub fn new(client: Client, bucket: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            prefix: prefix.into(),
        }
    }

    /// Build a client from the standard AWS environment (credentials, region).
    pub async fn from_env(bucket: String, prefix: String) -> Self {
        let sdk_config = aws_config::load_from_env().await;
        tracing::info!(bucket = %bucket, prefix = %prefix, "S3 storage backend configured");
        Self::new(Client::new(&sdk_config), bucket, prefix)
    }

    fn key_for(&self, file_name: &str) -> String {
        format!("{}{file_name}", self.prefix)
    }
}

#[async_trait]
impl StorageBackend for S3Backend {
    async fn list_profiles(&self) -> Result<Vec<String>, StorageError> {
        let mut names = Vec::new();
        let mut continuation: Option<String> = None;

        loop {
            let output = self
                .client
                .list_objects_v2()
                .bucket(&self.bucket)
                .prefix(&self.prefix)
                .set_continuation_token(continuation.take())
                .send()
                .await
                .map_err(|e| StorageError::Remote(format!("list_objects_v2 failed: {e}")))?;

            for object in output.contents() {
                let Some(key) = object.key() else { continue };
                let name = key.strip_prefix(self.prefix.as_str()).unwrap_or(key);
                // Nested keys are not profiles.
                if !name.contains('/') && is_image_file(name) {
                    names.push(name.to_string());
                }
            }

            match output.next_continuation_token() {
                Some(token) if output.is_truncated().unwrap_or(false) => {
                    continuation = Some(token.to_string());
                }
                _ => break,
            }
        }

        names.sort();
        Ok(names)
    }

    async fn download(&self, file_name: &str) -> Result<Vec<u8>, StorageError> {
        let key = self.key_for(file_name);
        let output = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(&key)
            .send()
            .await
            .map_err(|e| {
                if e.as_service_error().is_some_and(|se| se.is_no_such_key()) {
                    StorageError::NotFound(file_name.to_string())
                } else {
                    StorageError::Remote(format!("get_object {key} failed: {e}"))
                }
            })?;

        let data = output
            .body
            .collect()
            .await
            .map_err(|e| StorageError::Remote(format!("reading {key} failed: {e}")))?;

        let bytes = data.into_bytes().to_vec();
        tracing::debug!(key = %key, bytes = bytes.len(), "Downloaded profile image");
        Ok(bytes)
    }
}
