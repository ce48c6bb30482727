//! Storage backend selection from environment variables.

use std::path::PathBuf;
use std::sync::Arc;

use crate::error::StorageError;
use crate::{LocalDirBackend, S3Backend, StorageBackend};

/// Default directory for the local backend.
pub const DEFAULT_STORAGE_PATH: &str = "./profiles";

/// Supported storage backend kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackendType {
    Local,
    S3,
}

impl StorageBackendType {
    /// Parse from the `STORAGE_BACKEND` value.
    pub fn from_name(name: &str) -> Result<Self, StorageError> {
        match name {
            "local" => Ok(Self::Local),
            "s3" => Ok(Self::S3),
            other => Err(StorageError::Config(format!(
                "Unknown storage backend type '{other}'. Must be one of: local, s3"
            ))),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::S3 => "s3",
        }
    }
}

/// Where profile images live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    Local { base_path: PathBuf },
    S3 { bucket: String, prefix: String },
}

impl StorageConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var           | Default       |
    /// |-------------------|---------------|
    /// | `STORAGE_BACKEND` | `local`       |
    /// | `STORAGE_PATH`    | `./profiles`  |
    /// | `S3_BUCKET`       | required (s3) |
    /// | `S3_PREFIX`       | empty         |
    pub fn from_env() -> Result<Self, StorageError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, StorageError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend = lookup("STORAGE_BACKEND").unwrap_or_else(|| "local".into());

        match StorageBackendType::from_name(backend.trim())? {
            StorageBackendType::Local => {
                let base_path =
                    lookup("STORAGE_PATH").unwrap_or_else(|| DEFAULT_STORAGE_PATH.into());
                let base_path = require_non_empty(base_path, "STORAGE_PATH", "local")?;
                Ok(Self::Local {
                    base_path: PathBuf::from(base_path),
                })
            }
            StorageBackendType::S3 => {
                let bucket = lookup("S3_BUCKET").unwrap_or_default();
                let bucket = require_non_empty(bucket, "S3_BUCKET", "s3")?;
                let prefix = lookup("S3_PREFIX").unwrap_or_default().trim().to_string();
                Ok(Self::S3 { bucket, prefix })
            }
        }
    }

    pub fn backend_type(&self) -> StorageBackendType {
        match self {
            Self::Local { .. } => StorageBackendType::Local,
            Self::S3 { .. } => StorageBackendType::S3,
        }
    }

    /// Construct the configured backend.
    pub async fn build(&self) -> Arc<dyn StorageBackend> {
        match self {
            Self::Local { base_path } => Arc::new(LocalDirBackend::new(base_path.clone())),
            Self::S3 { bucket, prefix } => {
                Arc::new(S3Backend::from_env(bucket.clone(), prefix.clone()).await)
            }
        }
    }
}

fn require_non_empty(value: String, key: &str, backend: &str) -> Result<String, StorageError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(StorageError::Config(format!(
            "Backend type '{backend}' requires a non-empty {key}"
        )));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert_matches::assert_matches;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_to_local_directory() {
        let config = StorageConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(
            config,
            StorageConfig::Local {
                base_path: PathBuf::from(DEFAULT_STORAGE_PATH)
            }
        );
        assert_eq!(config.backend_type().name(), "local");
    }

    #[test]
    fn local_with_custom_path() {
        let config = StorageConfig::from_lookup(lookup(&[
            ("STORAGE_BACKEND", "local"),
            ("STORAGE_PATH", "/data/profiles"),
        ]))
        .unwrap();
        assert_eq!(
            config,
            StorageConfig::Local {
                base_path: PathBuf::from("/data/profiles")
            }
        );
    }

    #[test]
    fn local_rejects_blank_path() {
        let result = StorageConfig::from_lookup(lookup(&[("STORAGE_PATH", "  ")]));
        assert_matches!(result, Err(StorageError::Config(_)));
    }

    #[test]
    fn s3_requires_bucket() {
        let result = StorageConfig::from_lookup(lookup(&[("STORAGE_BACKEND", "s3")]));
        assert_matches!(result, Err(StorageError::Config(_)));
    }

    #[test]
    fn s3_with_bucket_and_prefix() {
        let config = StorageConfig::from_lookup(lookup(&[
            ("STORAGE_BACKEND", "s3"),
            ("S3_BUCKET", "profiles-bucket"),
            ("S3_PREFIX", "faces/"),
        ]))
        .unwrap();
        assert_eq!(
            config,
            StorageConfig::S3 {
                bucket: "profiles-bucket".into(),
                prefix: "faces/".into()
            }
        );
    }

    #[test]
    fn unknown_backend_rejected() {
        let result = StorageConfig::from_lookup(lookup(&[("STORAGE_BACKEND", "ftp")]));
        assert_matches!(result, Err(StorageError::Config(_)));
    }
}
