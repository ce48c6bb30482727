//! Profile image storage backends.
//!
//! Profiles are image files named after their number (`12.jpg`). A
//! [`StorageBackend`] lists them and hands out raw bytes, either at random or
//! by profile number. Image decoding is left to the client.

pub mod config;
pub mod error;
pub mod local;
pub mod memory;
pub mod s3;

use async_trait::async_trait;
use describer_core::profile::{image_content_type, parse_profile_number};
use describer_core::types::ProfileNumber;
use rand::seq::IndexedRandom;

pub use config::{StorageBackendType, StorageConfig};
pub use error::StorageError;
pub use local::LocalDirBackend;
pub use memory::MemoryBackend;
pub use s3::S3Backend;

/// Raw image of a single profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileImage {
    /// File name, used as the profile identifier in stored records.
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
}

impl ProfileImage {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let content_type = image_content_type(&file_name);
        Self {
            file_name,
            bytes,
            content_type,
        }
    }
}

/// Source of profile images.
///
/// Implementors only provide listing and raw download; random and by-number
/// selection are shared default methods.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// File names of every stored profile image, sorted.
    async fn list_profiles(&self) -> Result<Vec<String>, StorageError>;

    /// Download one image by file name.
    async fn download(&self, file_name: &str) -> Result<Vec<u8>, StorageError>;

    /// A uniformly random profile.
    async fn fetch_random(&self) -> Result<ProfileImage, StorageError> {
        let profiles = self.list_profiles().await?;
        let file_name = pick_random(&profiles).ok_or(StorageError::Empty)?;
        tracing::debug!(file_name = %file_name, "Picked random profile");
        let bytes = self.download(&file_name).await?;
        Ok(ProfileImage::new(file_name, bytes))
    }

    /// The profile whose file name starts with `number`, if any.
    async fn fetch_by_id(&self, number: ProfileNumber) -> Result<Option<ProfileImage>, StorageError> {
        let profiles = self.list_profiles().await?;
        let Some(file_name) = find_by_number(&profiles, number) else {
            return Ok(None);
        };
        let bytes = self.download(&file_name).await?;
        Ok(Some(ProfileImage::new(file_name, bytes)))
    }
}

fn pick_random(profiles: &[String]) -> Option<String> {
    profiles.choose(&mut rand::rng()).cloned()
}

fn find_by_number(profiles: &[String], number: ProfileNumber) -> Option<String> {
    profiles
        .iter()
        .find(|name| parse_profile_number(name).ok() == Some(number))
        .cloned()
}

/// Whether a file name looks like a supported image.
pub(crate) fn is_image_file(file_name: &str) -> bool {
    image_content_type(file_name).starts_with("image/")
}
