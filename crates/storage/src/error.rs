#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("No profile images available")]
    Empty,

    #[error("Profile image not found: {0}")]
    NotFound(String),

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Remote storage error: {0}")]
    Remote(String),

    #[error("Invalid storage configuration: {0}")]
    Config(String),
}
