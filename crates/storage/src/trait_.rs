//! Storage trait abstraction.

use async_trait::async_trait;
use goaltrack_core::{OwnerKey, OwnerRecord};

/// Error type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Owner key cannot be used as a storage key
    #[error("Invalid owner key: {0:?}")]
    InvalidKey(String),

    /// Other error
    #[error("{0}")]
    Other(String),
}

/// Storage collaborator for owner records.
///
/// A record is always read and replaced as a whole; `save_owner` either
/// stores the full record or leaves the previous one in place.
#[async_trait]
pub trait OwnerStore: Send + Sync {
    /// Load an owner record, `None` if no such owner exists.
    async fn load_owner(&self, key: &OwnerKey) -> Result<Option<OwnerRecord>>;

    /// Save an owner record (create or replace).
    async fn save_owner(&self, key: &OwnerKey, record: &OwnerRecord) -> Result<()>;

    /// List the keys of all stored owners.
    async fn list_owners(&self) -> Result<Vec<OwnerKey>>;
}

/// Reject keys that are empty or could escape a storage namespace.
pub(crate) fn validate_key(key: &OwnerKey) -> Result<()> {
    let s = key.as_str();
    if s.is_empty()
        || s == "."
        || s == ".."
        || s.contains(|c: char| matches!(c, '/' | '\\' | '\0'))
    {
        return Err(StorageError::InvalidKey(s.to_string()));
    }
    Ok(())
}
