//! JSON file storage implementation.
//!
//! Stores one pretty-printed JSON file per owner under `<root>/owners/`.
//! Saves go through a temporary sibling file that is renamed into place, so a
//! reader sees either the previous record or the new one.

use std::path::{Path, PathBuf};
use goaltrack_core::{OwnerKey, OwnerRecord};
use super::trait_::validate_key;
use super::{OwnerStore, Result};
use tokio::fs;

/// File-based JSON storage backend.
pub struct JsonStorage {
    root: PathBuf,
}

impl JsonStorage {
    /// Create storage rooted at `root`, creating the `owners/` directory.
    pub async fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(root.join("owners")).await?;
        tracing::debug!("Opened JSON storage at {}", root.display());
        Ok(Self { root })
    }

    fn owners_dir(&self) -> PathBuf {
        self.root.join("owners")
    }

    fn owner_path(&self, key: &OwnerKey) -> PathBuf {
        self.owners_dir().join(format!("{}.json", key))
    }
}

#[async_trait::async_trait]
impl OwnerStore for JsonStorage {
    async fn load_owner(&self, key: &OwnerKey) -> Result<Option<OwnerRecord>> {
        validate_key(key)?;
        read_json(&self.owner_path(key)).await
    }

    async fn save_owner(&self, key: &OwnerKey, record: &OwnerRecord) -> Result<()> {
        validate_key(key)?;
        let path = self.owner_path(key);
        let json = serde_json::to_string_pretty(record)?;
        write_atomic(&path, json.as_bytes()).await?;
        tracing::debug!("Saved owner {} ({} goals)", key, record.goals.len());
        Ok(())
    }

    async fn list_owners(&self) -> Result<Vec<OwnerKey>> {
        let mut keys = Vec::new();
        let mut rd = fs::read_dir(self.owners_dir()).await?;
        while let Some(entry) = rd.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                keys.push(OwnerKey::new(stem));
            }
        }
        keys.sort();
        Ok(keys)
    }
}

async fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    match fs::read_to_string(path).await {
        Ok(json) => {
            let value = serde_json::from_str(&json)?;
            Ok(Some(value))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, bytes).await?;
    if let Err(e) = fs::rename(&tmp, path).await {
        let _ = fs::remove_file(&tmp).await;
        return Err(e.into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use goaltrack_core::Goal;

    #[tokio::test]
    async fn test_save_and_load_owner() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonStorage::new(dir.path()).await.unwrap();
        let key = OwnerKey::new("alice");

        let mut owner = OwnerRecord::new("alice");
        owner.add_goal(Goal::quantitative("Read", "", "pages"));
        storage.save_owner(&key, &owner).await.unwrap();

        let loaded = storage.load_owner(&key).await.unwrap().unwrap();
        assert_eq!(loaded, owner);
        assert!(!dir.path().join("owners").join("alice.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_missing_owner_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonStorage::new(dir.path()).await.unwrap();

        let loaded = storage.load_owner(&OwnerKey::new("nobody")).await.unwrap();
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn test_save_replaces_whole_record() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonStorage::new(dir.path()).await.unwrap();
        let key = OwnerKey::new("alice");

        let mut owner = OwnerRecord::new("alice");
        owner.add_goal(Goal::binary("Stretch", ""));
        storage.save_owner(&key, &owner).await.unwrap();

        owner.goals.clear();
        storage.save_owner(&key, &owner).await.unwrap();

        let loaded = storage.load_owner(&key).await.unwrap().unwrap();
        assert!(loaded.goals.is_empty());
    }

    #[tokio::test]
    async fn test_list_owners_ignores_other_files() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonStorage::new(dir.path()).await.unwrap();

        for name in ["carol", "alice"] {
            storage
                .save_owner(&OwnerKey::new(name), &OwnerRecord::new(name))
                .await
                .unwrap();
        }
        std::fs::write(dir.path().join("owners").join("notes.txt"), "x").unwrap();

        let keys = storage.list_owners().await.unwrap();
        assert_eq!(keys, vec![OwnerKey::new("alice"), OwnerKey::new("carol")]);
    }

    #[tokio::test]
    async fn test_corrupt_file_is_json_error() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonStorage::new(dir.path()).await.unwrap();
        std::fs::write(dir.path().join("owners").join("alice.json"), "{not json").unwrap();

        let err = storage.load_owner(&OwnerKey::new("alice")).await.unwrap_err();
        assert!(matches!(err, crate::StorageError::Json(_)));
    }

    #[tokio::test]
    async fn test_invalid_key_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonStorage::new(dir.path()).await.unwrap();

        let err = storage.load_owner(&OwnerKey::new("../etc")).await.unwrap_err();
        assert!(matches!(err, crate::StorageError::InvalidKey(_)));
    }
}
