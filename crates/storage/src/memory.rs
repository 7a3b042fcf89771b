//! In-memory storage backend.

use std::collections::HashMap;
use goaltrack_core::{OwnerKey, OwnerRecord};
use tokio::sync::Mutex;
use super::trait_::validate_key;
use super::{OwnerStore, Result};

/// Owner records held in a map. Nothing survives the process.
#[derive(Default)]
pub struct MemoryStorage {
    owners: Mutex<HashMap<OwnerKey, OwnerRecord>>,
}

impl MemoryStorage {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with the given owners, keyed by username.
    pub fn with_owners(owners: impl IntoIterator<Item = OwnerRecord>) -> Self {
        let owners = owners
            .into_iter()
            .map(|o| (OwnerKey::new(o.username.clone()), o))
            .collect();
        Self {
            owners: Mutex::new(owners),
        }
    }
}

#[async_trait::async_trait]
impl OwnerStore for MemoryStorage {
    async fn load_owner(&self, key: &OwnerKey) -> Result<Option<OwnerRecord>> {
        validate_key(key)?;
        Ok(self.owners.lock().await.get(key).cloned())
    }

    async fn save_owner(&self, key: &OwnerKey, record: &OwnerRecord) -> Result<()> {
        validate_key(key)?;
        self.owners.lock().await.insert(key.clone(), record.clone());
        Ok(())
    }

    async fn list_owners(&self) -> Result<Vec<OwnerKey>> {
        let mut keys: Vec<_> = self.owners.lock().await.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_seeded_owners_are_loadable() {
        let storage = MemoryStorage::with_owners([OwnerRecord::new("alice"), OwnerRecord::new("bob")]);

        let alice = storage.load_owner(&OwnerKey::new("alice")).await.unwrap();
        assert_eq!(alice.unwrap().username, "alice");
        assert_eq!(storage.list_owners().await.unwrap().len(), 2);
        assert!(storage.load_owner(&OwnerKey::new("carol")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_returns_copy_not_alias() {
        let storage = MemoryStorage::new();
        let key = OwnerKey::new("alice");
        let mut owner = OwnerRecord::new("alice");
        storage.save_owner(&key, &owner).await.unwrap();

        owner.username = "changed".to_string();
        let loaded = storage.load_owner(&key).await.unwrap().unwrap();
        assert_eq!(loaded.username, "alice");
    }
}
