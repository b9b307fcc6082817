use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;

use super::traits::ItemStorage;
use crate::models::{Item, StorageError, StorageResult};

/// In-memory item store keyed by item ID
///
/// The existence check and the mutation for each write happen under a single
/// write guard, so operations on the same ID are serialized.
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    items: RwLock<HashMap<String, Item>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StorageResult<RwLockReadGuard<'_, HashMap<String, Item>>> {
        self.items
            .read()
            .map_err(|_| StorageError::Internal("lock poisoned".to_string()))
    }

    fn write(&self) -> StorageResult<RwLockWriteGuard<'_, HashMap<String, Item>>> {
        self.items
            .write()
            .map_err(|_| StorageError::Internal("lock poisoned".to_string()))
    }
}

impl ItemStorage for InMemoryStorage {
    fn get_items(&self) -> StorageResult<Vec<Item>> {
        let items = self.read()?;
        Ok(items.values().cloned().collect())
    }

    fn create_item(&self, item: Item) -> StorageResult<()> {
        let mut items = self.write()?;
        if items.contains_key(&item.id) {
            return Err(StorageError::ItemExists);
        }
        debug!("Storing item {}", item.id);
        items.insert(item.id.clone(), item);
        Ok(())
    }

    fn update_item(&self, id: &str, item: Item) -> StorageResult<()> {
        let mut items = self.write()?;
        match items.get_mut(id) {
            Some(stored) => {
                debug!("Replacing item {}", id);
                *stored = item;
                Ok(())
            }
            None => Err(StorageError::ItemNotFound),
        }
    }

    fn delete_item(&self, id: &str) -> StorageResult<()> {
        let mut items = self.write()?;
        match items.remove(id) {
            Some(_) => {
                debug!("Removed item {}", id);
                Ok(())
            }
            None => Err(StorageError::ItemNotFound),
        }
    }
}
