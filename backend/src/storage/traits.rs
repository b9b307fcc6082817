//! # Storage Traits
//!
//! This module defines the storage abstraction that the REST layer is written
//! against.

use crate::models::{Item, StorageResult};

/// Trait defining the interface for item storage operations
///
/// All operations are synchronous and complete within the calling request.
#[cfg_attr(test, mockall::automock)]
pub trait ItemStorage: Send + Sync {
    /// List every stored item. Order is unspecified.
    fn get_items(&self) -> StorageResult<Vec<Item>>;

    /// Store a new item, failing with `ItemExists` if its ID is already taken
    fn create_item(&self, item: Item) -> StorageResult<()>;

    /// Replace the item stored under `id`, failing with `ItemNotFound` if absent.
    ///
    /// The body's own `id` field is stored as-is and is not compared with `id`.
    fn update_item(&self, id: &str, item: Item) -> StorageResult<()>;

    /// Remove the item stored under `id`, failing with `ItemNotFound` if absent
    fn delete_item(&self, id: &str) -> StorageResult<()>;
}
