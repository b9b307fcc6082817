//! # Item Model
//!
//! The item data shape plus the sentinel failures the storage engine reports.

pub use shared::Item;

/// Errors returned by [`crate::storage::ItemStorage`] implementations
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("item already exists")]
    ItemExists,
    #[error("item not found")]
    ItemNotFound,
    #[error("storage error: {0}")]
    Internal(String),
}

pub type StorageResult<T> = Result<T, StorageError>;
