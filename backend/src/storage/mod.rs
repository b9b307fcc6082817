//! # Storage Module
//!
//! Holds the authoritative item set for the service.
//!
//! Handlers only ever see the [`ItemStorage`] trait, so the backing engine can
//! be swapped for a test double without touching the HTTP layer.
//!
//! ## Current Implementation
//!
//! - **Primary Storage**: [`InMemoryStorage`], a `HashMap` keyed by item ID behind an `RwLock`
//! - **Test Doubles**: `MockItemStorage`, generated by `mockall` in test builds

pub mod memory;
pub mod traits;

pub use memory::InMemoryStorage;
pub use traits::ItemStorage;

#[cfg(test)]
pub use traits::MockItemStorage;
