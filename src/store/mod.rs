//! Key-value persistence for host-side session state.
//!
//! The engine never touches the store; the session writes every state change
//! through it and reads it back on startup.

use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Opaque string-keyed store of serialized snapshots.
#[async_trait]
pub trait KeyValueStore: Send + Sync + fmt::Debug {
    /// Fetch the value stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: String) -> Result<(), StoreError>;

    /// Delete `key`. Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> Result<(), StoreError>;

    /// Write an optional value. `None` removes the key instead of storing a null marker.
    async fn put(&self, key: &str, value: Option<String>) -> Result<(), StoreError> {
        match value {
            Some(value) => self.set(key, value).await,
            None => self.remove(key).await,
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Db(#[from] sqlx::Error),
}
