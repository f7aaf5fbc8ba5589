//! Storage module
//!
//! String-keyed key/value storage consumed by the services. The SQLite
//! implementation lives in `database::Repository`; `MemoryStore` backs tests.

pub mod memory;

pub use memory::MemoryStore;

use crate::error::Result;
use async_trait::async_trait;

/// Asynchronous string key/value store holding serialized records
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value under `key`, `None` when absent
    async fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Insert or replace the value under `key`
    async fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`; removing an absent key is not an error
    async fn remove_item(&self, key: &str) -> Result<()>;
}
