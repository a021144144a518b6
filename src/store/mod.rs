//! Asynchronous string key/value persistence.
//!
//! The state controller only ever talks to a [`KeyValueStore`]; the concrete
//! adapter is picked at startup from [`crate::config::StorageConfig`].

use anyhow::Result;
use async_trait::async_trait;

pub mod file;
pub mod memory;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

pub const MOODS_KEY: &str = "moods";
pub const SNACKS_KEY: &str = "snacks";
pub const DARK_MODE_KEY: &str = "isDarkMode";

#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Durable once the returned future resolves.
    async fn set(&self, key: &str, value: String) -> Result<()>;

    async fn remove(&self, key: &str) -> Result<()>;
}
