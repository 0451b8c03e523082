//! Persistence trait.
//!
//! Implemented by the `marksheet-store` crate. Values are opaque strings; the
//! session decides what goes into them.

use async_trait::async_trait;

/// Asynchronous string key-value storage.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Human-readable backend name (e.g. "file").
    fn name(&self) -> &str;

    /// Read a value. A missing key is `Ok(None)`, not an error.
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>>;

    /// Write a value, replacing any previous one.
    async fn set(&self, key: &str, value: &str) -> anyhow::Result<()>;

    /// Delete a value. Deleting a missing key succeeds.
    async fn remove(&self, key: &str) -> anyhow::Result<()>;
}
