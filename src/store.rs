//! Persistence abstraction the dispatcher depends on.
//!
//! The backing store is an external collaborator (a managed database); the
//! dispatcher only sees this trait. Implementations:
//! - `MemoryStore` (`memory.rs`) — in-memory BTreeMap for tests and local runs
//! - `SpannerItemStore` (`spanner.rs`) — Cloud Spanner, production

use anyhow::Result;
use async_trait::async_trait;

use crate::item::Item;

/// Key-value persistence for items, keyed by `Item::id`.
///
/// Every method fails only on infrastructure-level errors (connectivity,
/// throttling, permissions). A missing key is `Ok(None)` on `get` and a
/// no-op on `delete`, never an error.
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Fetch the item stored under `id`, or `None` if there is none.
    async fn get(&self, id: &str) -> Result<Option<Item>>;

    /// Insert or overwrite the item under `item.id`. No merge: the stored
    /// row always ends up with exactly the fields of `item`.
    async fn put(&self, item: Item) -> Result<()>;

    /// Remove the item under `id`. Idempotent; deleting an absent key
    /// succeeds.
    async fn delete(&self, id: &str) -> Result<()>;

    /// Return every stored item. Unordered, unpaginated.
    async fn scan_all(&self) -> Result<Vec<Item>>;

    /// Verify the backend is reachable and responsive.
    async fn health_check(&self) -> Result<()>;
}
