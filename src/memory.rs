//! In-memory item store.
//!
//! `MemoryStore` implements `ItemStore` over a `BTreeMap`, which keeps test
//! assertions deterministic even though the store contract promises no
//! ordering. Used by the dispatcher and handler tests and usable for local
//! development without a Spanner emulator.

use std::collections::BTreeMap;
use std::sync::RwLock;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use crate::item::Item;
use crate::store::ItemStore;

/// In-memory store backed by `BTreeMap`, safe to share across handlers.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: RwLock<BTreeMap<String, Item>>,
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with items.
    pub fn with_items(items: impl IntoIterator<Item = Item>) -> Self {
        let map = items
            .into_iter()
            .map(|item| (item.id.clone(), item))
            .collect();
        Self {
            items: RwLock::new(map),
        }
    }

    /// Number of stored items.
    pub fn len(&self) -> usize {
        self.items.read().map(|map| map.len()).unwrap_or(0)
    }

    /// True if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ItemStore for MemoryStore {
    async fn get(&self, id: &str) -> Result<Option<Item>> {
        let items = self
            .items
            .read()
            .map_err(|_| anyhow!("item store lock poisoned"))?;
        Ok(items.get(id).cloned())
    }

    async fn put(&self, item: Item) -> Result<()> {
        let mut items = self
            .items
            .write()
            .map_err(|_| anyhow!("item store lock poisoned"))?;
        items.insert(item.id.clone(), item);
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let mut items = self
            .items
            .write()
            .map_err(|_| anyhow!("item store lock poisoned"))?;
        items.remove(id);
        Ok(())
    }

    async fn scan_all(&self) -> Result<Vec<Item>> {
        let items = self
            .items
            .read()
            .map_err(|_| anyhow!("item store lock poisoned"))?;
        Ok(items.values().cloned().collect())
    }

    async fn health_check(&self) -> Result<()> {
        Ok(())
    }
}
