//! In-process key-value cache

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::application::errors::StorageError;
use crate::domain::traits::Cache;

/// Map-backed cache. Reads and writes fail until `connect` ran.
pub struct MemoryCache {
    url: String,
    connected: AtomicBool,
    kv: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryCache {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            connected: AtomicBool::new(false),
            kv: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    fn ensure_connected(&self) -> Result<(), StorageError> {
        if self.connected.load(Ordering::Acquire) {
            Ok(())
        } else {
            Err(StorageError::NotConnected)
        }
    }
}

#[async_trait]
impl Cache for MemoryCache {
    async fn connect(&self) -> Result<(), StorageError> {
        if !self.url.starts_with("memory://") {
            return Err(StorageError::Cache(format!("Unsupported cache url: {}", self.url)));
        }
        self.connected.store(true, Ordering::Release);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.ensure_connected()?;
        let kv = self.kv.read().await;
        Ok(kv.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.ensure_connected()?;
        let mut kv = self.kv.write().await;
        kv.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.ensure_connected()?;
        let mut kv = self.kv.write().await;
        kv.remove(key);
        Ok(())
    }

    fn location(&self) -> String {
        self.url.clone()
    }
}
