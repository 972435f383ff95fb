use async_trait::async_trait;
use crate::application::errors::StorageError;

/// Relational datastore. Only the connection lifecycle is owned by the framework.
#[async_trait]
pub trait Datastore: Send + Sync {
    async fn connect(&self) -> Result<(), StorageError>;
    async fn disconnect(&self) -> Result<(), StorageError>;
    fn is_connected(&self) -> bool;
}

/// Key-value cache
#[async_trait]
pub trait Cache: Send + Sync {
    async fn connect(&self) -> Result<(), StorageError>;
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    async fn delete(&self, key: &str) -> Result<(), StorageError>;

    /// Human readable location, used in startup logs
    fn location(&self) -> String;
}
