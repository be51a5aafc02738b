//! In-memory [`ExpiringStore`] for tests

use super::{ExpiringStore, StoredEntity};
use crate::library::{BoxedError, EmptyResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// [`ExpiringStore`] keeping everything in a process-local map
///
/// Time-to-live values are recorded but never enforced; tests drive expiry
/// explicitly through [`InMemoryExpiringStore::remove`].
#[derive(Default)]
pub struct InMemoryExpiringStore {
    entries: Mutex<HashMap<String, String>>,
}

impl InMemoryExpiringStore {
    /// Creates a new, empty instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops an entry as if its time-to-live had elapsed
    pub fn remove<E: StoredEntity>(&self, key: &str) {
        self.entries
            .lock()
            .unwrap()
            .remove(&format!("{}:{}", E::keyspace(), key));
    }

    /// Number of currently retained entries
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    /// Whether the store holds no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ExpiringStore for InMemoryExpiringStore {
    async fn put<E>(&self, entity: &E, _ttl: Duration) -> EmptyResult
    where
        E: StoredEntity + Send + Sync,
    {
        let key = format!("{}:{}", E::keyspace(), entity.key());
        let value = serde_json::to_string(entity)?;

        self.entries.lock().unwrap().insert(key, value);

        Ok(())
    }

    async fn values<E>(&self) -> Result<Vec<E>, BoxedError>
    where
        E: StoredEntity + Send,
    {
        let prefix = format!("{}:", E::keyspace());
        let entries = self.entries.lock().unwrap();

        entries
            .iter()
            .filter(|(key, _)| key.starts_with(&prefix))
            .map(|(_, value)| serde_json::from_str(value).map_err(Into::into))
            .collect()
    }
}

#[async_trait]
impl ExpiringStore for Arc<InMemoryExpiringStore> {
    async fn put<E>(&self, entity: &E, ttl: Duration) -> EmptyResult
    where
        E: StoredEntity + Send + Sync,
    {
        self.as_ref().put(entity, ttl).await
    }

    async fn values<E>(&self) -> Result<Vec<E>, BoxedError>
    where
        E: StoredEntity + Send,
    {
        self.as_ref().values::<E>().await
    }
}
