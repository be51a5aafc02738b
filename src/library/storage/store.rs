use super::super::{BoxedError, EmptyResult};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// Entity which can be stored in an [`ExpiringStore`]
pub trait StoredEntity: Serialize + DeserializeOwned {
    /// Keyspace under which all entities of this type live
    fn keyspace() -> &'static str;

    /// Key of this particular entity within the keyspace
    fn key(&self) -> String;
}

/// Keyed store whose entries expire independently of each other
#[async_trait]
pub trait ExpiringStore {
    /// Writes the entity under its key, replacing any previous value and
    /// resetting the expiry to the given time-to-live
    async fn put<E>(&self, entity: &E, ttl: Duration) -> EmptyResult
    where
        E: StoredEntity + Send + Sync;

    /// Reads every non-expired entity in the keyspace
    async fn values<E>(&self) -> Result<Vec<E>, BoxedError>
    where
        E: StoredEntity + Send;
}
