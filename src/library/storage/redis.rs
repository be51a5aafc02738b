//! [`ExpiringStore`] implementation backed by redis string keys with a TTL

use super::{ExpiringStore, StoredEntity};
use crate::library::communication::implementation::redis::{
    RedisConnectionVariant, RedisFactory,
};
use crate::library::{BoxedError, EmptyResult};
use async_trait::async_trait;
use redis::AsyncCommands;
use std::time::Duration;

/// Redis implementation of the [`ExpiringStore`] trait
///
/// Entities are serialized to JSON and written with
/// [`SET ... EX`](https://redis.io/commands/setex) under
/// `<keyspace>:<key>`. Aggregate reads scan the keyspace and fetch each key
/// individually; keys that expire between the scan and the fetch are skipped.
pub struct RedisExpiringStore<F: RedisFactory> {
    factory: F,
}

impl<F> RedisExpiringStore<F>
where
    F: RedisFactory,
{
    /// Creates a new instance with a given [`RedisFactory`]
    pub fn new(factory: F) -> Self {
        Self { factory }
    }
}

#[async_trait]
impl<F> ExpiringStore for RedisExpiringStore<F>
where
    F: RedisFactory + Send + Sync,
{
    async fn put<E>(&self, entity: &E, ttl: Duration) -> EmptyResult
    where
        E: StoredEntity + Send + Sync,
    {
        let key = format!("{}:{}", E::keyspace(), entity.key());
        let value = serde_json::to_string(entity)?;

        let mut con = self
            .factory
            .connection(RedisConnectionVariant::Multiplexed)
            .await?;

        con.set_ex::<_, _, ()>(key, value, ttl.as_secs() as usize)
            .await?;

        Ok(())
    }

    async fn values<E>(&self) -> Result<Vec<E>, BoxedError>
    where
        E: StoredEntity + Send,
    {
        let mut con = self
            .factory
            .connection(RedisConnectionVariant::Multiplexed)
            .await?;

        let keys: Vec<String> = con.keys(format!("{}:*", E::keyspace())).await?;
        let mut entities = Vec::with_capacity(keys.len());

        for key in keys {
            let value: Option<String> = con.get(&key).await?;

            if let Some(value) = value {
                entities.push(serde_json::from_str(&value)?);
            }
        }

        Ok(entities)
    }
}
